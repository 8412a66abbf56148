//! Scheme: the element registry and its mutation API.

use indexmap::IndexMap;
use tracing::debug;

use super::types::{Connection, ElementId, Position};
use crate::elements::{Element, ElementKind, ElementParams};
use crate::engine::{self, EngineConfig, RunReport};
use crate::error::{Result, SchemeError};

/// A network of logic elements.
///
/// The scheme exclusively owns its elements, keyed by id in insertion
/// order. Every mutation validates before it touches any state, so a
/// failed call leaves the scheme unchanged.
#[derive(Debug, Clone, Default)]
pub struct Scheme {
    elements: IndexMap<ElementId, Element>,
    config: EngineConfig,
}

impl Scheme {
    /// Create an empty scheme with the default engine configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scheme with a custom engine configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            elements: IndexMap::new(),
            config,
        }
    }

    /// Engine configuration used by [`Scheme::run`].
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    /// Look up an element.
    pub fn get(&self, id: &str) -> Result<&Element> {
        self.elements.get(id).ok_or_else(|| SchemeError::unknown_id(id))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Element> {
        self.elements.get_mut(id).ok_or_else(|| SchemeError::unknown_id(id))
    }

    /// Iterate over elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Element ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &ElementId> {
        self.elements.keys()
    }

    pub(crate) fn elements(&self) -> &IndexMap<ElementId, Element> {
        &self.elements
    }

    pub(crate) fn elements_mut(&mut self) -> &mut IndexMap<ElementId, Element> {
        &mut self.elements
    }

    /// Create and register a new, unconnected element.
    pub fn add_element(
        &mut self,
        element_type: &str,
        id: &str,
        position: impl Into<Position>,
        params: &ElementParams,
    ) -> Result<()> {
        if self.contains(id) {
            return Err(SchemeError::DuplicateId { id: id.to_string() });
        }
        let kind = ElementKind::from_type_name(element_type, params)?;
        debug!(id, element_type = kind.element_type().as_str(), "adding element");
        let id = ElementId::from(id);
        self.elements
            .insert(id.clone(), Element::new(id, kind, position.into()));
        Ok(())
    }

    /// Connect `source.output_label` to `destination.input_label`.
    pub fn add_connection(
        &mut self,
        source_id: &str,
        output_label: &str,
        destination_id: &str,
        input_label: &str,
    ) -> Result<()> {
        let source = self.get(source_id)?;
        let destination = self.get(destination_id)?;
        source.output(output_label)?;
        if destination.input(input_label)?.is_some() {
            return Err(SchemeError::InputAlreadyConnected {
                id: destination_id.to_string(),
                label: input_label.to_string(),
            });
        }

        let connection = Connection::new(source_id, output_label, destination_id, input_label);
        debug!(%connection, "adding connection");
        self.get_mut(source_id)?
            .push_output_connection(connection.clone());
        self.get_mut(destination_id)?
            .set_input_connection(connection);
        Ok(())
    }

    /// Remove an element after severing every connection that touches it.
    pub fn delete_element(&mut self, id: &str) -> Result<()> {
        let element = self
            .elements
            .shift_remove(id)
            .ok_or_else(|| SchemeError::unknown_id(id))?;

        // Everything below is infallible: the element is already out of the
        // registry and its neighbours are cleaned up unconditionally.
        for connection in element.outputs().values().flatten() {
            if let Some(destination) = self.elements.get_mut(connection.destination().as_str()) {
                destination.clear_input_connection(connection.input_label());
            }
        }
        for connection in element.inputs().values().flatten() {
            if let Some(source) = self.elements.get_mut(connection.source().as_str()) {
                source.remove_output_connection(connection);
            }
        }
        debug!(id, "deleted element");
        Ok(())
    }

    /// Remove a connection.
    ///
    /// Clears every connection registered under `source.output_label`
    /// (and the matching input slot on each destination), not only the
    /// named edge. The named `destination.input_label` slot is always
    /// cleared; if another source fed it, that source forgets the edge.
    pub fn delete_connection(
        &mut self,
        source_id: &str,
        output_label: &str,
        destination_id: &str,
        input_label: &str,
    ) -> Result<()> {
        self.get(source_id)?.output(output_label)?;
        self.get(destination_id)?.input(input_label)?;

        let removed = self.get_mut(source_id)?.take_output_connections(output_label);
        for connection in &removed {
            if let Some(destination) = self.elements.get_mut(connection.destination().as_str()) {
                if destination.input(connection.input_label()).ok().flatten() == Some(connection) {
                    destination.clear_input_connection(connection.input_label());
                }
            }
        }
        let other = self.get_mut(destination_id)?.clear_input_connection(input_label);
        if let Some(connection) = other {
            if let Some(source) = self.elements.get_mut(connection.source().as_str()) {
                source.remove_output_connection(&connection);
            }
        }
        debug!(
            source_id,
            output_label,
            destination_id,
            input_label,
            removed = removed.len(),
            "deleted connection"
        );
        Ok(())
    }

    /// Move an element. Metadata only.
    pub fn move_element(&mut self, id: &str, position: impl Into<Position>) -> Result<()> {
        self.get_mut(id)?.set_position(position.into());
        Ok(())
    }

    /// Toggle a variable's value.
    pub fn switch(&mut self, id: &str) -> Result<()> {
        match self.get_mut(id)?.kind_mut() {
            ElementKind::Variable(v) => {
                v.switch();
                Ok(())
            }
            _ => Err(SchemeError::NotSwitchable {
                id: id.to_string(),
                operation: "switch".to_string(),
            }),
        }
    }

    /// Toggle a flip-flop's enable.
    pub fn switch_enable(&mut self, id: &str) -> Result<()> {
        match self.get_mut(id)?.kind_mut() {
            ElementKind::SrFlipFlop(ff) => ff.enabled = !ff.enabled,
            ElementKind::DFlipFlop(ff) => ff.enabled = !ff.enabled,
            _ => {
                return Err(SchemeError::NotSwitchable {
                    id: id.to_string(),
                    operation: "switch_enable".to_string(),
                })
            }
        }
        Ok(())
    }

    /// Delete every element and connection.
    pub fn clear(&mut self) {
        let ids: Vec<ElementId> = self.elements.keys().cloned().collect();
        for id in ids {
            // Ids come from the registry itself
            let _ = self.delete_element(id.as_str());
        }
    }

    /// Evaluate the scheme with its own configuration.
    pub fn run(&mut self) -> Result<RunReport> {
        let config = self.config.clone();
        self.run_with(&config)
    }

    /// Evaluate the scheme with an explicit configuration.
    ///
    /// On error the retained flip-flop bits and last committed values are
    /// left as they were before the call.
    pub fn run_with(&mut self, config: &EngineConfig) -> Result<RunReport> {
        engine::run(self, config)
    }
}

impl<'a> IntoIterator for &'a Scheme {
    type Item = &'a Element;
    type IntoIter = indexmap::map::Values<'a, ElementId, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::validate_scheme;

    fn params() -> ElementParams {
        ElementParams::new()
    }

    fn pair() -> Scheme {
        let mut s = Scheme::new();
        s.add_element("constant", "c", (0.0, 0.0), &params().with("value", 1)).unwrap();
        s.add_element("and", "g", (1.0, 0.0), &params()).unwrap();
        s.add_connection("c", "out", "g", "in1").unwrap();
        s
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut s = pair();
        let err = s.add_element("or", "g", (0.0, 0.0), &params()).unwrap_err();
        assert!(matches!(err, SchemeError::DuplicateId { .. }));
        assert_eq!(s.get("g").unwrap().element_type().as_str(), "AND");
    }

    #[test]
    fn test_invalid_arity_leaves_scheme_unchanged() {
        let mut s = Scheme::new();
        let err = s
            .add_element("xor", "x", (0.0, 0.0), &params().with("inputs", 1))
            .unwrap_err();
        assert!(matches!(err, SchemeError::InvalidArity { .. }));
        assert!(s.is_empty());
    }

    #[test]
    fn test_connection_recorded_on_both_ends() {
        let s = pair();
        let conn = s.get("g").unwrap().input("in1").unwrap().unwrap().clone();
        assert_eq!(s.get("c").unwrap().output("out").unwrap(), &[conn]);
        validate_scheme(&s).unwrap();
    }

    #[test]
    fn test_connection_label_errors() {
        let mut s = pair();
        assert!(matches!(
            s.add_connection("c", "q", "g", "in2"),
            Err(SchemeError::UnknownOutputLabel { .. })
        ));
        assert!(matches!(
            s.add_connection("c", "out", "g", "in9"),
            Err(SchemeError::UnknownInputLabel { .. })
        ));
        assert!(matches!(
            s.add_connection("nope", "out", "g", "in2"),
            Err(SchemeError::UnknownId { .. })
        ));
        assert_eq!(s.get("c").unwrap().output("out").unwrap().len(), 1);
    }

    #[test]
    fn test_occupied_input_keeps_prior_connection() {
        let mut s = pair();
        s.add_element("constant", "c2", (0.0, 1.0), &params()).unwrap();
        let err = s.add_connection("c2", "out", "g", "in1").unwrap_err();
        assert!(matches!(err, SchemeError::InputAlreadyConnected { .. }));

        let conn = s.get("g").unwrap().input("in1").unwrap().unwrap();
        assert_eq!(conn.source().as_str(), "c");
        assert!(s.get("c2").unwrap().output("out").unwrap().is_empty());
    }

    #[test]
    fn test_delete_element_clears_neighbour_slots() {
        let mut s = pair();
        s.add_element("not", "n", (2.0, 0.0), &params()).unwrap();
        s.add_connection("g", "out", "n", "in").unwrap();

        s.delete_element("g").unwrap();
        assert!(s.get("c").unwrap().output("out").unwrap().is_empty());
        assert_eq!(s.get("n").unwrap().input("in").unwrap(), None);
        validate_scheme(&s).unwrap();

        assert!(matches!(s.delete_element("g"), Err(SchemeError::UnknownId { .. })));
    }

    #[test]
    fn test_delete_element_keeps_other_fan_out() {
        let mut s = pair();
        s.add_element("or", "o", (1.0, 1.0), &params()).unwrap();
        s.add_connection("c", "out", "o", "in2").unwrap();
        s.delete_element("g").unwrap();
        let remaining = s.get("c").unwrap().output("out").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].destination().as_str(), "o");
        validate_scheme(&s).unwrap();
    }

    #[test]
    fn test_add_then_delete_restores_ids() {
        let mut s = pair();
        let before: Vec<_> = s.ids().cloned().collect();
        s.add_element("decoder", "d", (5.0, 5.0), &params()).unwrap();
        s.delete_element("d").unwrap();
        assert_eq!(s.ids().cloned().collect::<Vec<_>>(), before);
    }

    #[test]
    fn test_delete_connection_clears_whole_output_label() {
        let mut s = pair();
        s.add_connection("c", "out", "g", "in2").unwrap();
        s.delete_connection("c", "out", "g", "in1").unwrap();
        assert!(s.get("c").unwrap().output("out").unwrap().is_empty());
        assert_eq!(s.get("g").unwrap().input("in1").unwrap(), None);
        assert_eq!(s.get("g").unwrap().input("in2").unwrap(), None);
        validate_scheme(&s).unwrap();
    }

    #[test]
    fn test_delete_connection_clears_named_slot_fed_elsewhere() {
        let mut s = pair();
        s.add_element("constant", "d", (0.0, 1.0), &params()).unwrap();
        s.delete_connection("c", "out", "g", "in1").unwrap();
        s.add_connection("c", "out", "g", "in2").unwrap();
        s.add_connection("d", "out", "g", "in1").unwrap();

        s.delete_connection("c", "out", "g", "in1").unwrap();
        assert_eq!(s.get("g").unwrap().input("in1").unwrap(), None);
        assert_eq!(s.get("g").unwrap().input("in2").unwrap(), None);
        assert!(s.get("c").unwrap().output("out").unwrap().is_empty());
        assert!(s.get("d").unwrap().output("out").unwrap().is_empty());
        validate_scheme(&s).unwrap();
    }

    #[test]
    fn test_self_loop_delete() {
        let mut s = Scheme::new();
        s.add_element("not", "n", (0.0, 0.0), &params()).unwrap();
        s.add_connection("n", "out", "n", "in").unwrap();
        s.delete_element("n").unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn test_move_and_switch() {
        let mut s = pair();
        s.move_element("g", (3.5, -2.0)).unwrap();
        approx::assert_relative_eq!(s.get("g").unwrap().position().x, 3.5);
        approx::assert_relative_eq!(s.get("g").unwrap().position().y, -2.0);
        assert!(matches!(s.move_element("zz", (0.0, 0.0)), Err(SchemeError::UnknownId { .. })));

        assert!(matches!(s.switch("g"), Err(SchemeError::NotSwitchable { .. })));
        assert!(matches!(s.switch_enable("c"), Err(SchemeError::NotSwitchable { .. })));
    }

    #[test]
    fn test_clear() {
        let mut s = pair();
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.iter().count(), 0);
    }

    #[test]
    fn test_iteration_in_insertion_order() {
        let mut s = Scheme::new();
        for id in ["z", "a", "m"] {
            s.add_element("variable", id, (0.0, 0.0), &params()).unwrap();
        }
        let ids: Vec<&str> = (&s).into_iter().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }
}
