//! Structural checks over a scheme.

use std::collections::HashMap;

use crate::error::{Result, SchemeError};

use super::{ElementId, Scheme};

/// Check that the pin tables of all elements agree with each other.
///
/// Checks:
/// - Every connection references elements present in the scheme
/// - Every input-slot connection appears in its source's output list
/// - Every output-list connection occupies its destination's input slot
pub fn validate_scheme(scheme: &Scheme) -> Result<()> {
    for element in scheme.iter() {
        for (label, slot) in element.inputs() {
            let Some(connection) = slot else { continue };
            if connection.input_label() != label || connection.destination() != element.id() {
                return Err(mismatch(element.id(), label));
            }
            let source = scheme.get(connection.source().as_str())?;
            if !source.output(connection.output_label())?.contains(connection) {
                return Err(mismatch(element.id(), label));
            }
        }
        for (label, list) in element.outputs() {
            for connection in list {
                if connection.output_label() != label || connection.source() != element.id() {
                    return Err(mismatch(element.id(), label));
                }
                let destination = scheme.get(connection.destination().as_str())?;
                if destination.input(connection.input_label())? != Some(connection) {
                    return Err(mismatch(element.id(), label));
                }
            }
        }
    }
    Ok(())
}

fn mismatch(id: &ElementId, label: &str) -> SchemeError {
    SchemeError::InconsistentPins {
        id: id.to_string(),
        label: label.to_string(),
    }
}

/// Find one feedback loop, returned as the element ids along it.
///
/// Feedback is legal; the engine reports oscillating pins as unresolved.
/// This is for callers that want to warn about it or reject it.
pub fn find_feedback(scheme: &Scheme) -> Option<Vec<ElementId>> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Open,
        Active,
        Done,
    }

    let ids: Vec<&ElementId> = scheme.ids().collect();
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();
    let successors: Vec<Vec<usize>> = scheme
        .iter()
        .map(|element| {
            element
                .outputs()
                .values()
                .flatten()
                .filter_map(|c| index.get(c.destination().as_str()).copied())
                .collect()
        })
        .collect();

    let mut marks = vec![Mark::Open; ids.len()];
    for root in 0..ids.len() {
        if marks[root] != Mark::Open {
            continue;
        }
        // Iterative DFS; `path` mirrors the Active nodes on the stack
        let mut stack = vec![(root, 0usize)];
        let mut path = vec![root];
        marks[root] = Mark::Active;
        while let Some((node, next)) = stack.last_mut() {
            let node = *node;
            if let Some(&succ) = successors[node].get(*next) {
                *next += 1;
                match marks[succ] {
                    Mark::Active => {
                        let start = path.iter().position(|&n| n == succ).unwrap_or(0);
                        return Some(path[start..].iter().map(|&n| ids[n].clone()).collect());
                    }
                    Mark::Open => {
                        marks[succ] = Mark::Active;
                        stack.push((succ, 0));
                        path.push(succ);
                    }
                    Mark::Done => {}
                }
            } else {
                marks[node] = Mark::Done;
                stack.pop();
                path.pop();
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementParams;

    #[test]
    fn test_chain_has_no_feedback() {
        let mut s = Scheme::new();
        let p = ElementParams::new();
        s.add_element("variable", "v", (0.0, 0.0), &p).unwrap();
        s.add_element("not", "a", (1.0, 0.0), &p).unwrap();
        s.add_element("not", "b", (2.0, 0.0), &p).unwrap();
        s.add_connection("v", "out", "a", "in").unwrap();
        s.add_connection("a", "out", "b", "in").unwrap();
        assert_eq!(find_feedback(&s), None);
        validate_scheme(&s).unwrap();
    }

    #[test]
    fn test_ring_is_reported() {
        let mut s = Scheme::new();
        let p = ElementParams::new();
        for id in ["x", "a", "b", "c"] {
            s.add_element("not", id, (0.0, 0.0), &p).unwrap();
        }
        s.add_connection("x", "out", "a", "in").unwrap();
        s.add_connection("a", "out", "b", "in").unwrap();
        s.add_connection("b", "out", "c", "in").unwrap();
        s.add_connection("c", "out", "a", "in").unwrap_err();
        s.delete_connection("x", "out", "a", "in").unwrap();
        s.add_connection("c", "out", "a", "in").unwrap();

        let ring = find_feedback(&s).unwrap();
        let names: Vec<&str> = ring.iter().map(ElementId::as_str).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_self_loop_is_reported() {
        let mut s = Scheme::new();
        s.add_element("not", "n", (0.0, 0.0), &ElementParams::new()).unwrap();
        s.add_connection("n", "out", "n", "in").unwrap();
        assert_eq!(find_feedback(&s), Some(vec![ElementId::from("n")]));
    }
}
