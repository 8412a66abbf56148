//! Index-resolved view of the connections, built once per run.

use indexmap::IndexMap;

use crate::elements::Element;
use crate::error::{Result, SchemeError};
use crate::scheme::ElementId;

/// Where an input pin reads from: `(source element index, output pin index)`.
type Tap = Option<(usize, usize)>;

/// Connections of a scheme resolved to registry indices.
pub(crate) struct Wiring {
    /// Per element, one tap per input pin in pin order
    taps: Vec<Vec<Tap>>,
}

impl Wiring {
    pub(crate) fn compile(elements: &IndexMap<ElementId, Element>) -> Result<Self> {
        let taps = elements
            .values()
            .map(|element| {
                element
                    .inputs()
                    .values()
                    .map(|slot| match slot {
                        None => Ok(None),
                        Some(connection) => {
                            let (index, _, source) = elements
                                .get_full(connection.source().as_str())
                                .ok_or_else(|| SchemeError::unknown_id(connection.source().as_str()))?;
                            let pin = source.output_index(connection.output_label())?;
                            Ok(Some((index, pin)))
                        }
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { taps })
    }

    /// Compute one tick from the previous committed outputs.
    ///
    /// `retained` holds the working flip-flop bits, one per element.
    /// `settling` is forwarded to [`Element::evaluate`].
    pub(crate) fn tick(
        &self,
        elements: &IndexMap<ElementId, Element>,
        previous: &[Vec<bool>],
        retained: &mut [bool],
        settling: bool,
    ) -> Result<Vec<Vec<bool>>> {
        let mut inputs = Vec::new();
        elements
            .values()
            .zip(&self.taps)
            .zip(retained.iter_mut())
            .map(|((element, taps), bit)| {
                inputs.clear();
                // Open inputs read as logic low
                inputs.extend(
                    taps.iter()
                        .map(|tap| tap.map_or(false, |(source, pin)| previous[source][pin])),
                );
                element.evaluate(&inputs, bit, settling)
            })
            .collect()
    }
}
