//! Logic element models.
//!
//! This module provides every element a scheme can contain:
//! - Gates: AND, OR, XOR, NAND, NOR (n inputs), NOT
//! - Sources: Constant, Variable
//! - Coders: Multiplexer, Encoder, Decoder
//! - Arithmetic: Full Adder, Adder-Subtractor, Right Shifter
//! - Sequential: gated SR and D flip-flops
//!
//! An [`Element`] couples one of these models with its pin tables. Pin
//! names and their order are fixed at construction from the type and its
//! size parameters.

mod arithmetic;
mod coders;
mod flipflops;
mod gates;
mod params;
mod sources;

pub use arithmetic::{AdderSubtractor, FullAdder, RightShifter};
pub use coders::{Decoder, Encoder, Multiplexer};
pub use flipflops::{GatedDFlipFlop, GatedSrFlipFlop};
pub use gates::{GateOp, LogicGate, NotGate};
pub use params::{ElementParams, MAX_ADDRESS_LINES, MAX_WIDTH};
pub use sources::{Constant, Variable};

use indexmap::IndexMap;

use crate::error::{Result, SchemeError};
use crate::scheme::{Connection, ElementId, Position};

/// Type tag of an element, as reported to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Not,
    Constant,
    Variable,
    Multiplexer,
    Encoder,
    Decoder,
    FullAdder,
    AdderSubtractor,
    Shifter,
    SrFlipFlop,
    DFlipFlop,
}

impl ElementType {
    /// Upper-case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
            Self::Nand => "NAND",
            Self::Nor => "NOR",
            Self::Not => "NOT",
            Self::Constant => "CONSTANT",
            Self::Variable => "VARIABLE",
            Self::Multiplexer => "MULTIPLEXER",
            Self::Encoder => "ENCODER",
            Self::Decoder => "DECODER",
            Self::FullAdder => "FULLADDER",
            Self::AdderSubtractor => "ADDERSUBTRACTOR",
            Self::Shifter => "SHIFTER",
            Self::SrFlipFlop => "SRFLIPFLOP",
            Self::DFlipFlop => "DFLIPFLOP",
        }
    }

    /// Whether the element keeps a bit between ticks.
    pub fn is_sequential(&self) -> bool {
        matches!(self, Self::SrFlipFlop | Self::DFlipFlop)
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds an element model from its parameters.
type Constructor = fn(&ElementParams) -> Result<ElementKind>;

fn and_gate(p: &ElementParams) -> Result<ElementKind> {
    LogicGate::from_params(GateOp::And, p).map(ElementKind::Gate)
}
fn or_gate(p: &ElementParams) -> Result<ElementKind> {
    LogicGate::from_params(GateOp::Or, p).map(ElementKind::Gate)
}
fn xor_gate(p: &ElementParams) -> Result<ElementKind> {
    LogicGate::from_params(GateOp::Xor, p).map(ElementKind::Gate)
}
fn nand_gate(p: &ElementParams) -> Result<ElementKind> {
    LogicGate::from_params(GateOp::Nand, p).map(ElementKind::Gate)
}
fn nor_gate(p: &ElementParams) -> Result<ElementKind> {
    LogicGate::from_params(GateOp::Nor, p).map(ElementKind::Gate)
}
fn not_gate(p: &ElementParams) -> Result<ElementKind> {
    NotGate::from_params(p).map(ElementKind::Not)
}
fn constant(p: &ElementParams) -> Result<ElementKind> {
    Constant::from_params(p).map(ElementKind::Constant)
}
fn variable(p: &ElementParams) -> Result<ElementKind> {
    Variable::from_params(p).map(ElementKind::Variable)
}
fn multiplexer(p: &ElementParams) -> Result<ElementKind> {
    Multiplexer::from_params(p).map(ElementKind::Multiplexer)
}
fn encoder(p: &ElementParams) -> Result<ElementKind> {
    Encoder::from_params(p).map(ElementKind::Encoder)
}
fn decoder(p: &ElementParams) -> Result<ElementKind> {
    Decoder::from_params(p).map(ElementKind::Decoder)
}
fn full_adder(p: &ElementParams) -> Result<ElementKind> {
    FullAdder::from_params(p).map(ElementKind::FullAdder)
}
fn adder_subtractor(p: &ElementParams) -> Result<ElementKind> {
    AdderSubtractor::from_params(p).map(ElementKind::AdderSubtractor)
}
fn shifter(p: &ElementParams) -> Result<ElementKind> {
    RightShifter::from_params(p).map(ElementKind::Shifter)
}
fn sr_flip_flop(p: &ElementParams) -> Result<ElementKind> {
    GatedSrFlipFlop::from_params(p).map(ElementKind::SrFlipFlop)
}
fn d_flip_flop(p: &ElementParams) -> Result<ElementKind> {
    GatedDFlipFlop::from_params(p).map(ElementKind::DFlipFlop)
}

/// Type names accepted by [`ElementKind::from_type_name`] (lower case).
const REGISTRY: &[(&str, Constructor)] = &[
    ("and", and_gate),
    ("or", or_gate),
    ("xor", xor_gate),
    ("nand", nand_gate),
    ("nor", nor_gate),
    ("not", not_gate),
    ("constant", constant),
    ("variable", variable),
    ("multiplexer", multiplexer),
    ("encoder", encoder),
    ("decoder", decoder),
    ("fulladder", full_adder),
    ("addersubtractor", adder_subtractor),
    ("shifter", shifter),
    ("rightshifter", shifter),
    ("srflipflop", sr_flip_flop),
    ("dflipflop", d_flip_flop),
];

/// Every registered type name.
pub fn type_names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(name, _)| *name)
}

/// Behavior of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Gate(LogicGate),
    Not(NotGate),
    Constant(Constant),
    Variable(Variable),
    Multiplexer(Multiplexer),
    Encoder(Encoder),
    Decoder(Decoder),
    FullAdder(FullAdder),
    AdderSubtractor(AdderSubtractor),
    Shifter(RightShifter),
    SrFlipFlop(GatedSrFlipFlop),
    DFlipFlop(GatedDFlipFlop),
}

impl ElementKind {
    /// Construct a model from a case-insensitive type name.
    pub fn from_type_name(type_name: &str, params: &ElementParams) -> Result<Self> {
        let wanted = type_name.to_lowercase();
        let (_, build) = REGISTRY
            .iter()
            .find(|(name, _)| *name == wanted)
            .ok_or_else(|| SchemeError::UnknownElementType {
                element_type: type_name.to_string(),
            })?;
        build(params)
    }

    /// Get the type tag.
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Gate(g) => match g.op {
                GateOp::And => ElementType::And,
                GateOp::Or => ElementType::Or,
                GateOp::Xor => ElementType::Xor,
                GateOp::Nand => ElementType::Nand,
                GateOp::Nor => ElementType::Nor,
            },
            ElementKind::Not(_) => ElementType::Not,
            ElementKind::Constant(_) => ElementType::Constant,
            ElementKind::Variable(_) => ElementType::Variable,
            ElementKind::Multiplexer(_) => ElementType::Multiplexer,
            ElementKind::Encoder(_) => ElementType::Encoder,
            ElementKind::Decoder(_) => ElementType::Decoder,
            ElementKind::FullAdder(_) => ElementType::FullAdder,
            ElementKind::AdderSubtractor(_) => ElementType::AdderSubtractor,
            ElementKind::Shifter(_) => ElementType::Shifter,
            ElementKind::SrFlipFlop(_) => ElementType::SrFlipFlop,
            ElementKind::DFlipFlop(_) => ElementType::DFlipFlop,
        }
    }

    /// Input pin names in evaluation order.
    pub fn input_labels(&self) -> Vec<String> {
        match self {
            ElementKind::Gate(g) => g.input_labels(),
            ElementKind::Not(_) => labels(&["in"]),
            ElementKind::Constant(_) | ElementKind::Variable(_) => Vec::new(),
            ElementKind::Multiplexer(m) => m.input_labels(),
            ElementKind::Encoder(e) => e.input_labels(),
            ElementKind::Decoder(d) => d.input_labels(),
            ElementKind::FullAdder(_) => labels(&["A", "B", "Cin"]),
            ElementKind::AdderSubtractor(a) => a.input_labels(),
            ElementKind::Shifter(s) => s.input_labels(),
            ElementKind::SrFlipFlop(_) => labels(&["S", "R"]),
            ElementKind::DFlipFlop(_) => labels(&["D"]),
        }
    }

    /// Output pin names in evaluation order.
    pub fn output_labels(&self) -> Vec<String> {
        match self {
            ElementKind::Encoder(e) => e.output_labels(),
            ElementKind::Decoder(d) => d.output_labels(),
            ElementKind::FullAdder(_) => labels(&["S", "Cout"]),
            ElementKind::AdderSubtractor(a) => a.output_labels(),
            ElementKind::Shifter(s) => s.output_labels(),
            ElementKind::SrFlipFlop(_) | ElementKind::DFlipFlop(_) => labels(&["Q"]),
            _ => labels(&["out"]),
        }
    }

    /// Retained bit of a sequential element.
    pub fn retained(&self) -> Option<bool> {
        match self {
            ElementKind::SrFlipFlop(ff) => Some(ff.state),
            ElementKind::DFlipFlop(ff) => Some(ff.state),
            _ => None,
        }
    }

    pub(crate) fn set_retained(&mut self, bit: bool) {
        match self {
            ElementKind::SrFlipFlop(ff) => ff.state = bit,
            ElementKind::DFlipFlop(ff) => ff.state = bit,
            _ => {}
        }
    }
}

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// A node of the scheme: a model plus its pin tables.
#[derive(Debug, Clone)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    position: Position,
    inputs: IndexMap<String, Option<Connection>>,
    outputs: IndexMap<String, Vec<Connection>>,
    /// Outputs committed by the last completed run, in output pin order
    value: Vec<bool>,
}

impl Element {
    /// Create an unconnected element.
    pub fn new(id: ElementId, kind: ElementKind, position: Position) -> Self {
        let inputs = kind.input_labels().into_iter().map(|l| (l, None)).collect();
        let outputs: IndexMap<String, Vec<Connection>> = kind
            .output_labels()
            .into_iter()
            .map(|l| (l, Vec::new()))
            .collect();
        let value = vec![false; outputs.len()];
        Self {
            id,
            kind,
            position,
            inputs,
            outputs,
            value,
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Input pin table: label to the connection feeding it, if any.
    pub fn inputs(&self) -> &IndexMap<String, Option<Connection>> {
        &self.inputs
    }

    /// Output pin table: label to every connection leaving it.
    pub fn outputs(&self) -> &IndexMap<String, Vec<Connection>> {
        &self.outputs
    }

    /// Connection on an input pin. Open pins give `Ok(None)`.
    pub fn input(&self, label: &str) -> Result<Option<&Connection>> {
        self.inputs
            .get(label)
            .map(Option::as_ref)
            .ok_or_else(|| SchemeError::UnknownInputLabel {
                id: self.id.to_string(),
                label: label.to_string(),
            })
    }

    /// Connections leaving an output pin.
    pub fn output(&self, label: &str) -> Result<&[Connection]> {
        self.outputs
            .get(label)
            .map(Vec::as_slice)
            .ok_or_else(|| self.unknown_output(label))
    }

    /// Position of an output pin in [`Element::value`] order.
    pub fn output_index(&self, label: &str) -> Result<usize> {
        self.outputs
            .get_index_of(label)
            .ok_or_else(|| self.unknown_output(label))
    }

    /// Outputs committed by the last run, by pin label.
    pub fn value(&self) -> impl Iterator<Item = (&str, bool)> {
        self.outputs.keys().map(String::as_str).zip(self.value.iter().copied())
    }

    /// Last committed level of one output pin.
    pub fn output_value(&self, label: &str) -> Result<bool> {
        Ok(self.value[self.output_index(label)?])
    }

    /// Total number of connections touching this element.
    pub fn connection_count(&self) -> usize {
        self.inputs.values().flatten().count() + self.outputs.values().map(Vec::len).sum::<usize>()
    }

    fn unknown_output(&self, label: &str) -> SchemeError {
        SchemeError::UnknownOutputLabel {
            id: self.id.to_string(),
            label: label.to_string(),
        }
    }

    /// Compute outputs from input levels, one per input pin in pin order.
    ///
    /// `retained` is the working copy of a flip-flop's stored bit and is
    /// updated in place; other elements ignore it. While `settling`, an
    /// SR flip-flop sampling S = R = 1 holds its bit instead of failing.
    pub(crate) fn evaluate(&self, inputs: &[bool], retained: &mut bool, settling: bool) -> Result<Vec<bool>> {
        if inputs.len() != self.inputs.len() {
            return Err(SchemeError::InputCountMismatch {
                id: self.id.to_string(),
                expected: self.inputs.len(),
                got: inputs.len(),
            });
        }
        let out = match &self.kind {
            ElementKind::Gate(g) => vec![g.evaluate(inputs)],
            ElementKind::Not(n) => vec![n.evaluate(inputs[0])],
            ElementKind::Constant(c) => vec![c.value],
            ElementKind::Variable(v) => vec![v.value],
            ElementKind::Multiplexer(m) => vec![m.evaluate(inputs)],
            ElementKind::Encoder(e) => e.evaluate(inputs),
            ElementKind::Decoder(d) => d.evaluate(inputs),
            ElementKind::FullAdder(fa) => fa.evaluate(inputs[0], inputs[1], inputs[2]).to_vec(),
            ElementKind::AdderSubtractor(a) => a.evaluate(inputs),
            ElementKind::Shifter(s) => s.evaluate(inputs),
            ElementKind::SrFlipFlop(ff) => {
                match ff.next_state(inputs[0], inputs[1], *retained) {
                    Some(state) => *retained = state,
                    None if settling => {}
                    None => {
                        return Err(SchemeError::ForbiddenLatchState {
                            id: self.id.to_string(),
                        })
                    }
                }
                vec![*retained]
            }
            ElementKind::DFlipFlop(ff) => {
                *retained = ff.next_state(inputs[0], *retained);
                vec![*retained]
            }
        };
        Ok(out)
    }

    // ---- mutation, reserved for the owning scheme ----

    pub(crate) fn kind_mut(&mut self) -> &mut ElementKind {
        &mut self.kind
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn set_value(&mut self, value: Vec<bool>) {
        debug_assert_eq!(value.len(), self.outputs.len());
        self.value = value;
    }

    /// Store a connection on an input pin. The caller has validated the label.
    pub(crate) fn set_input_connection(&mut self, connection: Connection) {
        if let Some(slot) = self.inputs.get_mut(connection.input_label()) {
            *slot = Some(connection);
        }
    }

    pub(crate) fn clear_input_connection(&mut self, label: &str) -> Option<Connection> {
        self.inputs.get_mut(label).and_then(Option::take)
    }

    /// Append a connection to an output pin. The caller has validated the label.
    pub(crate) fn push_output_connection(&mut self, connection: Connection) {
        if let Some(list) = self.outputs.get_mut(connection.output_label()) {
            list.push(connection);
        }
    }

    /// Remove one specific connection from its output pin.
    pub(crate) fn remove_output_connection(&mut self, connection: &Connection) {
        if let Some(list) = self.outputs.get_mut(connection.output_label()) {
            list.retain(|c| c != connection);
        }
    }

    /// Remove and return every connection leaving an output pin.
    pub(crate) fn take_output_connections(&mut self, label: &str) -> Vec<Connection> {
        self.outputs.get_mut(label).map(std::mem::take).unwrap_or_default()
    }
}
