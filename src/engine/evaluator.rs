//! Settle-then-detect-period evaluation loop.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::report::{Level, RunReport};
use super::wiring::Wiring;
use super::DEFAULT_MAX_TICKS;
use crate::error::{Result, SchemeError};
use crate::scheme::Scheme;

/// Configuration for the evaluation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum period-detection ticks before giving up.
    pub max_ticks: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the period-detection tick cap.
    ///
    /// The settle phase is not counted. A cap of 0 makes every run fail.
    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks;
        self
    }
}

/// Evaluate `scheme`, committing outputs and retained bits only on success.
pub(crate) fn run(scheme: &mut Scheme, config: &EngineConfig) -> Result<RunReport> {
    let elements = scheme.elements();
    let wiring = Wiring::compile(elements)?;

    // Tick 0 is whatever the previous run left behind
    let mut outputs: Vec<Vec<bool>> = elements
        .values()
        .map(|e| e.value().map(|(_, v)| v).collect())
        .collect();
    let mut retained: Vec<bool> = elements
        .values()
        .map(|e| e.kind().retained().unwrap_or(false))
        .collect();

    // Unequal path depths can briefly drive an SR flip-flop to S = R = 1
    // here; it holds its bit until the inputs have propagated.
    let settle_ticks = elements.len();
    for tick in 0..settle_ticks {
        outputs = wiring.tick(elements, &outputs, &mut retained, true)?;
        trace!(tick, phase = "settle", "tick committed");
    }

    let mut levels: Vec<Vec<Level>> = outputs
        .iter()
        .map(|pins| pins.iter().map(|&b| Level::from(b)).collect())
        .collect();
    let mut seen: HashMap<Vec<bool>, usize> = HashMap::new();
    let mut detection_ticks = 0usize;
    let period = loop {
        if detection_ticks >= config.max_ticks {
            return Err(SchemeError::DidNotConverge {
                max_ticks: config.max_ticks,
            });
        }
        let next = wiring.tick(elements, &outputs, &mut retained, false)?;
        detection_ticks += 1;

        // The first comparison is against the settle snapshot
        mark_changes(&mut levels, &next, &outputs);
        outputs = next;
        trace!(tick = detection_ticks, phase = "detect", "tick committed");

        let flat: Vec<bool> = outputs.iter().flatten().copied().collect();
        if let Some(first) = seen.get(&flat) {
            break detection_ticks - first;
        }
        seen.insert(flat, detection_ticks);
    };

    let values: IndexMap<_, _> = elements
        .iter()
        .zip(levels)
        .map(|((id, element), pins)| {
            let named = element
                .outputs()
                .keys()
                .cloned()
                .zip(pins)
                .collect::<IndexMap<String, Level>>();
            (id.clone(), named)
        })
        .collect();

    debug!(
        elements = elements.len(),
        settle_ticks, detection_ticks, period, "run finished"
    );

    for ((element, pins), bit) in scheme
        .elements_mut()
        .values_mut()
        .zip(outputs)
        .zip(retained)
    {
        element.set_value(pins);
        element.kind_mut().set_retained(bit);
    }

    Ok(RunReport {
        values,
        settle_ticks,
        detection_ticks,
        period,
    })
}

/// Mark every pin that differs between two consecutive ticks as unresolved.
fn mark_changes(levels: &mut [Vec<Level>], next: &[Vec<bool>], previous: &[Vec<bool>]) {
    for ((level_pins, new_pins), old_pins) in levels.iter_mut().zip(next).zip(previous) {
        for ((level, &new), &old) in level_pins.iter_mut().zip(new_pins).zip(old_pins) {
            if new != old {
                *level = Level::Unresolved;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementKind, ElementParams};

    fn params() -> ElementParams {
        ElementParams::new()
    }

    fn constant(s: &mut Scheme, id: &str, value: bool) {
        s.add_element("constant", id, (0.0, 0.0), &params().with("value", value as u32))
            .unwrap();
    }

    #[test]
    fn test_empty_scheme() {
        let report = Scheme::new().run().unwrap();
        assert_eq!(report.iter().count(), 0);
        assert_eq!(report.period(), 1);
    }

    #[test]
    fn test_not_self_loop_is_unresolved() {
        let mut s = Scheme::new();
        s.add_element("not", "n", (0.0, 0.0), &params()).unwrap();
        s.add_connection("n", "out", "n", "in").unwrap();

        let report = s.run().unwrap();
        assert_eq!(report.get("n", "out"), Some(Level::Unresolved));
        assert_eq!(report.period(), 2);
        assert!(!report.is_stable());
        assert_eq!(report.to_string(), "n.out = X\n");
    }

    #[test]
    fn test_long_not_chain_settles() {
        let mut s = Scheme::new();
        constant(&mut s, "c", true);
        let mut prev = "c".to_string();
        for i in 0..9 {
            let id = format!("n{}", i);
            s.add_element("not", &id, (i as f64, 0.0), &params()).unwrap();
            s.add_connection(&prev, "out", &id, "in").unwrap();
            prev = id;
        }
        let report = s.run().unwrap();
        assert!(report.is_stable());
        assert_eq!(report.period(), 1);
        // nine inversions of a high constant
        assert_eq!(report.get("n8", "out"), Some(Level::Low));
        assert_eq!(report.get("n7", "out"), Some(Level::High));
        assert!(!s.get("n8").unwrap().output_value("out").unwrap());
    }

    #[test]
    fn test_open_inputs_read_low_for_every_type() {
        for name in crate::elements::type_names() {
            let mut s = Scheme::new();
            s.add_element(name, "e", (0.0, 0.0), &params()).unwrap();
            let element = s.get("e").unwrap().clone();
            let lows = vec![false; element.inputs().len()];
            let expected = element.evaluate(&lows, &mut false, false).unwrap();

            let report = s.run().unwrap();
            let got: Vec<Option<bool>> = report
                .element("e")
                .unwrap()
                .values()
                .map(Level::as_bool)
                .collect();
            let expected: Vec<Option<bool>> = expected.into_iter().map(Some).collect();
            assert_eq!(got, expected, "type {}", name);
        }
    }

    #[test]
    fn test_gates_through_scheme() {
        for (name, expect) in [("and", false), ("or", true), ("xor", false), ("nand", true), ("nor", false)] {
            let mut s = Scheme::new();
            constant(&mut s, "a", true);
            constant(&mut s, "b", false);
            constant(&mut s, "c", true);
            s.add_element(name, "g", (0.0, 0.0), &params().with("inputs", 3)).unwrap();
            s.add_connection("a", "out", "g", "in1").unwrap();
            s.add_connection("b", "out", "g", "in2").unwrap();
            s.add_connection("c", "out", "g", "in3").unwrap();
            assert_eq!(s.run().unwrap().get("g", "out"), Some(Level::from(expect)), "{}", name);
        }
    }

    #[test]
    fn test_decoder_and_encoder_back_to_back() {
        let mut s = Scheme::new();
        constant(&mut s, "b0", true);
        constant(&mut s, "b1", false);
        constant(&mut s, "b2", true);
        s.add_element("decoder", "dec", (0.0, 0.0), &params().with("inputs", 3)).unwrap();
        s.add_element("encoder", "enc", (0.0, 0.0), &params().with("outputs", 3)).unwrap();
        for (i, b) in ["b0", "b1", "b2"].iter().enumerate() {
            s.add_connection(b, "out", "dec", &format!("in{}", i + 1)).unwrap();
        }
        for i in 1..=8 {
            s.add_connection("dec", &format!("out{}", i), "enc", &format!("in{}", i)).unwrap();
        }
        let report = s.run().unwrap();
        // 0b101 = 5 -> out6 high
        assert_eq!(report.get("dec", "out6"), Some(Level::High));
        assert_eq!(report.get("dec", "out5"), Some(Level::Low));
        assert_eq!(report.get("enc", "out1"), Some(Level::High));
        assert_eq!(report.get("enc", "out2"), Some(Level::Low));
        assert_eq!(report.get("enc", "out3"), Some(Level::High));
    }

    #[test]
    fn test_full_adder_chain() {
        let mut s = Scheme::new();
        constant(&mut s, "one", true);
        s.add_element("fulladder", "fa", (0.0, 0.0), &params()).unwrap();
        s.add_connection("one", "out", "fa", "A").unwrap();
        s.add_connection("one", "out", "fa", "Cin").unwrap();
        let report = s.run().unwrap();
        assert_eq!(report.get("fa", "S"), Some(Level::Low));
        assert_eq!(report.get("fa", "Cout"), Some(Level::High));
    }

    #[test]
    fn test_sr_flip_flop_sequence() {
        let mut s = Scheme::new();
        s.add_element("variable", "s", (0.0, 0.0), &params().with("value", 1)).unwrap();
        s.add_element("variable", "r", (0.0, 1.0), &params()).unwrap();
        s.add_element("srflipflop", "ff", (1.0, 0.0), &params()).unwrap();
        s.add_connection("s", "out", "ff", "S").unwrap();
        s.add_connection("r", "out", "ff", "R").unwrap();

        // enabled, S=1 R=0
        assert_eq!(s.run().unwrap().get("ff", "Q"), Some(Level::High));

        // enabled, S=0 R=0 holds
        s.switch("s").unwrap();
        assert_eq!(s.run().unwrap().get("ff", "Q"), Some(Level::High));

        // enabled, S=1 R=1 is forbidden
        s.switch("s").unwrap();
        s.switch("r").unwrap();
        let err = s.run().unwrap_err();
        assert!(matches!(err, SchemeError::ForbiddenLatchState { ref id } if id == "ff"));
        assert_eq!(s.get("ff").unwrap().kind().retained(), Some(true));

        // disabled, S=0 R=1 leaves Q alone
        s.switch_enable("ff").unwrap();
        s.switch("s").unwrap();
        assert_eq!(s.run().unwrap().get("ff", "Q"), Some(Level::High));
    }

    #[test]
    fn test_sr_flip_flop_ignores_settling_glitch() {
        // R arrives one gate later than S, so S = R = 1 for one settle tick
        let mut s = Scheme::new();
        s.add_element("variable", "v", (0.0, 0.0), &params().with("value", 1)).unwrap();
        s.add_element("not", "n", (1.0, 1.0), &params()).unwrap();
        s.add_element("srflipflop", "ff", (2.0, 0.0), &params()).unwrap();
        s.add_connection("v", "out", "n", "in").unwrap();
        s.add_connection("v", "out", "ff", "S").unwrap();
        s.add_connection("n", "out", "ff", "R").unwrap();

        let report = s.run().unwrap();
        assert_eq!(report.get("ff", "Q"), Some(Level::High));
        assert!(report.is_stable());

        s.switch("v").unwrap();
        assert_eq!(s.run().unwrap().get("ff", "Q"), Some(Level::Low));
    }

    #[test]
    fn test_change_against_settle_snapshot_is_unresolved() {
        let settled = vec![vec![true, false]];
        let mut levels = vec![vec![Level::High, Level::Low]];
        mark_changes(&mut levels, &[vec![false, false]], &settled);
        assert_eq!(levels, [[Level::Unresolved, Level::Low]]);

        // once unresolved, a pin stays unresolved
        mark_changes(&mut levels, &[vec![false, false]], &[vec![false, false]]);
        assert_eq!(levels[0][0], Level::Unresolved);
    }

    #[test]
    fn test_d_flip_flop_latches_only_when_enabled() {
        let mut s = Scheme::new();
        s.add_element("variable", "d", (0.0, 0.0), &params().with("value", 1)).unwrap();
        s.add_element("dflipflop", "ff", (1.0, 0.0), &params()).unwrap();
        s.add_connection("d", "out", "ff", "D").unwrap();
        assert_eq!(s.run().unwrap().get("ff", "Q"), Some(Level::High));

        s.switch_enable("ff").unwrap();
        s.switch("d").unwrap();
        assert_eq!(s.run().unwrap().get("ff", "Q"), Some(Level::High));

        s.switch_enable("ff").unwrap();
        assert_eq!(s.run().unwrap().get("ff", "Q"), Some(Level::Low));
        assert!(matches!(
            s.get("ff").unwrap().kind(),
            ElementKind::DFlipFlop(ff) if ff.enabled && !ff.state
        ));
    }

    #[test]
    fn test_tick_cap_reports_non_convergence() {
        let mut s = Scheme::new();
        s.add_element("not", "n", (0.0, 0.0), &params()).unwrap();
        s.add_connection("n", "out", "n", "in").unwrap();
        let before: Vec<bool> = s.get("n").unwrap().value().map(|(_, v)| v).collect();

        let err = s.run_with(&EngineConfig::new().with_max_ticks(2)).unwrap_err();
        assert!(matches!(err, SchemeError::DidNotConverge { max_ticks: 2 }));
        let after: Vec<bool> = s.get("n").unwrap().value().map(|(_, v)| v).collect();
        assert_eq!(before, after);

        assert!(s.run_with(&EngineConfig::new().with_max_ticks(3)).is_ok());
    }

    #[test]
    fn test_oscillator_next_to_stable_logic() {
        let mut s = Scheme::new();
        s.add_element("not", "osc", (0.0, 0.0), &params()).unwrap();
        s.add_connection("osc", "out", "osc", "in").unwrap();
        constant(&mut s, "c", true);
        s.add_element("and", "g", (0.0, 0.0), &params()).unwrap();
        s.add_connection("c", "out", "g", "in1").unwrap();
        s.add_connection("c", "out", "g", "in2").unwrap();
        s.add_element("or", "h", (0.0, 0.0), &params()).unwrap();
        s.add_connection("osc", "out", "h", "in1").unwrap();
        s.add_connection("c", "out", "h", "in2").unwrap();

        let report = s.run().unwrap();
        assert_eq!(report.get("osc", "out"), Some(Level::Unresolved));
        assert_eq!(report.get("g", "out"), Some(Level::High));
        // OR with a high input stays high even though one input oscillates
        assert_eq!(report.get("h", "out"), Some(Level::High));
        let unresolved: Vec<_> = report.unresolved().map(|(id, pin)| (id.as_str(), pin)).collect();
        assert_eq!(unresolved, [("osc", "out")]);
    }

    #[test]
    fn test_multiplexer_feedback_latch_holds() {
        // out fed back to in1; sel=1 (select in2) loads the data constant,
        // then sel=0 keeps it circulating.
        let mut s = Scheme::new();
        s.add_element("variable", "sel", (0.0, 0.0), &params().with("value", 1)).unwrap();
        constant(&mut s, "data", true);
        s.add_element("multiplexer", "m", (0.0, 0.0), &params()).unwrap();
        s.add_connection("sel", "out", "m", "sel1").unwrap();
        s.add_connection("data", "out", "m", "in2").unwrap();
        s.add_connection("m", "out", "m", "in1").unwrap();
        assert_eq!(s.run().unwrap().get("m", "out"), Some(Level::High));

        s.switch("sel").unwrap();
        let report = s.run().unwrap();
        assert_eq!(report.get("m", "out"), Some(Level::High));
        assert!(report.is_stable());
    }

    #[test]
    fn test_adder_subtractor_through_scheme() {
        // 2 - 3 = -1 -> 0b11 with no carry
        let mut s = Scheme::new();
        constant(&mut s, "hi", true);
        s.add_element("addersubtractor", "alu", (0.0, 0.0), &params().with("bits", 2)).unwrap();
        for pin in ["A1", "B0", "B1", "sub"] {
            s.add_connection("hi", "out", "alu", pin).unwrap();
        }
        let report = s.run().unwrap();
        assert_eq!(report.get("alu", "S0"), Some(Level::High));
        assert_eq!(report.get("alu", "S1"), Some(Level::High));
        assert_eq!(report.get("alu", "Cout"), Some(Level::Low));
    }
}
