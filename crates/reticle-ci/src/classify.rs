//! Simulation outcome classification.
//!
//! Vivado exits 0 even when a testbench assertion fails, so the testbench
//! prints [`FAILURE_MARKER`] and the harness looks for it in stdout.

use serde::{Deserialize, Serialize};

/// Literal token printed by the simulation testbenches on assertion failure.
pub const FAILURE_MARKER: &str = "~~FAIL~~";

/// Content-level verdict for captured simulator output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Classify simulator output.
///
/// Returns [`Verdict::Fail`] if [`FAILURE_MARKER`] occurs anywhere in
/// `output` (first occurrence is enough; position and surrounding text do
/// not matter), otherwise [`Verdict::Pass`].
pub fn classify(output: &str) -> Verdict {
    if output.contains(FAILURE_MARKER) {
        Verdict::Fail
    } else {
        Verdict::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_in_middle_fails() {
        assert_eq!(classify("running...\n~~FAIL~~\ndone"), Verdict::Fail);
    }

    #[test]
    fn test_clean_output_passes() {
        assert_eq!(
            classify("running...\nall assertions passed\ndone"),
            Verdict::Pass
        );
    }

    #[test]
    fn test_marker_position_irrelevant() {
        assert_eq!(classify("~~FAIL~~"), Verdict::Fail);
        assert_eq!(classify("~~FAIL~~ then the preamble"), Verdict::Fail);
        assert_eq!(classify("preamble\n\n\nlast line ~~FAIL~~"), Verdict::Fail);
        assert_eq!(classify("[tb] x=3 expected=4 ~~FAIL~~ at 120ns"), Verdict::Fail);
    }

    #[test]
    fn test_partial_marker_passes() {
        assert_eq!(classify(""), Verdict::Pass);
        assert_eq!(classify("~~FAIL~"), Verdict::Pass);
        assert_eq!(classify("FAIL"), Verdict::Pass);
        assert_eq!(classify("~~fail~~"), Verdict::Pass);
        assert_eq!(classify("~~ FAIL ~~"), Verdict::Pass);
    }

    #[test]
    fn test_repeated_marker_fails() {
        assert_eq!(classify("~~FAIL~~\n~~FAIL~~"), Verdict::Fail);
    }

    #[test]
    fn test_verdict_is_pass() {
        assert!(Verdict::Pass.is_pass());
        assert!(!Verdict::Fail.is_pass());
    }
}
