//! Append-only log of thinking steps with a textual summary.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::step::{MetadataValue, ThinkingStep};

/// Returned by [`StepLog::summary`] when nothing has been recorded.
pub const EMPTY_SUMMARY: &str = "The thinking process is empty.";

const RULE_WIDTH: usize = 70;

/// Ordered record of thinking steps for one logical task.
///
/// This is a faithful append log, not a sequencer: step numbers are stored
/// exactly as given.
#[derive(Debug, Clone, Default)]
pub struct StepLog {
    steps: Vec<ThinkingStep>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step unconditionally and return a reference to it.
    pub fn add_step(
        &mut self,
        thought: impl Into<String>,
        step_number: u32,
        total_steps: u32,
        metadata: Option<BTreeMap<String, serde_json::Value>>,
    ) -> &ThinkingStep {
        self.steps.push(ThinkingStep::new(
            thought,
            step_number,
            total_steps,
            metadata.unwrap_or_default(),
        ));
        let index = self.steps.len() - 1;
        &self.steps[index]
    }

    /// First recorded step carrying `step_number`, if any.
    pub fn get_step(&self, step_number: u32) -> Option<&ThinkingStep> {
        self.steps.iter().find(|step| step.step_number == step_number)
    }

    pub fn steps(&self) -> &[ThinkingStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Multi-line rendering of every step in append order.
    pub fn summary(&self) -> String {
        if self.steps.is_empty() {
            return EMPTY_SUMMARY.to_string();
        }

        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "STRUCTURED THINKING PROCESS ({} steps)",
            self.steps.len()
        );
        let _ = writeln!(out, "{rule}");
        out.push('\n');

        for step in &self.steps {
            let _ = writeln!(out, "Step {}/{}:", step.step_number, step.total_steps);
            let _ = writeln!(out, "  {}", step.thought);
            for (key, value) in &step.metadata {
                let _ = writeln!(out, "  └─ {key}: {}", MetadataValue(value));
            }
            out.push('\n');
        }

        let _ = writeln!(out, "{rule}");
        out
    }

    /// Drop every recorded step; returns how many were removed.
    pub fn reset(&mut self) -> usize {
        let cleared = self.steps.len();
        self.steps.clear();
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn log_with_three_steps() -> StepLog {
        let mut log = StepLog::new();
        log.add_step("Define the problem", 1, 3, None);
        log.add_step("Weigh the options", 2, 3, None);
        log.add_step("Recommend a plan", 3, 3, None);
        log
    }

    #[test]
    fn empty_log_renders_designated_message() {
        assert_eq!(StepLog::new().summary(), EMPTY_SUMMARY);
    }

    #[test]
    fn summary_keeps_append_order() {
        let summary = log_with_three_steps().summary();

        let first = summary.find("Define the problem").expect("step 1 rendered");
        let second = summary.find("Weigh the options").expect("step 2 rendered");
        let third = summary.find("Recommend a plan").expect("step 3 rendered");
        assert!(first < second && second < third);
        assert!(summary.contains("Step 1/3:"));
        assert!(summary.contains("Step 3/3:"));
        assert!(summary.contains("(3 steps)"));
    }

    #[test]
    fn summary_renders_metadata_pairs() {
        let mut log = StepLog::new();
        let metadata = BTreeMap::from([
            ("context".to_string(), json!("Data Analysis")),
            ("sources".to_string(), json!(3)),
        ]);
        log.add_step("Scan the inputs", 1, 5, Some(metadata));

        let expected = [
            "=".repeat(70),
            "STRUCTURED THINKING PROCESS (1 steps)".to_string(),
            "=".repeat(70),
            String::new(),
            "Step 1/5:".to_string(),
            "  Scan the inputs".to_string(),
            "  └─ context: Data Analysis".to_string(),
            "  └─ sources: 3".to_string(),
            String::new(),
            "=".repeat(70),
            String::new(),
        ]
        .join("\n");
        assert_eq!(log.summary(), expected);
    }

    #[test]
    fn step_numbers_are_stored_verbatim() {
        let mut log = StepLog::new();
        log.add_step("late", 7, 3, None);
        log.add_step("again", 7, 3, None);
        log.add_step("early", 1, 3, None);

        let numbers: Vec<u32> = log.steps().iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![7, 7, 1]);
        assert_eq!(log.get_step(7).map(|s| s.thought.as_str()), Some("late"));
        assert!(log.get_step(2).is_none());
    }

    #[test]
    fn reset_clears_and_reports_count() {
        let mut log = log_with_three_steps();
        assert_eq!(log.reset(), 3);
        assert!(log.is_empty());
        assert_eq!(log.summary(), EMPTY_SUMMARY);

        log.add_step("Fresh start", 1, 1, None);
        let summary = log.summary();
        assert!(summary.contains("Fresh start"));
        assert!(!summary.contains("Define the problem"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn add_step_returns_the_recorded_step() {
        let mut log = StepLog::new();
        let step = log.add_step("Only step", 1, 1, None);
        assert_eq!(step.thought, "Only step");
        assert!(step.metadata.is_empty());
    }
}
