//! Confidence Scorer: deterministic post-hoc estimate in [0, 1].
//!
//! confidence = 0.4·[validation contains APROVADO]
//!            + min(0.1·tools, 0.3)
//!            + min(0.03·path_len, 0.2)
//!            + max(0.1 − 0.05·(attempts − 1), 0)
//!
//! Computed in integer percentage points so boundary values come out exact.

use tracing::info;

use crate::agent::state::{Node, WorkflowState};
use crate::agent::validator::APPROVED_TOKEN;

const VALIDATION_POINTS: i64 = 40;
const POINTS_PER_TOOL: i64 = 10;
const MAX_TOOL_POINTS: i64 = 30;
const POINTS_PER_STEP: i64 = 3;
const MAX_STEP_POINTS: i64 = 20;
const ATTEMPT_POINTS: i64 = 10;
const RETRY_PENALTY_POINTS: i64 = 5;

pub fn compute_confidence(
    validation: &str,
    tools_used: usize,
    workflow_len: usize,
    attempts: u32,
) -> f64 {
    let validation_points = if validation.contains(APPROVED_TOKEN) {
        VALIDATION_POINTS
    } else {
        0
    };
    let tool_points = (POINTS_PER_TOOL * tools_used as i64).min(MAX_TOOL_POINTS);
    let step_points = (POINTS_PER_STEP * workflow_len as i64).min(MAX_STEP_POINTS);
    let attempt_points =
        (ATTEMPT_POINTS - RETRY_PENALTY_POINTS * (i64::from(attempts) - 1)).max(0);

    let total = validation_points + tool_points + step_points + attempt_points;
    (total.clamp(0, 100) as f64) / 100.0
}

/// Confidence calculator node, the terminal step. Scores the path walked so far,
/// then records itself.
pub fn calculate_confidence(state: &mut WorkflowState) {
    state.confidence_score = compute_confidence(
        state.validation(),
        state.tools_used.len(),
        state.workflow_path.len(),
        state.answer_attempts,
    );
    info!("Confidence score: {:.2}", state.confidence_score);
    state.visit(Node::ConfidenceCalculator);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agent::state::VALIDATION_KEY;
    use crate::agent::tools::ExtractionTool;

    #[test]
    fn test_maxed_out_inputs_score_exactly_one() {
        assert_eq!(compute_confidence("APROVADO", 5, 10, 1), 1.0);
    }

    #[test]
    fn test_nothing_and_two_retries_scores_exactly_zero() {
        assert_eq!(compute_confidence("REJEITAR_VAGUE", 0, 0, 3), 0.0);
    }

    #[test]
    fn test_typical_extraction_run() {
        // 0.4 + 0.2 + min(0.18, 0.2) + 0.1 = 0.88
        let score = compute_confidence("APROVADO", 2, 6, 1);
        assert!((score - 0.88).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_forced_approval_still_counts_as_approved() {
        let forced = compute_confidence("APROVADO (attempt limit reached)", 1, 12, 3);
        // 0.4 + 0.1 + 0.2 + 0.0
        assert!((forced - 0.7).abs() < 1e-9, "Score was {forced}");
    }

    #[test]
    fn test_zero_attempts_gets_bonus_but_stays_clamped() {
        // 0.4 + 0.3 + 0.2 + 0.15 clamps to 1.0
        assert_eq!(compute_confidence("APROVADO", 3, 7, 0), 1.0);
    }

    #[test]
    fn test_node_scores_before_recording_itself() {
        let mut state = WorkflowState::new(Arc::from("cv"), "q");
        state.extracted_info.insert(VALIDATION_KEY, "APROVADO");
        state.tools_used = vec![ExtractionTool::ExtractSkills];
        state.answer_attempts = 1;
        for node in [
            Node::Classifier,
            Node::ToolSelector,
            Node::InformationExtractor,
            Node::ContextAnalyzer,
            Node::AnswerGenerator,
            Node::QualityValidator,
        ] {
            state.visit(node);
        }

        calculate_confidence(&mut state);

        // 0.4 + 0.1 + 0.18 + 0.1
        assert!((state.confidence_score - 0.78).abs() < 1e-9);
        assert_eq!(
            state.workflow_path.last(),
            Some(&Node::ConfidenceCalculator)
        );
    }
}
