use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::agent::state::{ExtractedInfo, Node, QuestionType, WorkflowState};
use crate::agent::tools::ExtractionTool;

/// What `answer()` hands back to the service layer.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResult {
    pub run_id: Uuid,
    pub question: String,
    pub answer: String,
    pub confidence: f64,
    pub workflow_path: Vec<Node>,
    pub tools_used: Vec<ExtractionTool>,
    pub question_type: QuestionType,
    pub attempts: u32,
    /// Everything the run extracted, minus the context blob.
    pub extracted_info: ExtractedInfo,
    pub timestamp: DateTime<Utc>,
}

impl AnswerResult {
    pub fn from_state(run_id: Uuid, state: WorkflowState) -> Self {
        Self {
            run_id,
            extracted_info: state.extracted_info.without_context_analysis(),
            question: state.question,
            answer: state.final_answer,
            confidence: state.confidence_score,
            workflow_path: state.workflow_path,
            tools_used: state.tools_used,
            question_type: state.question_type,
            attempts: state.answer_attempts,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agent::state::{Complexity, CONTEXT_ANALYSIS_KEY};

    #[test]
    fn test_serialized_result_uses_wire_names() {
        let mut state = WorkflowState::new(Arc::from("cv"), "Latest role?");
        state.set_classification(QuestionType::Experience, Complexity::Simple);
        state.tools_used = vec![ExtractionTool::ExtractExperience];
        state.visit(Node::Classifier);
        state.visit(Node::ToolSelector);
        state.extracted_info.insert(CONTEXT_ANALYSIS_KEY, "blob");
        state.final_answer = "Staff engineer".to_string();

        let json = serde_json::to_value(AnswerResult::from_state(Uuid::new_v4(), state)).unwrap();

        assert_eq!(json["question_type"], "experience");
        assert_eq!(json["tools_used"][0], "extract_experience");
        assert_eq!(json["workflow_path"][1], "tool_selector");
        assert_eq!(json["extracted_info"]["complexity"], "simple");
        assert!(json["extracted_info"].get("context_analysis").is_none());
        assert!(json["timestamp"].is_string());
    }
}
