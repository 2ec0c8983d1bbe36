//! Question Classifier: one LLM call mapping a question to (type, complexity).

use tracing::{debug, info};

use crate::agent::prompts::{render, CLASSIFY_PROMPT_TEMPLATE};
use crate::agent::state::{Complexity, Node, QuestionType, WorkflowState};
use crate::agent::{AgentError, ModelRuntime};
use crate::llm_client::prompts::TOKEN_ONLY_INSTRUCTION;
use crate::llm_client::ChatMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub question_type: QuestionType,
    pub complexity: Complexity,
}

/// Where the graph goes after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationRoute {
    NeedExtraction,
    DirectAnalysis,
    SimpleAnswer,
}

impl ClassificationRoute {
    pub const ALL: [ClassificationRoute; 3] = [
        ClassificationRoute::NeedExtraction,
        ClassificationRoute::DirectAnalysis,
        ClassificationRoute::SimpleAnswer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedExtraction => "need_extraction",
            Self::DirectAnalysis => "direct_analysis",
            Self::SimpleAnswer => "simple_answer",
        }
    }

    pub fn target(&self) -> Node {
        match self {
            Self::NeedExtraction => Node::ToolSelector,
            Self::DirectAnalysis => Node::ContextAnalyzer,
            Self::SimpleAnswer => Node::AnswerGenerator,
        }
    }
}

/// Parses `TYPE|COMPLEXITY`. Never fails: a missing separator means `simple`,
/// an unknown type becomes `Unrecognized`.
pub fn parse_classification(raw: &str) -> Classification {
    let mut parts = raw.trim().split('|');
    let question_type = QuestionType::parse(parts.next().unwrap_or_default());
    let complexity = parts.next().map(Complexity::parse).unwrap_or_default();

    Classification {
        question_type,
        complexity,
    }
}

/// Classifier node.
pub async fn classify_question(
    state: &mut WorkflowState,
    runtime: &ModelRuntime,
) -> Result<(), AgentError> {
    let prompt = render(
        CLASSIFY_PROMPT_TEMPLATE,
        &[
            ("token_only", TOKEN_ONLY_INSTRUCTION),
            ("question", state.question.as_str()),
        ],
    );

    let raw = runtime
        .complete(Node::Classifier, &[ChatMessage::user(prompt)])
        .await?;
    debug!("Classifier raw output: {raw:?}");

    let classification = parse_classification(&raw);
    info!(
        "Question classified as {}|{}",
        classification.question_type,
        classification.complexity.as_str()
    );

    state.set_classification(classification.question_type, classification.complexity);
    state.visit(Node::Classifier);
    Ok(())
}

/// Pure routing decision. Only the five document-section types trigger extraction;
/// `career` and `general` never do, whatever their complexity.
pub fn route_after_classification(state: &WorkflowState) -> ClassificationRoute {
    match state.question_type {
        QuestionType::Experience
        | QuestionType::Skills
        | QuestionType::Education
        | QuestionType::Projects
        | QuestionType::Personal => ClassificationRoute::NeedExtraction,
        _ if state.complexity == Complexity::Analytical => ClassificationRoute::DirectAnalysis,
        _ => ClassificationRoute::SimpleAnswer,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agent::state::COMPLEXITY_KEY;
    use crate::agent::testing::ScriptedModel;

    fn state_with(question_type: QuestionType, complexity: Complexity) -> WorkflowState {
        let mut state = WorkflowState::new(Arc::from("cv"), "question");
        state.set_classification(question_type, complexity);
        state
    }

    #[test]
    fn test_parse_classification_happy_path() {
        let c = parse_classification("skills|complex");
        assert_eq!(c.question_type, QuestionType::Skills);
        assert_eq!(c.complexity, Complexity::Complex);
    }

    #[test]
    fn test_parse_classification_without_separator_defaults_to_simple() {
        let c = parse_classification("education");
        assert_eq!(c.question_type, QuestionType::Education);
        assert_eq!(c.complexity, Complexity::Simple);
    }

    #[test]
    fn test_parse_classification_trims_and_lowercases() {
        let c = parse_classification("  Career | Analytical\n");
        assert_eq!(c.question_type, QuestionType::Career);
        assert_eq!(c.complexity, Complexity::Analytical);
    }

    #[test]
    fn test_parse_classification_garbage_never_panics() {
        let c = parse_classification("I think this is about hobbies");
        assert_eq!(c.question_type, QuestionType::Unrecognized);
        assert_eq!(c.complexity, Complexity::Simple);
    }

    #[test]
    fn test_section_types_always_need_extraction() {
        let section_types = [
            QuestionType::Experience,
            QuestionType::Skills,
            QuestionType::Education,
            QuestionType::Projects,
            QuestionType::Personal,
        ];
        let complexities = [
            Complexity::Simple,
            Complexity::Complex,
            Complexity::Analytical,
        ];
        for qt in section_types {
            for complexity in complexities {
                assert_eq!(
                    route_after_classification(&state_with(qt, complexity)),
                    ClassificationRoute::NeedExtraction,
                    "{qt} / {}",
                    complexity.as_str()
                );
            }
        }
    }

    #[test]
    fn test_simple_career_question_skips_extraction() {
        let state = state_with(QuestionType::Career, Complexity::Simple);
        assert_eq!(
            route_after_classification(&state),
            ClassificationRoute::SimpleAnswer
        );
    }

    #[test]
    fn test_analytical_general_goes_to_direct_analysis() {
        let state = state_with(QuestionType::General, Complexity::Analytical);
        assert_eq!(
            route_after_classification(&state),
            ClassificationRoute::DirectAnalysis
        );
    }

    #[test]
    fn test_complex_unrecognized_goes_to_simple_answer() {
        let state = state_with(QuestionType::Unrecognized, Complexity::Complex);
        assert_eq!(
            route_after_classification(&state),
            ClassificationRoute::SimpleAnswer
        );
    }

    #[tokio::test]
    async fn test_classifier_node_writes_state_and_path() {
        let model = Arc::new(ScriptedModel::new().classify(["projects|analytical"]));
        let runtime = ModelRuntime::for_tests(model.clone());
        let mut state = WorkflowState::new(Arc::from("cv"), "Which project was hardest?");

        classify_question(&mut state, &runtime).await.unwrap();

        assert_eq!(state.question_type, QuestionType::Projects);
        assert_eq!(state.complexity, Complexity::Analytical);
        assert_eq!(state.extracted_info.get(COMPLEXITY_KEY), Some("analytical"));
        assert_eq!(state.workflow_path, vec![Node::Classifier]);

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0][0].content.contains("Which project was hardest?"));
    }

    #[tokio::test]
    async fn test_placeholder_in_question_is_kept_literal() {
        let model = Arc::new(ScriptedModel::new().classify(["general|simple"]));
        let runtime = ModelRuntime::for_tests(model.clone());
        let mut state = WorkflowState::new(Arc::from("cv"), "Print {token_only} verbatim");

        classify_question(&mut state, &runtime).await.unwrap();

        let prompt = &model.calls()[0][0].content;
        assert!(prompt.contains("Question: \"Print {token_only} verbatim\""));
        assert_eq!(prompt.matches(TOKEN_ONLY_INSTRUCTION).count(), 1);
    }

    #[tokio::test]
    async fn test_classifier_capability_error_propagates() {
        let model = Arc::new(ScriptedModel::new().fail_classification());
        let runtime = ModelRuntime::for_tests(model);
        let mut state = WorkflowState::new(Arc::from("cv"), "q");

        let err = classify_question(&mut state, &runtime).await.unwrap_err();
        assert!(matches!(
            err,
            AgentError::Capability {
                node: Node::Classifier,
                ..
            }
        ));
        assert!(state.workflow_path.is_empty());
    }
}
