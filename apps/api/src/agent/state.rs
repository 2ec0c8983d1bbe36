//! Workflow State: the per-question record threaded through every orchestration node.
//!
//! Created fresh per question, owned by the orchestrator for the duration of one run,
//! and converted into an `AnswerResult` at the terminal node.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::agent::tools::ExtractionTool;

/// `extracted_info` bookkeeping key holding the classifier's complexity label.
pub const COMPLEXITY_KEY: &str = "complexity";
/// `extracted_info` key holding the assembled context blob. Never returned to callers.
pub const CONTEXT_ANALYSIS_KEY: &str = "context_analysis";
/// `extracted_info` key holding the validator's verdict record.
pub const VALIDATION_KEY: &str = "validation";

// ────────────────────────────────────────────────────────────────────────────
// Classification
// ────────────────────────────────────────────────────────────────────────────

/// What a question is about. Produced by the classifier from free-text model output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Experience,
    Skills,
    Education,
    Projects,
    Personal,
    Career,
    #[default]
    General,
    /// The model answered with a label outside the known set.
    Unrecognized,
}

impl QuestionType {
    /// Lenient parse: never fails, unknown labels become `Unrecognized`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "experience" => Self::Experience,
            "skills" => Self::Skills,
            "education" => Self::Education,
            "projects" => Self::Projects,
            "personal" => Self::Personal,
            "career" => Self::Career,
            "general" => Self::General,
            _ => Self::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Experience => "experience",
            Self::Skills => "skills",
            Self::Education => "education",
            Self::Projects => "projects",
            Self::Personal => "personal",
            Self::Career => "career",
            Self::General => "general",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much reasoning a question needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    #[default]
    Simple,
    Complex,
    Analytical,
}

impl Complexity {
    /// Lenient parse: unknown labels degrade to `Simple`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "complex" => Self::Complex,
            "analytical" => Self::Analytical,
            _ => Self::Simple,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Complex => "complex",
            Self::Analytical => "analytical",
        }
    }

    /// Complex and analytical questions get the career-progression tool appended.
    pub fn needs_career_analysis(&self) -> bool {
        matches!(self, Self::Complex | Self::Analytical)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Nodes
// ────────────────────────────────────────────────────────────────────────────

/// The seven orchestration steps. Names are the ones recorded in `workflow_path`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Classifier,
    ToolSelector,
    InformationExtractor,
    ContextAnalyzer,
    AnswerGenerator,
    QualityValidator,
    ConfidenceCalculator,
}

impl Node {
    pub const ALL: [Node; 7] = [
        Node::Classifier,
        Node::ToolSelector,
        Node::InformationExtractor,
        Node::ContextAnalyzer,
        Node::AnswerGenerator,
        Node::QualityValidator,
        Node::ConfidenceCalculator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Node::Classifier => "classifier",
            Node::ToolSelector => "tool_selector",
            Node::InformationExtractor => "information_extractor",
            Node::ContextAnalyzer => "context_analyzer",
            Node::AnswerGenerator => "answer_generator",
            Node::QualityValidator => "quality_validator",
            Node::ConfidenceCalculator => "confidence_calculator",
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extracted info
// ────────────────────────────────────────────────────────────────────────────

/// Accumulates tool outputs and intermediate fields. Keys are added or overwritten,
/// never removed, within one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedInfo(BTreeMap<String, String>);

impl ExtractedInfo {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The caller-facing view: everything except the context blob.
    pub fn without_context_analysis(&self) -> ExtractedInfo {
        ExtractedInfo(
            self.0
                .iter()
                .filter(|(k, _)| k.as_str() != CONTEXT_ANALYSIS_KEY)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Workflow state
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct WorkflowState {
    pub document_text: Arc<str>,
    pub question: String,
    pub question_type: QuestionType,
    pub complexity: Complexity,
    pub extracted_info: ExtractedInfo,
    pub tools_used: Vec<ExtractionTool>,
    /// Append-only audit trail, one entry per node execution.
    pub workflow_path: Vec<Node>,
    pub answer_attempts: u32,
    pub final_answer: String,
    pub confidence_score: f64,
}

impl WorkflowState {
    pub fn new(document_text: Arc<str>, question: impl Into<String>) -> Self {
        Self {
            document_text,
            question: question.into(),
            question_type: QuestionType::default(),
            complexity: Complexity::default(),
            extracted_info: ExtractedInfo::default(),
            tools_used: Vec::new(),
            workflow_path: Vec::new(),
            answer_attempts: 0,
            final_answer: String::new(),
            confidence_score: 0.0,
        }
    }

    /// Records one node execution.
    pub fn visit(&mut self, node: Node) {
        self.workflow_path.push(node);
    }

    /// Total node executions so far, repeats included.
    pub fn executions(&self) -> usize {
        self.workflow_path.len()
    }

    /// Writes the classifier's outcome, mirroring complexity into `extracted_info`.
    pub fn set_classification(&mut self, question_type: QuestionType, complexity: Complexity) {
        self.question_type = question_type;
        self.complexity = complexity;
        self.extracted_info.insert(COMPLEXITY_KEY, complexity.as_str());
    }

    /// The validator's verdict record, empty before the first validation.
    pub fn validation(&self) -> &str {
        self.extracted_info.get(VALIDATION_KEY).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_parse_is_lenient() {
        assert_eq!(QuestionType::parse("Skills"), QuestionType::Skills);
        assert_eq!(QuestionType::parse("  career \n"), QuestionType::Career);
        assert_eq!(QuestionType::parse("hobbies"), QuestionType::Unrecognized);
        assert_eq!(QuestionType::parse(""), QuestionType::Unrecognized);
    }

    #[test]
    fn test_complexity_unknown_degrades_to_simple() {
        assert_eq!(Complexity::parse("ANALYTICAL"), Complexity::Analytical);
        assert_eq!(Complexity::parse("complex"), Complexity::Complex);
        assert_eq!(Complexity::parse("very hard"), Complexity::Simple);
    }

    #[test]
    fn test_node_serializes_as_snake_case_name() {
        for node in Node::ALL {
            let json = serde_json::to_value(node).unwrap();
            assert_eq!(json, node.as_str());
        }
    }

    #[test]
    fn test_set_classification_mirrors_complexity() {
        let mut state = WorkflowState::new(Arc::from("cv"), "Where did they study?");
        state.set_classification(QuestionType::Education, Complexity::Complex);

        assert_eq!(state.question_type, QuestionType::Education);
        assert_eq!(state.extracted_info.get(COMPLEXITY_KEY), Some("complex"));
    }

    #[test]
    fn test_without_context_analysis_drops_only_that_key() {
        let mut info = ExtractedInfo::default();
        info.insert(COMPLEXITY_KEY, "simple");
        info.insert(CONTEXT_ANALYSIS_KEY, "big blob");
        info.insert(VALIDATION_KEY, "APROVADO");

        let visible = info.without_context_analysis();
        assert!(!visible.contains_key(CONTEXT_ANALYSIS_KEY));
        assert_eq!(visible.len(), 2);
        assert_eq!(info.len(), 3);
    }

    #[test]
    fn test_new_state_starts_empty() {
        let state = WorkflowState::new(Arc::from("cv text"), "q");
        assert_eq!(state.executions(), 0);
        assert_eq!(state.answer_attempts, 0);
        assert_eq!(state.validation(), "");
    }
}
