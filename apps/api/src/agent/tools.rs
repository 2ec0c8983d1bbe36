//! Extraction tools: the six document-extraction capabilities, the tool selector
//! and the information extractor node.
//!
//! Each tool is a single model call with a fixed template. Outputs are kept as the
//! model's raw text; the templates ask for JSON but nothing here parses it.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::agent::prompts::{
    ANALYZE_CAREER_PROGRESSION_TEMPLATE, EXTRACT_EDUCATION_TEMPLATE,
    EXTRACT_EXPERIENCE_TEMPLATE, EXTRACT_PERSONAL_INFO_TEMPLATE, EXTRACT_PROJECTS_TEMPLATE,
    EXTRACT_SKILLS_TEMPLATE, render,
};
use crate::agent::state::{Complexity, Node, QuestionType, WorkflowState};
use crate::agent::ModelRuntime;
use crate::llm_client::prompts::EXTRACTION_GROUNDING;
use crate::llm_client::{ChatMessage, LlmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionTool {
    ExtractExperience,
    ExtractSkills,
    ExtractEducation,
    ExtractProjects,
    ExtractPersonalInfo,
    AnalyzeCareerProgression,
}

impl ExtractionTool {
    pub const ALL: [ExtractionTool; 6] = [
        ExtractionTool::ExtractExperience,
        ExtractionTool::ExtractSkills,
        ExtractionTool::ExtractEducation,
        ExtractionTool::ExtractProjects,
        ExtractionTool::ExtractPersonalInfo,
        ExtractionTool::AnalyzeCareerProgression,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::ExtractExperience => "extract_experience",
            Self::ExtractSkills => "extract_skills",
            Self::ExtractEducation => "extract_education",
            Self::ExtractProjects => "extract_projects",
            Self::ExtractPersonalInfo => "extract_personal_info",
            Self::AnalyzeCareerProgression => "analyze_career_progression",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ExtractExperience => "Extracts detailed professional experience from the CV",
            Self::ExtractSkills => "Extracts technical skills and competencies",
            Self::ExtractEducation => "Extracts academic background and certifications",
            Self::ExtractProjects => "Extracts projects and achievements",
            Self::ExtractPersonalInfo => "Extracts personal and contact information",
            Self::AnalyzeCareerProgression => "Analyses career progression and growth",
        }
    }

    pub(crate) fn template(&self) -> &'static str {
        match self {
            Self::ExtractExperience => EXTRACT_EXPERIENCE_TEMPLATE,
            Self::ExtractSkills => EXTRACT_SKILLS_TEMPLATE,
            Self::ExtractEducation => EXTRACT_EDUCATION_TEMPLATE,
            Self::ExtractProjects => EXTRACT_PROJECTS_TEMPLATE,
            Self::ExtractPersonalInfo => EXTRACT_PERSONAL_INFO_TEMPLATE,
            Self::AnalyzeCareerProgression => ANALYZE_CAREER_PROGRESSION_TEMPLATE,
        }
    }

    pub fn build_prompt(&self, cv_text: &str) -> String {
        render(
            self.template(),
            &[("grounding", EXTRACTION_GROUNDING), ("cv_text", cv_text)],
        )
    }

    /// Runs the tool against the document text, returning the model's raw reply.
    pub async fn run(&self, cv_text: &str, runtime: &ModelRuntime) -> Result<String, LlmError> {
        runtime
            .invoke(&[ChatMessage::user(self.build_prompt(cv_text))])
            .await
    }
}

impl fmt::Display for ExtractionTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tool selection
// ────────────────────────────────────────────────────────────────────────────

/// Base tool list per question type.
pub fn tools_for(question_type: QuestionType) -> &'static [ExtractionTool] {
    use ExtractionTool::*;

    match question_type {
        QuestionType::Experience => &[ExtractExperience, AnalyzeCareerProgression],
        QuestionType::Skills => &[ExtractSkills],
        QuestionType::Education => &[ExtractEducation],
        QuestionType::Projects => &[ExtractProjects],
        QuestionType::Personal => &[ExtractPersonalInfo],
        QuestionType::Career => &[ExtractExperience, AnalyzeCareerProgression],
        QuestionType::General => &[ExtractExperience, ExtractSkills, ExtractEducation],
        QuestionType::Unrecognized => &[ExtractExperience],
    }
}

/// Base list plus the career-progression tool for complex and analytical questions,
/// appended once and never duplicated.
pub fn plan_tools(question_type: QuestionType, complexity: Complexity) -> Vec<ExtractionTool> {
    let mut tools = tools_for(question_type).to_vec();
    if complexity.needs_career_analysis()
        && !tools.contains(&ExtractionTool::AnalyzeCareerProgression)
    {
        tools.push(ExtractionTool::AnalyzeCareerProgression);
    }
    tools
}

/// Tool selector node.
pub fn select_tools(state: &mut WorkflowState) {
    state.tools_used = plan_tools(state.question_type, state.complexity);
    info!(
        "Selected tools: {}",
        state
            .tools_used
            .iter()
            .map(ExtractionTool::name)
            .collect::<Vec<_>>()
            .join(", ")
    );
    state.visit(Node::ToolSelector);
}

/// Information extractor node. A failing tool is recorded as an error string under
/// its own key and never aborts the run.
pub async fn extract_information(state: &mut WorkflowState, runtime: &ModelRuntime) {
    for tool in state.tools_used.clone() {
        debug!("Running tool {tool}");
        let value = match tool.run(&state.document_text, runtime).await {
            Ok(output) => output,
            Err(e) => {
                error!("Tool {tool} failed: {e}");
                format!("Extraction error: {e}")
            }
        };
        state.extracted_info.insert(tool.name(), value);
    }
    state.visit(Node::InformationExtractor);
}
