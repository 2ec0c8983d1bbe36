//! Answer Generator: persona prompt + assembled context + question.

use tracing::info;

use crate::agent::prompts::{
    CAREER_PERSONA, EDUCATION_PERSONA, EXPERIENCE_PERSONA, GENERATION_PROMPT_TEMPLATE,
    GENERIC_PERSONA, PROJECTS_PERSONA, SKILLS_PERSONA, render,
};
use crate::agent::state::{Node, QuestionType, WorkflowState, CONTEXT_ANALYSIS_KEY};
use crate::agent::{AgentError, ModelRuntime};
use crate::llm_client::prompts::RESPONSE_GUIDELINES;
use crate::llm_client::ChatMessage;

/// Specialised persona per question type; personal, general and unrecognised
/// questions share the generic one.
pub fn persona_for(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::Experience => EXPERIENCE_PERSONA,
        QuestionType::Skills => SKILLS_PERSONA,
        QuestionType::Education => EDUCATION_PERSONA,
        QuestionType::Projects => PROJECTS_PERSONA,
        QuestionType::Career => CAREER_PERSONA,
        QuestionType::Personal | QuestionType::General | QuestionType::Unrecognized => {
            GENERIC_PERSONA
        }
    }
}

pub fn build_generation_messages(state: &WorkflowState) -> Vec<ChatMessage> {
    let persona = persona_for(state.question_type);
    // Empty on the simple_answer path, which skips the context analyzer.
    let context = state
        .extracted_info
        .get(CONTEXT_ANALYSIS_KEY)
        .unwrap_or_default();

    let prompt = render(
        GENERATION_PROMPT_TEMPLATE,
        &[
            ("persona", persona),
            ("guidelines", RESPONSE_GUIDELINES),
            ("context", context),
            ("question", state.question.as_str()),
        ],
    );

    vec![ChatMessage::system(persona), ChatMessage::user(prompt)]
}

/// Answer generator node. Overwrites `final_answer` on every pass.
pub async fn generate_answer(
    state: &mut WorkflowState,
    runtime: &ModelRuntime,
) -> Result<(), AgentError> {
    let messages = build_generation_messages(state);
    let answer = runtime.complete(Node::AnswerGenerator, &messages).await?;
    info!("Answer generated ({} chars)", answer.len());

    state.final_answer = answer;
    state.visit(Node::AnswerGenerator);
    Ok(())
}
