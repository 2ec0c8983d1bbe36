//! Quality Validator: LLM judgement of the generated answer, bounded to three attempts.
//!
//! The model replies `APROVADO` or `REJEITAR_<reason>`. Anything else is kept verbatim
//! and sends the run back to the classifier.

use tracing::{info, warn};

use crate::agent::prompts::{render, VALIDATION_PROMPT_TEMPLATE};
use crate::agent::state::{Node, WorkflowState, VALIDATION_KEY};
use crate::agent::{AgentError, ModelRuntime};
use crate::llm_client::prompts::TOKEN_ONLY_INSTRUCTION;
use crate::llm_client::ChatMessage;

pub const APPROVED_TOKEN: &str = "APROVADO";
pub const REJECTED_TOKEN: &str = "REJEITAR";
/// Verdict recorded when the attempt cap overrides the model.
pub const FORCED_APPROVAL: &str = "APROVADO (attempt limit reached)";
/// Validations already performed at which the model's verdict is overridden.
pub const FORCE_APPROVE_AFTER: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    ForcedApproval,
    /// Raw reply containing `REJEITAR`.
    Rejected(String),
    /// Raw reply matching neither token.
    Unrecognized(String),
}

impl Verdict {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with(APPROVED_TOKEN) {
            Verdict::Approved
        } else if raw.contains(REJECTED_TOKEN) {
            Verdict::Rejected(raw.to_string())
        } else {
            Verdict::Unrecognized(raw.to_string())
        }
    }

    /// The string stored under `extracted_info["validation"]`.
    pub fn record(&self) -> &str {
        match self {
            Verdict::Approved => APPROVED_TOKEN,
            Verdict::ForcedApproval => FORCED_APPROVAL,
            Verdict::Rejected(raw) | Verdict::Unrecognized(raw) => raw,
        }
    }

    /// Text after `REJEITAR_`, if the model gave one.
    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            Verdict::Rejected(raw) => raw
                .split_once(REJECTED_TOKEN)
                .map(|(_, rest)| rest.trim_start_matches('_').trim())
                .filter(|reason| !reason.is_empty()),
            _ => None,
        }
    }
}

/// Where the graph goes after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRoute {
    Approved,
    Retry,
    Reclassify,
}

impl ValidationRoute {
    pub const ALL: [ValidationRoute; 3] = [
        ValidationRoute::Approved,
        ValidationRoute::Retry,
        ValidationRoute::Reclassify,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Retry => "retry",
            Self::Reclassify => "reclassify",
        }
    }

    pub fn target(&self) -> Node {
        match self {
            Self::Approved => Node::ConfidenceCalculator,
            Self::Retry => Node::ContextAnalyzer,
            Self::Reclassify => Node::Classifier,
        }
    }
}

pub fn build_validation_prompt(state: &WorkflowState) -> String {
    render(
        VALIDATION_PROMPT_TEMPLATE,
        &[
            ("token_only", TOKEN_ONLY_INSTRUCTION),
            ("question", state.question.as_str()),
            ("answer", state.final_answer.as_str()),
        ],
    )
}

/// Quality validator node.
///
/// `answer_attempts` goes up by exactly one per execution. The model is always asked;
/// once two validations have already happened its verdict is overridden with approval.
/// A failed call still ends the run, forced or not.
pub async fn validate_quality(
    state: &mut WorkflowState,
    runtime: &ModelRuntime,
) -> Result<Verdict, AgentError> {
    let previous_attempts = state.answer_attempts;

    let prompt = build_validation_prompt(state);
    let raw = runtime
        .complete(Node::QualityValidator, &[ChatMessage::user(prompt)])
        .await?;

    let verdict = if previous_attempts >= FORCE_APPROVE_AFTER {
        warn!(
            "Attempt limit reached after {previous_attempts} validations, \
             overriding {:?} with approval",
            raw.trim()
        );
        Verdict::ForcedApproval
    } else {
        Verdict::parse(&raw)
    };

    state.answer_attempts = previous_attempts + 1;
    state.extracted_info.insert(VALIDATION_KEY, verdict.record());
    state.visit(Node::QualityValidator);

    match &verdict {
        Verdict::Rejected(_) => info!(
            "Answer rejected (attempt {}): {}",
            state.answer_attempts,
            verdict.rejection_reason().unwrap_or("no reason given")
        ),
        Verdict::Unrecognized(raw) => warn!("Unrecognised validator reply: {raw:?}"),
        _ => info!("Answer approved (attempt {})", state.answer_attempts),
    }

    Ok(verdict)
}

/// Pure routing decision over the stored verdict and the post-increment attempt count.
pub fn route_after_validation(state: &WorkflowState) -> ValidationRoute {
    let validation = state.validation();
    let attempts = state.answer_attempts;

    if validation.starts_with(APPROVED_TOKEN) || attempts >= FORCE_APPROVE_AFTER {
        ValidationRoute::Approved
    } else if validation.contains(REJECTED_TOKEN) {
        ValidationRoute::Retry
    } else {
        ValidationRoute::Reclassify
    }
}
