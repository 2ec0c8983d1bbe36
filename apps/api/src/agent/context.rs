//! Context Analyzer: merges everything extracted so far into one textual blob.

use std::collections::BTreeMap;

use tracing::debug;

use crate::agent::prompts::{render, CONTEXT_ANALYSIS_TEMPLATE};
use crate::agent::state::{Node, WorkflowState, COMPLEXITY_KEY, CONTEXT_ANALYSIS_KEY};

/// Renders the context blob for a question from the current `extracted_info`.
/// The complexity bookkeeping key and empty values are left out.
pub fn build_context(state: &WorkflowState) -> String {
    let relevant: BTreeMap<&str, &str> = state
        .extracted_info
        .iter()
        .filter(|(key, value)| *key != COMPLEXITY_KEY && !value.is_empty())
        .collect();

    // A map of strings always serialises.
    let extracted_json = serde_json::to_string_pretty(&relevant).unwrap_or_default();

    render(
        CONTEXT_ANALYSIS_TEMPLATE,
        &[
            ("question", state.question.as_str()),
            ("extracted_json", extracted_json.as_str()),
        ],
    )
}

/// Context analyzer node. Runs on the first pass and as the retry target.
pub fn analyze_context(state: &mut WorkflowState) {
    let context = build_context(state);
    debug!("Context assembled ({} chars)", context.len());
    state.extracted_info.insert(CONTEXT_ANALYSIS_KEY, context);
    state.visit(Node::ContextAnalyzer);
}
