//! Axum route handlers for the CV agent API.

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::QueryRejection, Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::agent::classifier::ClassificationRoute;
use crate::agent::state::Node;
use crate::agent::tools::ExtractionTool;
use crate::document::load_pdf;
use crate::errors::AppError;
use crate::models::answer::AnswerResult;
use crate::models::document::UploadResponse;
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AskParams {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct GraphInfoResponse {
    pub nodes: Vec<Node>,
    pub tools: Vec<&'static str>,
    pub tool_descriptions: BTreeMap<&'static str, &'static str>,
    pub workflow_types: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct GraphMermaidResponse {
    pub mermaid: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /upload
///
/// Accepts a multipart `file` field holding a PDF and replaces the loaded CV.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let document = load_pdf(&filename, bytes).await?;
        let text_length = document.text.len();
        state.agent.submit_document(document.text).await;

        return Ok(Json(UploadResponse {
            status: "success",
            filename,
            text_length,
            pages: document.pages,
        }));
    }

    Err(AppError::Validation(format!(
        "Multipart field '{UPLOAD_FIELD}' is required"
    )))
}

/// POST /ask?question=...
///
/// A missing or malformed query string is reported in the same error envelope as
/// every other validation failure.
pub async fn handle_ask(
    State(state): State<AppState>,
    params: Result<Query<AskParams>, QueryRejection>,
) -> Result<Json<AnswerResult>, AppError> {
    let Query(params) = params.map_err(|e| AppError::Validation(e.body_text()))?;
    let question = params.question.trim();
    if question.is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }

    let result = state.agent.answer(question).await?;
    Ok(Json(result))
}

/// GET /graph-info
pub async fn handle_graph_info(State(state): State<AppState>) -> Json<GraphInfoResponse> {
    Json(GraphInfoResponse {
        nodes: Node::ALL.to_vec(),
        tools: state.agent.list_tools(),
        tool_descriptions: ExtractionTool::ALL
            .iter()
            .map(|t| (t.name(), t.description()))
            .collect(),
        workflow_types: ClassificationRoute::ALL.iter().map(|r| r.as_str()).collect(),
    })
}

/// GET /graph-mermaid
pub async fn handle_graph_mermaid(State(state): State<AppState>) -> Json<GraphMermaidResponse> {
    Json(GraphMermaidResponse {
        mermaid: state.agent.graph_mermaid(),
    })
}

/// GET /examples
///
/// Sample questions grouped by the type they are expected to classify as.
pub async fn handle_examples() -> Json<Value> {
    Json(json!({
        "experience": [
            "What is the most recent professional experience?",
            "How many years of total experience does the candidate have?",
            "What were the main responsibilities in the last role?"
        ],
        "skills": [
            "What are the main technical skills?",
            "Does the candidate have Python experience?",
            "Which frameworks does the candidate know?"
        ],
        "education": [
            "What is the academic background?",
            "Does the candidate hold relevant certifications?",
            "Where did the candidate study?"
        ],
        "projects": [
            "Which projects has the candidate delivered?",
            "What was the most challenging project?",
            "Which technologies were used in the projects?"
        ],
        "career": [
            "How has the career progressed?",
            "In short, what is the candidate's professional experience?",
            "What are the candidate's strengths?"
        ]
    }))
}
