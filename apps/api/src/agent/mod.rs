//! CV Agent: answers questions about one uploaded CV through the orchestration graph.
//!
//! Flow per question: classifier → (tool_selector → information_extractor →)
//! context_analyzer → answer_generator → quality_validator → confidence_calculator,
//! with retry and reclassify loops driven by the validator.
//!
//! All model calls go through `ModelRuntime`, which enforces the per-call timeout.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::llm_client::{invoke_with_timeout, ChatMessage, LanguageModel, LlmError};
use crate::models::answer::AnswerResult;

pub mod classifier;
pub mod confidence;
pub mod context;
pub mod generator;
pub mod graph;
pub mod handlers;
pub mod prompts;
pub mod state;
pub mod tools;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

use graph::Orchestrator;
use state::{Node, WorkflowState};
use tools::ExtractionTool;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("No document has been submitted yet")]
    DocumentNotLoaded,

    #[error("Model call failed at {node}: {source}")]
    Capability {
        node: Node,
        #[source]
        source: LlmError,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Model runtime
// ────────────────────────────────────────────────────────────────────────────

/// The model handle shared by every node of a run.
#[derive(Clone)]
pub struct ModelRuntime {
    model: Arc<dyn LanguageModel>,
    call_timeout: Duration,
}

impl ModelRuntime {
    pub fn new(model: Arc<dyn LanguageModel>, call_timeout: Duration) -> Self {
        Self {
            model,
            call_timeout,
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(model: Arc<dyn LanguageModel>) -> Self {
        Self::new(model, Duration::from_secs(30))
    }

    /// One model call under the per-call timeout.
    pub async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        invoke_with_timeout(self.model.as_ref(), messages, self.call_timeout).await
    }

    /// Like `invoke`, for nodes where a failure ends the run.
    pub async fn complete(
        &self,
        node: Node,
        messages: &[ChatMessage],
    ) -> Result<String, AgentError> {
        self.invoke(messages)
            .await
            .map_err(|source| AgentError::Capability { node, source })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Agent facade
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct AgentSettings {
    pub call_timeout: Duration,
    pub max_node_executions: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(60),
            max_node_executions: graph::DEFAULT_MAX_NODE_EXECUTIONS,
        }
    }
}

impl From<&Config> for AgentSettings {
    fn from(config: &Config) -> Self {
        Self {
            call_timeout: Duration::from_secs(config.llm_call_timeout_secs),
            ..Self::default()
        }
    }
}

/// One loaded document. Replaced wholesale on every upload.
#[derive(Debug, Clone)]
pub struct Session {
    pub text: Arc<str>,
    pub loaded_at: DateTime<Utc>,
}

pub struct CvAgent {
    runtime: ModelRuntime,
    settings: AgentSettings,
    session: RwLock<Option<Session>>,
}

impl CvAgent {
    pub fn new(model: Arc<dyn LanguageModel>, settings: AgentSettings) -> Self {
        Self {
            runtime: ModelRuntime::new(model, settings.call_timeout),
            settings,
            session: RwLock::new(None),
        }
    }

    /// Replaces the current document. Never appends to the previous one.
    pub async fn submit_document(&self, text: String) {
        let length = text.len();
        *self.session.write().await = Some(Session {
            text: Arc::from(text),
            loaded_at: Utc::now(),
        });
        info!("Document loaded ({length} chars)");
    }

    /// Runs one question through the graph.
    pub async fn answer(&self, question: &str) -> Result<AnswerResult, AgentError> {
        let document = self
            .session
            .read()
            .await
            .as_ref()
            .filter(|s| !s.text.is_empty())
            .map(|s| s.text.clone())
            .ok_or(AgentError::DocumentNotLoaded)?;

        let run_id = Uuid::new_v4();
        self.run(run_id, document, question)
            .instrument(info_span!("answer", %run_id))
            .await
    }

    async fn run(
        &self,
        run_id: Uuid,
        document: Arc<str>,
        question: &str,
    ) -> Result<AnswerResult, AgentError> {
        info!("Answering question: {question:?}");
        let state = WorkflowState::new(document, question);
        let orchestrator = Orchestrator::new(&self.runtime, self.settings.max_node_executions);
        let state = orchestrator.run(state).await?;
        info!(
            "Run finished: {} steps, {} attempts, confidence {:.2}",
            state.executions(),
            state.answer_attempts,
            state.confidence_score
        );
        Ok(AnswerResult::from_state(run_id, state))
    }

    pub fn list_tools(&self) -> Vec<&'static str> {
        ExtractionTool::ALL.iter().map(|t| t.name()).collect()
    }

    pub fn is_ready(&self) -> bool {
        graph::is_complete()
    }

    pub async fn document_loaded(&self) -> bool {
        self.document_length().await > 0
    }

    pub async fn document_length(&self) -> usize {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.text.len())
            .unwrap_or(0)
    }

    /// When the current document was submitted, if any.
    pub async fn document_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.session.read().await.as_ref().map(|s| s.loaded_at)
    }

    pub fn graph_mermaid(&self) -> String {
        graph::to_mermaid()
    }
}
