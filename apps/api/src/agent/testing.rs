//! Scripted language model for agent tests.
//!
//! Replies are chosen by prompt kind (classifier, validator, generator, tool), each kind
//! with its own queue. The last queued reply repeats once the queue is down to one entry.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::agent::tools::ExtractionTool;
use crate::llm_client::{ChatMessage, LanguageModel, LlmError, Role};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail,
    Hang,
}

#[derive(Default)]
struct Script {
    classifications: VecDeque<Reply>,
    verdicts: VecDeque<Reply>,
    answers: VecDeque<Reply>,
    failing_tools: HashSet<ExtractionTool>,
}

#[derive(Default)]
pub struct ScriptedModel {
    script: Mutex<Script>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

fn texts<I, S>(replies: I) -> impl Iterator<Item = Reply>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    replies.into_iter().map(|r| Reply::Text(r.into()))
}

fn next_reply(queue: &mut VecDeque<Reply>, default: &str) -> Reply {
    match queue.len() {
        0 => Reply::Text(default.to_string()),
        1 => queue[0].clone(),
        _ => queue.pop_front().unwrap_or(Reply::Fail),
    }
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify<I, S>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.script.lock().unwrap().classifications.extend(texts(replies));
        self
    }

    pub fn validate<I, S>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.script.lock().unwrap().verdicts.extend(texts(replies));
        self
    }

    pub fn answer<I, S>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.script.lock().unwrap().answers.extend(texts(replies));
        self
    }

    pub fn fail_classification(self) -> Self {
        self.script.lock().unwrap().classifications.push_back(Reply::Fail);
        self
    }

    pub fn fail_validations(self) -> Self {
        self.script.lock().unwrap().verdicts.push_back(Reply::Fail);
        self
    }

    pub fn fail_answers(self) -> Self {
        self.script.lock().unwrap().answers.push_back(Reply::Fail);
        self
    }

    /// Generator calls never return; pair with a paused clock and a call timeout.
    pub fn hang_answers(self) -> Self {
        self.script.lock().unwrap().answers.push_back(Reply::Hang);
        self
    }

    pub fn fail_tool(self, tool: ExtractionTool) -> Self {
        self.script.lock().unwrap().failing_tools.insert(tool);
        self
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }

    fn pick(&self, prompt: &str) -> Reply {
        let mut script = self.script.lock().unwrap();
        if prompt.contains("Return only: TYPE|COMPLEXITY") {
            return next_reply(&mut script.classifications, "general|simple");
        }
        if prompt.contains("Return only: APROVADO") {
            return next_reply(&mut script.verdicts, "APROVADO");
        }
        if prompt.contains("Available context:") {
            return next_reply(&mut script.answers, "A grounded answer.");
        }
        let tool = ExtractionTool::ALL.into_iter().find(|tool| {
            tool.template()
                .lines()
                .next()
                .is_some_and(|header| prompt.starts_with(header))
        });
        match tool {
            Some(tool) if script.failing_tools.contains(&tool) => Reply::Fail,
            Some(tool) => Reply::Text(format!("{tool} data")),
            None => Reply::Text(String::new()),
        }
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(messages.to_vec());

        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        match self.pick(prompt) {
            Reply::Text(text) => Ok(text),
            Reply::Fail => Err(LlmError::Api {
                status: 503,
                message: "scripted failure".to_string(),
            }),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(LlmError::EmptyContent)
            }
        }
    }
}
