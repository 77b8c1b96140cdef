//! Scripted completion backend for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use traceline_llm::{ChatApi, ChatRequest};

/// A `ChatApi` that replays a fixed list of responses in order
///
/// Records every prompt it receives so tests can assert on prompt content
/// and call counts.
pub(crate) struct ScriptedApi {
    responses: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedApi {
    /// Script a sequence of successful responses
    pub(crate) fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|s| Ok(s.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Script a backend whose next call fails with the given message
    pub(crate) fn failing(message: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([Err(message.into())])),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order
    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of completion calls made
    pub(crate) fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatApi for ScriptedApi {
    async fn complete(&self, request: &ChatRequest) -> traceline_llm::Result<String> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(traceline_llm::Error::Endpoint(message)),
            None => Err(traceline_llm::Error::Endpoint(
                "script exhausted".to_string(),
            )),
        }
    }
}
