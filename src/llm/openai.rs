use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::ChatClient;
use crate::history::{Role, Turn};

#[derive(Debug)]
pub struct OpenAiClient {
    api_key: String,
    endpoint: String,
    model: String,
    client: Client,
}

impl OpenAiClient {
    pub fn new(api_key: String, endpoint: String, model: String) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            api_key,
            endpoint,
            model,
            client,
        })
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn wire_messages(turns: &[Turn]) -> Vec<serde_json::Value> {
    turns
        .iter()
        .map(|t| {
            let role = match t.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            serde_json::json!({ "role": role, "content": t.text })
        })
        .collect()
}

impl ChatClient for OpenAiClient {
    fn complete(&self, turns: &[Turn]) -> Result<String> {
        let req = CompletionRequest {
            model: &self.model,
            messages: wire_messages(turns),
        };

        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .context("failed to reach the chat completion endpoint")?
            .error_for_status()
            .context("chat completion endpoint returned an error status")?;

        let body: CompletionResponse = resp
            .json()
            .context("failed to decode the completion response")?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("completion response carried no content")
    }
}
