use anyhow::Result;

use super::ChatClient;
use crate::history::{Role, Turn};

/// Offline stand-in for the remote model, selected once at startup when the
/// offline flag is set. Replies come from a fixed keyword table over the
/// latest user turn; the responder is deterministic and never fails.
#[derive(Debug)]
pub struct CannedClient;

impl CannedClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CannedClient {
    fn default() -> Self {
        Self::new()
    }
}

fn pick_reply(input: &str) -> &'static str {
    let lower = input.to_lowercase();
    if lower.contains("swedish") {
        // Classification prompts get the no-match sentinel so the batch
        // pipeline stays well-formed without a backend.
        return "No Swedish text found.";
    }
    if lower.contains("hello") || lower.contains("hej") || lower.contains("hey") {
        return "Hello! I'm running in offline mode, but happy to chat.";
    }
    if lower.contains("help") {
        return "I can only offer canned replies right now. Set OPENAI_API_KEY to talk to a real model.";
    }
    if lower.contains("thank") {
        return "You're welcome!";
    }
    if lower.trim_end().ends_with('?') {
        return "Good question. Offline I can't really tell, but a real model could.";
    }
    "I see. Tell me more."
}

impl ChatClient for CannedClient {
    fn complete(&self, turns: &[Turn]) -> Result<String> {
        let last_user = turns
            .iter()
            .rev()
            .find(|t| t.role == Role::User)
            .map(|t| t.text.as_str())
            .unwrap_or("");
        Ok(pick_reply(last_user).to_string())
    }
}
