pub mod canned;
pub mod openai;

use anyhow::Result;

use crate::history::Turn;

/// One chat-completion exchange against a model backend. The caller hands
/// over the whole ordered conversation and gets the generated reply back.
/// Any call may fail; transport, auth and quota are the backend's business.
pub trait ChatClient: Send + Sync + std::fmt::Debug {
    fn complete(&self, turns: &[Turn]) -> Result<String>;
}
