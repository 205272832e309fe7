use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::history::History;
use crate::llm::ChatClient;

/// In-band tokens that end the loop before any request is made.
fn is_exit_token(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Interactive conversation loop. One line of input per iteration; the whole
/// accumulated history is replayed to the client on every request.
///
/// A failed request leaves the user's turn in the history but never appends
/// an assistant turn, so the next exchange is built on what the user actually
/// said rather than on a phantom reply.
pub fn run_chat(
    client: &dyn ChatClient,
    history: &mut History,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<()> {
    loop {
        write!(output, "You: ")?;
        output.flush()?;

        let mut line = String::new();
        let n = input
            .read_line(&mut line)
            .context("failed to read user input")?;
        if n == 0 {
            // stdin closed
            writeln!(output)?;
            return Ok(());
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_exit_token(line) {
            return Ok(());
        }

        history.push_user(line.to_string());
        match client.complete(history.turns()) {
            Ok(reply) => {
                writeln!(output, "Bot: {reply}\n")?;
                history.push_assistant(reply);
            }
            Err(err) => {
                writeln!(output, "Error: {err:#}\n")?;
            }
        }
    }
}
