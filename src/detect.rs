use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::history::History;
use crate::llm::ChatClient;

const DEFAULT_FILE: &str = "data.csv";
const BATCH_SIZE: usize = 20;

const DETECT_INSTRUCTION: &str = "You are a language detection assistant. \
    Analyze the provided CSV lines (format: Id;Text) and identify which lines contain Swedish language text. \
    Respond ONLY with the IDs of lines that are in Swedish, one ID per line. \
    If no Swedish text is found, respond with 'No Swedish text found.'";

const NO_MATCH_SENTINEL: &str = "No Swedish text found";
const NO_MATCH_PREFIX: &str = "No Swedish";

pub struct DetectionOutcome {
    pub ids: Vec<String>,
    pub lines_processed: usize,
}

/// Pull positive IDs out of one batch response. Every non-empty line that
/// does not carry the no-match prefix counts as an ID; the shape of the line
/// is not validated further, so a free-text preamble from the model would be
/// taken at face value.
fn extract_ids(response: &str) -> Vec<String> {
    if response.contains(NO_MATCH_SENTINEL) {
        return Vec::new();
    }
    response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(NO_MATCH_PREFIX))
        .map(str::to_string)
        .collect()
}

/// Classify the input in fixed-size batches. Each batch is a fresh,
/// independent request seeded only with the detection instruction; nothing
/// carries over between batches, and a failed batch contributes no IDs but
/// does not stop the run.
pub fn classify_lines(
    client: &dyn ChatClient,
    lines: &[String],
    batch_size: usize,
    mut output: impl Write,
) -> Result<DetectionOutcome> {
    let mut ids = Vec::new();
    let mut lines_processed = 0usize;

    for batch in lines.chunks(batch_size) {
        let mut history = History::new(DETECT_INSTRUCTION.to_string());
        history.push_user(format!(
            "Analyze these CSV lines and identify Swedish language content:\n\n{}",
            batch.join("\n")
        ));

        match client.complete(history.turns()) {
            Ok(response) => {
                ids.extend(extract_ids(&response));
                lines_processed += batch.len();
                writeln!(output, "[Processed {lines_processed} lines]")?;
            }
            Err(err) => {
                writeln!(output, "Error processing batch: {err:#}\n")?;
            }
        }
    }

    Ok(DetectionOutcome {
        ids,
        lines_processed,
    })
}

pub fn run_detection(
    client: &dyn ChatClient,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<()> {
    writeln!(output, "\nCSV File Analysis Mode - Swedish Language Detection")?;
    writeln!(output, "Default file: {DEFAULT_FILE}")?;
    write!(output, "Enter CSV file path (or press Enter to use default): ")?;
    output.flush()?;

    let mut path = String::new();
    input
        .read_line(&mut path)
        .context("failed to read file path")?;
    let path = path.trim();
    let path = if path.is_empty() { DEFAULT_FILE } else { path };

    if !Path::new(path).exists() {
        writeln!(output, "\nError: File '{path}' not found.")?;
        return Ok(());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read '{path}'"))?;
    let lines: Vec<String> = content.lines().map(str::to_string).collect();

    writeln!(output, "\nAnalyzing file for Swedish language content...\n")?;
    let outcome = classify_lines(client, &lines, BATCH_SIZE, &mut output)?;

    writeln!(
        output,
        "\nAnalysis complete. Total lines processed: {}",
        outcome.lines_processed
    )?;
    writeln!(output, "\n===========================================")?;
    writeln!(output, "Swedish Text IDs:")?;
    writeln!(output, "===========================================")?;

    if outcome.ids.is_empty() {
        writeln!(output, "No Swedish text found in the file.")?;
    } else {
        for id in &outcome.ids {
            writeln!(output, "{id}")?;
        }
        writeln!(
            output,
            "\nTotal Swedish entries found: {}",
            outcome.ids.len()
        )?;
    }

    Ok(())
}
