mod chat;
mod config;
mod detect;
mod history;
mod llm;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use crossterm::style::Stylize;

use crate::chat::run_chat;
use crate::config::{Config, Mode};
use crate::detect::run_detection;
use crate::history::History;
use crate::llm::ChatClient;
use crate::llm::canned::CannedClient;
use crate::llm::openai::OpenAiClient;

const CHAT_INSTRUCTION: &str = "You are a helpful, friendly AI assistant.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ModelChoice {
    Gpt4oMini,
    Gpt51Chat,
    CsvAnalysis,
}

impl ModelChoice {
    fn parse(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::Gpt4oMini),
            "2" => Some(Self::Gpt51Chat),
            "3" => Some(Self::CsvAnalysis),
            _ => None,
        }
    }

    /// Model sent on the wire. CSV analysis always runs on gpt-4o-mini.
    fn model(self) -> &'static str {
        match self {
            Self::Gpt4oMini | Self::CsvAnalysis => "gpt-4o-mini",
            Self::Gpt51Chat => "gpt-5.1-chat",
        }
    }
}

fn select_model(input: &mut impl BufRead, output: &mut impl Write) -> Result<ModelChoice> {
    loop {
        writeln!(output, "Please select a model:")?;
        writeln!(output, "1. gpt-4o-mini")?;
        writeln!(output, "2. gpt-5.1-chat")?;
        writeln!(output, "3. Analyze CSV file (uses gpt-4o-mini)")?;
        write!(output, "\nEnter your choice (1-3): ")?;
        output.flush()?;

        let mut choice = String::new();
        let n = input
            .read_line(&mut choice)
            .context("failed to read menu choice")?;
        if n == 0 {
            bail!("input closed before a model was selected");
        }
        if let Some(parsed) = ModelChoice::parse(&choice) {
            return Ok(parsed);
        }
        writeln!(output)?;
    }
}

fn build_client(config: Config, menu_model: &str) -> Result<Box<dyn ChatClient>> {
    match config.resolve(menu_model)? {
        Mode::Offline => {
            println!("\nUsing model: {}", "offline canned responder".bold());
            println!(
                "{}",
                "Offline mode: replies are canned, nothing leaves this machine.".dark_grey()
            );
            Ok(Box::new(CannedClient::new()))
        }
        Mode::Remote {
            api_key,
            endpoint,
            model,
        } => {
            println!("\nUsing model: {}", model.as_str().bold());
            Ok(Box::new(OpenAiClient::new(api_key, endpoint, model)?))
        }
    }
}

fn main() -> Result<()> {
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout();

    println!();
    println!("{}", "===========================================".dark_cyan());
    println!("{}", "  Welcome to Strat-AI-chat".bold());
    println!("{}", "===========================================".dark_cyan());
    println!();

    let choice = select_model(&mut stdin, &mut stdout)?;

    let config = Config::load()?;
    let client = build_client(config, choice.model())?;

    if choice == ModelChoice::CsvAnalysis {
        run_detection(client.as_ref(), &mut stdin, &mut stdout)?;
    } else {
        println!("\nType your messages and I'll respond.");
        println!("{}", "Type 'exit' or 'quit' (or Ctrl+C) to leave.\n".dark_grey());
        let mut history = History::new(CHAT_INSTRUCTION.to_string());
        run_chat(client.as_ref(), &mut history, &mut stdin, &mut stdout)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::config::test_env;

    const VARS: &[&str] = &[
        "STRATCHAT_OFFLINE",
        "OPENAI_API_KEY",
        "OPENAI_ENDPOINT",
        "OPENAI_MODEL",
    ];

    /// The canned responder answers classification prompts with the no-match
    /// sentinel, which distinguishes it from any remote client.
    fn assert_is_canned(client: &dyn ChatClient) {
        let mut history = History::new("sys".to_string());
        history.push_user("identify Swedish language content".to_string());
        assert_eq!(
            client.complete(history.turns()).unwrap(),
            "No Swedish text found."
        );
    }

    #[test]
    fn test_build_client_offline_flag_selects_the_canned_responder() {
        let _guard = test_env::lock();
        test_env::clear(VARS);

        let config = Config {
            offline: true,
            ..Config::default()
        };
        let client = build_client(config, "gpt-4o-mini").unwrap();
        assert_is_canned(client.as_ref());
    }

    #[test]
    fn test_build_client_env_flag_selects_the_canned_responder() {
        let _guard = test_env::lock();
        test_env::clear(VARS);
        test_env::set("STRATCHAT_OFFLINE", "1");

        let client = build_client(Config::default(), "gpt-4o-mini");
        test_env::clear(VARS);
        assert_is_canned(client.unwrap().as_ref());
    }

    #[test]
    fn test_build_client_without_key_or_flag_fails() {
        let _guard = test_env::lock();
        test_env::clear(VARS);

        let err = build_client(Config::default(), "gpt-4o-mini").unwrap_err();
        assert!(format!("{err:#}").contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_model_choice_parsing() {
        assert_eq!(ModelChoice::parse("1"), Some(ModelChoice::Gpt4oMini));
        assert_eq!(ModelChoice::parse(" 2 \n"), Some(ModelChoice::Gpt51Chat));
        assert_eq!(ModelChoice::parse("3"), Some(ModelChoice::CsvAnalysis));
        assert_eq!(ModelChoice::parse("4"), None);
        assert_eq!(ModelChoice::parse(""), None);
    }

    #[test]
    fn test_csv_analysis_uses_the_small_model() {
        assert_eq!(ModelChoice::CsvAnalysis.model(), "gpt-4o-mini");
        assert_eq!(ModelChoice::Gpt51Chat.model(), "gpt-5.1-chat");
    }

    #[test]
    fn test_menu_reprompts_until_a_valid_choice() {
        let mut input = Cursor::new("9\nbanana\n3\n");
        let mut out = Vec::new();

        let choice = select_model(&mut input, &mut out).unwrap();

        assert_eq!(choice, ModelChoice::CsvAnalysis);
        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.matches("Please select a model:").count(), 3);
    }

    #[test]
    fn test_menu_fails_when_input_closes() {
        let mut input = Cursor::new("9\n");
        let mut out = Vec::new();

        let err = select_model(&mut input, &mut out).unwrap_err();
        assert!(err.to_string().contains("input closed"));
    }
}
