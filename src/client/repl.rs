//! Interactive terminal front end for a [`Conversation`].

use crate::client::speech::{SpeechSynthesizer, UnavailableRecognizer, UnavailableSynthesizer};
use crate::client::{
    sanitize, ChatMessage, ClientError, Conversation, EspeakSynthesizer, HttpGatewayClient,
    Language, MicrophoneState, Sender,
};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::info;

/// Settings for `samvad chat`.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub gateway_url: String,
    pub language: Language,
    pub muted: bool,
    /// Try to speak replies through espeak-ng
    pub speech: bool,
}

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    Lang(String),
    Mic,
    Mute,
    Unmute,
    Speak,
    History,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    if line.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ReplCommand::Ask(line.to_string());
    };

    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).unwrap_or_default();
    match name.as_str() {
        "lang" | "language" => ReplCommand::Lang(arg.to_string()),
        "mic" => ReplCommand::Mic,
        "mute" => ReplCommand::Mute,
        "unmute" => ReplCommand::Unmute,
        "speak" => ReplCommand::Speak,
        "history" => ReplCommand::History,
        "help" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        _ => ReplCommand::Unknown(line.to_string()),
    }
}

/// Runs the chat loop until `/quit` or end of input.
pub async fn run_chat(options: ChatOptions) -> Result<(), ClientError> {
    let gateway = HttpGatewayClient::new(&options.gateway_url)?;
    info!("Using gateway {}", gateway.ask_url());

    let synthesizer: Box<dyn SpeechSynthesizer> = if options.speech {
        Box::new(EspeakSynthesizer::detect())
    } else {
        Box::new(UnavailableSynthesizer)
    };
    let mut conversation = Conversation::new(
        Box::new(gateway),
        Box::new(UnavailableRecognizer),
        synthesizer,
    );
    conversation.set_language(options.language);
    conversation.set_muted(options.muted);

    display_welcome_message(&conversation);

    loop {
        let prompt = format!("[{}] Ask", conversation.language().display_name());
        let line = match Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .with_initial_text(conversation.input().to_string())
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(e) => {
                info!("Input closed: {}", e);
                break;
            }
        };

        match parse_command(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Ask(text) => {
                conversation.set_input(&text);
                let spinner = thinking_spinner();
                let reply = conversation.submit_input().await.cloned();
                spinner.finish_and_clear();
                if let Some(message) = reply {
                    print_message(&message);
                }
            }
            ReplCommand::Lang(tag) => match tag.parse::<Language>() {
                Ok(lang) => {
                    conversation.set_language(lang);
                    println!("{}", format!("Language set to {}", lang.display_name()).green());
                }
                Err(e) => println!("{}", e.to_string().red()),
            },
            ReplCommand::Mic => match conversation.toggle_microphone() {
                MicrophoneState::Listening => {
                    println!("{}", "Listening... type /mic again to stop.".yellow())
                }
                MicrophoneState::Stopped => println!("{}", "Microphone off.".yellow()),
                MicrophoneState::Unavailable => {
                    println!("{}", "Voice input is not available on this device.".dimmed())
                }
            },
            ReplCommand::Mute => {
                conversation.mute();
                println!("{}", "Replies will not be spoken.".yellow());
            }
            ReplCommand::Unmute => {
                conversation.set_muted(false);
                println!("{}", "Replies will be spoken.".yellow());
            }
            ReplCommand::Speak => {
                if !conversation.speak_last_reply() {
                    println!("{}", "Nothing to read out yet.".dimmed());
                }
            }
            ReplCommand::History => {
                for message in conversation.transcript().messages() {
                    print_message(message);
                }
            }
            ReplCommand::Help => display_help(),
            ReplCommand::Quit => break,
            ReplCommand::Unknown(line) => {
                println!("{} {}", "Unknown command:".red(), line);
                display_help();
            }
        }
    }

    conversation.mute();
    Ok(())
}

fn display_welcome_message(conversation: &Conversation) {
    println!("{}", "\n🩺 Jeevan Suraksha AI Assistant".bold().cyan());
    println!(
        "{}",
        "Your health companion in your own language".yellow()
    );
    println!(
        "Language: {}. Type /help for commands.\n",
        conversation.language().display_name()
    );
}

fn display_help() {
    println!("  /lang <tag>   switch language (hi-IN, te-IN, mr-IN, kn-IN, en-IN)");
    println!("  /mic          start or stop voice input");
    println!("  /mute         stop reading replies aloud");
    println!("  /unmute       read replies aloud again");
    println!("  /speak        read the last reply again");
    println!("  /history      show the conversation so far");
    println!("  /quit         leave");
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_message(message: &ChatMessage) {
    let time = message.sent_at.format("%H:%M").to_string();
    let text = sanitize(&message.text);
    match message.sender {
        Sender::User => println!("{} {} {}", time.dimmed(), "You:".magenta().bold(), text),
        Sender::Assistant => println!("{} {} {}", time.dimmed(), "Assistant:".cyan().bold(), text),
    }
}
