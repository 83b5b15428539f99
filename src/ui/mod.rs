//! Line-oriented terminal surface: prompts, role styling, the busy
//! spinner.
//!
//! Every prompt helper returns `None` when the read is interrupted
//! (Ctrl-C) or the terminal goes away; the chat loop treats that as a
//! clean exit.

pub mod chat_loop;
pub mod input;

use std::time::Duration;

use console::{style, Style, Term};
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::core::message::{Message, Role};

const START_NEW_LABEL: &str = "Start a new conversation";

/// Outcome of the conversation picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationChoice {
    Existing(usize),
    StartNew,
}

/// Fixed display styling per role: user turns get a bold cyan `You:`
/// prefix, system context prints dim, assistant text prints unstyled.
fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::new().cyan(),
        Role::System => Style::new().dim(),
        Role::Assistant => Style::new(),
        Role::Function => Style::new().magenta(),
    }
}

pub fn print_message(message: &Message) {
    let body = role_style(message.role).apply_to(message.content.as_str());
    if message.role.is_user() {
        println!("{} {}", style("You:").cyan().bold(), body);
    } else {
        println!("{body}");
    }
    println!();
}

pub fn print_transcript(messages: &[Message]) {
    for message in messages {
        print_message(message);
    }
}

pub fn print_error(text: &str) {
    eprintln!("❌ {text}");
    eprintln!();
}

pub fn clear_screen() -> std::io::Result<()> {
    Term::stdout().clear_screen()
}

/// Busy indicator shown while a request is in flight. Ticks on its own
/// thread; call `finish_and_clear` once the call returns.
pub fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Read one raw input line for message entry.
pub fn read_line() -> Option<String> {
    let result = Input::<String>::new()
        .with_prompt(">")
        .allow_empty(true)
        .interact_text();
    match result {
        Ok(line) => Some(line),
        Err(err) => {
            debug!(error = %err, "input prompt ended");
            None
        }
    }
}

/// Pick an existing conversation by name, or elect to start a new one.
pub fn select_conversation(names: &[String]) -> Option<ConversationChoice> {
    let mut items: Vec<&str> = names.iter().map(String::as_str).collect();
    items.push(START_NEW_LABEL);

    let selection = Select::new()
        .with_prompt("Pick a conversation")
        .items(&items)
        .default(0)
        .interact_opt();

    match selection {
        Ok(Some(index)) if index < names.len() => Some(ConversationChoice::Existing(index)),
        Ok(Some(_)) => Some(ConversationChoice::StartNew),
        Ok(None) => None,
        Err(err) => {
            debug!(error = %err, "selection prompt ended");
            None
        }
    }
}

/// Prompt for the name and system context of a new conversation.
pub fn prompt_new_conversation(default_context: &str) -> Option<(String, String)> {
    let name = prompt_required("Conversation name")?;
    let context = prompt_with_default("System context", default_context)?;
    Some((name, context))
}

fn prompt_required(prompt: &str) -> Option<String> {
    let result = Input::<String>::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Err("a name is required")
            } else {
                Ok(())
            }
        })
        .interact_text();
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(error = %err, "prompt ended");
            None
        }
    }
}

fn prompt_with_default(prompt: &str, default: &str) -> Option<String> {
    let result = Input::<String>::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text();
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(error = %err, "prompt ended");
            None
        }
    }
}
