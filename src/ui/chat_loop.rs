//! The interactive session: pick or create a conversation, then read,
//! send, persist, display until the user leaves.

use std::error::Error;

use crate::api::{resolve_credentials, HttpChatClient};
use crate::core::config::Config;
use crate::core::conversation::{Conversation, ConversationStore};
use crate::core::message::Message;
use crate::core::session::ChatSession;
use crate::ui::input::{collect_message, InputEvent};
use crate::ui::{self, ConversationChoice};

/// System context offered when creating a conversation; editable at the
/// prompt.
const DEFAULT_SYSTEM_CONTEXT: &str =
    "You are a helpful assistant to help roleplaying game masters and players.";

/// How this session begins: resuming a stored record, or creating a new
/// one.
enum Opening {
    Resume(Conversation),
    Create { name: String, context: String },
}

pub async fn run_chat() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let credentials = resolve_credentials(config.base_url.as_deref())?;
    let client = HttpChatClient::new(credentials, config.model())?;
    let store = ConversationStore::new(config.conversations_dir()?);

    let Some(opening) = choose_opening(&store) else {
        // Interrupted at a startup prompt: leave quietly.
        return Ok(());
    };

    let mut session = match opening {
        Opening::Resume(conversation) => ChatSession::new(conversation, &store, &client),
        Opening::Create { name, context } => ChatSession::start(name, context, &store, &client)?,
    };
    ui::print_transcript(&session.conversation().messages);

    loop {
        match collect_message(ui::read_line) {
            InputEvent::Message(content) => {
                let spinner = ui::thinking_spinner();
                let result = session.send(content).await;
                spinner.finish_and_clear();
                match result {
                    Ok(reply) => ui::print_message(&Message::assistant(reply)),
                    Err(e) => ui::print_error(&e.to_string()),
                }
            }
            InputEvent::Clear => ui::clear_screen()?,
            InputEvent::Nothing => {}
            InputEvent::Exit => break,
        }
    }

    Ok(())
}

/// Resolve which conversation this session is about. `None` means a
/// prompt was interrupted.
fn choose_opening(store: &ConversationStore) -> Option<Opening> {
    let existing = store.list_all();
    if existing.is_empty() {
        // Nothing to pick from yet; go straight to creation.
        return prompt_creation();
    }

    let names: Vec<String> = existing.iter().map(|c| c.name.clone()).collect();
    match ui::select_conversation(&names) {
        Some(ConversationChoice::Existing(index)) => {
            existing.into_iter().nth(index).map(Opening::Resume)
        }
        Some(ConversationChoice::StartNew) => prompt_creation(),
        None => None,
    }
}

fn prompt_creation() -> Option<Opening> {
    ui::prompt_new_conversation(DEFAULT_SYSTEM_CONTEXT)
        .map(|(name, context)| Opening::Create { name, context })
}
