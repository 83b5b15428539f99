use std::error::Error;

use crate::api::ChatApi;
use crate::core::conversation::{Conversation, ConversationStore};
use crate::core::message::Message;

/// One live conversation bound to its store and the remote endpoint.
///
/// Every append persists the whole record before anything else happens, so
/// an interrupt at any point loses at most the message currently being
/// typed.
pub struct ChatSession<'a> {
    conversation: Conversation,
    store: &'a ConversationStore,
    client: &'a dyn ChatApi,
}

impl<'a> ChatSession<'a> {
    /// Resume an existing conversation.
    pub fn new(
        conversation: Conversation,
        store: &'a ConversationStore,
        client: &'a dyn ChatApi,
    ) -> Self {
        Self {
            conversation,
            store,
            client,
        }
    }

    /// Start a fresh conversation: seed the system context and persist the
    /// record immediately so it shows up in the picker from now on.
    pub fn start(
        name: impl Into<String>,
        system_context: impl Into<String>,
        store: &'a ConversationStore,
        client: &'a dyn ChatApi,
    ) -> Result<Self, Box<dyn Error>> {
        let conversation = Conversation::new(name, system_context);
        store.save(&conversation)?;
        Ok(Self::new(conversation, store, client))
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Append a user message, persist, forward the full transcript, append
    /// the reply, persist again. On failure the user message stays
    /// appended and persisted; no assistant message is added.
    pub async fn send(&mut self, content: impl Into<String>) -> Result<String, Box<dyn Error>> {
        self.conversation.push(Message::user(content));
        self.store.save(&self.conversation)?;

        let reply = self.client.complete(&self.conversation.messages).await?;

        self.conversation.push(Message::assistant(reply.clone()));
        self.store.save(&self.conversation)?;
        Ok(reply)
    }
}
