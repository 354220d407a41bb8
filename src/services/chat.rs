//! Chat Service
//!
//! Freeform session chat: replays the persisted conversation, appends the
//! new question, and stores the exchange.

use tracing::error;

use ccv_research_llm::types::Message;
use ccv_research_llm::TextCompletion;

use crate::research::prompts::CHAT_SYSTEM_PROMPT;
use crate::storage::Database;
use crate::utils::error::AppResult;

/// Service for persisted conversational sessions.
pub struct ChatService<G> {
    gateway: G,
    db: Database,
}

impl<G: TextCompletion> ChatService<G> {
    pub fn new(gateway: G, db: Database) -> Self {
        Self { gateway, db }
    }

    /// Send one user message in a session and persist the exchange.
    ///
    /// The conversation sent to the model is the persisted history under the
    /// live chat system prompt, plus the new question. A gateway error
    /// becomes the stored answer text.
    pub async fn send_message(
        &self,
        session_id: &str,
        topic: &str,
        persona: &str,
        question: &str,
        model: &str,
    ) -> AppResult<String> {
        let mut conversation = vec![Message::system(CHAT_SYSTEM_PROMPT)];
        // history[0] is the reconstruction system turn; the live prompt
        // replaces it.
        conversation.extend(self.db.session_history(session_id)?.into_iter().skip(1));
        conversation.push(Message::user(question));

        let response = match self.gateway.invoke(&conversation, model).await {
            Ok(text) => text,
            Err(e) => {
                error!("Chat call failed: {}", e);
                format!("Error: {}", e)
            }
        };

        self.db
            .append_interaction(session_id, topic, persona, question, &response)?;
        Ok(response)
    }
}
