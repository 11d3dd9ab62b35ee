//! Chat view conversation

use tracing::debug;
use vassist_sc::DialogueResponder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
}

/// Conversation history plus the keyword responder
#[derive(Debug, Default)]
pub struct ChatSession {
    responder: DialogueResponder,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the user's utterance and the bot's reply, returning the reply
    pub fn handle_utterance(&mut self, text: &str) -> String {
        let reply = self.responder.respond(text);
        debug!("Chat: '{}' -> '{}'", text, reply);
        self.messages.push(ChatMessage {
            speaker: Speaker::User,
            text: text.to_string(),
        });
        self.messages.push(ChatMessage {
            speaker: Speaker::Bot,
            text: reply.clone(),
        });
        reply
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_alternates() {
        let mut chat = ChatSession::new();
        let reply = chat.handle_utterance("hello");
        assert_eq!(reply, "Hello! How can I help you today?");

        chat.handle_utterance("open the door");
        let speakers: Vec<Speaker> = chat.messages().iter().map(|m| m.speaker).collect();
        assert_eq!(speakers, vec![Speaker::User, Speaker::Bot, Speaker::User, Speaker::Bot]);
        assert_eq!(chat.messages()[0].text, "hello");
    }
}
