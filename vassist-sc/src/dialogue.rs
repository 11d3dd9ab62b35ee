//! Keyword dialogue for the chat view
//!
//! Rules are checked in order and the first one with a matching trigger
//! wins. Triggers are lowercase substrings, so "hi" also matches inside
//! words such as "this".

use chrono::{Local, NaiveTime};

enum Reply {
    Fixed(&'static str),
    CurrentTime,
}

struct Rule {
    triggers: &'static [&'static str],
    reply: Reply,
}

const RULES: &[Rule] = &[
    Rule {
        triggers: &["hello", "hi"],
        reply: Reply::Fixed("Hello! How can I help you today?"),
    },
    Rule {
        triggers: &["help", "what can you do"],
        reply: Reply::Fixed(
            "I can help you with image recognition, navigation, and general assistance. What would you like to do?",
        ),
    },
    Rule {
        triggers: &["what is the current time right now", "can you tell me what time it is"],
        reply: Reply::CurrentTime,
    },
    Rule {
        triggers: &["can you do something intresting", "what else can you do"],
        reply: Reply::Fixed(
            "I am not trained yet to help you with such things but i will be availble very soon with large amount of data to help you with every complex problem. Hope you will consider this time",
        ),
    },
    Rule {
        triggers: &["how is todays weather", "what is the weather today"],
        reply: Reply::Fixed(
            "I apologize, but I currently don't have access to weather information. Would you like me to help you with something else?",
        ),
    },
];

pub const FALLBACK_REPLY: &str =
    "I'm not sure how to help with that. Would you like me to describe your surroundings using the camera?";

#[derive(Debug, Default, Clone, Copy)]
pub struct DialogueResponder;

impl DialogueResponder {
    pub fn new() -> Self {
        Self
    }

    /// Reply using the local wall clock for time questions
    pub fn respond(&self, text: &str) -> String {
        self.respond_at(text, Local::now().time())
    }

    pub fn respond_at(&self, text: &str, now: NaiveTime) -> String {
        let lower = text.to_lowercase();
        let rule = RULES
            .iter()
            .find(|rule| rule.triggers.iter().any(|t| lower.contains(t)));

        match rule.map(|r| &r.reply) {
            Some(Reply::Fixed(reply)) => (*reply).to_string(),
            Some(Reply::CurrentTime) => {
                format!("The current time is {}", now.format("%-I:%M:%S %p"))
            }
            None => FALLBACK_REPLY.to_string(),
        }
    }
}
