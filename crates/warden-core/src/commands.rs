//! Bot commands: parsing and reply texts.
//!
//! Execution lives in [`crate::pipeline`], which owns the state the commands
//! touch.

use chrono::{DateTime, TimeZone};

pub const GREETING: &str = "👋 Hi! I'm a bot that keeps this chat tidy.\n\
I remove system messages, filter banned words and log events.\n\n\
Send /help for the feature list.";

pub const HELP: &str = "🛠 Bot features:\n\
• Welcomes new members\n\
• Removes system messages (leaves, topics, pins and so on)\n\
• Filters messages containing banned words\n\
• Logs joins and deletions\n\n\
📌 Word-list commands work in groups where the bot is an administrator:\n\
/addword <word> - add a banned word\n\
/delword <word> - remove a banned word\n\
/listwords - show banned words\n\
/status - check that the bot is running";

pub const PERMISSION_DENIED: &str = "❌ You don't have permission to do that.";
pub const LIST_EMPTY: &str = "The list is empty.";
pub const SAVE_FAILED: &str = "⚠️ Could not save the word list. Try again later.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Status,
    AddWord(Vec<String>),
    DelWord(Vec<String>),
    ListWords,
}

impl Command {
    /// Parse a message text into a command.
    ///
    /// Returns `None` for plain text, unknown commands, and commands addressed
    /// to a different bot (`/cmd@otherbot`). Those are treated as ordinary text.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let text = text.trim_start();
        if !text.starts_with('/') {
            return None;
        }

        let mut tokens = text.split_whitespace();
        let head = tokens.next()?.trim_start_matches('/');
        let args: Vec<String> = tokens.map(str::to_string).collect();

        let (name, target) = match head.split_once('@') {
            Some((name, target)) => (name, Some(target)),
            None => (head, None),
        };
        if let (Some(target), Some(me)) = (target, bot_username) {
            if !target.eq_ignore_ascii_case(me.trim_start_matches('@')) {
                return None;
            }
        }

        match name.to_lowercase().as_str() {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            "status" => Some(Command::Status),
            "addword" => Some(Command::AddWord(args)),
            "delword" => Some(Command::DelWord(args)),
            "listwords" => Some(Command::ListWords),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Status => "status",
            Command::AddWord(_) => "addword",
            Command::DelWord(_) => "delword",
            Command::ListWords => "listwords",
        }
    }
}

pub fn usage(command: &str) -> String {
    format!("❗ Usage: /{command} <word>")
}

pub fn added(word: &str) -> String {
    format!("✅ Word '{word}' added.")
}

pub fn already_exists(word: &str) -> String {
    format!("⚠️ '{word}' is already in the list.")
}

pub fn removed(word: &str) -> String {
    format!("✅ Word '{word}' removed.")
}

pub fn not_found(word: &str) -> String {
    format!("⚠️ '{word}' is not in the list.")
}

pub fn word_list(words: &[String]) -> String {
    if words.is_empty() {
        return LIST_EMPTY.to_string();
    }
    format!("🚫 Banned words:\n{}", words.join("\n"))
}

pub fn status<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("✅ Bot is running\n🕒 {}", now.format("%d.%m.%Y %H:%M"))
}
