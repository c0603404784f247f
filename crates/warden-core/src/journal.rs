use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};

use crate::{
    event::{ChatInfo, Member},
    Result,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One append-only text log. Lines are never rewritten or rotated.
#[derive(Clone, Debug)]
pub struct AppendLog {
    path: PathBuf,
}

impl AppendLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `<timestamp> — <body>` as a single line.
    pub fn append(&self, at: DateTime<Local>, body: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = format!("{} — {body}\n", at.format(TIMESTAMP_FORMAT));
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

/// The three activity logs the bot keeps.
#[derive(Clone, Debug)]
pub struct Journal {
    pub joins: AppendLog,
    pub deletions: AppendLog,
    pub chats: AppendLog,
}

impl Journal {
    pub fn new(
        joins: impl Into<PathBuf>,
        deletions: impl Into<PathBuf>,
        chats: impl Into<PathBuf>,
    ) -> Self {
        Self {
            joins: AppendLog::new(joins),
            deletions: AppendLog::new(deletions),
            chats: AppendLog::new(chats),
        }
    }

    pub fn record_join(&self, member: &Member, chat: &ChatInfo) -> Result<()> {
        self.joins.append(Local::now(), &join_line(member, chat))
    }

    pub fn record_deletion(&self, sender: Option<&Member>, text: &str) -> Result<()> {
        self.deletions.append(Local::now(), &deletion_line(sender, text))
    }

    pub fn record_chat(&self, chat: &ChatInfo) -> Result<()> {
        self.chats.append(Local::now(), &chat_line(chat))
    }
}

pub fn join_line(member: &Member, chat: &ChatInfo) -> String {
    let handle = match member.username.as_deref() {
        Some(u) => format!("@{u}"),
        None => "no username".to_string(),
    };
    format!(
        "{} ({handle}) ID:{} joined {}",
        member.full_name,
        member.id.0,
        chat_title(chat)
    )
}

pub fn deletion_line(sender: Option<&Member>, text: &str) -> String {
    let username = sender
        .and_then(|m| m.username.as_deref())
        .unwrap_or("no nickname");
    format!("Deleted message from @{username}: {}", single_line(text))
}

/// Escape line breaks so a multi-line message stays on one log line.
fn single_line(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\r', "\\r")
        .replace('\n', "\\n")
}

pub fn chat_line(chat: &ChatInfo) -> String {
    format!(
        "{} — {} (ID: {})",
        chat.kind.as_str().to_uppercase(),
        chat_title(chat),
        chat.id.0
    )
}

fn chat_title(chat: &ChatInfo) -> &str {
    chat.title.as_deref().unwrap_or("private")
}
