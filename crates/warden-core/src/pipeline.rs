//! The moderation pipeline: one call per inbound event.
//!
//! Every event is first written to the chat-activity log, then classified and
//! handed to at most one executor. Nothing in here returns an error: platform
//! and file failures are logged and the event is considered handled.

use std::{sync::Arc, time::Duration};

use chrono::Local;

use crate::{
    access::AccessGuard,
    classify::{classify, Category},
    commands::{self, Command},
    config::Config,
    event::{ChatEvent, ChatInfo, ChatKind, Member, SystemNotice},
    formatting::welcome_html,
    journal::Journal,
    platform::{delete_best_effort, schedule_delete, ChatPlatform},
    wordlist::{WordListError, WordListStore},
};

const DEFAULT_WELCOME_TTL: Duration = Duration::from_secs(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WordEdit {
    Add,
    Remove,
}

pub struct Moderator {
    platform: Arc<dyn ChatPlatform>,
    words: Arc<WordListStore>,
    guard: AccessGuard,
    journal: Journal,
    welcome_ttl: Duration,
    bot_username: Option<String>,
}

impl Moderator {
    pub fn new(
        platform: Arc<dyn ChatPlatform>,
        words: Arc<WordListStore>,
        guard: AccessGuard,
        journal: Journal,
    ) -> Self {
        Self {
            platform,
            words,
            guard,
            journal,
            welcome_ttl: DEFAULT_WELCOME_TTL,
            bot_username: None,
        }
    }

    pub fn from_config(
        cfg: &Config,
        platform: Arc<dyn ChatPlatform>,
        words: Arc<WordListStore>,
    ) -> Self {
        Self::new(
            platform,
            words,
            AccessGuard::new(cfg.allowed_chat_ids.iter().copied()),
            Journal::new(
                cfg.join_log_path.clone(),
                cfg.delete_log_path.clone(),
                cfg.chat_log_path.clone(),
            ),
        )
        .with_welcome_ttl(cfg.welcome_ttl)
    }

    pub fn with_welcome_ttl(mut self, ttl: Duration) -> Self {
        self.welcome_ttl = ttl;
        self
    }

    /// Commands addressed to another `@bot` are ignored once this is set.
    pub fn with_bot_username(mut self, username: Option<String>) -> Self {
        self.bot_username = username;
        self
    }

    pub fn words(&self) -> &WordListStore {
        &self.words
    }

    /// Chat-activity log only. Edits and channel posts go through here and
    /// are never moderated.
    pub fn record_activity(&self, chat: &ChatInfo) {
        if let Err(e) = self.journal.record_chat(chat) {
            tracing::warn!(chat_id = chat.id.0, "chat log write failed: {e}");
        }
    }

    pub async fn handle(&self, event: &ChatEvent) {
        self.record_activity(&event.chat);

        match classify(event, self.bot_username.as_deref()) {
            Category::Command(cmd) => self.run_command(event, cmd).await,
            _ if !self.guard.is_chat_allowed(event.chat.id) => {
                tracing::debug!(chat_id = event.chat.id.0, "chat not allowed; skipping");
            }
            Category::NewMembers(members) => self.welcome(event, members).await,
            Category::SystemNotice(notice) => self.remove_notice(event, notice).await,
            Category::GroupText(text) => self.filter_text(event, text).await,
            Category::Other => {}
        }
    }

    async fn welcome(&self, event: &ChatEvent, members: &[Member]) {
        if let Some(notice) = event.message_ref() {
            delete_best_effort(self.platform.as_ref(), notice).await;
        }

        for member in members {
            match self
                .platform
                .send_html(event.chat.id, &welcome_html(member))
                .await
            {
                Ok(sent) => {
                    schedule_delete(self.platform.clone(), sent, self.welcome_ttl);
                }
                Err(e) => {
                    tracing::warn!(
                        chat_id = event.chat.id.0,
                        user_id = member.id.0,
                        "welcome send failed: {e}"
                    );
                }
            }

            if let Err(e) = self.journal.record_join(member, &event.chat) {
                tracing::warn!(chat_id = event.chat.id.0, "join log write failed: {e}");
            }
        }
    }

    async fn remove_notice(&self, event: &ChatEvent, notice: SystemNotice) {
        let Some(msg) = event.message_ref() else {
            return;
        };
        if delete_best_effort(self.platform.as_ref(), msg).await {
            tracing::debug!(chat_id = event.chat.id.0, ?notice, "system notice removed");
        }
    }

    async fn filter_text(&self, event: &ChatEvent, text: &str) {
        if !self.words.contains(text).await {
            return;
        }

        if let Some(msg) = event.message_ref() {
            delete_best_effort(self.platform.as_ref(), msg).await;
        }
        tracing::info!(
            chat_id = event.chat.id.0,
            user_id = event.sender.as_ref().map(|s| s.id.0),
            "filtered message with banned word"
        );

        if let Err(e) = self.journal.record_deletion(event.sender.as_ref(), text) {
            tracing::warn!(chat_id = event.chat.id.0, "deletion log write failed: {e}");
        }
    }

    async fn run_command(&self, event: &ChatEvent, cmd: Command) {
        let Some(origin) = event.message_ref() else {
            return;
        };
        let allowed = self.guard.is_chat_allowed(event.chat.id);

        let reply = match &cmd {
            Command::Start => (event.chat.kind == ChatKind::Private || allowed)
                .then(|| commands::GREETING.to_string()),
            Command::Help => Some(commands::HELP.to_string()),
            Command::Status => Some(commands::status(&Local::now())),
            Command::ListWords => {
                if allowed {
                    Some(commands::word_list(&self.words.list().await))
                } else {
                    None
                }
            }
            Command::AddWord(args) if allowed => {
                Some(self.edit_words(event, WordEdit::Add, args).await)
            }
            Command::DelWord(args) if allowed => {
                Some(self.edit_words(event, WordEdit::Remove, args).await)
            }
            Command::AddWord(_) | Command::DelWord(_) => None,
        };

        let Some(reply) = reply else {
            tracing::debug!(
                chat_id = event.chat.id.0,
                command = cmd.name(),
                "command ignored in this chat"
            );
            return;
        };
        if let Err(e) = self.platform.reply_text(origin, &reply).await {
            tracing::warn!(
                chat_id = event.chat.id.0,
                command = cmd.name(),
                "reply failed: {e}"
            );
        }
    }

    /// Admin-gated word list mutation. Check order: admin, then arguments.
    async fn edit_words(&self, event: &ChatEvent, edit: WordEdit, args: &[String]) -> String {
        let command = match edit {
            WordEdit::Add => "addword",
            WordEdit::Remove => "delword",
        };

        let is_admin = match &event.sender {
            Some(sender) => {
                self.guard
                    .is_admin(self.platform.as_ref(), event.chat.id, sender.id)
                    .await
            }
            None => false,
        };
        if !is_admin {
            return commands::PERMISSION_DENIED.to_string();
        }

        let [word] = args else {
            return commands::usage(command);
        };

        let result = match edit {
            WordEdit::Add => self.words.add(word).await,
            WordEdit::Remove => self.words.remove(word).await,
        };

        match (edit, result) {
            (WordEdit::Add, Ok(word)) => {
                tracing::info!(chat_id = event.chat.id.0, %word, "banned word added");
                commands::added(&word)
            }
            (WordEdit::Remove, Ok(word)) => {
                tracing::info!(chat_id = event.chat.id.0, %word, "banned word removed");
                commands::removed(&word)
            }
            (_, Err(WordListError::AlreadyExists(word))) => commands::already_exists(&word),
            (_, Err(WordListError::NotFound(word))) => commands::not_found(&word),
            (_, Err(WordListError::EmptyWord)) => commands::usage(command),
            (_, Err(WordListError::Io(e))) => {
                tracing::warn!(
                    path = %self.words.path().display(),
                    "word list write failed: {e}"
                );
                commands::SAVE_FAILED.to_string()
            }
        }
    }
}
