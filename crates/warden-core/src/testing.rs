//! Test support: a recording platform fake and event builders.

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicI32, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    errors::Error,
    event::{ChatEvent, ChatInfo, ChatKind, Member},
    platform::{ChatPlatform, MemberStatus},
    Result,
};

pub fn tmp_path(prefix: &str) -> PathBuf {
    static SEQ: AtomicI32 = AtomicI32::new(0);
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_nanos();
    let pid = std::process::id();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}-{seq}.txt"))
}

pub fn member(id: i64, username: Option<&str>, full_name: &str) -> Member {
    Member {
        id: UserId(id),
        username: username.map(str::to_string),
        full_name: full_name.to_string(),
    }
}

pub fn group_event(chat_id: i64, text: Option<&str>) -> ChatEvent {
    ChatEvent {
        chat: ChatInfo {
            id: ChatId(chat_id),
            kind: ChatKind::Supergroup,
            title: Some("Test Group".to_string()),
        },
        message_id: Some(MessageId(10)),
        sender: Some(member(1, Some("user"), "User One")),
        text: text.map(str::to_string),
        new_members: Vec::new(),
        notice: None,
    }
}

pub fn private_event(chat_id: i64, text: Option<&str>) -> ChatEvent {
    let mut ev = group_event(chat_id, text);
    ev.chat.kind = ChatKind::Private;
    ev.chat.title = None;
    ev
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sent {
    pub chat_id: ChatId,
    pub html: String,
    pub msg: MessageRef,
}

/// Records every outbound call. Member lookups for users without a configured
/// status fail, like a platform error would.
pub struct FakePlatform {
    next_id: AtomicI32,
    fail_deletes: AtomicBool,
    fail_sends: AtomicBool,
    sent: Mutex<Vec<Sent>>,
    replies: Mutex<Vec<(MessageRef, String)>>,
    deleted: Mutex<Vec<MessageRef>>,
    statuses: Mutex<HashMap<i64, MemberStatus>>,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self {
            next_id: AtomicI32::new(1000),
            fail_deletes: AtomicBool::new(false),
            fail_sends: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
            replies: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            statuses: Mutex::new(HashMap::new()),
        }
    }
}

impl FakePlatform {
    pub fn set_status(&self, user: UserId, status: MemberStatus) {
        self.statuses.lock().unwrap().insert(user.0, status);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Makes `send_html` and `reply_text` fail without recording anything.
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    fn check_send(&self) -> Result<()> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(Error::External(
                "Forbidden: bot was kicked from the supergroup chat".to_string(),
            ));
        }
        Ok(())
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<String> {
        self.replies
            .lock()
            .unwrap()
            .iter()
            .map(|(_, t)| t.clone())
            .collect()
    }

    pub fn deleted(&self) -> Vec<MessageRef> {
        self.deleted.lock().unwrap().clone()
    }

    fn next_ref(&self, chat_id: ChatId) -> MessageRef {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        MessageRef::new(chat_id, MessageId(id))
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        self.check_send()?;
        let msg = self.next_ref(chat_id);
        self.sent.lock().unwrap().push(Sent {
            chat_id,
            html: html.to_string(),
            msg,
        });
        Ok(msg)
    }

    async fn reply_text(&self, to: MessageRef, text: &str) -> Result<MessageRef> {
        self.check_send()?;
        self.replies.lock().unwrap().push((to, text.to_string()));
        Ok(self.next_ref(to.chat_id))
    }

    async fn delete_message(&self, msg: MessageRef) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Error::External(
                "Bad Request: message can't be deleted".to_string(),
            ));
        }
        self.deleted.lock().unwrap().push(msg);
        Ok(())
    }

    async fn member_status(&self, _chat_id: ChatId, user_id: UserId) -> Result<MemberStatus> {
        self.statuses
            .lock()
            .unwrap()
            .get(&user_id.0)
            .copied()
            .ok_or_else(|| Error::External("Bad Request: user not found".to_string()))
    }
}
