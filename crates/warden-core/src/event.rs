use crate::domain::{ChatId, MessageId, MessageRef, UserId};

/// Messenger-agnostic inbound update.
///
/// Telegram-specific parsing lives in the adapter; the pipeline only sees this.
#[derive(Clone, Debug)]
pub struct ChatEvent {
    pub chat: ChatInfo,
    pub message_id: Option<MessageId>,
    pub sender: Option<Member>,
    pub text: Option<String>,
    pub new_members: Vec<Member>,
    pub notice: Option<SystemNotice>,
}

impl ChatEvent {
    /// Reference to the message that carried this event, if any.
    pub fn message_ref(&self) -> Option<MessageRef> {
        self.message_id
            .map(|message_id| MessageRef::new(self.chat.id, message_id))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatInfo {
    pub id: ChatId,
    pub kind: ChatKind,
    pub title: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatKind::Private => "private",
            ChatKind::Group => "group",
            ChatKind::Supergroup => "supergroup",
            ChatKind::Channel => "channel",
        }
    }

    /// Groups and supergroups; the only chats the word filter watches.
    pub fn is_group(self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Supergroup)
    }
}

/// A user as seen in an event (sender or joining member).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub id: UserId,
    pub username: Option<String>,
    pub full_name: String,
}

/// Platform-generated service messages that get cleaned up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemNotice {
    MemberLeft,
    ChatPhotoChanged,
    ChatPhotoDeleted,
    MessagePinned,
    GroupCreated,
    SupergroupCreated,
    AutoDeleteTimerChanged,
    ForumTopicCreated,
    ForumTopicEdited,
    ForumTopicClosed,
    ForumTopicReopened,
    GeneralForumTopicHidden,
    GeneralForumTopicUnhidden,
}
