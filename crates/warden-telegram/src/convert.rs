use teloxide::types::{Message, MessageKind, User};

use warden_core::{
    domain::{ChatId, MessageId, UserId},
    event::{ChatEvent, ChatInfo, ChatKind, Member, SystemNotice},
};

/// Convert a teloxide message into the pipeline's event model.
pub fn to_event(msg: &Message) -> ChatEvent {
    ChatEvent {
        chat: chat_info(msg),
        message_id: Some(MessageId(msg.id.0)),
        sender: msg.from().map(to_member),
        text: msg.text().map(str::to_string),
        new_members: msg
            .new_chat_members()
            .map(|users| users.iter().map(to_member).collect())
            .unwrap_or_default(),
        notice: system_notice(&msg.kind),
    }
}

pub fn to_member(user: &User) -> Member {
    Member {
        id: UserId(user.id.0 as i64),
        username: user.username.clone(),
        full_name: user.full_name(),
    }
}

pub fn chat_info(msg: &Message) -> ChatInfo {
    let chat = &msg.chat;
    let kind = if chat.is_private() {
        ChatKind::Private
    } else if chat.is_group() {
        ChatKind::Group
    } else if chat.is_supergroup() {
        ChatKind::Supergroup
    } else {
        ChatKind::Channel
    };

    ChatInfo {
        id: ChatId(chat.id.0),
        kind,
        title: chat.title().map(str::to_string),
    }
}

fn system_notice(kind: &MessageKind) -> Option<SystemNotice> {
    let notice = match kind {
        MessageKind::LeftChatMember(_) => SystemNotice::MemberLeft,
        MessageKind::NewChatPhoto(_) => SystemNotice::ChatPhotoChanged,
        MessageKind::DeleteChatPhoto(_) => SystemNotice::ChatPhotoDeleted,
        MessageKind::Pinned(_) => SystemNotice::MessagePinned,
        MessageKind::GroupChatCreated(_) => SystemNotice::GroupCreated,
        MessageKind::SupergroupChatCreated(_) => SystemNotice::SupergroupCreated,
        MessageKind::MessageAutoDeleteTimerChanged(_) => SystemNotice::AutoDeleteTimerChanged,
        MessageKind::ForumTopicCreated(_) => SystemNotice::ForumTopicCreated,
        MessageKind::ForumTopicEdited(_) => SystemNotice::ForumTopicEdited,
        MessageKind::ForumTopicClosed(_) => SystemNotice::ForumTopicClosed,
        MessageKind::ForumTopicReopened(_) => SystemNotice::ForumTopicReopened,
        MessageKind::GeneralForumTopicHidden(_) => SystemNotice::GeneralForumTopicHidden,
        MessageKind::GeneralForumTopicUnhidden(_) => SystemNotice::GeneralForumTopicUnhidden,
        _ => return None,
    };
    Some(notice)
}
