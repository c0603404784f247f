use std::collections::HashSet;

use crate::{
    domain::{ChatId, UserId},
    platform::ChatPlatform,
};

/// Allow-list and admin checks.
#[derive(Clone, Debug, Default)]
pub struct AccessGuard {
    allowed_chats: HashSet<i64>,
}

impl AccessGuard {
    /// An empty allow-list means every chat is allowed.
    pub fn new(allowed_chats: impl IntoIterator<Item = i64>) -> Self {
        Self {
            allowed_chats: allowed_chats.into_iter().collect(),
        }
    }

    pub fn is_chat_allowed(&self, chat_id: ChatId) -> bool {
        self.allowed_chats.is_empty() || self.allowed_chats.contains(&chat_id.0)
    }

    /// True iff the user is an administrator or the creator of the chat.
    ///
    /// Fails closed: a lookup error counts as "not an admin".
    pub async fn is_admin(
        &self,
        platform: &dyn ChatPlatform,
        chat_id: ChatId,
        user_id: UserId,
    ) -> bool {
        match platform.member_status(chat_id, user_id).await {
            Ok(status) => status.is_admin(),
            Err(e) => {
                tracing::warn!(
                    chat_id = chat_id.0,
                    user_id = user_id.0,
                    "admin lookup failed: {e}"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{platform::MemberStatus, testing::FakePlatform};

    #[test]
    fn empty_allow_list_allows_everything() {
        let guard = AccessGuard::new([]);
        assert!(guard.is_chat_allowed(ChatId(1)));
        assert!(guard.is_chat_allowed(ChatId(-100)));
    }

    #[test]
    fn allow_list_is_exact() {
        let guard = AccessGuard::new([100]);
        assert!(guard.is_chat_allowed(ChatId(100)));
        assert!(!guard.is_chat_allowed(ChatId(200)));
    }

    #[tokio::test]
    async fn admin_check_maps_statuses_and_fails_closed() {
        let guard = AccessGuard::default();
        let fake = FakePlatform::default();
        let chat = ChatId(-5);

        fake.set_status(UserId(1), MemberStatus::Creator);
        fake.set_status(UserId(2), MemberStatus::Administrator);
        fake.set_status(UserId(3), MemberStatus::Member);
        fake.set_status(UserId(4), MemberStatus::Restricted);

        assert!(guard.is_admin(&fake, chat, UserId(1)).await);
        assert!(guard.is_admin(&fake, chat, UserId(2)).await);
        assert!(!guard.is_admin(&fake, chat, UserId(3)).await);
        assert!(!guard.is_admin(&fake, chat, UserId(4)).await);

        // Unknown users make the fake return an error.
        assert!(!guard.is_admin(&fake, chat, UserId(99)).await);
    }
}
