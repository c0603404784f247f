use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::{
    domain::{ChatId, MessageRef, UserId},
    platform::port::{ChatPlatform, MemberStatus},
    Result,
};

#[derive(Clone, Copy, Debug)]
pub struct ThrottleConfig {
    /// Minimum spacing between any two API calls.
    pub global_min_interval: Duration,
    /// Minimum spacing between outgoing messages in one chat.
    pub per_chat_send_interval: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            global_min_interval: Duration::from_millis(40), // ~25/sec
            per_chat_send_interval: Duration::from_millis(1050), // ~0.95/sec
        }
    }
}

/// Earliest instant each kind of call may run again.
#[derive(Debug)]
struct Slots {
    global: Instant,
    sends: HashMap<i64, Instant>,
}

/// Take the slot at `next` (or `now` if it has passed), push `next` one
/// interval further, and return how long to wait for the taken slot.
fn take_slot(next: &mut Instant, now: Instant, interval: Duration) -> Duration {
    let start = (*next).max(now);
    *next = start + interval;
    start - now
}

/// ChatPlatform decorator that spaces out outbound calls.
///
/// A join burst produces one welcome per member in the same chat, and
/// Telegram answers more than about one message per second per chat with
/// 429s. Sends are therefore spaced per chat as well as globally. Deletes and
/// member lookups only take a global slot, so spam removal is never queued
/// behind welcome messages.
pub struct ThrottledPlatform {
    inner: Arc<dyn ChatPlatform>,
    cfg: ThrottleConfig,
    slots: Mutex<Slots>,
}

impl ThrottledPlatform {
    pub fn new(inner: Arc<dyn ChatPlatform>, cfg: ThrottleConfig) -> Self {
        Self {
            inner,
            cfg,
            slots: Mutex::new(Slots {
                global: Instant::now(),
                sends: HashMap::new(),
            }),
        }
    }

    async fn wait_for_send(&self, chat_id: ChatId) {
        let wait = {
            let mut slots = self.slots.lock().await;
            let now = Instant::now();
            let global = take_slot(&mut slots.global, now, self.cfg.global_min_interval);
            if !slots.sends.contains_key(&chat_id.0) {
                // A chat whose slot has passed behaves exactly like an unseen one.
                slots.sends.retain(|_, next| *next > now);
            }
            let next = slots.sends.entry(chat_id.0).or_insert(now);
            global.max(take_slot(next, now, self.cfg.per_chat_send_interval))
        };
        if !wait.is_zero() {
            sleep(wait).await;
        }
    }

    async fn wait_for_global(&self) {
        let wait = {
            let mut slots = self.slots.lock().await;
            take_slot(&mut slots.global, Instant::now(), self.cfg.global_min_interval)
        };
        if !wait.is_zero() {
            sleep(wait).await;
        }
    }
}

#[async_trait]
impl ChatPlatform for ThrottledPlatform {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        self.wait_for_send(chat_id).await;
        self.inner.send_html(chat_id, html).await
    }

    async fn reply_text(&self, to: MessageRef, text: &str) -> Result<MessageRef> {
        self.wait_for_send(to.chat_id).await;
        self.inner.reply_text(to, text).await
    }

    async fn delete_message(&self, msg: MessageRef) -> Result<()> {
        self.wait_for_global().await;
        self.inner.delete_message(msg).await
    }

    async fn member_status(&self, chat_id: ChatId, user_id: UserId) -> Result<MemberStatus> {
        self.wait_for_global().await;
        self.inner.member_status(chat_id, user_id).await
    }
}
