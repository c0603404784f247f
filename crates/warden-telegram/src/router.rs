use std::{sync::Arc, time::Duration};

use teloxide::{
    dispatching::{Dispatcher, UpdateHandler},
    dptree,
    prelude::*,
    types::BotCommand,
};

use warden_core::{
    config::Config,
    domain::ChatId,
    pipeline::Moderator,
    platform::{
        throttled::{ThrottleConfig, ThrottledPlatform},
        ChatPlatform,
    },
    wordlist::WordListStore,
};

use crate::{convert, TelegramPlatform};

pub struct AppState {
    pub moderator: Moderator,
}

pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    // Transport timeouts are fixed here, once. Keep them above the long-poll
    // timeout so idle polls are not cut off.
    let client = teloxide::net::default_reqwest_settings()
        .timeout(cfg.http_timeout)
        .build()?;
    let bot = Bot::with_client(cfg.telegram_bot_token.clone(), client);

    let bot_username = match bot.get_me().await {
        Ok(me) => {
            tracing::info!("warden started: @{}", me.username());
            me.user.username.clone()
        }
        Err(e) => {
            tracing::warn!("get_me failed, commands to other bots will not be filtered: {e}");
            None
        }
    };
    if cfg.allowed_chat_ids.is_empty() {
        tracing::info!("allowed chats: all");
    } else {
        tracing::info!(count = cfg.allowed_chat_ids.len(), "allowed chats");
    }

    let words = Arc::new(WordListStore::load(&cfg.banned_words_file)?);
    tracing::info!(
        count = words.list().await.len(),
        path = %words.path().display(),
        "banned words loaded"
    );

    let raw_platform: Arc<dyn ChatPlatform> = Arc::new(TelegramPlatform::new(bot.clone()));
    let platform: Arc<dyn ChatPlatform> = Arc::new(ThrottledPlatform::new(
        raw_platform,
        ThrottleConfig::default(),
    ));

    register_commands(&bot).await;

    if let Some(chat_id) = cfg.notify_chat_id {
        let platform = platform.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            if let Err(e) = platform
                .send_html(ChatId(chat_id), "🚀 Bot started")
                .await
            {
                tracing::warn!(chat_id, "startup notification failed: {e}");
            }
        });
    }

    let state = Arc::new(AppState {
        moderator: Moderator::from_config(&cfg, platform, words).with_bot_username(bot_username),
    });

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

/// New messages are moderated. Edits and channel posts only reach the
/// chat-activity log.
pub fn schema() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_edited_message().endpoint(record_activity))
        .branch(Update::filter_channel_post().endpoint(record_activity))
        .branch(Update::filter_edited_channel_post().endpoint(record_activity))
}

async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let event = convert::to_event(&msg);
    state.moderator.handle(&event).await;
    Ok(())
}

async fn record_activity(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    state.moderator.record_activity(&convert::chat_info(&msg));
    Ok(())
}

/// Publish the command list for client autocomplete. Best-effort.
async fn register_commands(bot: &Bot) {
    let commands = vec![
        BotCommand::new("start", "Greeting"),
        BotCommand::new("help", "Feature list"),
        BotCommand::new("status", "Check that the bot is running"),
        BotCommand::new("addword", "Add a banned word (admins)"),
        BotCommand::new("delword", "Remove a banned word (admins)"),
        BotCommand::new("listwords", "Show banned words"),
    ];
    if let Err(e) = bot.set_my_commands(commands).await {
        tracing::warn!("failed to register bot commands: {e}");
    }
}
