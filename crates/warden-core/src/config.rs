use std::{
    collections::HashMap,
    env, fs,
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

/// Typed configuration, built once at startup and shared by `Arc`.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,
    pub allowed_chat_ids: Vec<i64>,
    pub notify_chat_id: Option<i64>,

    // Files
    pub banned_words_file: PathBuf,
    pub join_log_path: PathBuf,
    pub delete_log_path: PathBuf,
    pub chat_log_path: PathBuf,

    // Runtime
    pub welcome_ttl: Duration,
    pub http_timeout: Duration,
    pub health_addr: SocketAddr,
}

impl Config {
    /// Load from the process environment, after merging `.env` if present.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `load` passes the environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = lookup("TOKEN")
            .and_then(non_empty)
            .or_else(|| lookup("TELEGRAM_BOT_TOKEN").and_then(non_empty))
            .ok_or_else(|| Error::Config("TOKEN environment variable is required".to_string()))?;

        let allowed_chat_ids = parse_csv_i64("ALLOWED_CHAT_IDS", lookup("ALLOWED_CHAT_IDS"))?;
        let notify_chat_id = match lookup("NOTIFY_CHAT_ID").and_then(non_empty) {
            Some(raw) => Some(parse_i64("NOTIFY_CHAT_ID", &raw)?),
            None => None,
        };

        let path_or = |key: &str, default: &str| {
            PathBuf::from(lookup(key).and_then(non_empty).unwrap_or(default.to_string()))
        };
        let banned_words_file = path_or("BANNED_WORDS_FILE", "banned_words.txt");
        let join_log_path = path_or("JOIN_LOG", "join_log.txt");
        let delete_log_path = path_or("DELETE_LOG", "deleted_messages.txt");
        let chat_log_path = path_or("CHAT_LOG", "bot_chats.log");

        let welcome_ttl = Duration::from_secs(
            parse_opt::<u64>("WELCOME_TTL_SECS", lookup("WELCOME_TTL_SECS"))?.unwrap_or(300),
        );
        let http_timeout = Duration::from_secs(
            parse_opt::<u64>("HTTP_TIMEOUT_SECS", lookup("HTTP_TIMEOUT_SECS"))?.unwrap_or(17),
        );
        let health_port =
            parse_opt::<u16>("HEALTH_PORT", lookup("HEALTH_PORT"))?.unwrap_or(10_000);
        let health_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, health_port));

        Ok(Self {
            telegram_bot_token,
            allowed_chat_ids,
            notify_chat_id,
            banned_words_file,
            join_log_path,
            delete_log_path,
            chat_log_path,
            welcome_ttl,
            http_timeout,
            health_addr,
        })
    }

    /// Build from a fixed set of pairs. Handy for tests and embedding.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::from_lookup(|key| map.get(key).cloned())
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn parse_i64(key: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::Config(format!("{key}: '{}' is not a valid chat id", raw.trim())))
}

fn parse_csv_i64(key: &str, v: Option<String>) -> Result<Vec<i64>> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| parse_i64(key, s))
        .collect()
}

fn parse_opt<T: std::str::FromStr>(key: &str, v: Option<String>) -> Result<Option<T>> {
    let Some(raw) = v.and_then(non_empty) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| Error::Config(format!("{key}: invalid value '{}'", raw.trim())))
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
