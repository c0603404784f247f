use crate::event::Member;

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Inline mention that works whether or not the user has a username.
pub fn mention_html(member: &Member) -> String {
    format!(
        "<a href=\"tg://user?id={}\">{}</a>",
        member.id.0,
        escape_html(&member.full_name)
    )
}

pub fn welcome_html(member: &Member) -> String {
    format!("👋 Welcome, {}!", mention_html(member))
}
