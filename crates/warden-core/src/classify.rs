use crate::{
    commands::Command,
    event::{ChatEvent, Member, SystemNotice},
};

/// What the pipeline should do with an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Category<'a> {
    Command(Command),
    NewMembers(&'a [Member]),
    SystemNotice(SystemNotice),
    GroupText(&'a str),
    Other,
}

/// Route an event to exactly one category.
///
/// Precedence: command, new members, system notice, group text.
pub fn classify<'a>(event: &'a ChatEvent, bot_username: Option<&str>) -> Category<'a> {
    if let Some(cmd) = event
        .text
        .as_deref()
        .and_then(|t| Command::parse(t, bot_username))
    {
        return Category::Command(cmd);
    }

    if !event.new_members.is_empty() {
        return Category::NewMembers(&event.new_members);
    }

    if let Some(notice) = event.notice {
        return Category::SystemNotice(notice);
    }

    match event.text.as_deref() {
        Some(text) if event.chat.kind.is_group() => Category::GroupText(text),
        _ => Category::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{group_event, member, private_event};

    #[test]
    fn commands_win_over_everything() {
        let ev = group_event(1, Some("/listwords"));
        assert_eq!(classify(&ev, None), Category::Command(Command::ListWords));
    }

    #[test]
    fn unknown_commands_fall_through_to_text() {
        let ev = group_event(1, Some("/buy spam"));
        assert_eq!(classify(&ev, None), Category::GroupText("/buy spam"));
    }

    #[test]
    fn joins_before_notices() {
        let mut ev = group_event(1, None);
        ev.new_members = vec![member(5, Some("a"), "A")];
        ev.notice = Some(SystemNotice::MessagePinned);
        assert!(matches!(classify(&ev, None), Category::NewMembers(m) if m.len() == 1));

        ev.new_members.clear();
        assert_eq!(
            classify(&ev, None),
            Category::SystemNotice(SystemNotice::MessagePinned)
        );
    }

    #[test]
    fn private_text_is_not_filtered() {
        let ev = private_event(9, Some("spam"));
        assert_eq!(classify(&ev, None), Category::Other);

        let ev = group_event(1, None);
        assert_eq!(classify(&ev, None), Category::Other);
    }
}
