//! Formatting of reaction notifications sent to message authors.

use super::types::{Message, Reaction};

/// Maximum number of characters of the reacted message quoted in a notification.
pub const TEXT_PREVIEW_LEN: usize = 200;

/// Name used when the reacting user can't be resolved.
pub const UNKNOWN_USER_DISPLAY_NAME: &str = "Someone";

const ELLIPSIS: &str = "...";

/// Builds a single-line, quote-safe preview of a message text.
pub fn text_preview(text: &str) -> String {
    let truncated = text.chars().count() > TEXT_PREVIEW_LEN;

    let mut preview: String = text
        .chars()
        .take(TEXT_PREVIEW_LEN)
        .filter(|c| *c != '`')
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();

    if truncated {
        preview.push_str(ELLIPSIS);
    }

    preview
}

/// Builds the direct link to a message.
pub fn permalink(base_url: &str, message: &Message) -> String {
    format!(
        "{}/Limonad/workspace/{}/conversation/{}/message/{}",
        base_url.trim_end_matches('/'),
        message.workspace.key,
        message.conversation_id,
        message.id
    )
}

/// Picks the name to show for the reacting user, falling back to a placeholder.
pub fn display_name_or_placeholder(display_name: Option<&str>) -> &str {
    match display_name.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => UNKNOWN_USER_DISPLAY_NAME,
    }
}

/// Builds the notification body for a reaction added to `message`.
pub fn notification_body(display_name: &str, reaction: &Reaction, message: &Message, base_url: &str) -> String {
    format!(
        "{}: :{}:\n```\n{}\n```\n{}",
        display_name,
        reaction.emoji_name,
        text_preview(&message.text),
        permalink(base_url, message)
    )
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::types::Workspace;

    fn message(text: &str) -> Message {
        Message {
            id: "m-1".to_string(),
            conversation_id: "c-1".to_string(),
            thread_root_id: None,
            user_id: "u-1".to_string(),
            text: text.to_string(),
            reactions: vec![],
            workspace: Workspace {
                id: "w-1".to_string(),
                key: "acme".to_string(),
            },
        }
    }

    #[test]
    fn test_short_text_is_unchanged() {
        assert_eq!(text_preview("hello"), "hello");
        assert_eq!(text_preview(""), "");

        let exact = "x".repeat(TEXT_PREVIEW_LEN);
        assert_eq!(text_preview(&exact), exact);
    }

    #[test]
    fn test_long_text_is_truncated() {
        let long = "y".repeat(TEXT_PREVIEW_LEN + 1);

        assert_eq!(text_preview(&long), format!("{}...", "y".repeat(TEXT_PREVIEW_LEN)));
    }

    #[test]
    fn test_truncation_counts_characters() {
        let long = "ب".repeat(TEXT_PREVIEW_LEN + 10);
        let preview = text_preview(&long);

        assert_eq!(preview.chars().count(), TEXT_PREVIEW_LEN + ELLIPSIS.len());
    }

    #[test]
    fn test_newlines_and_backticks_are_sanitized() {
        assert_eq!(text_preview("a\r\nb\nc"), "a  b c");
        assert_eq!(text_preview("run `cargo` ```x```"), "run cargo x");
    }

    #[test]
    fn test_backticks_alone_do_not_add_ellipsis() {
        assert_eq!(text_preview("`quoted`"), "quoted");
    }

    #[test]
    fn test_long_text_is_sanitized_and_truncated() {
        let long = format!("`a\n{}", "z".repeat(TEXT_PREVIEW_LEN));
        let preview = text_preview(&long);

        assert!(preview.ends_with(ELLIPSIS));
        assert!(!preview.contains('`'));
        assert!(!preview.contains('\n'));
        assert!(preview.starts_with("a z"));
    }

    #[test]
    fn test_permalink() {
        let message = message("hello");

        assert_eq!(permalink("https://web.limoo.im", &message), "https://web.limoo.im/Limonad/workspace/acme/conversation/c-1/message/m-1");
        assert_eq!(permalink("https://web.limoo.im/", &message), "https://web.limoo.im/Limonad/workspace/acme/conversation/c-1/message/m-1");
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(display_name_or_placeholder(Some("Ada")), "Ada");
        assert_eq!(display_name_or_placeholder(Some("  ")), UNKNOWN_USER_DISPLAY_NAME);
        assert_eq!(display_name_or_placeholder(None), UNKNOWN_USER_DISPLAY_NAME);
    }

    #[test]
    fn test_notification_body() {
        let message = message("hello\nworld");
        let body = notification_body("Ada", &Reaction::new("thumbsup", "u-2"), &message, "https://web.limoo.im");

        assert_eq!(
            body,
            "Ada: :thumbsup:\n```\nhello world\n```\nhttps://web.limoo.im/Limonad/workspace/acme/conversation/c-1/message/m-1"
        );
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        fn sanitized(text: &str) -> String {
            text.chars().filter(|c| *c != '`').map(|c| if c == '\r' || c == '\n' { ' ' } else { c }).collect()
        }

        proptest! {
            #[test]
            fn test_short_plain_text_is_unchanged(text in "[a-zé ]{0,200}") {
                prop_assert_eq!(text_preview(&text), text);
            }

            #[test]
            fn test_preview_is_single_line_and_bounded(text in "[a-zé `\r\n]{0,400}") {
                let preview = text_preview(&text);
                let length = text.chars().count();

                prop_assert!(!preview.contains(['`', '\r', '\n']));

                if length > TEXT_PREVIEW_LEN {
                    let quoted: String = text.chars().take(TEXT_PREVIEW_LEN).collect();

                    prop_assert_eq!(preview, format!("{}{}", sanitized(&quoted), ELLIPSIS));
                } else {
                    prop_assert_eq!(preview, sanitized(&text));
                }
            }
        }
    }
}
