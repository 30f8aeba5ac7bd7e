//! R1 message layout.
//!
//! DeepSeek-R1 style models reject a dedicated system role and consecutive
//! turns with the same role. The caller folds the system instruction in as a
//! leading user turn; this module merges each run of same-role turns into one
//! chat message.

use itertools::Itertools;

use crate::api::openai::{ChatContent, ChatMessage, ChatRole};
use crate::model::{Message, Part, Role};

/// Convert a conversation into the R1 layout.
///
/// Runs of consecutive messages sharing a role are merged: text-only runs
/// become a single newline-joined string, runs containing images become
/// content parts when the model `supports_images`. Assistant turns never
/// carry images.
pub fn convert_to_r1_format(messages: &[Message], supports_images: bool) -> Vec<ChatMessage> {
    messages
        .iter()
        .map(|msg| (msg.role(), msg.parts().to_vec()))
        .coalesce(|(prev_role, mut prev_parts), (role, parts)| {
            if prev_role == role {
                prev_parts.extend(parts);
                Ok((prev_role, prev_parts))
            } else {
                Err(((prev_role, prev_parts), (role, parts)))
            }
        })
        .map(|(role, parts)| merged_message(role, &parts, supports_images))
        .collect()
}

fn merged_message(role: Role, parts: &[Part], supports_images: bool) -> ChatMessage {
    match role {
        Role::User => ChatMessage {
            role: ChatRole::User,
            content: ChatContent::from_parts(parts, supports_images),
        },
        Role::Assistant => ChatMessage {
            role: ChatRole::Assistant,
            content: ChatContent::from_parts(parts, false),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::openai::ChatContentPart;

    #[test]
    fn test_system_folds_into_first_user_turn() {
        let messages = vec![
            Message::user("You are terse."),
            Message::user("Hi"),
            Message::assistant("Hello"),
            Message::user("Bye"),
        ];

        assert_eq!(
            convert_to_r1_format(&messages, true),
            vec![
                ChatMessage::text(ChatRole::User, "You are terse.\nHi"),
                ChatMessage::text(ChatRole::Assistant, "Hello"),
                ChatMessage::text(ChatRole::User, "Bye"),
            ]
        );
    }

    #[test]
    fn test_consecutive_assistant_turns_merge() {
        let messages = vec![
            Message::user("q"),
            Message::assistant("a1"),
            Message::assistant("a2"),
        ];

        let converted = convert_to_r1_format(&messages, true);
        assert_eq!(converted.len(), 2);
        assert_eq!(
            converted[1],
            ChatMessage::text(ChatRole::Assistant, "a1\na2")
        );
    }

    #[test]
    fn test_merged_run_with_image_keeps_parts() {
        let messages = vec![
            Message::user("system"),
            Message::User(vec![Part::Image {
                media_type: "image/jpeg".to_string(),
                data: "Zm9v".to_string(),
            }]),
        ];

        let converted = convert_to_r1_format(&messages, true);
        assert_eq!(converted.len(), 1);
        match &converted[0].content {
            ChatContent::Parts(parts) => {
                assert_eq!(parts.len(), 2);
                assert_eq!(
                    parts[0],
                    ChatContentPart::Text {
                        text: "system".to_string()
                    }
                );
                assert!(matches!(parts[1], ChatContentPart::ImageUrl { .. }));
            }
            other => panic!("expected content parts, got {other:?}"),
        }
    }

    #[test]
    fn test_merged_run_without_image_support_is_text() {
        let messages = vec![
            Message::user("system"),
            Message::User(vec![
                Part::Text("look".to_string()),
                Part::Image {
                    media_type: "image/jpeg".to_string(),
                    data: "Zm9v".to_string(),
                },
            ]),
        ];

        assert_eq!(
            convert_to_r1_format(&messages, false),
            vec![ChatMessage::text(ChatRole::User, "system\nlook")]
        );
    }

    #[test]
    fn test_empty_conversation() {
        assert!(convert_to_r1_format(&[], true).is_empty());
    }
}
