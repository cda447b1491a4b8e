#[cfg(test)]
mod tests {
    use crate::card::*;
    use crate::chat::*;
    use crate::config::*;
    use crate::error::*;
    use crate::event::*;
    use crate::session::*;
    use crate::timestamp::parse_timestamp;
    use chrono::{Datelike, Timelike};

    fn reply(intent: Intent, card_id: Option<i64>) -> ChatReply {
        ChatReply {
            session_id: Some("sess-1".to_string()),
            response: "ok".to_string(),
            intent,
            confidence: 0.8,
            reasoning: "because".to_string(),
            card_id: card_id.map(CardId),
            timestamp: "2024-03-01T10:00:00".to_string(),
        }
    }

    // ─── Card Tests ──────────────────────────────────────────

    #[test]
    fn test_card_deserializes_backend_shape() {
        let json = r#"{
            "id": 7,
            "title": "Ownership",
            "content": "<p>Each value has one owner</p>",
            "metadata": {"novelty": "High", "processed": true},
            "created_at": "2024-05-02T08:15:00.123456"
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, CardId(7));
        assert_eq!(card.title, "Ownership");
        assert_eq!(card.novelty(), Some("High"));
    }

    #[test]
    fn test_card_without_metadata() {
        let card: Card =
            serde_json::from_str(r#"{"id": 1, "title": "t", "content": "c", "created_at": ""}"#)
                .unwrap();
        assert!(card.metadata.is_none());
        assert!(card.novelty().is_none());
    }

    #[test]
    fn test_card_id_display() {
        assert_eq!(CardId(42).to_string(), "42");
    }

    #[test]
    fn test_truncate_chars_short_text_untouched() {
        assert_eq!(truncate_chars("hello", 500), "hello");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        let text = "ééééé";
        assert_eq!(truncate_chars(text, 3), "ééé");
        assert_eq!(truncate_chars(text, 0), "");
    }

    #[test]
    fn test_focused_context_truncates_content() {
        let card = Card::new(CardId(3), "Long", "x".repeat(800));
        let ctx = FocusedCardContext::from_card(&card, 500);
        assert_eq!(ctx.id, CardId(3));
        assert_eq!(ctx.title, "Long");
        assert_eq!(ctx.content.len(), 500);
    }

    #[test]
    fn test_card_patch_skips_absent_fields() {
        let patch = CardPatch::title("Renamed");
        assert!(!patch.is_empty());
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"title":"Renamed"}"#);
        assert!(CardPatch::default().is_empty());
    }

    // ─── Chat Tests ──────────────────────────────────────────

    #[test]
    fn test_intent_wire_names() {
        assert_eq!(serde_json::to_string(&Intent::NoAction).unwrap(), r#""NO_ACTION""#);
        assert_eq!(serde_json::to_string(&Intent::CreateNew).unwrap(), r#""CREATE_NEW""#);
        let intent: Intent = serde_json::from_str(r#""UPDATE""#).unwrap();
        assert_eq!(intent, Intent::Update);
    }

    #[test]
    fn test_intent_unrecognised_is_unknown() {
        let intent: Intent = serde_json::from_str(r#""DELETE_ALL""#).unwrap();
        assert_eq!(intent, Intent::Unknown);
        assert!(!intent.mutates_cards());
    }

    #[test]
    fn test_request_omits_focused_card_when_none() {
        let req = ChatRequest {
            message: "hi".to_string(),
            session_id: None,
            focused_card: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("focused_card").is_none());
        assert!(value["session_id"].is_null());
    }

    #[test]
    fn test_request_carries_focused_card() {
        let card = Card::new(CardId(9), "Rust", "borrowing");
        let req = ChatRequest {
            message: "expand this".to_string(),
            session_id: Some("abc".to_string()),
            focused_card: Some(FocusedCardContext::from_card(&card, 500)),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["focused_card"]["id"], 9);
        assert_eq!(value["session_id"], "abc");
    }

    #[test]
    fn test_reply_with_null_session_and_card() {
        let json = r#"{
            "session_id": null,
            "response": "Sure",
            "intent": "NO_ACTION",
            "confidence": 0.4,
            "reasoning": "question",
            "card_id": null,
            "timestamp": "2024-01-01T00:00:00"
        }"#;
        let reply: ChatReply = serde_json::from_str(json).unwrap();
        assert!(reply.session_id.is_none());
        assert!(reply.mutated_card().is_none());
        assert!(reply.created_card().is_none());
    }

    #[test]
    fn test_reply_mutation_helpers() {
        assert_eq!(reply(Intent::CreateNew, Some(99)).mutated_card(), Some(CardId(99)));
        assert_eq!(reply(Intent::CreateNew, Some(99)).created_card(), Some(CardId(99)));
        assert_eq!(reply(Intent::Update, Some(4)).mutated_card(), Some(CardId(4)));
        assert!(reply(Intent::Update, Some(4)).created_card().is_none());
        assert!(reply(Intent::CreateNew, None).mutated_card().is_none());
        assert!(reply(Intent::NoAction, Some(1)).mutated_card().is_none());
    }

    #[test]
    fn test_assistant_message_from_reply() {
        let msg = ChatMessage::from_reply(&reply(Intent::CreateNew, Some(99)));
        match msg {
            ChatMessage::Assistant {
                text,
                intent,
                related_card_id,
                timestamp,
                ..
            } => {
                assert_eq!(text, "ok");
                assert_eq!(intent, Intent::CreateNew);
                assert_eq!(related_card_id, Some(CardId(99)));
                assert_eq!(timestamp.month(), 3);
                assert_eq!(timestamp.hour(), 10);
            }
            other => panic!("Wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_assistant_confidence_is_clamped() {
        let mut r = reply(Intent::NoAction, None);
        r.confidence = 1.7;
        if let ChatMessage::Assistant { confidence, .. } = ChatMessage::from_reply(&r) {
            assert_eq!(confidence, 1.0);
        }
        r.confidence = f32::NAN;
        if let ChatMessage::Assistant { confidence, .. } = ChatMessage::from_reply(&r) {
            assert_eq!(confidence, 0.0);
        }
    }

    #[test]
    fn test_chat_message_text_accessor() {
        assert_eq!(ChatMessage::user("hello").text(), "hello");
        assert_eq!(ChatMessage::system_error("oops").text(), "oops");
    }

    #[test]
    fn test_chat_message_tagged_serialization() {
        let json = serde_json::to_string(&ChatMessage::user("hi")).unwrap();
        assert!(json.contains(r#""kind":"user""#));
    }

    // ─── Session Tests ───────────────────────────────────────

    #[test]
    fn test_session_default_is_inactive() {
        let session = Session::default();
        assert!(session.session_id.is_none());
        assert!(!session.is_remote_active());
    }

    #[test]
    fn test_session_needs_both_id_and_memory() {
        let mut session = Session {
            session_id: Some("s".to_string()),
            remote_memory_enabled: false,
        };
        assert!(!session.is_remote_active());
        session.remote_memory_enabled = true;
        assert!(session.is_remote_active());
    }

    // ─── Timestamp Tests ─────────────────────────────────────

    #[test]
    fn test_parse_timestamp_naive_iso() {
        let ts = parse_timestamp("2024-05-02T08:15:00.123456").unwrap();
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.day(), 2);
        assert_eq!(ts.hour(), 8);
    }

    #[test]
    fn test_parse_timestamp_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-05-02T08:15:00+02:00").unwrap();
        assert_eq!(ts.hour(), 6);
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.backend.cards_url, "http://localhost:5000");
        assert_eq!(config.backend.ai_url, "http://localhost:8000");
        assert_eq!(config.context.max_content_chars, 500);
        assert_eq!(config.health.poll_interval_ms, 30_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"backend": {"cards_url": "https://cards.example", "ai_url": "https://ai.example/"}}"#)
                .unwrap();
        assert_eq!(config.backend.ai_base(), "https://ai.example");
        assert_eq!(config.refocus, RefocusPolicy::default());
    }

    #[test]
    fn test_config_rejects_bad_url() {
        let mut config = AppConfig::default();
        config.backend.ai_url = "localhost:8000".to_string();
        assert!(matches!(config.validate(), Err(CardsError::Config(_))));
    }

    #[test]
    fn test_config_rejects_zero_attempts() {
        let mut config = AppConfig::default();
        config.refocus.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_refocus_backoff() {
        let policy = RefocusPolicy::default();
        assert_eq!(policy.delay_for(0), 500);
        assert_eq!(policy.delay_for(1), 1000);
        assert_eq!(policy.delay_for(2), 2000);
        assert_eq!(policy.delay_for(3), 4000);
        assert_eq!(policy.delay_for(10), 4000);
    }

    #[test]
    fn test_refocus_backoff_saturates() {
        let policy = RefocusPolicy {
            max_attempts: 3,
            initial_delay_ms: u64::MAX / 2,
            backoff_factor: 1000,
            max_delay_ms: u64::MAX,
        };
        assert_eq!(policy.delay_for(5), u64::MAX);
    }

    // ─── Event / Error Tests ─────────────────────────────────

    #[test]
    fn test_focus_reason_scroll_hint() {
        assert!(FocusReason::Click.wants_scroll());
        assert!(FocusReason::Created.wants_scroll());
        assert!(!FocusReason::Scroll.wants_scroll());
        assert!(!FocusReason::CardsChanged.wants_scroll());
    }

    #[test]
    fn test_app_event_serialization() {
        let event = AppEvent::FocusChanged {
            card_id: Some(CardId(5)),
            reason: FocusReason::Click,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("FocusChanged"));
        assert!(json.contains("Click"));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(CardsError::NotFound(CardId(3)).to_string(), "Card 3 not found");
        assert_eq!(
            CardsError::Transport("timeout".to_string()).to_string(),
            "Network error: timeout"
        );
    }

    #[test]
    fn test_error_from_serde() {
        let err: CardsError = serde_json::from_str::<Card>("{oops").unwrap_err().into();
        assert!(matches!(err, CardsError::Serialization(_)));
    }
}
