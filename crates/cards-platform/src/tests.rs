#[cfg(test)]
mod tests {
    use crate::api::ai_http::*;
    use crate::api::backend_error;
    use crate::api::cards_http::*;
    use crate::settings::*;
    use cards_types::card::CardId;
    use cards_types::chat::Intent;
    use cards_types::config::AppConfig;
    use cards_types::CardsError;

    // ─── Card service ────────────────────────────────────────

    #[test]
    fn test_parse_card_list() {
        let body = r#"{
            "success": true,
            "cards": [
                {"id": 1, "title": "Ownership", "content": "<p>Moves</p>",
                 "metadata": {"novelty": "High"}, "created_at": "2024-03-05T10:00:00"},
                {"id": 2, "title": "Borrowing", "content": "", "metadata": null,
                 "created_at": "2024-03-06T10:00:00"}
            ],
            "count": 2
        }"#;
        let cards = parse_card_list(200, body).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id, CardId(1));
        assert_eq!(cards[0].novelty(), Some("High"));
        assert!(cards[1].metadata.is_none());
    }

    #[test]
    fn test_parse_card_list_error_status() {
        let err = parse_card_list(500, r#"{"error": "db down"}"#).unwrap_err();
        assert_eq!(err, CardsError::Backend("HTTP 500: db down".to_string()));
    }

    #[test]
    fn test_parse_card_list_malformed() {
        let err = parse_card_list(200, "<html>").unwrap_err();
        assert!(matches!(err, CardsError::Serialization(_)));
    }

    #[test]
    fn test_parse_created() {
        let id = parse_created(200, r#"{"success": true, "card_id": 42}"#).unwrap();
        assert_eq!(id, CardId(42));
    }

    #[test]
    fn test_parse_created_failure() {
        let err = parse_created(500, r#"{"success": false, "error": "LLM timeout"}"#).unwrap_err();
        assert_eq!(err, CardsError::Backend("LLM timeout".to_string()));

        let err = parse_created(400, r#"{"error": "Missing 'text' field"}"#).unwrap_err();
        assert_eq!(err, CardsError::Backend("Missing 'text' field".to_string()));

        let err = parse_created(502, "Bad Gateway").unwrap_err();
        assert_eq!(err, CardsError::Backend("HTTP 502: Bad Gateway".to_string()));
    }

    #[test]
    fn test_parse_updated() {
        let body = r#"{
            "success": true,
            "message": "Card 3 updated successfully",
            "updated_card": {"id": 3, "title": "Renamed", "content": "x",
                             "metadata": null, "created_at": "2024-01-01T00:00:00"}
        }"#;
        let card = parse_updated(CardId(3), 200, body).unwrap();
        assert_eq!(card.title, "Renamed");

        let err = parse_updated(CardId(3), 404, r#"{"success": false}"#).unwrap_err();
        assert_eq!(err, CardsError::NotFound(CardId(3)));
    }

    #[test]
    fn test_parse_deleted() {
        assert!(parse_deleted(CardId(1), 200, r#"{"success": true}"#).is_ok());
        assert_eq!(
            parse_deleted(CardId(1), 404, "").unwrap_err(),
            CardsError::NotFound(CardId(1))
        );
        assert!(matches!(
            parse_deleted(CardId(1), 500, r#"{"success": false, "error": "locked"}"#),
            Err(CardsError::Backend(_))
        ));
    }

    #[test]
    fn test_backend_error_without_body() {
        assert_eq!(backend_error(503, "  "), CardsError::Backend("HTTP 503".to_string()));
    }

    // ─── AI service ──────────────────────────────────────────

    #[test]
    fn test_parse_health() {
        let health = parse_health(
            200,
            r#"{"status": "healthy", "service": "LangGraph Backend", "redis_enabled": true}"#,
        )
        .unwrap();
        assert!(health.available);
        assert!(health.remote_memory_enabled);

        let health = parse_health(200, r#"{"status": "degraded"}"#).unwrap();
        assert!(!health.available);
        assert!(!health.remote_memory_enabled);
    }

    #[test]
    fn test_parse_health_unreachable() {
        assert!(parse_health(500, r#"{"status": "healthy"}"#).is_none());
        assert!(parse_health(200, "not json").is_none());
    }

    #[test]
    fn test_parse_chat_reply() {
        let body = r#"{
            "success": true,
            "data": {
                "message": "make a card about lifetimes",
                "response": "Created a card about lifetimes.",
                "intent": "CREATE_NEW",
                "confidence": 0.92,
                "reasoning": "new topic",
                "session_id": "abc",
                "card_id": 17,
                "updated_card": null,
                "focused_card": null,
                "timestamp": "2024-05-01T09:30:00.123456"
            }
        }"#;
        let reply = parse_chat_reply(200, body).unwrap();
        assert_eq!(reply.intent, Intent::CreateNew);
        assert_eq!(reply.session_id.as_deref(), Some("abc"));
        assert_eq!(reply.created_card(), Some(CardId(17)));
        assert!((reply.confidence - 0.92).abs() < 1e-6);
    }

    #[test]
    fn test_parse_chat_reply_nulls() {
        let body = r#"{"success": true, "data": {
            "response": "Hi", "intent": null, "confidence": null,
            "reasoning": null, "session_id": null, "card_id": null, "timestamp": null
        }}"#;
        let reply = parse_chat_reply(200, body).unwrap();
        assert_eq!(reply.intent, Intent::NoAction);
        assert!(reply.session_id.is_none());
        assert_eq!(reply.confidence, 0.0);
        assert!(reply.mutated_card().is_none());
    }

    #[test]
    fn test_parse_chat_reply_unknown_intent() {
        let body = r#"{"success": true, "data": {"response": "?", "intent": "SUMMARIZE"}}"#;
        assert_eq!(parse_chat_reply(200, body).unwrap().intent, Intent::Unknown);
    }

    #[test]
    fn test_parse_chat_reply_failure() {
        let err = parse_chat_reply(500, r#"{"success": false, "error": "workflow crashed"}"#)
            .unwrap_err();
        assert_eq!(err, CardsError::Backend("workflow crashed".to_string()));

        let err = parse_chat_reply(200, r#"{"success": true}"#).unwrap_err();
        assert!(matches!(err, CardsError::Backend(_)));
    }

    #[test]
    fn test_parse_ack() {
        assert!(parse_ack(200, r#"{"success": true, "message": "Focused card set successfully"}"#).is_ok());
        assert!(matches!(
            parse_ack(400, r#"{"success": false, "error": "Missing 'card' field"}"#),
            Err(CardsError::Backend(msg)) if msg.contains("Missing 'card' field")
        ));
        assert!(parse_ack(200, r#"{"success": false}"#).is_err());
    }

    // ─── Settings ────────────────────────────────────────────

    #[test]
    fn test_settings_round_trip() {
        let mut config = AppConfig::default();
        config.backend.ai_url = "https://ai.example.com/".to_string();
        config.refocus.max_attempts = 6;
        let json = encode_config(&config).unwrap();
        assert_eq!(decode_config(&json).unwrap(), config);
    }

    #[test]
    fn test_settings_partial_document_uses_defaults() {
        let config = decode_config(r#"{"health": {"poll_interval_ms": 0}}"#).unwrap();
        assert_eq!(config.health.poll_interval_ms, 0);
        assert_eq!(config.backend, AppConfig::default().backend);
    }

    #[test]
    fn test_settings_invalid_rejected() {
        let err = decode_config(r#"{"backend": {"cards_url": "ftp://x", "ai_url": "http://y"}}"#)
            .unwrap_err();
        assert!(matches!(err, CardsError::Config(_)));
        assert!(matches!(decode_config("{"), Err(CardsError::Serialization(_))));
    }
}
