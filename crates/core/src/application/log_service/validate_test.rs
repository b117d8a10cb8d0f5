//! Unit tests for log service request validation

use super::validate::*;
use super::CreateQuestionLog;

#[test]
fn test_validate_conversation_id_empty() {
    let req = CreateQuestionLog::new("  ", "user-1");

    let result = validate_create(&req);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("conversation_id cannot be empty"));
}

#[test]
fn test_validate_user_id_too_long() {
    let req = CreateQuestionLog::new("conv-1", "u".repeat(MAX_ID_LEN + 1));

    let result = validate_create(&req);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("too long"));
}

#[test]
fn test_validate_negative_submit_timestamp() {
    let mut req = CreateQuestionLog::new("conv-1", "user-1");
    req.submit_timestamp = Some(-5);

    assert!(validate_create(&req).is_err());
}

#[test]
fn test_validate_accepts_blank_entries() {
    let req = CreateQuestionLog::new("conv-1", "user-1")
        .with_model_choices(vec!["General".to_string(), "".to_string()]);
    assert!(validate_create(&req).is_ok());

    assert!(validate_entries("error_codes", &["  ".to_string()]).is_ok());
}

#[test]
fn test_validate_entry_too_long() {
    let long = "x".repeat(MAX_ENTRY_LEN + 1);
    let result = validate_entries("error_codes", &[long]);
    assert!(result.unwrap_err().to_string().contains("error_codes[0]"));
}

#[test]
fn test_validate_too_many_entries() {
    let errors: Vec<String> = (0..=MAX_ENTRIES).map(|i| format!("E{}", i)).collect();

    let result = validate_entries("error_codes", &errors);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("too many entries"));
}

#[test]
fn test_validate_tokens() {
    assert!(validate_tokens(Some(0), None).is_ok());
    assert!(validate_tokens(None, None).is_ok());
    assert!(validate_tokens(Some(10), Some(-1)).is_err());
}

#[test]
fn test_validate_minutes_back_range() {
    assert!(validate_minutes_back(5).is_ok());
    assert!(validate_minutes_back(0).is_err());
    assert!(validate_minutes_back(MAX_RECENT_MINUTES + 1).is_err());
}

#[test]
fn test_clamp_limit() {
    assert_eq!(clamp_limit(None), DEFAULT_QUERY_LIMIT);
    assert_eq!(clamp_limit(Some(0)), 1);
    assert_eq!(clamp_limit(Some(500)), MAX_QUERY_LIMIT);
    assert_eq!(clamp_limit(Some(25)), 25);
}

#[test]
fn test_validate_valid_request() {
    let req = CreateQuestionLog::new("test-conv-123", "test-user-456")
        .with_model_choices(vec!["General".to_string()]);

    assert!(validate_create(&req).is_ok());
}
