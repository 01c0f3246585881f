//! Tests for db::repository::error module.

use text_compliance::db::repository::{ErrorContext, RepositoryError};

#[test]
fn test_error_context_new() {
    let ctx = ErrorContext::new("create_analysis");
    assert_eq!(ctx.operation, Some("create_analysis".to_string()));
    assert!(ctx.entity.is_none());
    assert!(ctx.entity_id.is_none());
    assert!(ctx.details.is_none());
    assert!(!ctx.retryable);
}

#[test]
fn test_error_context_chaining() {
    let ctx = ErrorContext::new("get_analysis")
        .with_entity("analysis")
        .with_entity_id("6f1c0a0e")
        .with_details("row missing")
        .retryable();

    assert_eq!(ctx.entity, Some("analysis".to_string()));
    assert_eq!(ctx.entity_id, Some("6f1c0a0e".to_string()));
    assert_eq!(ctx.details, Some("row missing".to_string()));
    assert!(ctx.retryable);
}

#[test]
fn test_error_context_display() {
    let ctx = ErrorContext::new("list_analyses")
        .with_entity("analysis")
        .with_entity_id(7);

    let display = format!("{}", ctx);
    assert_eq!(display, "[operation=list_analyses, entity=analysis, id=7]");
}

#[test]
fn test_error_context_display_empty() {
    assert_eq!(format!("{}", ErrorContext::default()), "[]");
}

#[test]
fn test_connection_error_is_retryable() {
    let err = RepositoryError::connection("pool exhausted");
    assert!(err.is_retryable());
    assert!(err.to_string().contains("Connection error: pool exhausted"));
}

#[test]
fn test_timeout_error_is_retryable() {
    let err = RepositoryError::timeout("statement timeout");
    assert!(err.is_retryable());
    assert!(matches!(err, RepositoryError::TimeoutError { .. }));
}

#[test]
fn test_query_error_not_retryable_by_default() {
    let err = RepositoryError::query("syntax error");
    assert!(!err.is_retryable());
}

#[test]
fn test_query_error_with_retryable_context() {
    let err = RepositoryError::query_with_context(
        "serialization failure",
        ErrorContext::new("create_analysis").retryable(),
    );
    assert!(err.is_retryable());
}

#[test]
fn test_not_found_and_configuration_never_retryable() {
    let not_found = RepositoryError::not_found("missing");
    assert!(not_found.is_not_found());
    assert!(!not_found.is_retryable());

    let config = RepositoryError::configuration("bad url");
    assert!(!config.is_not_found());
    assert!(!config.is_retryable());
}

#[test]
fn test_with_operation_sets_context() {
    let err = RepositoryError::internal("boom").with_operation("count_analyses");
    assert_eq!(
        err.context().operation,
        Some("count_analyses".to_string())
    );
    assert!(err.to_string().contains("operation=count_analyses"));
}

#[test]
fn test_not_found_with_context_display() {
    let err = RepositoryError::not_found_with_context(
        "Analysis not found",
        ErrorContext::new("get_analysis").with_entity("analysis"),
    );
    assert_eq!(
        err.to_string(),
        "Not found: Analysis not found [operation=get_analysis, entity=analysis]"
    );
}
