//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod booking_repository;
pub mod catalog_repository;
pub mod content_repository;
pub mod file_repository;
pub mod order_repository;
pub mod payment_repository;
pub mod repository_provider;
pub mod review_repository;
pub mod technician_repository;
pub mod translation_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::DbErr;

use crate::domain::DomainError;

// ── Shared conversion helpers ───────────────────────────────────

fn db_err(e: DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

/// Map unique-constraint violations to `Conflict`, anything else to `Database`
fn write_err(e: DbErr, conflict: impl FnOnce() -> String) -> DomainError {
    let msg = e.to_string();
    if msg.contains("UNIQUE") || msg.contains("duplicate") {
        DomainError::Conflict(conflict())
    } else {
        db_err(e)
    }
}

/// JSON text column → string list; malformed text reads as empty
fn decode_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

fn decode_json(raw: Option<String>) -> Option<serde_json::Value> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
}

fn encode_json(value: &Option<serde_json::Value>) -> Option<String> {
    value.as_ref().map(|v| v.to_string())
}

/// Parse a stored enum column, falling back to `default` for unknown text
fn parse_or<T: std::str::FromStr>(raw: &str, default: T) -> T {
    raw.parse().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_columns_tolerate_garbage() {
        assert!(decode_list("not json").is_empty());
        let encoded = encode_list(&["a".into(), "b".into()]);
        assert_eq!(decode_list(&encoded), vec!["a".to_string(), "b".to_string()]);
    }
}
