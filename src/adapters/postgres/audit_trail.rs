//! PostgreSQL implementation of the AuditTrail read port.
//!
//! Entries are inserted by `PostgresVersionStore` inside its write
//! transactions; this adapter only reads them back. The table carries no
//! update or delete path.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{
    AuditEntryId, DocumentId, DomainError, ErrorCode, Timestamp, UserId, VersionId,
};
use crate::domain::version::VersionStatus;
use crate::ports::AuditTrail;

/// PostgreSQL implementation of AuditTrail.
#[derive(Clone)]
pub struct PostgresAuditTrail {
    pool: PgPool,
}

impl PostgresAuditTrail {
    /// Creates a new PostgresAuditTrail.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditTrail for PostgresAuditTrail {
    async fn entries_for_version(
        &self,
        version_id: &VersionId,
    ) -> Result<Vec<AuditEntry>, DomainError> {
        let rows = sqlx::query(
            "SELECT * FROM audit_log WHERE version_id = $1 ORDER BY occurred_at, id",
        )
        .bind(version_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch audit entries: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_entry).collect()
    }

    async fn entries_for_document(
        &self,
        document_id: &DocumentId,
    ) -> Result<Vec<AuditEntry>, DomainError> {
        let rows = sqlx::query(
            "SELECT * FROM audit_log WHERE document_id = $1 ORDER BY occurred_at, id",
        )
        .bind(document_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch audit entries: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_entry).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn db_error(message: String) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, message)
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| db_error(format!("Failed to get {}: {}", name, e)))
}

fn parse_status(s: &str) -> Result<VersionStatus, DomainError> {
    VersionStatus::parse_str(s)
        .ok_or_else(|| db_error(format!("Invalid version status: {}", s)))
}

fn row_to_entry(row: PgRow) -> Result<AuditEntry, DomainError> {
    let id: uuid::Uuid = column(&row, "id")?;
    let version_id: uuid::Uuid = column(&row, "version_id")?;
    let document_id: uuid::Uuid = column(&row, "document_id")?;
    let from_status: Option<String> = column(&row, "from_status")?;
    let to_status = parse_status(&column::<String>(&row, "to_status")?)?;
    let actor_id: String = column(&row, "actor_id")?;
    let occurred_at: chrono::DateTime<chrono::Utc> = column(&row, "occurred_at")?;
    let comments: Option<String> = column(&row, "comments")?;
    let attachment: Option<serde_json::Value> = column(&row, "attachment")?;

    Ok(AuditEntry::reconstitute(
        AuditEntryId::from_uuid(id),
        VersionId::from_uuid(version_id),
        DocumentId::from_uuid(document_id),
        from_status.as_deref().map(parse_status).transpose()?,
        to_status,
        UserId::new(actor_id).map_err(|e| db_error(format!("Invalid actor id: {}", e)))?,
        Timestamp::from_datetime(occurred_at),
        comments,
        attachment,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_accepts_all_wire_names() {
        assert_eq!(
            parse_status("changes_requested").unwrap(),
            VersionStatus::ChangesRequested
        );
        assert!(parse_status("unknown").is_err());
    }
}
