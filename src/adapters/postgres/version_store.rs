//! PostgreSQL implementation of VersionStore.
//!
//! Concurrency model:
//!
//! - `update_guarded` is a conditional `UPDATE ... WHERE status = expected`;
//!   zero affected rows means a concurrent caller won the race.
//! - `create` and `publish` take a per-document advisory transaction lock,
//!   since both must look at more than one row of the document (the
//!   active-work check, the previously published version).
//! - Every write inserts its audit entry inside the same transaction, so
//!   a transition and its entry commit or roll back together.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, Timestamp, UserId, VersionId};
use crate::domain::version::{Version, VersionStatus};
use crate::ports::VersionStore;

/// PostgreSQL implementation of VersionStore.
#[derive(Clone)]
pub struct PostgresVersionStore {
    pool: PgPool,
}

impl PostgresVersionStore {
    /// Creates a new PostgresVersionStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Serializes writers per document for the duration of the transaction.
    async fn lock_document(
        tx: &mut Transaction<'_, Postgres>,
        document_id: &DocumentId,
    ) -> Result<(), DomainError> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(document_id.as_uuid())
            .execute(&mut **tx)
            .await
            .map_err(|e| db_error(format!("Failed to lock document: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl VersionStore for PostgresVersionStore {
    async fn create(&self, version: &Version, entry: &AuditEntry) -> Result<(), DomainError> {
        let mut tx = begin(&self.pool).await?;
        Self::lock_document(&mut tx, version.document_id()).await?;

        let (has_active,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM versions
                WHERE document_id = $1 AND status IN ('draft', 'pending_review')
            )
            "#,
        )
        .bind(version.document_id().as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error(format!("Failed to check for in-progress versions: {}", e)))?;

        if has_active {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!(
                    "Document {} already has a version in progress",
                    version.document_id()
                ),
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO versions (
                id, document_id, sequence_number, content, status,
                author_id, created_at, reviewer_id, review_comments, reviewed_at,
                published_by_id, published_at, supersedes_version_id, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(version.id().as_uuid())
        .bind(version.document_id().as_uuid())
        .bind(version.sequence_number())
        .bind(version.content())
        .bind(version.status().as_str())
        .bind(version.author_id().as_str())
        .bind(version.created_at().as_datetime())
        .bind(version.reviewer_id().map(UserId::as_str))
        .bind(version.review_comments())
        .bind(version.reviewed_at().map(Timestamp::as_datetime))
        .bind(version.published_by_id().map(UserId::as_str))
        .bind(version.published_at().map(Timestamp::as_datetime))
        .bind(version.supersedes_version_id().map(VersionId::as_uuid))
        .bind(version.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| insert_conflict_or_db_error(e, version))?;

        insert_audit_entry(&mut tx, entry).await?;
        commit(tx).await
    }

    async fn next_sequence_number(&self, document_id: &DocumentId) -> Result<i64, DomainError> {
        let (max,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(MAX(sequence_number), 0) FROM versions WHERE document_id = $1",
        )
        .bind(document_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to read sequence number: {}", e)))?;

        Ok(max + 1)
    }

    async fn find_by_id(&self, id: &VersionId) -> Result<Option<Version>, DomainError> {
        let row = sqlx::query("SELECT * FROM versions WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(format!("Failed to fetch version: {}", e)))?;

        row.map(row_to_version).transpose()
    }

    async fn history(&self, document_id: &DocumentId) -> Result<Vec<Version>, DomainError> {
        let rows = sqlx::query(
            "SELECT * FROM versions WHERE document_id = $1 ORDER BY sequence_number DESC",
        )
        .bind(document_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to fetch version history: {}", e)))?;

        rows.into_iter().map(row_to_version).collect()
    }

    async fn find_published(
        &self,
        document_id: &DocumentId,
    ) -> Result<Option<Version>, DomainError> {
        let row = sqlx::query(
            "SELECT * FROM versions WHERE document_id = $1 AND status = 'published'",
        )
        .bind(document_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to fetch published version: {}", e)))?;

        row.map(row_to_version).transpose()
    }

    async fn update_guarded(
        &self,
        version: &Version,
        expected_status: VersionStatus,
        entry: &AuditEntry,
    ) -> Result<(), DomainError> {
        let mut tx = begin(&self.pool).await?;

        let affected = update_version_row(&mut tx, version, expected_status).await?;
        if affected == 0 {
            return Err(stale_status_error(&self.pool, version, expected_status).await);
        }

        insert_audit_entry(&mut tx, entry).await?;
        commit(tx).await
    }

    async fn publish(
        &self,
        version: &Version,
        expected_status: VersionStatus,
        entry: &AuditEntry,
    ) -> Result<Option<Version>, DomainError> {
        let mut tx = begin(&self.pool).await?;
        Self::lock_document(&mut tx, version.document_id()).await?;

        // Demote the current published version, if any. Both row updates
        // commit together or not at all.
        let archived_row = sqlx::query(
            r#"
            UPDATE versions
            SET status = 'archived', updated_at = $3
            WHERE document_id = $1 AND status = 'published' AND id <> $2
            RETURNING *
            "#,
        )
        .bind(version.document_id().as_uuid())
        .bind(version.id().as_uuid())
        .bind(Timestamp::now().as_datetime())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error(format!("Failed to archive published version: {}", e)))?;

        let archived = archived_row.map(row_to_version).transpose()?;

        let affected = update_version_row(&mut tx, version, expected_status).await?;
        if affected == 0 {
            // Dropping the transaction rolls back the archive as well.
            return Err(stale_status_error(&self.pool, version, expected_status).await);
        }

        if let Some(previous) = &archived {
            let supersede = AuditEntry::record(
                *previous.id(),
                *previous.document_id(),
                Some(VersionStatus::Published),
                VersionStatus::Archived,
                entry.actor_id().clone(),
            )
            .with_comments(format!(
                "Superseded by version {}",
                version.sequence_number()
            ));
            insert_audit_entry(&mut tx, &supersede).await?;
        }
        insert_audit_entry(&mut tx, entry).await?;

        commit(tx).await?;
        Ok(archived)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn db_error(message: String) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, message)
}

async fn begin(pool: &PgPool) -> Result<Transaction<'_, Postgres>, DomainError> {
    pool.begin()
        .await
        .map_err(|e| db_error(format!("Failed to begin transaction: {}", e)))
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), DomainError> {
    tx.commit()
        .await
        .map_err(|e| db_error(format!("Failed to commit transaction: {}", e)))
}

/// A unique violation on insert means a concurrent writer took the
/// sequence number or the single-active slot; callers retry.
fn insert_conflict_or_db_error(e: sqlx::Error, version: &Version) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return DomainError::new(
                ErrorCode::Conflict,
                format!(
                    "Version {} of document {} was created concurrently",
                    version.sequence_number(),
                    version.document_id()
                ),
            );
        }
    }
    db_error(format!("Failed to insert version: {}", e))
}

/// Writes every mutable column of the version row, guarded on status.
async fn update_version_row(
    tx: &mut Transaction<'_, Postgres>,
    version: &Version,
    expected_status: VersionStatus,
) -> Result<u64, DomainError> {
    let result = sqlx::query(
        r#"
        UPDATE versions SET
            status = $3,
            reviewer_id = $4,
            review_comments = $5,
            reviewed_at = $6,
            published_by_id = $7,
            published_at = $8,
            updated_at = $9
        WHERE id = $1 AND status = $2
        "#,
    )
    .bind(version.id().as_uuid())
    .bind(expected_status.as_str())
    .bind(version.status().as_str())
    .bind(version.reviewer_id().map(UserId::as_str))
    .bind(version.review_comments())
    .bind(version.reviewed_at().map(Timestamp::as_datetime))
    .bind(version.published_by_id().map(UserId::as_str))
    .bind(version.published_at().map(Timestamp::as_datetime))
    .bind(version.updated_at().as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| db_error(format!("Failed to update version: {}", e)))?;

    Ok(result.rows_affected())
}

/// Distinguishes "row gone" from "status changed" after a guarded update
/// matched nothing.
async fn stale_status_error(
    pool: &PgPool,
    version: &Version,
    expected_status: VersionStatus,
) -> DomainError {
    let found: Result<Option<(String,)>, sqlx::Error> =
        sqlx::query_as("SELECT status FROM versions WHERE id = $1")
            .bind(version.id().as_uuid())
            .fetch_optional(pool)
            .await;

    match found {
        Ok(Some((status,))) => DomainError::new(
            ErrorCode::Conflict,
            format!("Expected status '{}', found '{}'", expected_status, status),
        ),
        Ok(None) => DomainError::new(
            ErrorCode::VersionNotFound,
            format!("Version not found: {}", version.id()),
        ),
        Err(e) => db_error(format!("Failed to re-read version status: {}", e)),
    }
}

async fn insert_audit_entry(
    tx: &mut Transaction<'_, Postgres>,
    entry: &AuditEntry,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO audit_log (
            id, version_id, document_id, from_status, to_status,
            actor_id, occurred_at, comments, attachment
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(entry.id().as_uuid())
    .bind(entry.version_id().as_uuid())
    .bind(entry.document_id().as_uuid())
    .bind(entry.from_status().map(|s| s.as_str()))
    .bind(entry.to_status().as_str())
    .bind(entry.actor_id().as_str())
    .bind(entry.occurred_at().as_datetime())
    .bind(entry.comments())
    .bind(entry.attachment())
    .execute(&mut **tx)
    .await
    .map_err(|e| db_error(format!("Failed to insert audit entry: {}", e)))?;

    Ok(())
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| db_error(format!("Failed to get {}: {}", name, e)))
}

fn parse_status(s: &str) -> Result<VersionStatus, DomainError> {
    VersionStatus::parse_str(s)
        .ok_or_else(|| db_error(format!("Invalid version status: {}", s)))
}

fn parse_user(s: String) -> Result<UserId, DomainError> {
    UserId::new(s).map_err(|e| db_error(format!("Invalid user id: {}", e)))
}

pub(super) fn row_to_version(row: PgRow) -> Result<Version, DomainError> {
    let id: uuid::Uuid = column(&row, "id")?;
    let document_id: uuid::Uuid = column(&row, "document_id")?;
    let sequence_number: i64 = column(&row, "sequence_number")?;
    let content: serde_json::Value = column(&row, "content")?;
    let status = parse_status(&column::<String>(&row, "status")?)?;
    let author_id = parse_user(column(&row, "author_id")?)?;
    let created_at: chrono::DateTime<chrono::Utc> = column(&row, "created_at")?;
    let reviewer_id: Option<String> = column(&row, "reviewer_id")?;
    let review_comments: Option<String> = column(&row, "review_comments")?;
    let reviewed_at: Option<chrono::DateTime<chrono::Utc>> = column(&row, "reviewed_at")?;
    let published_by_id: Option<String> = column(&row, "published_by_id")?;
    let published_at: Option<chrono::DateTime<chrono::Utc>> = column(&row, "published_at")?;
    let supersedes_version_id: Option<uuid::Uuid> = column(&row, "supersedes_version_id")?;
    let updated_at: chrono::DateTime<chrono::Utc> = column(&row, "updated_at")?;

    Ok(Version::reconstitute(
        VersionId::from_uuid(id),
        DocumentId::from_uuid(document_id),
        sequence_number,
        content,
        status,
        author_id,
        Timestamp::from_datetime(created_at),
        reviewer_id.map(parse_user).transpose()?,
        review_comments,
        reviewed_at.map(Timestamp::from_datetime),
        published_by_id.map(parse_user).transpose()?,
        published_at.map(Timestamp::from_datetime),
        supersedes_version_id.map(VersionId::from_uuid),
        Timestamp::from_datetime(updated_at),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_round_trips_wire_names() {
        for status in [
            VersionStatus::Draft,
            VersionStatus::PendingReview,
            VersionStatus::ChangesRequested,
            VersionStatus::Approved,
            VersionStatus::Published,
            VersionStatus::Archived,
        ] {
            assert_eq!(parse_status(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn parse_status_rejects_invalid() {
        assert!(parse_status("invalid").is_err());
    }

    #[test]
    fn parse_user_rejects_empty() {
        assert!(parse_user(String::new()).is_err());
        assert_eq!(
            parse_user("author-1".to_string()).unwrap().as_str(),
            "author-1"
        );
    }
}
