//! GetVersionHistoryHandler - Query handler for a document's history.

use std::sync::Arc;

use crate::domain::foundation::DocumentId;
use crate::domain::version::{Version, VersionError};
use crate::ports::VersionStore;

/// Query for a document's ordered version history.
#[derive(Debug, Clone)]
pub struct GetVersionHistoryQuery {
    pub document_id: DocumentId,
}

/// Handler for reading version history.
pub struct GetVersionHistoryHandler {
    store: Arc<dyn VersionStore>,
}

impl GetVersionHistoryHandler {
    pub fn new(store: Arc<dyn VersionStore>) -> Self {
        Self { store }
    }

    /// Returns the document's versions, newest first.
    ///
    /// A document with no versions does not exist, so an unknown
    /// document id simply yields an empty history. The result is a
    /// finite snapshot; callers re-query to observe later transitions.
    pub async fn handle(
        &self,
        query: GetVersionHistoryQuery,
    ) -> Result<Vec<Version>, VersionError> {
        let history = self.store.history(&query.document_id).await?;
        Ok(history)
    }
}
