//! Builds and sends keyword/question searches against the current context.

use std::sync::Arc;

use scan_payload::{ResolvedIdentity, format_doc_label};
use tracing::{info, instrument};

use crate::backend::{IfuBackend, SearchMode, SearchQuery, SearchResultItem};
use crate::error_handler::EngineResult;

pub struct SearchDispatcher<B> {
    backend: Arc<B>,
}

impl<B: IfuBackend> SearchDispatcher<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Runs one search and returns the items in backend order.
    ///
    /// Each `doc` is passed through [`format_doc_label`]; `page` and
    /// `snippet` are returned as received. An empty result set is `Ok`.
    ///
    /// # Errors
    /// - [`EmptyKeyword`](crate::IfuEngineError::EmptyKeyword) before any network call.
    /// - Transport/HTTP/decode errors from the backend.
    #[instrument(skip_all, fields(%mode))]
    pub async fn search(
        &self,
        context: &ResolvedIdentity,
        keyword: &str,
        mode: SearchMode,
    ) -> EngineResult<Vec<SearchResultItem>> {
        let query = SearchQuery::new(context, keyword, mode)?;

        let mut items = self.backend.search_ifu(&query).await?;
        for item in &mut items {
            item.doc = format_doc_label(&item.doc);
        }

        info!(
            keyword = %query.keyword,
            scoped = query.assistantid.is_some(),
            count = items.len(),
            "search completed"
        );
        Ok(items)
    }
}
