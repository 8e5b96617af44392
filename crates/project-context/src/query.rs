use crate::error::ProjectContextError;
use crate::lifecycle::EngineLifecycle;
use context_protocol::{
    QueryInlineProjectContextParams, QueryInlineProjectContextResult, QueryVectorIndexParams,
    QueryVectorIndexResult,
};
use std::sync::Arc;

/// Query entry points. Every call produces a result: an absent engine or an engine failure
/// yields the empty form.
pub struct ContextQueryFacade {
    lifecycle: Arc<EngineLifecycle>,
}

impl ContextQueryFacade {
    pub fn new(lifecycle: Arc<EngineLifecycle>) -> Self {
        Self { lifecycle }
    }

    pub async fn query_vector_index(
        &self,
        params: &QueryVectorIndexParams,
    ) -> QueryVectorIndexResult {
        let Some(ready) = self.lifecycle.ready_engine() else {
            return QueryVectorIndexResult::default();
        };

        match ready.engine.query_vector_index(&params.query).await {
            Ok(chunks) => QueryVectorIndexResult { chunks },
            Err(err) => {
                log::error!(
                    "Error in queryVectorIndex: {}",
                    ProjectContextError::engine_call("query_vector_index", err)
                );
                QueryVectorIndexResult::default()
            }
        }
    }

    pub async fn query_inline_project_context(
        &self,
        params: &QueryInlineProjectContextParams,
    ) -> QueryInlineProjectContextResult {
        let Some(ready) = self.lifecycle.ready_engine() else {
            return QueryInlineProjectContextResult::default();
        };

        match ready
            .engine
            .query_inline_project_context(&params.query, &params.file_path, &params.target)
            .await
        {
            Ok(inline_project_context) => QueryInlineProjectContextResult {
                inline_project_context,
            },
            Err(err) => {
                log::error!(
                    "Error in queryInlineProjectContext: {}",
                    ProjectContextError::engine_call("query_inline_project_context", err)
                );
                QueryInlineProjectContextResult::default()
            }
        }
    }
}
