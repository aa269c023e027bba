use std::sync::Arc;

use sqlx::PgPool;

use crate::cvs::generator::CvDrafter;
use crate::storage::PdfStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Produces tailored CV JSON. `LlmClient` in production.
    pub cv_drafter: Arc<dyn CvDrafter>,
    pub store: PdfStore,
}
