// PDF rendering of tailored CVs.
// Rendering is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod font_metrics;
pub mod pdf;

pub use pdf::render_cv_pdf;
