// CV generation: profile + job description → LLM → structured CV → PDF.
// All model calls go through llm_client via the CvDrafter seam.

pub mod cv_data;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod service;
