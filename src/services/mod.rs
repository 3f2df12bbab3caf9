/// Game catalog projection.
pub mod catalog_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Score reads and submissions.
pub mod score_service;
