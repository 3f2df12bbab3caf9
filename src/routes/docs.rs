use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Path of the Swagger UI.
pub const DOCS_PATH: &str = "/api/docs";
/// Path of the raw OpenAPI document.
pub const OPENAPI_PATH: &str = "/api/openapi.json";

/// Serve the Swagger UI and the OpenAPI document it renders.
///
/// Both live under `/api` so the frontend fallback never shadows them.
pub fn router() -> Router<SharedState> {
    SwaggerUi::new(DOCS_PATH)
        .url(OPENAPI_PATH, ApiDoc::openapi())
        .into()
}
