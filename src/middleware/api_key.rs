use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::api::AppState;

/// HTTP header name for the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Query parameter accepted as a fallback to the header
const API_KEY_QUERY_PARAM: &str = "apiKey";

/// Rejects any request that does not present the configured API key in the
/// `x-api-key` header or the `apiKey` query parameter.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let header_key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());
    let query_key = request.uri().query().and_then(api_key_from_query);

    let presented = header_key.or(query_key);

    if presented != Some(state.config.api_key.as_str()) {
        let body = Json(json!({
            "code": "UNAUTHORIZED",
            "message": "Api key is invalid"
        }));
        return (StatusCode::UNAUTHORIZED, body).into_response();
    }

    next.run(request).await
}

fn api_key_from_query(query: &str) -> Option<&str> {
    query.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name == API_KEY_QUERY_PARAM).then_some(value)
    })
}
