use super::extract::extract_student_no;
use crate::context::AppContext;

use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Serializes `body` with an explicit status and the UTF-8 JSON content type.
pub fn json_reply<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let (status, bytes) = match serde_json::to_vec(body) {
        Ok(bytes) => (status, bytes),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                br#"{"error":"internal_error","message":"response serialization failed"}"#
                    .to_vec(),
            )
        }
    };

    let mut response = (status, bytes).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(JSON_CONTENT_TYPE),
    );
    response
}

pub async fn handle_health() -> Response {
    json_reply(StatusCode::OK, &json!({ "status": "ok" }))
}

/// Resolves the route prefix, validates the request and dispatches to the bound store.
pub async fn handle_lookup(State(ctx): State<AppContext>, method: Method, uri: Uri) -> Response {
    let Some(binding) = ctx.resolve(uri.path()) else {
        return json_reply(StatusCode::NOT_FOUND, &json!({ "error": "Not Found" }));
    };

    if method != Method::GET {
        return json_reply(
            StatusCode::METHOD_NOT_ALLOWED,
            &json!({ "error": "Method Not Allowed" }),
        );
    }

    let Some(student_no) = extract_student_no(&uri) else {
        return json_reply(
            StatusCode::BAD_REQUEST,
            &json!({ "error": "student_no parameter is required" }),
        );
    };

    match binding.store.get_by_id(&student_no).await {
        Ok(Some(record)) => json_reply(StatusCode::OK, &record),
        Ok(None) => json_reply(
            StatusCode::NOT_FOUND,
            &json!({ "error": "student not found", "student_no": student_no }),
        ),
        Err(e) => {
            tracing::error!("Lookup of {} on {} failed: {}", student_no, binding.prefix, e);
            json_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "error": "internal_error", "message": e.to_string() }),
            )
        }
    }
}
