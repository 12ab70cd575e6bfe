use axum::extract::Query;
use axum::http::Uri;
use std::collections::HashMap;

pub const STUDENT_NO_PARAM: &str = "student_no";

const PATH_MARKER: &str = "student_no=";

/// Pulls the student number out of `.../student_no=<no>` or `?student_no=<no>`.
///
/// The path form wins when it carries a non-blank value. Returns `None` when
/// neither form yields a non-blank value.
pub fn extract_student_no(uri: &Uri) -> Option<String> {
    from_path(uri.path()).or_else(|| from_query(uri))
}

fn from_path(path: &str) -> Option<String> {
    let idx = path.find(PATH_MARKER)?;
    let raw = &path[idx + PATH_MARKER.len()..];
    let decoded = urlencoding::decode(raw).ok()?;
    non_blank(&decoded)
}

fn from_query(uri: &Uri) -> Option<String> {
    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(uri).ok()?;
    params.get(STUDENT_NO_PARAM).and_then(|value| non_blank(value))
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
