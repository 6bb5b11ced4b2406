//! HTTP rendering of [`AppError`]
//!
//! Responses follow RFC 7807 Problem Details. `code` is present whenever
//! the error carries one; clients branch on it instead of on `detail`.

use super::app_error::AppError;

#[cfg(feature = "axum")]
impl AppError {
    fn problem_body(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
        });
        if let Some(code) = self.code() {
            body["code"] = code.into();
        }
        if let Some(action) = self.action() {
            body["action"] = action.into();
        }
        body
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::{HeaderValue, StatusCode, header};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (status, Json(self.problem_body())).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}
