//! Error types for tool invocation over HTTP.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Errors a single tool invocation can surface. Neither affects process
/// state; the next call starts clean.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested operation name is not a known tool.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A structurally required argument is missing or has the wrong shape.
    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

impl ToolError {
    fn code(&self) -> &'static str {
        match self {
            ToolError::UnknownTool(_) => "unknown_tool",
            ToolError::MalformedInput(_) => "malformed_input",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ToolError::UnknownTool(_) => StatusCode::NOT_FOUND,
            ToolError::MalformedInput(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ToolError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "code": self.code(),
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}
