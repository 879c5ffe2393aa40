use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedBody {
    pub id: i64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn success<T>(data: T) -> impl IntoResponse
where
    T: Serialize,
{
    (StatusCode::OK, Json(data))
}

pub fn message(message: impl Into<String>) -> impl IntoResponse {
    let body = MessageBody {
        message: message.into(),
    };
    (StatusCode::OK, Json(body))
}

pub fn created(id: i64, message: impl Into<String>) -> impl IntoResponse {
    let body = CreatedBody {
        id,
        message: message.into(),
    };
    (StatusCode::CREATED, Json(body))
}

pub fn error(message: impl Into<String>, status: StatusCode) -> Response {
    let body = ErrorBody {
        error: message.into(),
    };

    (status, Json(body)).into_response()
}
