//! handler 共用的响应构造

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::ReelinkError;

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub code: &'static str,
    pub error: &'static str,
    pub message: &'a str,
}

/// 错误类型到 HTTP 状态码的映射
pub fn http_status(err: &ReelinkError) -> StatusCode {
    match err {
        ReelinkError::Validation(_) => StatusCode::BAD_REQUEST,
        ReelinkError::AliasConflict(_) => StatusCode::CONFLICT,
        ReelinkError::NotFound(_) => StatusCode::NOT_FOUND,
        ReelinkError::CodeSpaceExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(err: &ReelinkError) -> HttpResponse {
    HttpResponse::build(http_status(err)).json(ErrorBody {
            code: err.code(),
            error: err.error_type(),
            message: err.message(),
        })
}

pub fn json_response<T: Serialize>(status: StatusCode, data: T) -> HttpResponse {
    HttpResponse::build(status).json(data)
}
