use std::io;

use axum::http::StatusCode;
use axum::response::IntoResponse;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not Found")]
    NotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 上传字节无法解码为可识别的图片格式
    #[error("invalid image data: {0}")]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error(transparent)]
    Serde(#[from] toml::de::Error),

    #[error("{0}")]
    FormatError(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    ApiError(#[from] ApiError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            Error::Sqlx(e) => {
                tracing::error!(%e, "sqlx error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            .into_response(),
            Error::Io(e) => {
                tracing::error!(%e, "file io error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            .into_response(),
            Error::Decode(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response(),
            Error::Multipart(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            Error::Serde(e) => (StatusCode::BAD_REQUEST, e.message().to_string()).into_response(),
            Error::FormatError(s) => (StatusCode::BAD_REQUEST, s.to_string()).into_response(),
            Error::ApiError(api_error) => match api_error {
                ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT FOUND").into_response(),
            },
        }
    }
}
