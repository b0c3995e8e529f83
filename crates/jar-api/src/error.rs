use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use jar_types::UnsupportedFormat;

use crate::{flash, pages};

#[derive(Debug, Error)]
pub enum AppError {
    /// A form field was blank or inconsistent. Sent back to the form with a flash message.
    #[error("{message}")]
    Validation {
        message: String,
        redirect_to: &'static str,
    },

    /// Bad credentials or a taken username. Handled like `Validation`.
    #[error("{message}")]
    Auth {
        message: String,
        redirect_to: &'static str,
    },

    #[error("page not found")]
    NotFound,

    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormat),

    #[error(transparent)]
    Database(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>, redirect_to: &'static str) -> Self {
        Self::Validation {
            message: message.into(),
            redirect_to,
        }
    }

    pub fn auth(message: impl Into<String>, redirect_to: &'static str) -> Self {
        Self::Auth {
            message: message.into(),
            redirect_to,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation {
                message,
                redirect_to,
            }
            | AppError::Auth {
                message,
                redirect_to,
            } => flash::redirect(redirect_to, &message),
            AppError::NotFound => (StatusCode::NOT_FOUND, Html(pages::not_found())).into_response(),
            AppError::UnsupportedFormat(_) => {
                (StatusCode::BAD_REQUEST, "Invalid format").into_response()
            }
            AppError::Database(err) => {
                error!("Database error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
