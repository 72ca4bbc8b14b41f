use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::flash::{redirect_with_flash, Flash};

/// Request-level failures. Validation problems are normally handled in place
/// by re-rendering the originating form; the variants here cover everything
/// that ends a request early.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        Self::Internal(anyhow::Error::new(e))
    }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage {
    flash: Option<Flash>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(msg) => redirect_with_flash("/", Flash::danger(msg)),
            AppError::NotFound(what) => {
                redirect_with_flash("/menu", Flash::danger(format!("{what} not found.")))
            }
            AppError::Unauthorized => {
                redirect_with_flash("/login", Flash::warning("Please log in to continue."))
            }
            AppError::Database(e) => {
                error!(error = %e, "database error");
                server_error_page()
            }
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                server_error_page()
            }
        }
    }
}

// Generic "try again" page; never leaks query text or credentials.
fn server_error_page() -> Response {
    let page = ErrorPage { flash: None };
    match page.render() {
        Ok(html) => (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong. Please try again.",
        )
            .into_response(),
    }
}
