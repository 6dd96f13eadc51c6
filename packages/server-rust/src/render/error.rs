//! Errors of the page handlers.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

use super::templates::StatusPage;
use askama::Template;

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
    #[error("catalog is still loading")]
    Loading,
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error("no vehicle with id {0:?}")]
    NotFound(String),
}

impl BrowserError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // the placeholder is a normal page; readiness reports the load
            Self::Loading => StatusCode::OK,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn page(&self) -> StatusPage<'static> {
        match self {
            Self::Loading => StatusPage::LOADING,
            Self::NotFound(_) => StatusPage::NOT_FOUND,
            Self::Render(_) | Self::Unavailable(_) => StatusPage::UNAVAILABLE,
        }
    }
}

impl IntoResponse for BrowserError {
    fn into_response(self) -> Response {
        if let Self::Render(e) = &self {
            error!(error = %e, "page rendering failed");
        }
        let status = self.status();
        match self.page().render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(_) => (status, self.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(BrowserError::Loading.status(), StatusCode::OK);
        assert_eq!(
            BrowserError::Unavailable("down".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(BrowserError::NotFound("9".into()).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn response_is_html_status_page() {
        let response = BrowserError::NotFound("9".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()["content-type"],
            "text/html; charset=utf-8"
        );
    }
}
