//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Page handlers return `Result<T, AppError>`; the
//! error renders as a full page so the header navigation stays usable.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::filters;
use crate::notices::Notice;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A page could not load its data from the record store.
    ///
    /// `message` is what the shopper sees; the source is only logged.
    #[error("{message}: {source}")]
    Upstream {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Wrap a record store failure with the message shown to the shopper.
    #[must_use]
    pub const fn upstream(message: &'static str, source: StoreError) -> Self {
        Self::Upstream { message, source }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Message safe to show to the shopper.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Upstream { message, .. } => (*message).to_string(),
            Self::NotFound(msg) => msg.clone(),
        }
    }
}

/// Error page template.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: String,
    pub notices: Vec<Notice>,
}

/// What an error page showed, attached to the response so a later layer can
/// render it again with more notices.
#[derive(Debug, Clone)]
pub struct ErrorPage {
    pub message: String,
    pub notices: Vec<Notice>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Backend failures go to Sentry and also surface as an error notice
        let notices = if let Self::Upstream { .. } = self {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
            vec![Notice::error(self.public_message())]
        } else {
            tracing::debug!(error = %self, "Not found");
            Vec::new()
        };

        let status = self.status();
        let message = self.public_message();

        let page = ErrorPage {
            message: message.clone(),
            notices: notices.clone(),
        };
        let mut response = (status, ErrorTemplate { message, notices }).into_response();
        response.extensions_mut().insert(page);
        response
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
