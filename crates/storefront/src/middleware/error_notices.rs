//! Error page notices.
//!
//! A failed page load often follows a form post that already queued a
//! notice, e.g. an add-to-cart that failed and redirected to a listing that
//! cannot load either. Error pages are rendered by [`AppError`] without
//! session access, so this layer re-renders them with the pending notices
//! taken out of the session. Without it those notices would surface on some
//! later, unrelated page.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::error::{AppError, ErrorPage, ErrorTemplate};
use crate::notices;

/// Show pending session notices on error pages.
///
/// Must sit inside the session layer.
pub async fn error_notices_middleware(session: Session, request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let Some(page) = response.extensions().get::<ErrorPage>().cloned() else {
        return response;
    };

    let mut pending = notices::take(&session).await;
    if pending.is_empty() {
        return response;
    }
    pending.extend(page.notices);

    let template = ErrorTemplate {
        message: page.message,
        notices: pending,
    };
    (response.status(), template).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, http::Request as HttpRequest, http::StatusCode, routing::get};
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    use super::*;
    use crate::notices::Notice;

    async fn failed_after_notice(session: Session) -> AppError {
        notices::push(&session, Notice::error("Failed to add item to cart.")).await;
        AppError::NotFound("Product not found.".to_string())
    }

    async fn plain_error() -> AppError {
        AppError::NotFound("Product not found.".to_string())
    }

    fn app() -> Router {
        Router::new()
            .route("/queued", get(failed_after_notice))
            .route("/plain", get(plain_error))
            .layer(axum::middleware::from_fn(error_notices_middleware))
            .layer(SessionManagerLayer::new(MemoryStore::default()))
    }

    async fn body_text(uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(HttpRequest::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_error_page_shows_pending_notices() {
        let (status, body) = body_text("/queued").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Failed to add item to cart."));
        assert!(body.contains("Product not found."));
    }

    #[tokio::test]
    async fn test_error_page_without_pending_notices_unchanged() {
        let (status, body) = body_text("/plain").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Product not found."));
        assert!(!body.contains("notice-error"));
    }
}
