//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (record in span, echo in response)
//! 4. Security headers (CSP, frame, referrer)
//! 5. Session layer (tower-sessions, in-memory store, carries notices)
//! 6. Error notices (moves pending notices onto error pages)

pub mod error_notices;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use error_notices::error_notices_middleware;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
