//! Askama filters used by the base layout.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Year for the footer copyright line.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Fingerprint of `static/css/main.css`, set by `build.rs`.
///
/// Names the copy under `static/css/derived/`, so the stylesheet URL changes
/// whenever its content does.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}
