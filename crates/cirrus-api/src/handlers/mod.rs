pub mod delete;
pub mod download;
pub mod files;
pub mod health;
pub mod pages;
pub mod upload;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

/// Redirect target for the index page with a flash-style notice.
pub(crate) fn redirect_with_notice(notice: &str) -> String {
    format!("/?notice={}", utf8_percent_encode(notice, NON_ALPHANUMERIC))
}

/// Redirect target for the index page with a flash-style error.
pub(crate) fn redirect_with_error(error: &str) -> String {
    format!("/?error={}", utf8_percent_encode(error, NON_ALPHANUMERIC))
}
