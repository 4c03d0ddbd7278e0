//! REST API module.
//!
//! Read-only discovery routes consumed by the marketplace frontend.

mod creators;
mod resources;

pub use creators::*;
pub use resources::*;

use std::num::IntErrorKind;

use serde::Deserialize;

/// Query parameters accepted by the ranked list routes.
///
/// `limit` stays a string so malformed input reaches [`parse_limit`]
/// instead of being rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    #[serde(default)]
    pub limit: Option<String>,
}

impl LimitQuery {
    pub fn limit_or(&self, default: usize) -> usize {
        parse_limit(self.limit.as_deref(), default)
    }
}

/// Parse a `limit` parameter leniently.
///
/// Missing, non-numeric, negative and zero values fall back to `default`.
/// Positive values pass through; ones too large for `usize` saturate.
pub fn parse_limit(raw: Option<&str>, default: usize) -> usize {
    raw.map(str::trim)
        .and_then(|s| match s.parse::<usize>() {
            Ok(n) => Some(n),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(usize::MAX),
            Err(_) => None,
        })
        .filter(|&n| n > 0)
        .unwrap_or(default)
}
