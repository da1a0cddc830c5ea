//! Helpers for the transport layer that answers resolved requests.

use serde::Serialize;

use crate::query::{Pagination, QueryContext};
use crate::Error;

/// Header carrying the collection size (or page count).
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Value of the total-count header.
///
/// Page-based requests report the number of pages, everything else the raw total.
pub fn total_count_header(total: u64, context: &QueryContext) -> u64 {
    match context.pagination {
        Some(Pagination {
            limit, page: Some(_), ..
        }) if limit > 0 => total.div_ceil(limit),
        _ => total,
    }
}

/// Status and message sent back for a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

impl ErrorResponse {
    /// Client errors keep their message; anything else becomes a bare 500.
    pub fn from_error(error: &Error) -> Self {
        if error.is_client_error() {
            Self {
                status: error.status(),
                message: error.to_string(),
            }
        } else {
            Self {
                status: 500,
                message: "Internal Server Error".to_string(),
            }
        }
    }
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        Self::from_error(error)
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}
