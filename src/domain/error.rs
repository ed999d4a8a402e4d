// Error taxonomy for route data handling
use thiserror::Error;

/// Errors produced while loading and analyzing a route's sample data.
///
/// Single-route requests surface all variants to the caller. The
/// comparator swallows them per route and skips the offender.
#[derive(Debug, Error)]
pub enum RouteDataError {
    /// A row had the wrong column count or a non-numeric cell.
    #[error("malformed sample data at line {line}: {reason}")]
    Parse { line: u64, reason: String },

    /// The file parsed cleanly but contained zero samples; metrics
    /// cannot be computed.
    #[error("route contains no samples")]
    EmptyRoute,

    /// The route file could not be read.
    #[error("failed to read route file: {0}")]
    Io(#[from] std::io::Error),
}
