// Route metadata domain model
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Durable metadata for one uploaded sensor log. The raw CSV payload
/// lives on disk under the upload directory; only its stored filename
/// is recorded here.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RouteRecord {
    pub id: i64,
    pub name: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    // Nullable for rows that predate the metadata columns.
    pub supplier: Option<String>,
    pub product: Option<String>,
    pub route_info: Option<String>,
}

/// Fields required to register a new route.
#[derive(Debug, Clone)]
pub struct NewRoute {
    pub name: String,
    pub supplier: String,
    pub product: String,
    pub route_info: String,
}
