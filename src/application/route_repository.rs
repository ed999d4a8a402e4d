// Repository contract for route metadata
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::route::{NewRoute, RouteRecord};

#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// All route metadata rows, newest first.
    async fn list_routes(&self) -> anyhow::Result<Vec<RouteRecord>>;

    async fn find_route(&self, id: i64) -> anyhow::Result<Option<RouteRecord>>;

    /// Route names are unique; used to detect duplicates before insert.
    async fn find_route_by_name(&self, name: &str) -> anyhow::Result<Option<RouteRecord>>;

    /// Insert a new route row and return its id.
    async fn insert_route(
        &self,
        route: &NewRoute,
        filename: &str,
        created_at: DateTime<Utc>,
    ) -> anyhow::Result<i64>;

    async fn delete_route(&self, id: i64) -> anyhow::Result<()>;
}
