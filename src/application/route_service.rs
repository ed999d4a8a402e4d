// Route service - Use cases for route CRUD, dashboards, and comparison
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use futures::future::join_all;

use crate::application::error::{ServiceError, ServiceResult};
use crate::application::route_repository::RouteRepository;
use crate::domain::comparison::{RouteComparison, assemble_comparison};
use crate::domain::error::RouteDataError;
use crate::domain::metrics::{RouteAnalysis, analyze_route};
use crate::domain::route::{NewRoute, RouteRecord};
use crate::domain::sample::parse_samples;
use crate::infrastructure::file_store::FileStore;

/// Single-route analysis payload: metadata passthrough plus the
/// freshly computed analysis.
#[derive(Debug, Clone)]
pub struct RouteDashboard {
    pub details: RouteRecord,
    pub analysis: RouteAnalysis,
}

#[derive(Clone)]
pub struct RouteService {
    repository: Arc<dyn RouteRepository>,
    files: Arc<FileStore>,
}

impl RouteService {
    pub fn new(repository: Arc<dyn RouteRepository>, files: Arc<FileStore>) -> Self {
        Self { repository, files }
    }

    pub async fn list_routes(&self) -> ServiceResult<Vec<RouteRecord>> {
        Ok(self.repository.list_routes().await?)
    }

    /// Store the uploaded payload and register the route.
    ///
    /// The stored file is removed again if the metadata insert fails,
    /// so no orphan files accumulate under the upload directory.
    pub async fn upload_route(
        &self,
        route: NewRoute,
        client_filename: &str,
        payload: &[u8],
    ) -> ServiceResult<i64> {
        let all_present = !route.name.trim().is_empty()
            && !route.supplier.trim().is_empty()
            && !route.product.trim().is_empty()
            && !route.route_info.trim().is_empty()
            && !client_filename.trim().is_empty();
        if !all_present {
            return Err(ServiceError::Validation(
                "all metadata fields and the file are required".to_string(),
            ));
        }

        if self
            .repository
            .find_route_by_name(&route.name)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "a route named '{}' already exists",
                route.name
            )));
        }

        let filename = self
            .files
            .store(client_filename, payload)
            .await
            .context("failed to store route file")?;

        match self
            .repository
            .insert_route(&route, &filename, Utc::now())
            .await
        {
            Ok(id) => Ok(id),
            Err(err) => {
                if let Err(cleanup_err) = self.files.remove(&filename).await {
                    tracing::warn!(
                        filename = %filename,
                        error = %cleanup_err,
                        "failed to remove file after insert failure"
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Delete a route row and best-effort remove its file. Deleting an
    /// unknown id succeeds, matching the idempotent boundary contract.
    pub async fn delete_route(&self, route_id: i64) -> ServiceResult<()> {
        if let Some(record) = self.repository.find_route(route_id).await? {
            if let Err(err) = self.files.remove(&record.filename).await {
                tracing::warn!(
                    route_id,
                    filename = %record.filename,
                    error = %err,
                    "failed to remove route file"
                );
            }
        }
        self.repository.delete_route(route_id).await?;
        Ok(())
    }

    /// Recompute the dashboard for one route from its raw samples.
    pub async fn route_dashboard(
        &self,
        route_id: i64,
        threshold: f64,
    ) -> ServiceResult<RouteDashboard> {
        let details = self
            .repository
            .find_route(route_id)
            .await?
            .ok_or(ServiceError::RouteNotFound(route_id))?;

        let analysis = self.analyze_stored_route(&details, threshold).await?;
        Ok(RouteDashboard { details, analysis })
    }

    /// Compare several routes under one threshold.
    ///
    /// Unknown ids and routes whose files fail to load are skipped;
    /// the remaining routes are analyzed concurrently and reassembled
    /// in caller order before the comparison fold.
    pub async fn compare_routes(
        &self,
        route_ids: &[i64],
        threshold: f64,
    ) -> ServiceResult<RouteComparison> {
        let mut records = Vec::new();
        for route_id in route_ids {
            match self.repository.find_route(*route_id).await? {
                Some(record) => records.push(record),
                None => tracing::warn!(route_id, "skipping unknown route in comparison"),
            }
        }

        let analyses = join_all(records.iter().map(|record| async move {
            let result = self.analyze_stored_route(record, threshold).await;
            (record.name.clone(), result)
        }))
        .await;

        Ok(assemble_comparison(analyses))
    }

    async fn analyze_stored_route(
        &self,
        record: &RouteRecord,
        threshold: f64,
    ) -> Result<RouteAnalysis, RouteDataError> {
        let bytes = self.files.read(&record.filename).await?;
        let samples = parse_samples(&bytes)?;
        analyze_route(&samples, threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::DEFAULT_VIBRATION_THRESHOLD;
    use std::sync::Mutex;

    /// In-memory stand-in for the SQLite repository.
    #[derive(Default)]
    struct FakeRoutes {
        rows: Mutex<Vec<RouteRecord>>,
        next_id: Mutex<i64>,
    }

    #[async_trait::async_trait]
    impl RouteRepository for FakeRoutes {
        async fn list_routes(&self) -> anyhow::Result<Vec<RouteRecord>> {
            let mut rows = self.rows.lock().unwrap().clone();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(rows)
        }

        async fn find_route(&self, id: i64) -> anyhow::Result<Option<RouteRecord>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned())
        }

        async fn find_route_by_name(&self, name: &str) -> anyhow::Result<Option<RouteRecord>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.name == name)
                .cloned())
        }

        async fn insert_route(
            &self,
            route: &NewRoute,
            filename: &str,
            created_at: chrono::DateTime<Utc>,
        ) -> anyhow::Result<i64> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            self.rows.lock().unwrap().push(RouteRecord {
                id: *next_id,
                name: route.name.clone(),
                filename: filename.to_string(),
                created_at,
                supplier: Some(route.supplier.clone()),
                product: Some(route.product.clone()),
                route_info: Some(route.route_info.clone()),
            });
            Ok(*next_id)
        }

        async fn delete_route(&self, id: i64) -> anyhow::Result<()> {
            self.rows.lock().unwrap().retain(|r| r.id != id);
            Ok(())
        }
    }

    fn test_service(tag: &str) -> RouteService {
        let dir = std::env::temp_dir().join(format!(
            "route-telemetry-test-{}-{}",
            tag,
            std::process::id()
        ));
        RouteService::new(
            Arc::new(FakeRoutes::default()),
            Arc::new(FileStore::new(dir)),
        )
    }

    fn meta(name: &str) -> NewRoute {
        NewRoute {
            name: name.to_string(),
            supplier: "Acme".to_string(),
            product: "Gearbox".to_string(),
            route_info: "SP-RJ".to_string(),
        }
    }

    async fn upload(service: &RouteService, name: &str, csv: &[u8]) -> i64 {
        service
            .files
            .ensure_root()
            .await
            .expect("upload dir should be creatable");
        service
            .upload_route(meta(name), "log.csv", csv)
            .await
            .expect("upload should succeed")
    }

    #[tokio::test]
    async fn test_dashboard_recomputes_from_raw_samples() {
        let service = test_service("dashboard");
        let id = upload(
            &service,
            "run-1",
            b"0.0,0.0,20.0,5.0,50.0\n0.0,0.0,20.0,12.0,50.0\n",
        )
        .await;

        let dashboard = service
            .route_dashboard(id, DEFAULT_VIBRATION_THRESHOLD)
            .await
            .unwrap();

        assert_eq!(dashboard.details.name, "run-1");
        assert_eq!(dashboard.analysis.metrics.total_distance_km, 0.0);
        assert_eq!(dashboard.analysis.metrics.impact_count, 1);
        assert_eq!(dashboard.analysis.metrics.max_vibration, 12.0);
    }

    #[tokio::test]
    async fn test_dashboard_for_unknown_route_is_not_found() {
        let service = test_service("missing");
        let err = service.route_dashboard(99, 8.0).await.unwrap_err();
        assert!(matches!(err, ServiceError::RouteNotFound(99)));
    }

    #[tokio::test]
    async fn test_dashboard_rejects_empty_file() {
        let service = test_service("empty");
        let id = upload(&service, "empty-run", b"").await;

        let err = service.route_dashboard(id, 8.0).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Data(RouteDataError::EmptyRoute)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_route_name_conflicts() {
        let service = test_service("duplicate");
        upload(&service, "run-1", b"0.0,0.0,20.0,5.0,50.0\n").await;

        let err = service
            .upload_route(meta("run-1"), "log.csv", b"0.0,0.0,20.0,5.0,50.0\n")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_upload_requires_all_fields() {
        let service = test_service("fields");
        let mut incomplete = meta("run-1");
        incomplete.supplier = String::new();

        let err = service
            .upload_route(incomplete, "log.csv", b"")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_comparison_skips_empty_routes() {
        let service = test_service("compare-skip");
        let empty = upload(&service, "empty-run", b"").await;
        let valid = upload(
            &service,
            "valid-run",
            b"0.0,0.0,20.0,5.0,50.0\n0.0,1.0,21.0,9.0,51.0\n",
        )
        .await;

        let comparison = service.compare_routes(&[empty, valid], 8.0).await.unwrap();

        assert_eq!(comparison.entries.len(), 1);
        assert_eq!(comparison.entries[0].name, "valid-run");
        assert_eq!(comparison.labels.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_comparison_preserves_caller_order_with_unequal_lengths() {
        let service = test_service("compare-order");
        let row = "0.0,0.0,20.0,5.0,50.0\n";
        let a = upload(&service, "a", row.repeat(10).as_bytes()).await;
        let b = upload(&service, "b", row.repeat(20).as_bytes()).await;
        let c = upload(&service, "c", row.repeat(15).as_bytes()).await;

        let comparison = service.compare_routes(&[a, b, c], 8.0).await.unwrap();

        assert_eq!(comparison.labels.as_ref().unwrap().len(), 20);
        let names: Vec<&str> = comparison.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_comparison_with_no_survivors_is_valid() {
        let service = test_service("compare-none");
        let comparison = service.compare_routes(&[404, 405], 8.0).await.unwrap();
        assert!(comparison.labels.is_none());
        assert!(comparison.entries.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let service = test_service("delete");
        let id = upload(&service, "run-1", b"0.0,0.0,20.0,5.0,50.0\n").await;

        service.delete_route(id).await.unwrap();
        service.delete_route(id).await.unwrap();
        assert!(service.list_routes().await.unwrap().is_empty());
    }
}
