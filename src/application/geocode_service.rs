// Reverse-geocoding service with a relational cache
use std::sync::Arc;

use async_trait::async_trait;

/// Address cache keyed on the exact coordinate pair.
#[async_trait]
pub trait GeocodeCache: Send + Sync {
    async fn lookup_address(&self, lat: f64, lon: f64) -> anyhow::Result<Option<String>>;

    /// Store an address for the pair; an existing entry wins.
    async fn store_address(&self, lat: f64, lon: f64, address: &str) -> anyhow::Result<()>;
}

/// Upstream reverse geocoder. `None` means the provider answered but
/// knows no address for the point.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, lat: f64, lon: f64) -> anyhow::Result<Option<String>>;
}

#[derive(Clone)]
pub struct GeocodeService {
    cache: Arc<dyn GeocodeCache>,
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl GeocodeService {
    pub fn new(cache: Arc<dyn GeocodeCache>, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self { cache, geocoder }
    }

    /// Resolve a coordinate pair to an address, cache-first.
    ///
    /// Upstream misses and failures resolve to a placeholder string
    /// that is cached like any address; every call returns some text.
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> anyhow::Result<String> {
        if let Some(address) = self.cache.lookup_address(lat, lon).await? {
            return Ok(address);
        }

        let address = match self.geocoder.reverse(lat, lon).await {
            Ok(Some(address)) => address,
            Ok(None) => "address not found".to_string(),
            Err(err) => {
                tracing::warn!(lat, lon, error = %err, "reverse geocode lookup failed");
                format!("address unavailable: {err}")
            }
        };

        self.cache.store_address(lat, lon, &address).await?;
        Ok(address)
    }
}
