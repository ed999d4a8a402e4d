// Route KPI computation from ordered sensor samples
use crate::domain::error::RouteDataError;
use crate::domain::geo;
use crate::domain::sample::Sample;

/// Vibration magnitude above which a sample counts as a severe impact,
/// used when the caller supplies no threshold.
pub const DEFAULT_VIBRATION_THRESHOLD: f64 = 8.0;

/// The three summary KPIs derived per route. Values keep full float
/// precision; rounding belongs to the serialization boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteMetrics {
    pub total_distance_km: f64,
    pub impact_count: usize,
    pub max_vibration: f64,
}

/// Full analysis of one route: KPIs plus the per-channel series and
/// coordinate list, index-aligned with `labels = [0, n)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAnalysis {
    pub metrics: RouteMetrics,
    pub temperature: Vec<f64>,
    pub vibration: Vec<f64>,
    pub humidity: Vec<f64>,
    pub coordinates: Vec<(f64, f64)>,
}

impl RouteAnalysis {
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn labels(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }
}

/// Compute KPIs and channel series for one route.
///
/// Total distance sums the haversine legs over consecutive samples and
/// is zero for a single sample. Impacts count samples whose vibration
/// strictly exceeds the threshold. An empty route fails with
/// `EmptyRoute`; partial metrics are never produced.
pub fn analyze_route(samples: &[Sample], threshold: f64) -> Result<RouteAnalysis, RouteDataError> {
    if samples.is_empty() {
        return Err(RouteDataError::EmptyRoute);
    }

    let coordinates: Vec<(f64, f64)> = samples.iter().map(Sample::coordinates).collect();
    let total_distance_km = geo::path_distance_km(&coordinates);

    let impact_count = samples.iter().filter(|s| s.vibration > threshold).count();

    // f64::max drops NaN operands, so one bad cell never hides the
    // real channel maximum.
    let max_vibration = samples
        .iter()
        .map(|s| s.vibration)
        .fold(f64::NEG_INFINITY, f64::max);

    Ok(RouteAnalysis {
        metrics: RouteMetrics {
            total_distance_km,
            impact_count,
            max_vibration,
        },
        temperature: samples.iter().map(|s| s.temperature).collect(),
        vibration: samples.iter().map(|s| s.vibration).collect(),
        humidity: samples.iter().map(|s| s.humidity).collect(),
        coordinates,
    })
}
