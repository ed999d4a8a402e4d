// Application state for HTTP handlers
use crate::application::auth_service::AuthService;
use crate::application::geocode_service::GeocodeService;
use crate::application::route_service::RouteService;
use crate::infrastructure::config::AuthSettings;

#[derive(Clone)]
pub struct AppState {
    pub route_service: RouteService,
    pub geocode_service: GeocodeService,
    pub auth_service: AuthService,
    /// Needed by the extractor to validate bearer tokens.
    pub auth_settings: AuthSettings,
}
