use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub geocoder: GeocoderSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub database_path: String,
    pub upload_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderSettings {
    pub base_url: String,
    pub user_agent: String,
    /// Preferred language for resolved addresses.
    pub language: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    /// HMAC secret for signing access tokens.
    pub token_secret: String,
    pub token_ttl_mins: i64,
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/service"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
