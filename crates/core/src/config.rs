use remote::supabase::SupabaseConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub remote: RemoteConfig,
    #[serde(default)]
    pub toast: ToastConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_password_rpc")]
    pub password_rpc: String,
    #[serde(default = "default_password_param")]
    pub password_param: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToastConfig {
    pub duration_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self { duration_ms: 1500 }
    }
}

impl ToastConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

fn default_table() -> String {
    "project".to_string()
}

fn default_bucket() -> String {
    "images".to_string()
}

fn default_password_rpc() -> String {
    "verify_admin_password".to_string()
}

fn default_password_param() -> String {
    "input_password".to_string()
}

impl From<&RemoteConfig> for SupabaseConfig {
    fn from(cfg: &RemoteConfig) -> Self {
        SupabaseConfig {
            url: cfg.url.clone(),
            api_key: cfg.api_key.clone(),
            table: cfg.table.clone(),
            bucket: cfg.bucket.clone(),
            password_rpc: cfg.password_rpc.clone(),
            password_param: cfg.password_param.clone(),
        }
    }
}

/// Loads the TOML file (explicit path, or an optional `config/default`) and
/// overlays `GALLERY__SECTION__KEY` environment variables.
pub fn load(path: Option<&str>) -> crate::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix("GALLERY")
            .prefix_separator("__")
            .separator("__"),
    );
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
