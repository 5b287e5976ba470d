use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded recordings. Created at startup if missing.
    pub upload_dir: String,
    /// Directory of static frontend assets served at the router fallback.
    pub public_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl Config {
    /// Load configuration: built-in defaults, overlaid with an optional TOML
    /// file, overlaid with `RECORDING_VAULT_*` environment variables
    /// (e.g. `RECORDING_VAULT_SERVICE__HTTP__PORT=9000`).
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("service.name", "recording-vault")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 8001)?
            .set_default("storage.upload_dir", "uploads")?
            .set_default("storage.public_dir", "public")?
            .set_default("auth.username", "admin")?
            .set_default("auth.password", "123456")?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("RECORDING_VAULT").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_config_file() {
        let cfg = Config::load(None).unwrap();

        assert_eq!(cfg.service.name, "recording-vault");
        assert_eq!(cfg.service.http.port, 8001);
        assert_eq!(cfg.storage.upload_dir, "uploads");
        assert_eq!(cfg.auth.username, "admin");
        assert_eq!(cfg.auth.password, "123456");
    }
}
