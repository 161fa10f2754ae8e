use std::env;

use medinfo_analysis::client::DEFAULT_ENDPOINT;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BUCKET: &str = "prescriptions";

/// Process configuration, read once at startup and handed to the router.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub storage_url: String,
    pub storage_service_key: String,
    pub storage_bucket: String,
    pub ai_service_url: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| eyre::eyre!("{key} must be set"));

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| eyre::eyre!("invalid PORT {raw:?}: {e}"))?,
            None => DEFAULT_PORT,
        };

        let storage_service_key = get("SUPABASE_SERVICE_ROLE_KEY")
            .or_else(|| get("SUPABASE_SERVICE_KEY"))
            .ok_or_else(|| eyre::eyre!("SUPABASE_SERVICE_ROLE_KEY must be set"))?;

        Ok(Self {
            database_url: require("DATABASE_URL")?,
            port,
            jwt_secret: require("JWT_SECRET")?,
            storage_url: require("SUPABASE_URL")?,
            storage_service_key,
            storage_bucket: get("SUPABASE_STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            ai_service_url: get("AI_SERVICE_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        })
    }
}
