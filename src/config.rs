use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FdcConfig {
    /// Absence is a startup warning, not a hard failure; lookups fail lazily.
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub fdc: FdcConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "macrolog".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "macrolog-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 7),
        };
        let fdc = FdcConfig {
            api_key: std::env::var("FDC_API_KEY").ok().filter(|k| !k.is_empty()),
            base_url: std::env::var("FDC_BASE_URL")
                .unwrap_or_else(|_| "https://api.nal.usda.gov/fdc/v1".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            fdc,
        })
    }
}
