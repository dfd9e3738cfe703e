use crate::constants::*;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub redis_url: Option<String>,
    pub catalog_cache_ttl: u64,
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Plan length used when a request omits `totalWeeks`
    pub default_total_weeks: u32,

    /// Longest plan a request may ask for
    pub max_total_weeks: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_total_weeks: DEFAULT_TOTAL_WEEKS,
            max_total_weeks: DEFAULT_MAX_TOTAL_WEEKS,
        }
    }
}

impl GeneratorConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            default_total_weeks: env::var("ROUTINE_DEFAULT_TOTAL_WEEKS")
                .unwrap_or_else(|_| defaults.default_total_weeks.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTINE_DEFAULT_TOTAL_WEEKS")?,

            max_total_weeks: env::var("ROUTINE_MAX_TOTAL_WEEKS")
                .unwrap_or_else(|_| defaults.max_total_weeks.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTINE_MAX_TOTAL_WEEKS")?,
        };

        if config.default_total_weeks == 0 || config.default_total_weeks > config.max_total_weeks {
            return Err(format!(
                "ROUTINE_DEFAULT_TOTAL_WEEKS must be between 1 and {}",
                config.max_total_weeks
            ));
        }

        Ok(config)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            database_url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            redis_url: env::var("REDIS_URL").ok(),
            catalog_cache_ttl: env::var("CATALOG_CACHE_TTL")
                .unwrap_or_else(|_| DEFAULT_CATALOG_CACHE_TTL_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid CATALOG_CACHE_TTL")?,
            generator: GeneratorConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// True when `DATABASE_URL` points at a SQLite file or in-memory database.
    pub fn uses_sqlite(&self) -> bool {
        self.database_url.starts_with("sqlite:")
    }
}
