use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Which backend holds rubbish locations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "LOCATION_STORE must be 'postgres' or 'memory', got '{}'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Upper bound for a single store call
    pub timeout: Duration,
    /// Only present for the postgres backend
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    pub jwks_url: String,
    pub jwks_cache_ttl: Duration,
    pub jwt_leeway: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            store: StoreConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 2 * 1024 * 1024; // 2MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StoreConfig {
    const DEFAULT_TIMEOUT_MS: u64 = 5000;

    pub fn from_env() -> Result<Self, String> {
        let backend = env::var("LOCATION_STORE")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse::<StoreBackend>()?;

        let timeout_ms = env::var("STORE_TIMEOUT_MS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "STORE_TIMEOUT_MS must be a valid number".to_string())?;

        let database = match backend {
            StoreBackend::Postgres => Some(DatabaseConfig::from_env()?),
            StoreBackend::Memory => None,
        };

        Ok(Self {
            backend,
            timeout: Duration::from_millis(timeout_ms),
            database,
        })
    }
}

impl DatabaseConfig {
    // Conservative pool defaults, the service runs one query per request
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    const DEFAULT_JWKS_CACHE_TTL_SECS: u64 = 3600; // 1 hour
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60; // 1 minute

    pub fn from_env() -> Result<Self, String> {
        let issuer = env::var("AUTH_ISSUER")
            .map_err(|_| "AUTH_ISSUER environment variable is required".to_string())?;

        let audience = env::var("AUTH_AUDIENCE")
            .map_err(|_| "AUTH_AUDIENCE environment variable is required".to_string())?;

        let jwks_url = env::var("AUTH_JWKS_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::default_jwks_url(&issuer));

        let jwks_cache_ttl_secs = env::var("JWKS_CACHE_TTL")
            .unwrap_or_else(|_| Self::DEFAULT_JWKS_CACHE_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWKS_CACHE_TTL must be a valid number".to_string())?;

        let jwt_leeway_secs = env::var("JWT_LEEWAY")
            .unwrap_or_else(|_| Self::DEFAULT_JWT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_LEEWAY must be a valid number".to_string())?;

        Ok(Self {
            issuer,
            audience,
            jwks_url,
            jwks_cache_ttl: Duration::from_secs(jwks_cache_ttl_secs),
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
        })
    }

    fn default_jwks_url(issuer: &str) -> String {
        format!("{}/.well-known/jwks.json", issuer.trim_end_matches('/'))
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Rubbish Map API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "API documentation for Rubbish Map".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!(
            "postgres".parse::<StoreBackend>(),
            Ok(StoreBackend::Postgres)
        );
        assert_eq!(" Memory ".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("mongo".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_default_jwks_url_strips_trailing_slash() {
        assert_eq!(
            AuthConfig::default_jwks_url("https://tenant.example.com/"),
            "https://tenant.example.com/.well-known/jwks.json"
        );
    }

    #[test]
    fn test_swagger_credentials_require_both_parts() {
        let mut swagger = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert_eq!(swagger.credentials(), None);

        swagger.password = Some("secret".to_string());
        assert_eq!(swagger.credentials(), Some("admin:secret".to_string()));
    }
}
