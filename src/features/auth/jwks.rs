use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
}

struct JwksCache {
    keys: HashMap<String, DecodingKey>,
    last_fetched: Instant,
}

/// Fetches and caches the identity provider's signing keys
pub struct JwksClient {
    jwks_url: String,
    client: reqwest::Client,
    cache: Arc<RwLock<Option<JwksCache>>>,
    cache_ttl: Duration,
}

impl JwksClient {
    pub fn new(jwks_url: &str, cache_ttl: Duration) -> Self {
        Self {
            jwks_url: jwks_url.to_string(),
            client: reqwest::Client::new(),
            cache: Arc::new(RwLock::new(None)),
            cache_ttl,
        }
    }

    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, JwksError> {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.last_fetched.elapsed() < self.cache_ttl {
                    if let Some(key) = cached.keys.get(kid) {
                        return Ok(key.clone());
                    }
                }
            }
        }

        // Cache miss or expired, an unknown kid may mean the keys rotated
        self.fetch_jwks().await?;

        let cache = self.cache.read().await;
        cache
            .as_ref()
            .and_then(|cached| cached.keys.get(kid).cloned())
            .ok_or_else(|| JwksError::KeyNotFound(kid.to_string()))
    }

    async fn fetch_jwks(&self) -> Result<(), JwksError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| JwksError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JwksError::FetchError(format!(
                "Failed to fetch JWKS: HTTP {}",
                response.status()
            )));
        }

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| JwksError::ParseError(e.to_string()))?;

        let keys = decoding_keys(jwks)?;
        tracing::debug!("Fetched {} signing keys from {}", keys.len(), self.jwks_url);

        let mut cache = self.cache.write().await;
        *cache = Some(JwksCache {
            keys,
            last_fetched: Instant::now(),
        });

        Ok(())
    }
}

/// RSA keys only; other key types are ignored
fn decoding_keys(jwks: JwksResponse) -> Result<HashMap<String, DecodingKey>, JwksError> {
    let mut keys = HashMap::new();

    for jwk in jwks.keys {
        if jwk.kty != "RSA" {
            continue;
        }
        let (Some(n), Some(e)) = (jwk.n.as_deref(), jwk.e.as_deref()) else {
            continue;
        };
        let decoding_key = DecodingKey::from_rsa_components(n, e)
            .map_err(|e| JwksError::KeyConversionError(e.to_string()))?;
        keys.insert(jwk.kid, decoding_key);
    }

    Ok(keys)
}

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("Failed to fetch JWKS: {0}")]
    FetchError(String),

    #[error("Failed to parse JWKS: {0}")]
    ParseError(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Failed to convert key: {0}")]
    KeyConversionError(String),
}
