//! Application configuration, read once at startup from the environment
//! and injected into the adapters — no ambient configuration singleton.
//!
//! The hosted store endpoint and credential are validated for presence
//! only: when absent, a warning is logged and the server falls back to
//! in-memory stores so local development works without credentials.

use std::env;
use std::net::SocketAddr;

use tracing::warn;
use url::Url;

/// Default product display name.
const DEFAULT_PRODUCT_NAME: &str = "Föreningshandboken";
/// Default price in the currency's main unit.
const DEFAULT_PRODUCT_PRICE: u32 = 299;
/// Default currency key.
const DEFAULT_PRODUCT_CURRENCY: &str = "sek";
/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Product display data shown on order summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    /// Product display name.
    pub name: String,
    /// Price in the currency's main unit.
    pub price: u32,
    /// Lowercase currency key.
    pub currency: String,
}

impl Default for ProductInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_PRODUCT_NAME.to_owned(),
            price: DEFAULT_PRODUCT_PRICE,
            currency: DEFAULT_PRODUCT_CURRENCY.to_owned(),
        }
    }
}

/// Endpoint and credential of the hosted store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the hosted store.
    pub endpoint: Url,
    /// Anonymous API key sent with every request.
    pub anon_key: String,
}

/// Everything the server reads from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Product display data.
    pub product: ProductInfo,
    /// Hosted store access, when configured.
    pub store: Option<StoreConfig>,
    /// Payment gateway publishable key; recorded but unused by this core.
    pub stripe_publishable_key: Option<String>,
    /// AI service credential; recorded but unused by this core.
    pub openai_api_key: Option<String>,
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,
    /// Whether the session cookie requires HTTPS.
    pub cookie_secure: bool,
}

impl AppConfig {
    /// Read the configuration from the environment.
    ///
    /// Missing or malformed values never abort startup: each falls back
    /// to a default with a warning, matching the presence-only validation
    /// this service promises.
    pub fn from_env() -> Self {
        let store = match (read("SUPABASE_URL"), read("SUPABASE_ANON_KEY")) {
            (Some(raw_url), Some(anon_key)) => match Url::parse(&raw_url) {
                Ok(endpoint) => Some(StoreConfig { endpoint, anon_key }),
                Err(error) => {
                    warn!(%error, "SUPABASE_URL is not a valid URL; using in-memory stores");
                    None
                }
            },
            _ => {
                warn!(
                    "SUPABASE_URL/SUPABASE_ANON_KEY not set; using in-memory stores (dev only)"
                );
                None
            }
        };

        let price = read("PRODUCT_PRICE")
            .and_then(|raw| match raw.parse() {
                Ok(price) => Some(price),
                Err(_) => {
                    warn!(value = %raw, "PRODUCT_PRICE is not a number; using the default");
                    None
                }
            })
            .unwrap_or(DEFAULT_PRODUCT_PRICE);
        let product = ProductInfo {
            name: read("PRODUCT_NAME").unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_owned()),
            price,
            currency: read("PRODUCT_CURRENCY")
                .unwrap_or_else(|| DEFAULT_PRODUCT_CURRENCY.to_owned()),
        };

        let bind_addr = read("BIND_ADDR")
            .and_then(|raw| match raw.parse() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    warn!(value = %raw, "BIND_ADDR is not a socket address; using the default");
                    None
                }
            })
            .unwrap_or_else(default_bind_addr);

        let cookie_secure = read("SESSION_COOKIE_SECURE").is_none_or(|value| value != "0");

        Self {
            product,
            store,
            stripe_publishable_key: read("STRIPE_PUBLISHABLE_KEY"),
            openai_api_key: read("OPENAI_API_KEY"),
            bind_addr,
            cookie_secure,
        }
    }
}

fn read(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn default_bind_addr() -> SocketAddr {
    DEFAULT_BIND_ADDR
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8080)))
}
