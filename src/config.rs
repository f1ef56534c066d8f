use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.chapa.co/v1";
const DEFAULT_CURRENCY: &str = "ETB";
const DEFAULT_CALLBACK_URL: &str = "http://127.0.0.1:3000/api/payments/verify";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Read-only payment gateway configuration, resolved once at process start
/// and passed explicitly into the gateway client.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway API, without a trailing slash.
    pub base_url: String,
    /// Bearer secret for the gateway account.
    pub secret_key: String,
    /// Fixed currency code sent with every initiation.
    pub currency: String,
    /// Callback/return URL handed to the gateway at initiation.
    pub callback_url: String,
    /// Upper bound on each outbound gateway call.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Builds the configuration from environment variables, falling back to
    /// defaults for everything except the secret, which defaults to empty
    /// (the gateway will reject calls until `CHAPA_SECRET_KEY` is set).
    pub fn from_env() -> Self {
        let timeout_secs = std::env::var("GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url: env_or("CHAPA_BASE_URL", DEFAULT_BASE_URL),
            secret_key: std::env::var("CHAPA_SECRET_KEY").unwrap_or_default(),
            currency: env_or("PAYMENT_CURRENCY", DEFAULT_CURRENCY),
            callback_url: env_or("PAYMENT_CALLBACK_URL", DEFAULT_CALLBACK_URL),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Configuration pointed at an arbitrary base URL with a throwaway
    /// secret; used by tests against a local mock gateway.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            secret_key: "test-secret".to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            callback_url: DEFAULT_CALLBACK_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
