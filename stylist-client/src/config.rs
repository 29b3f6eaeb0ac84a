//! Client configuration

/// Environment variable holding the backend base URL
pub const ENV_API_BASE: &str = "STYLIST_API_BASE";
/// Environment variable holding the request timeout (seconds)
pub const ENV_TIMEOUT_SECS: &str = "STYLIST_HTTP_TIMEOUT_SECS";
/// Environment variable holding the admin bearer token
pub const ENV_ADMIN_TOKEN: &str = "STYLIST_ADMIN_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Client configuration for connecting to the stylist backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "http://localhost:8000"), trailing slashes trimmed.
    ///
    /// `None` is allowed: requests then fail with `ClientError::NotConfigured`.
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Bearer token sent on `/admin` requests
    pub admin_token: Option<String>,
}

impl ClientConfig {
    /// Create a configuration pointing at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            admin_token: None,
        }
    }

    /// A configuration with no backend; every request reports `NotConfigured`
    pub fn unconfigured() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            admin_token: None,
        }
    }

    /// Load from `STYLIST_API_BASE`, `STYLIST_HTTP_TIMEOUT_SECS` and `STYLIST_ADMIN_TOKEN`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(ENV_API_BASE).and_then(|v| normalize_base_url(&v));
        if base_url.is_none() {
            tracing::warn!("{} is not set, backend calls will fail", ENV_API_BASE);
        }

        Self {
            base_url,
            timeout_secs: lookup(ENV_TIMEOUT_SECS)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            admin_token: lookup(ENV_ADMIN_TOKEN).filter(|s| !s.trim().is_empty()),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Set the admin bearer token
    pub fn with_admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = Some(token.into());
        self
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::unconfigured()
    }
}

fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Join a base URL and an API path with exactly one slash between them.
///
/// Duplicate slashes inside `path` are collapsed; the scheme's `//` in
/// `base` is never touched.
pub fn join_url(base: &str, path: &str) -> String {
    let mut joined = String::with_capacity(base.len() + path.len() + 1);
    joined.push_str(base.trim_end_matches('/'));
    let mut prev_slash = false;
    joined.push('/');
    for ch in path.trim_start_matches('/').chars() {
        if ch == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        joined.push(ch);
    }
    joined
}
