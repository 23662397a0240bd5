//! Bridge configuration: endpoints, markup identifiers and the storage key.
//!
//! Every identifier the bridge depends on lives here instead of being embedded
//! at the call sites. Values come from the defaults below, from build-time
//! environment variables (`FORMBRIDGE_*`), from CLI flags, or in the browser
//! from a runtime `window.FORMBRIDGE_CONFIG` object so static deployments can
//! point at another backend without rebuilding. Configuration values are
//! public; do not store secrets here.

use crate::bridge::FormKind;
use crate::errors::BridgeError;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_MESSAGE_ELEMENT_ID: &str = "message";
pub const DEFAULT_STORAGE_KEY: &str = "jwt";
/// Default request timeout applied by both the native and browser transports.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Element identifiers for one form and its two inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormIds {
    pub form_id: String,
    pub username_id: String,
    pub password_id: String,
}

impl FormIds {
    /// Builds the conventional `<prefix>-form`, `<prefix>-username`,
    /// `<prefix>-password` identifiers.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            form_id: format!("{prefix}-form"),
            username_id: format!("{prefix}-username"),
            password_id: format!("{prefix}-password"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    pub endpoint_signup: String,
    pub endpoint_login: String,
    pub message_element_id: String,
    pub storage_key: String,
    pub signup: FormIds,
    pub login: FormIds,
    pub timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            endpoint_signup: build_url_with_base(DEFAULT_BASE_URL, "/signup"),
            endpoint_login: build_url_with_base(DEFAULT_BASE_URL, "/login"),
            message_element_id: DEFAULT_MESSAGE_ELEMENT_ID.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            signup: FormIds::with_prefix("signup"),
            login: FormIds::with_prefix("login"),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl BridgeConfig {
    /// Default configuration with both endpoints rooted at `base_url`.
    ///
    /// # Errors
    /// Returns `BridgeError::Config` if `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, BridgeError> {
        let parsed = Url::parse(base_url.trim())
            .map_err(|err| BridgeError::Config(format!("invalid base URL {base_url}: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BridgeError::Config(format!(
                "invalid base URL {base_url}: expected http(s)://"
            )));
        }

        Ok(Self {
            endpoint_signup: build_url_with_base(base_url, "/signup"),
            endpoint_login: build_url_with_base(base_url, "/login"),
            ..Self::default()
        })
    }

    /// Loads config from build-time environment variables and applies runtime overrides.
    #[must_use]
    pub fn load() -> Self {
        let mut config = option_env!("FORMBRIDGE_BASE_URL")
            .and_then(|base| Self::with_base_url(base).ok())
            .unwrap_or_default();

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config
    }

    #[must_use]
    pub fn endpoint(&self, form: FormKind) -> &str {
        match form {
            FormKind::Signup => &self.endpoint_signup,
            FormKind::Login => &self.endpoint_login,
        }
    }

    #[must_use]
    pub fn form_ids(&self, form: FormKind) -> &FormIds {
        match form {
            FormKind::Signup => &self.signup,
            FormKind::Login => &self.login,
        }
    }
}

/// Joins a base URL and a path with exactly one slash between them.
#[must_use]
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

#[derive(Default)]
struct RuntimeConfig {
    base_url: Option<String>,
    endpoint_signup: Option<String>,
    endpoint_login: Option<String>,
    message_element_id: Option<String>,
    storage_key: Option<String>,
}

fn apply_runtime_overrides(config: &mut BridgeConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.base_url {
        config.endpoint_signup = build_url_with_base(&value, "/signup");
        config.endpoint_login = build_url_with_base(&value, "/login");
    }
    // explicit endpoints win over the base URL
    if let Some(value) = runtime.endpoint_signup {
        config.endpoint_signup = value;
    }
    if let Some(value) = runtime.endpoint_login {
        config.endpoint_login = value;
    }
    if let Some(value) = runtime.message_element_id {
        config.message_element_id = value;
    }
    if let Some(value) = runtime.storage_key {
        config.storage_key = value;
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("FORMBRIDGE_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        base_url: read_runtime_value(&object, "base_url"),
        endpoint_signup: read_runtime_value(&object, "endpoint_signup"),
        endpoint_login: read_runtime_value(&object, "endpoint_login"),
        message_element_id: read_runtime_value(&object, "message_element_id"),
        storage_key: read_runtime_value(&object, "storage_key"),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

#[cfg(target_arch = "wasm32")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key))
        .ok()?
        .as_string()?;
    normalize_runtime_value(&value)
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_markup_contract() {
        let config = BridgeConfig::default();
        assert_eq!(config.endpoint_signup, "http://localhost:8080/signup");
        assert_eq!(config.endpoint_login, "http://localhost:8080/login");
        assert_eq!(config.message_element_id, "message");
        assert_eq!(config.storage_key, "jwt");
        assert_eq!(config.signup.form_id, "signup-form");
        assert_eq!(config.signup.username_id, "signup-username");
        assert_eq!(config.login.password_id, "login-password");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn with_base_url_normalizes_slashes() {
        let config = BridgeConfig::with_base_url("https://auth.example.com/api/").unwrap();
        assert_eq!(config.endpoint_signup, "https://auth.example.com/api/signup");
        assert_eq!(config.endpoint_login, "https://auth.example.com/api/login");
        assert_eq!(config.storage_key, "jwt");
    }

    #[test]
    fn with_base_url_rejects_non_http() {
        assert!(matches!(
            BridgeConfig::with_base_url("ftp://example.com"),
            Err(BridgeError::Config(_))
        ));
        assert!(matches!(
            BridgeConfig::with_base_url("not a url"),
            Err(BridgeError::Config(_))
        ));
    }

    #[test]
    fn endpoint_and_ids_follow_form_kind() {
        let config = BridgeConfig::default();
        assert!(config.endpoint(FormKind::Signup).ends_with("/signup"));
        assert!(config.endpoint(FormKind::Login).ends_with("/login"));
        assert_eq!(config.form_ids(FormKind::Login).form_id, "login-form");
    }

    #[test]
    fn build_url_with_empty_base_keeps_path() {
        assert_eq!(build_url_with_base("", "/login"), "/login");
        assert_eq!(build_url_with_base("http://a//", "//b"), "http://a/b");
    }

    #[test]
    fn normalize_runtime_value_trims_and_rejects_empty() {
        assert_eq!(normalize_runtime_value(""), None);
        assert_eq!(normalize_runtime_value("   "), None);
        assert_eq!(
            normalize_runtime_value("  https://auth.example.com "),
            Some("https://auth.example.com".to_string())
        );
    }

    #[test]
    fn apply_runtime_overrides_ignores_empty_values() {
        let mut config = BridgeConfig::default();
        let runtime = RuntimeConfig {
            base_url: normalize_runtime_value(" "),
            endpoint_signup: normalize_runtime_value(""),
            endpoint_login: None,
            message_element_id: normalize_runtime_value(""),
            storage_key: normalize_runtime_value("  "),
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn apply_runtime_overrides_prefers_explicit_endpoints() {
        let mut config = BridgeConfig::default();
        let runtime = RuntimeConfig {
            base_url: normalize_runtime_value("https://auth.example.com"),
            endpoint_signup: None,
            endpoint_login: normalize_runtime_value("https://login.example.com/session"),
            message_element_id: normalize_runtime_value("status"),
            storage_key: normalize_runtime_value("auth_token"),
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.endpoint_signup, "https://auth.example.com/signup");
        assert_eq!(config.endpoint_login, "https://login.example.com/session");
        assert_eq!(config.message_element_id, "status");
        assert_eq!(config.storage_key, "auth_token");
    }
}
