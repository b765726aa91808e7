//! 客户端配置
//!
//! 解析顺序：构建期环境变量 `SKILLPILOT_API_BASE_URL` > 按页面主机名推断的默认值，
//! 之后再叠加 `window.SKILLPILOT_CONFIG` 运行时覆盖（静态部署无需重新构建即可切换后端）。
//! 这里的值都是公开的，不要放入任何密钥。

use skillpilot_shared::{TOKEN_KEY, USER_KEY};

/// 本地开发时后端的默认地址
pub const DEV_API_BASE_URL: &str = "http://localhost:8000/api";
/// 部署环境下与前端同源的 API 前缀
pub const SAME_ORIGIN_API_BASE_URL: &str = "/api";

/// 401 响应的处理范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthFailurePolicy {
    /// 只有员工列表端点在 401 时清除会话
    #[default]
    EmployeeListOnly,
    /// 所有需要认证的端点在 401 时都清除会话
    AllEndpoints,
}

impl AuthFailurePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "employee_list_only" => Some(AuthFailurePolicy::EmployeeListOnly),
            "all_endpoints" => Some(AuthFailurePolicy::AllEndpoints),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub token_key: String,
    pub user_key: String,
    pub auth_failure_policy: AuthFailurePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_hostname("")
    }
}

impl AppConfig {
    /// 按构建期变量、页面主机名与运行时覆盖加载配置
    pub fn load() -> Self {
        let mut config = match option_env!("SKILLPILOT_API_BASE_URL").and_then(normalize_runtime_value) {
            Some(url) => Self::with_base_url(url),
            None => Self::for_hostname(&current_hostname()),
        };

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        crate::log_info!("API base URL: {}", config.api_base_url);
        config
    }

    /// 本机访问时连开发后端，否则走同源 `/api`
    pub fn for_hostname(hostname: &str) -> Self {
        Self::with_base_url(base_url_for_hostname(hostname))
    }

    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            api_base_url: url.into(),
            token_key: TOKEN_KEY.to_string(),
            user_key: USER_KEY.to_string(),
            auth_failure_policy: AuthFailurePolicy::default(),
        }
    }

    pub fn with_auth_failure_policy(mut self, policy: AuthFailurePolicy) -> Self {
        self.auth_failure_policy = policy;
        self
    }
}

pub fn base_url_for_hostname(hostname: &str) -> &'static str {
    match hostname {
        "localhost" | "127.0.0.1" | "" => DEV_API_BASE_URL,
        _ => SAME_ORIGIN_API_BASE_URL,
    }
}

#[derive(Default)]
struct RuntimeConfig {
    api_base_url: Option<String>,
    auth_failure_policy: Option<AuthFailurePolicy>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.auth_failure_policy {
        config.auth_failure_policy = value;
    }
}

#[cfg(target_arch = "wasm32")]
fn current_hostname() -> String {
    web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn current_hostname() -> String {
    String::new()
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("SKILLPILOT_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        api_base_url: read_runtime_value(&object, "api_base_url"),
        auth_failure_policy: read_runtime_value(&object, "auth_failure_policy")
            .and_then(|v| AuthFailurePolicy::parse(&v)),
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
    fn local_hosts_use_dev_backend() {
        assert_eq!(AppConfig::for_hostname("localhost").api_base_url, DEV_API_BASE_URL);
        assert_eq!(AppConfig::for_hostname("127.0.0.1").api_base_url, DEV_API_BASE_URL);
        assert_eq!(AppConfig::for_hostname("").api_base_url, DEV_API_BASE_URL);
        assert_eq!(
            AppConfig::for_hostname("skillpilot.example.com").api_base_url,
            SAME_ORIGIN_API_BASE_URL
        );
    }

    #[test]
    fn default_keys_and_policy() {
        let config = AppConfig::default();
        assert_eq!(config.token_key, "skillpilot_token");
        assert_eq!(config.user_key, "skillpilot_user");
        assert_eq!(config.auth_failure_policy, AuthFailurePolicy::EmployeeListOnly);
    }

    #[test]
    fn normalize_runtime_value_trims_and_rejects_empty() {
        assert_eq!(normalize_runtime_value("   "), None);
        assert_eq!(
            normalize_runtime_value("  https://skills.example.com/api "),
            Some("https://skills.example.com/api".to_string())
        );
    }

    #[test]
    fn runtime_overrides_apply_only_present_values() {
        let mut config = AppConfig::for_hostname("localhost");
        apply_runtime_overrides(&mut config, RuntimeConfig::default());
        assert_eq!(config.api_base_url, DEV_API_BASE_URL);

        let runtime = RuntimeConfig {
            api_base_url: normalize_runtime_value("https://skills.example.com/api"),
            auth_failure_policy: AuthFailurePolicy::parse("all_endpoints"),
        };
        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.api_base_url, "https://skills.example.com/api");
        assert_eq!(config.auth_failure_policy, AuthFailurePolicy::AllEndpoints);
    }
}
