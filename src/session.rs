use std::sync::Arc;

use skillpilot_shared::{
    CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE, Session, UserProfile,
};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::storage::StorageAdapter;

/// 未存储令牌时 Bearer 头中的占位值（与浏览器 localStorage 读取缺失键的结果一致）
const MISSING_TOKEN: &str = "null";

// =========================================================
// 页面跳转抽象
// =========================================================

/// 会话状态变化时的页面跳转
pub trait Redirect: Send + Sync {
    /// 回到登录入口页
    fn to_entry_page(&self);
    /// 进入仪表盘
    fn to_dashboard(&self);
}

/// 不做任何跳转（原生环境或无界面调用方）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRedirect;

impl Redirect for NoRedirect {
    fn to_entry_page(&self) {}
    fn to_dashboard(&self) {}
}

// =========================================================
// 认证存储
// =========================================================

/// 认证存储：持久化的令牌与用户资料
///
/// 两项数据只通过这里读写，`logout` 会同时清除两者。
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn StorageAdapter>,
    redirect: Arc<dyn Redirect>,
    token_key: String,
    user_key: String,
}

impl SessionStore {
    pub fn new(
        config: &AppConfig,
        storage: Arc<dyn StorageAdapter>,
        redirect: Arc<dyn Redirect>,
    ) -> Self {
        Self {
            storage,
            redirect,
            token_key: config.token_key.clone(),
            user_key: config.user_key.clone(),
        }
    }

    pub fn redirect(&self) -> &dyn Redirect {
        self.redirect.as_ref()
    }

    pub fn set_token(&self, token: &str) -> AppResult<()> {
        self.storage
            .set(&self.token_key, token)
            .map_err(|e| e.in_op("session.set_token"))
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(&self.token_key).filter(|t| !t.is_empty())
    }

    pub fn set_user(&self, user: &UserProfile) -> AppResult<()> {
        let raw = serde_json::to_string(user)
            .map_err(|e| AppError::serialization(e.to_string()).in_op("session.set_user"))?;
        self.storage
            .set(&self.user_key, &raw)
            .map_err(|e| e.in_op("session.set_user"))
    }

    /// 存储中的用户资料；无法解析的值视为不存在
    pub fn user(&self) -> Option<UserProfile> {
        let raw = self.storage.get(&self.user_key)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                crate::log_warn!("Ignoring unreadable stored user: {}", e);
                None
            }
        }
    }

    pub fn session(&self) -> Option<Session> {
        Some(Session {
            token: self.token()?,
            user: self.user()?,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// 保存登录结果：令牌与用户资料
    pub fn begin(&self, token: &str, user: &UserProfile) -> AppResult<()> {
        self.set_token(token)?;
        if let Err(e) = self.set_user(user) {
            self.storage.remove(&self.token_key);
            return Err(e);
        }
        Ok(())
    }

    /// 清除令牌与用户资料，并回到登录页
    pub fn logout(&self) {
        self.storage.remove(&self.token_key);
        self.storage.remove(&self.user_key);
        crate::log_info!("Session cleared");
        self.redirect.to_entry_page();
    }

    /// 未认证时跳转到登录页，返回是否已认证
    pub fn require_auth(&self) -> bool {
        if self.is_authenticated() {
            true
        } else {
            self.redirect.to_entry_page();
            false
        }
    }

    /// JSON 内容类型与 Bearer 令牌
    ///
    /// 没有令牌时仍发送 Authorization 头，值为 `Bearer null`，由服务端拒绝。
    pub fn auth_headers(&self) -> Vec<(String, String)> {
        let token = self.token().unwrap_or_else(|| {
            crate::log_error!("No token found in storage");
            MISSING_TOKEN.to_string()
        });
        vec![
            (HEADER_CONTENT_TYPE.to_string(), CONTENT_TYPE_JSON.to_string()),
            (HEADER_AUTHORIZATION.to_string(), format!("Bearer {}", token)),
        ]
    }
}

// =========================================================
// 测试环境实现 (RecordingRedirect)
// =========================================================

#[cfg(test)]
#[derive(Default)]
pub struct RecordingRedirect {
    entry: std::sync::atomic::AtomicUsize,
    dashboard: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl RecordingRedirect {
    pub fn entry_count(&self) -> usize {
        self.entry.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn dashboard_count(&self) -> usize {
        self.dashboard.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl Redirect for RecordingRedirect {
    fn to_entry_page(&self) {
        self.entry.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    fn to_dashboard(&self) {
        self.dashboard.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use skillpilot_shared::Role;

    fn store() -> (SessionStore, Arc<MemoryStorage>, Arc<RecordingRedirect>) {
        let storage = Arc::new(MemoryStorage::new());
        let redirect = Arc::new(RecordingRedirect::default());
        let session = SessionStore::new(&AppConfig::default(), storage.clone(), redirect.clone());
        (session, storage, redirect)
    }

    fn employee() -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "id": 3, "name": "Grace", "email": "grace@example.com", "role": "EMPLOYEE", "job_title_id": 2
        }))
        .unwrap()
    }

    #[test]
    fn token_makes_session_authenticated() {
        let (session, _, _) = store();
        assert!(!session.is_authenticated());

        session.set_token("abc").unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("abc"));
    }

    #[test]
    fn empty_token_is_not_authenticated() {
        let (session, _, _) = store();
        session.set_token("").unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn logout_clears_both_keys_and_redirects_once() {
        let (session, storage, redirect) = store();
        session.begin("abc", &employee()).unwrap();
        assert_eq!(storage.len(), 2);

        session.logout();

        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert!(storage.is_empty());
        assert_eq!(redirect.entry_count(), 1);
    }

    #[test]
    fn stored_user_survives_round_trip() {
        let (session, _, _) = store();
        session.begin("abc", &employee()).unwrap();

        let stored = session.session().unwrap();
        assert_eq!(stored.user.role, Role::Employee);
        assert_eq!(stored.user.job_title_id(), Some(2));
    }

    #[test]
    fn unreadable_user_is_treated_as_absent() {
        let (session, storage, _) = store();
        storage.set("skillpilot_user", "{not json").unwrap();
        assert!(session.user().is_none());
    }

    #[test]
    fn require_auth_redirects_without_token() {
        let (session, _, redirect) = store();
        assert!(!session.require_auth());
        assert_eq!(redirect.entry_count(), 1);

        session.set_token("abc").unwrap();
        assert!(session.require_auth());
        assert_eq!(redirect.entry_count(), 1);
    }

    #[test]
    fn auth_headers_carry_placeholder_without_token() {
        let (session, _, _) = store();
        let headers = session.auth_headers();
        assert_eq!(
            headers,
            vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), "Bearer null".to_string()),
            ]
        );

        session.set_token("abc").unwrap();
        let headers = session.auth_headers();
        assert!(headers.contains(&("Authorization".to_string(), "Bearer abc".to_string())));
    }
}
