//! 测试夹具：内存存储 + 记录跳转 + 预置响应的 HTTP 客户端

use std::sync::Arc;

use skillpilot_shared::UserProfile;

use crate::api::SkillPilotApi;
use crate::config::{AppConfig, AuthFailurePolicy};
use crate::request::MockHttpClient;
use crate::session::{RecordingRedirect, SessionStore};
use crate::storage::MemoryStorage;

pub const TEST_BASE_URL: &str = "http://api.test/api/";

pub struct Harness {
    pub api: SkillPilotApi,
    pub http: Arc<MockHttpClient>,
    pub storage: Arc<MemoryStorage>,
    pub redirect: Arc<RecordingRedirect>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_policy(AuthFailurePolicy::EmployeeListOnly)
    }

    pub fn with_policy(policy: AuthFailurePolicy) -> Self {
        let config = AppConfig::with_base_url(TEST_BASE_URL).with_auth_failure_policy(policy);
        let http = Arc::new(MockHttpClient::new());
        let storage = Arc::new(MemoryStorage::new());
        let redirect = Arc::new(RecordingRedirect::default());
        let session = SessionStore::new(&config, storage.clone(), redirect.clone());
        let api = SkillPilotApi::new(&config, session, http.clone());
        Self {
            api,
            http,
            storage,
            redirect,
        }
    }

    /// 以给定用户登录后的状态
    pub fn signed_in(user: UserProfile) -> Self {
        let harness = Self::new();
        harness.api.session().begin("test-token", &user).unwrap();
        harness
    }

    pub fn session(&self) -> &SessionStore {
        self.api.session()
    }
}

pub fn manager() -> UserProfile {
    serde_json::from_value(serde_json::json!({
        "id": 1, "name": "Morgan", "email": "morgan@example.com", "role": "OD_MANAGER"
    }))
    .unwrap()
}

pub fn employee() -> UserProfile {
    serde_json::from_value(serde_json::json!({
        "id": 7, "name": "Ada", "email": "ada@example.com", "role": "EMPLOYEE", "job_title_id": 3
    }))
    .unwrap()
}
