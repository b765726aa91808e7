//! 认证模块
//!
//! 会话本身保存在 localStorage（由 `skillpilot::SessionStore` 管理）。
//! 这里只维护一个修订号信号：会话每次变化都递增它，
//! 路由服务通过注入的认证信号感知登录 / 注销并完成跳转。

use leptos::prelude::*;
use skillpilot::{AppConfig, Redirect, SessionStore, SkillPilotApi, default_http_client, default_storage};
use skillpilot_shared::UserProfile;
use std::sync::Arc;

/// 会话跳转实现：只递增修订号，实际跳转由路由服务的认证 Effect 完成
struct SignalRedirect {
    revision: RwSignal<u64>,
}

impl Redirect for SignalRedirect {
    fn to_entry_page(&self) {
        self.revision.update(|r| *r += 1);
    }

    fn to_dashboard(&self) {
        self.revision.update(|r| *r += 1);
    }
}

/// 认证上下文
///
/// 持有 API 客户端与会话修订号，通过 Context 在组件间共享。
#[derive(Clone)]
pub struct AuthContext {
    pub api: SkillPilotApi,
    revision: RwSignal<u64>,
}

impl AuthContext {
    pub fn new() -> Self {
        let config = AppConfig::load();
        let revision = RwSignal::new(0);
        let session = SessionStore::new(
            &config,
            default_storage(),
            Arc::new(SignalRedirect { revision }),
        );
        let api = SkillPilotApi::new(&config, session, default_http_client());
        Self { api, revision }
    }

    /// 认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let revision = self.revision;
        let api = self.api.clone();
        Signal::derive(move || {
            revision.get();
            api.session().is_authenticated()
        })
    }

    /// 当前登录用户；会话变化时重新读取
    pub fn user_signal(&self) -> Signal<Option<UserProfile>> {
        let revision = self.revision;
        let api = self.api.clone();
        Signal::derive(move || {
            revision.get();
            api.session().user()
        })
    }

    /// 注销：清除会话，路由服务随后跳回登录页
    pub fn logout(&self) {
        self.api.session().logout();
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}
