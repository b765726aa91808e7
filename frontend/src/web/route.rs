//! 路由定义模块
//!
//! 纯粹的领域模型，不依赖 DOM。
//! 应用只有两个入口：登录页与仪表盘，仪表盘内部的页面切换由 `PageRouter` 负责。

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页（入口页面）
    #[default]
    Login,
    /// 仪表盘（需要认证）
    Dashboard,
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由；兼容静态部署时的 `.html` 路径
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" | "/index.html" | "/login" => Self::Login,
            "/dashboard" | "/dashboard.html" => Self::Dashboard,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Dashboard => "/dashboard",
            Self::NotFound => "/404",
        }
    }

    /// 浏览器标签页标题
    pub fn document_title(&self) -> &'static str {
        match self {
            Self::Login => "SkillPilot AI - Login",
            Self::Dashboard => "SkillPilot AI - Dashboard",
            Self::NotFound => "SkillPilot AI - Not Found",
        }
    }

    /// 该路由是否需要认证
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard)
    }

    /// 已认证用户是否应该离开此路由
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_map_to_routes() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/index.html"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/dashboard.html"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/dashboard/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/admin"), AppRoute::NotFound);
    }

    #[test]
    fn only_dashboard_is_guarded() {
        assert!(AppRoute::Dashboard.requires_auth());
        assert!(!AppRoute::Login.requires_auth());
        assert!(AppRoute::Login.should_redirect_when_authenticated());
        assert_eq!(AppRoute::auth_success_redirect().to_path(), "/dashboard");
    }
}
