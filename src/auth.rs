//! 登录 / 注册流程
//!
//! 成功（响应带 `access_token`）时保存令牌与用户资料并进入仪表盘；
//! 其余情况存储保持不变，只返回可展示的错误消息。

use skillpilot_shared::protocol::Reply;
use skillpilot_shared::{LoginResponse, Role, UserProfile};

use crate::api::SkillPilotApi;
use crate::error::AppResult;

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const REGISTER_FAILED_MESSAGE: &str = "Registration failed";
pub const CONNECT_FAILED_MESSAGE: &str =
    "Cannot connect to server. Please check if backend is running.";

#[derive(Debug, Clone, PartialEq)]
pub enum AuthFailure {
    /// 服务端拒绝：展示 detail 文本，否则展示通用失败消息
    Rejected(String),
    /// 请求未完成（网络错误或响应无法解析）
    Unreachable,
}

impl AuthFailure {
    pub fn message(&self) -> &str {
        match self {
            AuthFailure::Rejected(msg) => msg.as_str(),
            AuthFailure::Unreachable => CONNECT_FAILED_MESSAGE,
        }
    }
}

pub async fn login(api: &SkillPilotApi, email: &str, password: &str) -> Result<UserProfile, AuthFailure> {
    crate::log_info!("Login attempt");
    let reply = api.login(email, password).await;
    establish(api, reply, LOGIN_FAILED_MESSAGE)
}

pub async fn register(
    api: &SkillPilotApi,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<UserProfile, AuthFailure> {
    crate::log_info!("Registration attempt as {}", role.as_str());
    let reply = api.register(name, email, password, role).await;
    establish(api, reply, REGISTER_FAILED_MESSAGE)
}

fn establish(
    api: &SkillPilotApi,
    reply: AppResult<Reply<LoginResponse>>,
    fallback: &str,
) -> Result<UserProfile, AuthFailure> {
    let response = match reply {
        Ok(Reply::Data(response)) => response,
        Ok(Reply::Detail(detail)) => {
            let msg = detail.message();
            crate::log_warn!("Authentication rejected: {}", msg);
            return Err(AuthFailure::Rejected(if msg.is_empty() {
                fallback.to_string()
            } else {
                msg
            }));
        }
        Err(e) => {
            crate::log_error!("Authentication request failed: {}", e);
            return Err(AuthFailure::Unreachable);
        }
    };

    let (token, user) = match (response.access_token, response.user) {
        (Some(token), Some(user)) if !token.is_empty() => (token, user),
        _ => return Err(AuthFailure::Rejected(fallback.to_string())),
    };

    api.session().begin(&token, &user).map_err(|e| {
        crate::log_error!("Failed to persist session: {}", e);
        AuthFailure::Rejected(fallback.to_string())
    })?;

    crate::log_info!("Signed in as {} ({})", user.name, user.role.as_str());
    api.session().redirect().to_dashboard();
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpMethod;
    use crate::testing::Harness;
    use serde_json::json;

    #[tokio::test]
    async fn successful_login_stores_session_and_opens_dashboard() {
        let h = Harness::new();
        h.http.on_json(
            HttpMethod::Post,
            "/api/auth/login",
            json!({
                "access_token": "jwt-123",
                "token_type": "bearer",
                "user": {"id": 7, "name": "Ada", "email": "ada@example.com", "role": "EMPLOYEE", "job_title_id": 3}
            }),
        );

        let user = login(&h.api, "ada@example.com", "secret").await.unwrap();

        assert_eq!(user.role, Role::Employee);
        assert_eq!(h.session().token().as_deref(), Some("jwt-123"));
        assert_eq!(h.session().user().unwrap().job_title_id(), Some(3));
        assert_eq!(h.redirect.dashboard_count(), 1);
    }

    #[tokio::test]
    async fn rejected_login_leaves_storage_untouched_and_shows_detail() {
        let h = Harness::new();
        h.http.on(
            HttpMethod::Post,
            "/api/auth/login",
            401,
            r#"{"detail":"Incorrect email or password"}"#,
        );

        let failure = login(&h.api, "ada@example.com", "wrong").await.unwrap_err();

        assert_eq!(failure.message(), "Incorrect email or password");
        assert!(h.storage.is_empty());
        assert_eq!(h.redirect.dashboard_count(), 0);
    }

    #[tokio::test]
    async fn response_without_token_uses_generic_message() {
        let h = Harness::new();
        h.http.on_json(HttpMethod::Post, "/api/auth/login", json!({"token_type": "bearer"}));

        let failure = login(&h.api, "ada@example.com", "pw").await.unwrap_err();

        assert_eq!(failure.message(), LOGIN_FAILED_MESSAGE);
        assert!(h.storage.is_empty());
    }

    #[tokio::test]
    async fn unreachable_backend_shows_connect_message() {
        let h = Harness::new();
        h.http.fail(HttpMethod::Post, "/api/auth/login");

        let failure = login(&h.api, "ada@example.com", "pw").await.unwrap_err();

        assert_eq!(failure, AuthFailure::Unreachable);
        assert_eq!(
            failure.message(),
            "Cannot connect to server. Please check if backend is running."
        );
        assert!(h.storage.is_empty());
    }

    #[tokio::test]
    async fn register_establishes_session_like_login() {
        let h = Harness::new();
        h.http.on_json(
            HttpMethod::Post,
            "/api/auth/register",
            json!({
                "access_token": "jwt-456",
                "user": {"id": 9, "name": "Lin", "email": "lin@example.com", "role": "OD_MANAGER"}
            }),
        );

        let user = register(&h.api, "Lin", "lin@example.com", "pw", Role::OdManager)
            .await
            .unwrap();

        assert!(user.role.is_manager());
        assert!(h.session().is_authenticated());
        let body = h.http.last_request().unwrap().body.unwrap();
        assert!(body.contains(r#""role":"OD_MANAGER""#));
    }
}
