//! SkillPilot AI 前端应用
//!
//! 业务逻辑全部位于 `skillpilot` 核心库，此 crate 只负责渲染：
//! - `web::route`: 路由定义
//! - `web::router`: 路由服务（History API + 认证守卫）
//! - `auth`: 认证上下文
//! - `components`: UI 组件层

mod auth;
mod components {
    pub mod dashboard;
    mod forms;
    pub mod login;
    mod pages;
}

pub(crate) mod web {
    pub mod route;
    pub mod router;
}

use crate::auth::AuthContext;
use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;

use leptos::prelude::*;

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <a class="btn btn-primary mt-6" href="/">"Back to login"</a>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let auth_ctx = AuthContext::new();
    // 认证信号注入路由服务，路由与认证解耦
    let is_authenticated = auth_ctx.is_authenticated_signal();
    provide_context(auth_ctx);

    view! {
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
