//! 路由服务模块
//!
//! 所有对 window.history 的操作都集中在此模块。
//! 导航流程：监听 -> 守卫 -> 更新状态 -> 渲染。

use leptos::prelude::*;
use skillpilot::log_info;
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn write_history(path: &str, use_push: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let _ = if use_push {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    };
}

fn set_document_title(route: &AppRoute) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        document.set_title(route.document_title());
    }
}

/// 守卫：返回实际应进入的路由
fn guard(target: AppRoute, is_auth: bool) -> AppRoute {
    if target.requires_auth() && !is_auth {
        log_info!("[Router] Not authenticated, redirecting to login");
        AppRoute::auth_failure_redirect()
    } else if target.should_redirect_when_authenticated() && is_auth {
        log_info!("[Router] Already authenticated, redirecting to dashboard");
        AppRoute::auth_success_redirect()
    } else {
        target
    }
}

/// 路由器服务
///
/// 通过注入的认证信号与认证系统解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: RwSignal<AppRoute>,
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        let requested = AppRoute::from_path(&current_path());
        // 首次加载同样经过守卫，已登录用户打开登录页直接进入仪表盘
        let initial = guard(requested.clone(), is_authenticated.get_untracked());
        if initial != requested {
            write_history(initial.to_path(), false);
        }
        set_document_title(&initial);

        Self {
            current_route: RwSignal::new(initial),
            is_authenticated,
        }
    }

    pub fn current_route(&self) -> Signal<AppRoute> {
        self.current_route.into()
    }

    fn navigate_to_route(&self, target: AppRoute, use_push: bool) {
        let route = guard(target, self.is_authenticated.get_untracked());
        write_history(route.to_path(), use_push);
        set_document_title(&route);
        self.current_route.set(route);
    }

    /// 浏览器后退 / 前进
    fn init_popstate_listener(&self) {
        let service = *self;
        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            service.navigate_to_route(target, false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 监听器与页面同生命周期
        closure.forget();
    }

    /// 认证状态变化时自动跳转
    ///
    /// 登录成功、主动注销、受保护端点返回 401 都会改变认证状态。
    fn setup_auth_redirect(&self) {
        let service = *self;
        Effect::new(move |_| {
            let is_auth = service.is_authenticated.get();
            let route = service.current_route.get_untracked();

            if is_auth && route.should_redirect_when_authenticated() {
                log_info!("[Router] Signed in, opening dashboard");
                service.navigate_to_route(AppRoute::auth_success_redirect(), true);
            } else if !is_auth && route.requires_auth() {
                log_info!("[Router] Session cleared, returning to login");
                service.navigate_to_route(AppRoute::auth_failure_redirect(), true);
            }
        });
    }
}

fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);
    router.init_popstate_listener();
    router.setup_auth_redirect();
    provide_context(router);
    router
}

pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件，应在 App 根部使用
#[component]
pub fn Router(is_authenticated: Signal<bool>, children: Children) -> impl IntoView {
    provide_router(is_authenticated);
    children()
}

/// 路由出口：根据当前路由渲染对应的组件
#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();
    move || matcher(router.current_route().get())
}
