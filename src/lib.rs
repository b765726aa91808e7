//! SkillPilot 客户端核心
//!
//! 与 DOM 无关的业务层，前端组件只负责渲染这里产出的视图模型：
//! - `config`: API 地址与存储键配置
//! - `storage` / `session`: 认证存储（令牌 + 用户资料）
//! - `request` / `api`: HTTP 抽象与按端点划分的 API 客户端
//! - `auth`: 登录 / 注册流程
//! - `navigation` / `loaders` / `views`: 页面路由、页面加载器与视图模型
//! - `actions`: 表单提交动作

// =========================================================
// 跨平台日志宏
// =========================================================

#[doc(hidden)]
pub mod __private {
    #[cfg(target_arch = "wasm32")]
    pub use web_sys;
}

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => ($crate::__private::web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_warn {
    ($($t:tt)*) => ($crate::__private::web_sys::console::warn_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => ($crate::__private::web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub mod actions;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod loaders;
pub mod navigation;
pub mod request;
pub mod session;
pub mod storage;
pub mod views;

#[cfg(test)]
mod testing;

pub use api::SkillPilotApi;
pub use config::{AppConfig, AuthFailurePolicy};
pub use error::{AppError, AppResult};
pub use navigation::{MenuItem, NavigationTicket, Page, PageRouter, menu_for};
pub use request::{HttpClient, HttpRequest, HttpResponse, default_http_client};
pub use session::{Redirect, SessionStore};
pub use storage::{MemoryStorage, StorageAdapter, default_storage};
pub use views::PageContent;

pub use skillpilot_shared as shared;
