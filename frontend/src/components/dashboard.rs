use crate::auth::use_auth;
use crate::components::pages::PageView;
use leptos::prelude::*;
use leptos::task::spawn_local;
use skillpilot::loaders::load_page;
use skillpilot::{Page, PageRouter};
use skillpilot_shared::Role;

/// 仪表盘外壳：顶栏、角色菜单、内容区与通知
#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let Some(user) = auth.api.session().user() else {
        // 有令牌但用户资料缺失或无法解析
        let auth = StoredValue::new(auth);
        return view! {
            <div class="hero min-h-screen bg-base-200">
                <div class="card bg-base-100 shadow-xl p-8 text-center space-y-4">
                    <p>"Your session could not be restored. Please log in again."</p>
                    <button class="btn btn-primary" on:click=move |_| auth.with_value(|a| a.logout())>
                        "Login"
                    </button>
                </div>
            </div>
        }
        .into_any();
    };

    let role = user.role;
    let router = PageRouter::new(role);
    let active = RwSignal::new(router.active());
    let content = RwSignal::new(router.content());
    let notification = RwSignal::new(Option::<(String, bool)>::None); // 消息内容, 是否出错
    let api = StoredValue::new(auth.api.clone());
    let auth = StoredValue::new(auth);
    let page_router = StoredValue::new(router);

    // 切换页面：立即显示加载占位，只有最新一次导航的结果会写入内容区
    let navigate = Callback::new(move |page: Page| {
        let router = page_router.get_value();
        let ticket = router.begin(page);
        active.set(page);
        content.set(router.content());

        let api = api.get_value();
        spawn_local(async move {
            let loaded = load_page(&api, router.role(), page).await;
            if router.commit(&ticket, loaded) {
                content.set(router.content());
            }
        });
    });

    let notify = Callback::new(move |message: (String, bool)| notification.set(Some(message)));
    let reload = Callback::new(move |_: ()| navigate.run(active.get_untracked()));

    // 初始加载默认页面
    navigate.run(Page::Dashboard);

    // 3秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    let on_logout = move |_| auth.with_value(|a| a.logout());

    let badge_class = if role.is_manager() {
        "badge badge-manager badge-primary"
    } else {
        "badge badge-employee badge-secondary"
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <Show when=move || notification.get().is_some()>
                <div class="toast toast-top toast-end z-50">
                    <div class=move || match notification.get() {
                        Some((_, true)) => "alert alert-error shadow-lg",
                        _ => "alert alert-success shadow-lg",
                    }>
                        <span>{move || notification.get().map(|(msg, _)| msg).unwrap_or_default()}</span>
                    </div>
                </div>
            </Show>

            <div class="navbar bg-base-100 shadow-xl">
                <div class="flex-1 gap-2">
                    <a class="btn btn-ghost text-xl">"SkillPilot AI"</a>
                </div>
                <div class="flex-none gap-3">
                    <span class="font-semibold">{user.name.clone()}</span>
                    <span class=badge_class>{role.label()}</span>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                        "Logout"
                    </button>
                </div>
            </div>

            <div class="flex flex-col md:flex-row gap-6 p-4 md:p-8 max-w-7xl mx-auto">
                <NavMenu role=role active=active navigate=navigate />

                <main class="flex-1 space-y-6">
                    <h2 class="text-2xl font-bold">{move || active.get().title()}</h2>
                    {move || view! {
                        <PageView content=content.get() navigate=navigate notify=notify reload=reload />
                    }}
                </main>
            </div>
        </div>
    }
    .into_any()
}

/// 角色菜单；员工报告页高亮 "Employees"
#[component]
fn NavMenu(role: Role, active: RwSignal<Page>, navigate: Callback<Page>) -> impl IntoView {
    let items = skillpilot::menu_for(role);

    view! {
        <ul class="menu nav-menu bg-base-100 rounded-box shadow w-full md:w-60 shrink-0">
            {items
                .iter()
                .map(|item| {
                    let page = item.page;
                    view! {
                        <li>
                            <a
                                class=move || if active.get().menu_page() == page { "active" } else { "" }
                                on:click=move |_| navigate.run(page)
                            >
                                {item.icon} " " {item.label}
                            </a>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
}
