use crate::auth::use_auth;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use skillpilot::auth::{login, register};
use skillpilot_shared::Role;

/// 登录页，可切换到注册模式
///
/// 成功后会话写入存储，路由服务监听到认证状态变化后进入仪表盘。
#[component]
pub fn LoginPage() -> impl IntoView {
    let api = StoredValue::new(use_auth().api);

    let registering = RwSignal::new(false);
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let role = RwSignal::new(Role::Employee);
    let is_submitting = RwSignal::new(false);
    let error_msg = RwSignal::new(Option::<String>::None);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if email.get().is_empty() || password.get().is_empty() {
            error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }
        if registering.get() && name.get().trim().is_empty() {
            error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        is_submitting.set(true);
        error_msg.set(None);

        let api = api.get_value();
        let (name, email, password, role) = (name.get(), email.get(), password.get(), role.get());
        let registering = registering.get();
        spawn_local(async move {
            let outcome = if registering {
                register(&api, name.trim(), &email, &password, role).await
            } else {
                login(&api, &email, &password).await
            };
            if let Err(failure) = outcome {
                error_msg.set(Some(failure.message().to_string()));
            }
            is_submitting.set(false);
        });
    };

    let toggle_mode = move |_| {
        registering.update(|r| *r = !*r);
        error_msg.set(None);
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"SkillPilot AI"</h1>
                    <p class="text-base-content/70">
                        {move || if registering.get() {
                            "Create your account"
                        } else {
                            "Skills assessment and career development"
                        }}
                    </p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <Show when=move || registering.get()>
                            <div class="form-control">
                                <label class="label" for="name">
                                    <span class="label-text">"Full Name"</span>
                                </label>
                                <input
                                    id="name"
                                    type="text"
                                    on:input=move |ev| name.set(event_target_value(&ev))
                                    prop:value=name
                                    class="input input-bordered"
                                />
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@company.com"
                                on:input=move |ev| email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>

                        <Show when=move || registering.get()>
                            <div class="form-control">
                                <label class="label" for="role">
                                    <span class="label-text">"Role"</span>
                                </label>
                                <select
                                    id="role"
                                    class="select select-bordered"
                                    on:change=move |ev| {
                                        let value = event_target_value(&ev);
                                        role.set(if value == Role::OdManager.as_str() {
                                            Role::OdManager
                                        } else {
                                            Role::Employee
                                        });
                                    }
                                >
                                    <option value=Role::Employee.as_str() selected=move || role.get() == Role::Employee>
                                        {Role::Employee.label()}
                                    </option>
                                    <option value=Role::OdManager.as_str() selected=move || role.get() == Role::OdManager>
                                        {Role::OdManager.label()}
                                    </option>
                                </select>
                            </div>
                        </Show>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || match (is_submitting.get(), registering.get()) {
                                    (true, _) => view! { <span class="loading loading-spinner"></span> "Please wait..." }.into_any(),
                                    (false, true) => "Register".into_any(),
                                    (false, false) => "Login".into_any(),
                                }}
                            </button>
                        </div>
                        <button type="button" class="btn btn-link btn-sm" on:click=toggle_mode>
                            {move || if registering.get() {
                                "Already have an account? Login"
                            } else {
                                "New here? Create an account"
                            }}
                        </button>
                    </form>
                </div>
            </div>
        </div>
    }
}
