//! 表单组件
//!
//! 每个表单把零散的 signal 整合为一个 `*FormState`（`RwSignal` 实现了 `Copy`，
//! 可直接在闭包间传递），提交时转换为请求对象并调用 `skillpilot::actions`。

use crate::auth::use_auth;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use skillpilot::actions::{self, parse_list};
use skillpilot::views::{JobTitleOption, QuizQuestionView};
use skillpilot::{AppResult, log_error};
use skillpilot_shared::{
    GenerateQuiz, NewJobDescription, NewJobTitle, ProficiencyLevel, QuizAnswer, SkillSubmission,
};
use std::collections::BTreeMap;
use std::str::FromStr;

type Notify = Callback<(String, bool)>;

/// 提交结果写入通知；成功时刷新当前页面
fn report(result: AppResult<String>, notify: Notify, reload: Option<Callback<()>>) {
    match result {
        Ok(message) => {
            notify.run((message, false));
            if let Some(reload) = reload {
                reload.run(());
            }
        }
        Err(e) => {
            log_error!("Form submission failed: {}", e);
            notify.run((e.user_message(), true));
        }
    }
}

/// 数字输入框的内容；空值或非法值按 0 处理，由动作层校验
fn number<T: FromStr + Default>(input: &str) -> T {
    input.trim().parse().unwrap_or_default()
}

fn optional_id(input: &str) -> Option<i64> {
    input.trim().parse().ok()
}

fn optional_text(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn level_select(levels: Vec<ProficiencyLevel>, selected: RwSignal<ProficiencyLevel>) -> impl IntoView {
    view! {
        <select
            class="select select-bordered"
            on:change=move |ev| {
                if let Some(level) = ProficiencyLevel::parse(&event_target_value(&ev)) {
                    selected.set(level);
                }
            }
        >
            {levels
                .into_iter()
                .map(|level| view! {
                    <option value=level.as_str() selected=move || selected.get() == level>
                        {level.as_str()}
                    </option>
                })
                .collect_view()}
        </select>
    }
}

fn job_title_select(
    options: Vec<JobTitleOption>,
    selected: RwSignal<String>,
    placeholder: &'static str,
) -> impl IntoView {
    view! {
        <select
            class="select select-bordered"
            on:change=move |ev| selected.set(event_target_value(&ev))
            prop:value=selected
        >
            <option value="">{placeholder}</option>
            {options
                .into_iter()
                .map(|opt| view! { <option value=opt.id.to_string()>{opt.title}</option> })
                .collect_view()}
        </select>
    }
}

fn text_input(label: &'static str, value: RwSignal<String>, placeholder: &'static str) -> impl IntoView {
    view! {
        <label class="form-control">
            <span class="label-text">{label}</span>
            <input
                type="text"
                class="input input-bordered"
                placeholder=placeholder
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=value
            />
        </label>
    }
}

fn number_input(label: &'static str, value: RwSignal<String>, step: &'static str) -> impl IntoView {
    view! {
        <label class="form-control">
            <span class="label-text">{label}</span>
            <input
                type="number"
                min="0"
                step=step
                class="input input-bordered"
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=value
            />
        </label>
    }
}

// =========================================================
// 岗位
// =========================================================

#[derive(Clone, Copy)]
struct JobTitleFormState {
    title: RwSignal<String>,
    level: RwSignal<String>,
    department: RwSignal<String>,
    next_level: RwSignal<String>,
}

impl JobTitleFormState {
    fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            level: RwSignal::new("1".to_string()),
            department: RwSignal::new(String::new()),
            next_level: RwSignal::new(String::new()),
        }
    }

    fn to_request(self) -> NewJobTitle {
        NewJobTitle {
            title: self.title.get(),
            level: number(&self.level.get()),
            next_level_job_id: optional_id(&self.next_level.get()),
            department: optional_text(&self.department.get()),
        }
    }
}

#[component]
pub fn JobTitleForm(titles: Vec<JobTitleOption>, notify: Notify, reload: Callback<()>) -> impl IntoView {
    let api = StoredValue::new(use_auth().api);
    let form = JobTitleFormState::new();
    let submitting = RwSignal::new(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        submitting.set(true);
        let request = form.to_request();
        let api = api.get_value();
        spawn_local(async move {
            let result = actions::create_job_title(&api, request).await;
            submitting.set(false);
            report(result, notify, Some(reload));
        });
    };

    view! {
        <form class="card bg-base-100 shadow-xl" on:submit=on_submit>
            <div class="card-body grid grid-cols-1 md:grid-cols-2 gap-3">
                <h3 class="card-title md:col-span-2">"Create Job Title"</h3>
                {text_input("Title", form.title, "e.g. Data Engineer")}
                {number_input("Level", form.level, "1")}
                {text_input("Department", form.department, "Optional")}
                <label class="form-control">
                    <span class="label-text">"Next Level"</span>
                    {job_title_select(titles, form.next_level, "None")}
                </label>
                <button class="btn btn-primary md:col-span-2" disabled=move || submitting.get()>
                    "Create Job Title"
                </button>
            </div>
        </form>
    }
}

#[derive(Clone, Copy)]
struct JobDescriptionFormState {
    job_title: RwSignal<String>,
    required_skills: RwSignal<String>,
    required_tools: RwSignal<String>,
    years: RwSignal<String>,
    preferred_skills: RwSignal<String>,
    description: RwSignal<String>,
}

impl JobDescriptionFormState {
    fn new() -> Self {
        Self {
            job_title: RwSignal::new(String::new()),
            required_skills: RwSignal::new(String::new()),
            required_tools: RwSignal::new(String::new()),
            years: RwSignal::new("0".to_string()),
            preferred_skills: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
        }
    }

    fn to_request(self) -> Option<NewJobDescription> {
        let preferred = parse_list(&self.preferred_skills.get());
        Some(NewJobDescription {
            job_title_id: optional_id(&self.job_title.get())?,
            required_skills: parse_list(&self.required_skills.get()),
            required_tools: parse_list(&self.required_tools.get()),
            required_years_of_experience: number(&self.years.get()),
            preferred_skills: (!preferred.is_empty()).then_some(preferred),
            description: optional_text(&self.description.get()),
        })
    }
}

#[component]
pub fn JobDescriptionForm(
    job_titles: Vec<JobTitleOption>,
    notify: Notify,
    reload: Callback<()>,
) -> impl IntoView {
    let api = StoredValue::new(use_auth().api);
    let form = JobDescriptionFormState::new();
    let submitting = RwSignal::new(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(request) = form.to_request() else {
            notify.run(("Select a job title".to_string(), true));
            return;
        };
        submitting.set(true);
        let api = api.get_value();
        spawn_local(async move {
            let result = actions::create_job_description(&api, request).await;
            submitting.set(false);
            report(result, notify, Some(reload));
        });
    };

    view! {
        <form class="card bg-base-100 shadow-xl" on:submit=on_submit>
            <div class="card-body grid grid-cols-1 md:grid-cols-2 gap-3">
                <h3 class="card-title md:col-span-2">"Create Job Description"</h3>
                <label class="form-control">
                    <span class="label-text">"Job Title"</span>
                    {job_title_select(job_titles, form.job_title, "Select a job title")}
                </label>
                {number_input("Required Years of Experience", form.years, "0.5")}
                {text_input("Required Skills", form.required_skills, "Comma separated, e.g. Python, SQL")}
                {text_input("Required Tools", form.required_tools, "Comma separated")}
                {text_input("Preferred Skills", form.preferred_skills, "Optional, comma separated")}
                <label class="form-control md:col-span-2">
                    <span class="label-text">"Description"</span>
                    <textarea
                        class="textarea textarea-bordered"
                        on:input=move |ev| form.description.set(event_target_value(&ev))
                        prop:value=form.description
                    ></textarea>
                </label>
                <button class="btn btn-primary md:col-span-2" disabled=move || submitting.get()>
                    "Create Job Description"
                </button>
            </div>
        </form>
    }
}

// =========================================================
// 出题
// =========================================================

#[derive(Clone, Copy)]
struct QuizFormState {
    job_title: RwSignal<String>,
    skill_name: RwSignal<String>,
    years: RwSignal<String>,
    difficulty: RwSignal<ProficiencyLevel>,
    count: RwSignal<String>,
}

impl QuizFormState {
    fn new() -> Self {
        Self {
            job_title: RwSignal::new(String::new()),
            skill_name: RwSignal::new(String::new()),
            years: RwSignal::new("1".to_string()),
            difficulty: RwSignal::new(ProficiencyLevel::Intermediate),
            count: RwSignal::new("5".to_string()),
        }
    }

    fn reset(&self) {
        self.skill_name.set(String::new());
        self.count.set("5".to_string());
    }

    fn to_request(self) -> Option<GenerateQuiz> {
        Some(GenerateQuiz {
            job_title_id: optional_id(&self.job_title.get())?,
            skill_name: self.skill_name.get(),
            experience_level_years: number(&self.years.get()),
            difficulty_level: self.difficulty.get(),
            num_questions: number(&self.count.get()),
        })
    }
}

#[component]
pub fn GenerateQuizForm(
    job_titles: Vec<JobTitleOption>,
    levels: Vec<ProficiencyLevel>,
    notify: Notify,
) -> impl IntoView {
    let api = StoredValue::new(use_auth().api);
    let form = QuizFormState::new();
    let generating = RwSignal::new(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(request) = form.to_request() else {
            notify.run(("Select a job title".to_string(), true));
            return;
        };
        generating.set(true);
        let api = api.get_value();
        spawn_local(async move {
            let result = actions::generate_quiz(&api, request).await;
            generating.set(false);
            if result.is_ok() {
                form.reset();
            }
            report(result, notify, None);
        });
    };

    view! {
        <form class="card bg-base-100 shadow-xl" on:submit=on_submit>
            <div class="card-body grid grid-cols-1 md:grid-cols-2 gap-3">
                <h3 class="card-title md:col-span-2">"Generate Quiz Questions"</h3>
                <label class="form-control">
                    <span class="label-text">"Job Title"</span>
                    {job_title_select(job_titles, form.job_title, "Select a job title")}
                </label>
                {text_input("Skill", form.skill_name, "e.g. Python")}
                {number_input("Experience Level (years)", form.years, "0.5")}
                <label class="form-control">
                    <span class="label-text">"Difficulty"</span>
                    {level_select(levels, form.difficulty)}
                </label>
                {number_input("Number of Questions", form.count, "1")}
                <button class="btn btn-primary md:col-span-2" disabled=move || generating.get()>
                    {move || if generating.get() { "Generating..." } else { "Generate Quiz" }}
                </button>
            </div>
        </form>
    }
}

// =========================================================
// 技能提交
// =========================================================

#[derive(Clone, Copy)]
struct SkillRow {
    key: usize,
    name: RwSignal<String>,
    level: RwSignal<ProficiencyLevel>,
    years: RwSignal<String>,
}

impl SkillRow {
    fn new(key: usize) -> Self {
        Self {
            key,
            name: RwSignal::new(String::new()),
            level: RwSignal::new(ProficiencyLevel::Beginner),
            years: RwSignal::new("0".to_string()),
        }
    }

    fn to_submission(self) -> SkillSubmission {
        SkillSubmission {
            skill_name: self.name.get(),
            proficiency_level: self.level.get(),
            years_of_experience: number(&self.years.get()),
            self_assessment_score: None,
        }
    }
}

#[component]
pub fn SkillsForm(levels: Vec<ProficiencyLevel>, notify: Notify, reload: Callback<()>) -> impl IntoView {
    let api = StoredValue::new(use_auth().api);
    let levels = StoredValue::new(levels);
    let rows = RwSignal::new(vec![SkillRow::new(0)]);
    let next_key = StoredValue::new(1usize);
    let submitting = RwSignal::new(false);

    let add_row = move |_| {
        let key = next_key.get_value();
        next_key.set_value(key + 1);
        rows.update(|r| r.push(SkillRow::new(key)));
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let skills: Vec<SkillSubmission> = rows.get().into_iter().map(SkillRow::to_submission).collect();
        submitting.set(true);
        let api = api.get_value();
        spawn_local(async move {
            let result = actions::submit_skills(&api, skills).await;
            submitting.set(false);
            report(result, notify, Some(reload));
        });
    };

    view! {
        <form class="card bg-base-100 shadow-xl" on:submit=on_submit>
            <div class="card-body space-y-3">
                <h3 class="card-title">"Update My Skills"</h3>
                <For
                    each=move || rows.get()
                    key=|row| row.key
                    children=move |row| {
                        let key = row.key;
                        view! {
                            <div class="grid grid-cols-1 md:grid-cols-4 gap-2 items-end">
                                {text_input("Skill", row.name, "e.g. Rust")}
                                <label class="form-control">
                                    <span class="label-text">"Proficiency"</span>
                                    {level_select(levels.get_value(), row.level)}
                                </label>
                                {number_input("Years", row.years, "0.5")}
                                <button
                                    type="button"
                                    class="btn btn-ghost"
                                    on:click=move |_| rows.update(|r| r.retain(|x| x.key != key))
                                >
                                    "Remove"
                                </button>
                            </div>
                        }
                    }
                />
                <div class="flex gap-2">
                    <button type="button" class="btn btn-outline" on:click=add_row>"Add Skill"</button>
                    <button class="btn btn-primary" disabled=move || submitting.get()>"Save Skills"</button>
                </div>
            </div>
        </form>
    }
}

// =========================================================
// 答题
// =========================================================

#[component]
pub fn QuizForm(questions: Vec<QuizQuestionView>, notify: Notify, reload: Callback<()>) -> impl IntoView {
    if questions.is_empty() {
        return view! {
            <p class="text-base-content/50">"No quiz questions are available for your job title yet."</p>
        }
        .into_any();
    }

    let api = StoredValue::new(use_auth().api);
    let answers = RwSignal::new(BTreeMap::<i64, String>::new());
    let submitting = RwSignal::new(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let selected: Vec<QuizAnswer> = answers
            .get()
            .into_iter()
            .map(|(id, answer)| QuizAnswer {
                quiz_question_id: id,
                selected_answer: answer,
                time_taken_seconds: None,
            })
            .collect();
        submitting.set(true);
        let api = api.get_value();
        spawn_local(async move {
            let result = actions::submit_quiz(&api, selected)
                .await
                .map(|summary| actions::quiz_summary_text(&summary));
            submitting.set(false);
            report(result, notify, Some(reload));
        });
    };

    view! {
        <form class="space-y-4" on:submit=on_submit>
            {questions
                .into_iter()
                .enumerate()
                .map(|(i, q)| {
                    let id = q.id;
                    let group = format!("question-{}", id);
                    view! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body space-y-2">
                                <div class="flex justify-between text-sm opacity-70">
                                    <span>{format!("Question {} · {}", i + 1, q.skill)}</span>
                                    <span>{format!("{} pts", q.points)}</span>
                                </div>
                                <p class="font-semibold">{q.text}</p>
                                {q.options
                                    .into_iter()
                                    .map(|opt| {
                                        let key = opt.key.clone();
                                        view! {
                                            <label class="label cursor-pointer justify-start gap-3">
                                                <input
                                                    type="radio"
                                                    class="radio radio-primary"
                                                    name=group.clone()
                                                    on:change=move |_| {
                                                        let key = key.clone();
                                                        answers.update(|a| {
                                                            a.insert(id, key);
                                                        });
                                                    }
                                                />
                                                <span>{format!("{}. {}", opt.key, opt.text)}</span>
                                            </label>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        </div>
                    }
                })
                .collect_view()}
            <button class="btn btn-primary" disabled=move || submitting.get()>"Submit Quiz"</button>
        </form>
    }
    .into_any()
}

// =========================================================
// 学习路线
// =========================================================

#[component]
pub fn RoadmapForm(
    suggested_skills: Vec<String>,
    levels: Vec<ProficiencyLevel>,
    notify: Notify,
    reload: Callback<()>,
) -> impl IntoView {
    let api = StoredValue::new(use_auth().api);
    let skill = RwSignal::new(String::new());
    let target = RwSignal::new(ProficiencyLevel::Advanced);
    let generating = RwSignal::new(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        generating.set(true);
        let (skill_name, level) = (skill.get(), target.get());
        let api = api.get_value();
        spawn_local(async move {
            let result = actions::generate_roadmap(&api, &skill_name, level).await;
            generating.set(false);
            report(result, notify, Some(reload));
        });
    };

    view! {
        <form class="card bg-base-100 shadow-xl" on:submit=on_submit>
            <div class="card-body grid grid-cols-1 md:grid-cols-3 gap-3 items-end">
                <h3 class="card-title md:col-span-3">"Generate Roadmap"</h3>
                <label class="form-control">
                    <span class="label-text">"Skill"</span>
                    <input
                        type="text"
                        list="roadmap-skills"
                        class="input input-bordered"
                        on:input=move |ev| skill.set(event_target_value(&ev))
                        prop:value=skill
                    />
                    <datalist id="roadmap-skills">
                        {suggested_skills
                            .into_iter()
                            .map(|s| view! { <option value=s></option> })
                            .collect_view()}
                    </datalist>
                </label>
                <label class="form-control">
                    <span class="label-text">"Target Level"</span>
                    {level_select(levels, target)}
                </label>
                <button class="btn btn-primary" disabled=move || generating.get()>
                    {move || if generating.get() { "Generating..." } else { "Generate Roadmap" }}
                </button>
            </div>
        </form>
    }
}

/// 路线卡片上的进度调整
#[component]
pub fn ProgressControl(roadmap_id: i64, progress: f64, notify: Notify, reload: Callback<()>) -> impl IntoView {
    let api = StoredValue::new(use_auth().api);
    let value = RwSignal::new(progress.round().to_string());

    let on_save = move |_| {
        let progress: f64 = number(&value.get());
        let api = api.get_value();
        spawn_local(async move {
            let result = actions::update_roadmap_progress(&api, roadmap_id, progress).await;
            report(result, notify, Some(reload));
        });
    };

    view! {
        <div class="flex items-center gap-2">
            <input
                type="range"
                min="0"
                max="100"
                step="5"
                class="range range-sm flex-1"
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=value
            />
            <span class="w-12 text-right text-sm">{move || format!("{}%", value.get())}</span>
            <button type="button" class="btn btn-sm btn-outline" on:click=on_save>"Update"</button>
        </div>
    }
}
