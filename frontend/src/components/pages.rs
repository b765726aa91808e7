//! 内容区渲染
//!
//! 每个 `PageContent` 变体对应一个视图。数据整理已在加载器中完成，
//! 这里只做展示；表单交给 `forms` 模块。

use crate::components::forms::{
    GenerateQuizForm, JobDescriptionForm, JobTitleForm, ProgressControl, QuizForm, RoadmapForm,
    SkillsForm,
};
use leptos::prelude::*;
use skillpilot::views::{
    CareerSummary, EmployeeDashboard, EmployeeReportView, EmployeeRow, GapSummary,
    JobDescriptionsView, JobTitleOption, JobTitlesView, ManagerDashboard, MySkillsView, RoadmapView,
    SkillCard,
};
use skillpilot::{Page, PageContent};

#[component]
pub fn PageView(
    content: PageContent,
    navigate: Callback<Page>,
    notify: Callback<(String, bool)>,
    reload: Callback<()>,
) -> impl IntoView {
    match content {
        PageContent::Loading(text) => view! {
            <div class="loading-panel flex items-center justify-center gap-3 py-10 text-base-content/60">
                <span class="loading loading-spinner loading-md"></span>
                {text}
            </div>
        }
        .into_any(),
        PageContent::Error(message) => view! {
            <div role="alert" class="alert alert-error error-message">
                <span>{message}</span>
            </div>
        }
        .into_any(),
        PageContent::ManagerDashboard(dash) => manager_dashboard(dash, navigate).into_any(),
        PageContent::EmployeeDashboard(dash) => employee_dashboard(dash, navigate).into_any(),
        PageContent::Employees(rows) => employees_page(rows, navigate).into_any(),
        PageContent::EmployeeReport(report) => employee_report(report, navigate).into_any(),
        PageContent::JobTitles(view) => job_titles_page(view, notify, reload).into_any(),
        PageContent::JobDescriptions(view) => job_descriptions_page(view, notify, reload).into_any(),
        PageContent::GenerateQuiz(view) => view! {
            <GenerateQuizForm job_titles=view.job_titles levels=view.levels notify=notify />
        }
        .into_any(),
        PageContent::MySkills(view) => my_skills_page(view, notify, reload).into_any(),
        PageContent::GapAnalysis(gap) => gap_card("Your Gap Analysis", gap).into_any(),
        PageContent::TakeQuiz(quiz) => view! {
            <div class="space-y-4">
                <p class="text-base-content/70">
                    {format!("Questions: {} | Previous answers: {}", quiz.questions.len(), quiz.attempts)}
                </p>
                <QuizForm questions=quiz.questions notify=notify reload=reload />
            </div>
        }
        .into_any(),
        PageContent::Roadmap(view) => roadmap_page(view, notify, reload).into_any(),
    }
}

// =========================================================
// 通用片段
// =========================================================

fn stat(title: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="stat stat-card">
            <div class="stat-title">{title}</div>
            <div class="stat-value text-primary">{value}</div>
        </div>
    }
}

fn card(header: String, body: AnyView) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title card-header">{header}</h3>
                {body}
            </div>
        </div>
    }
}

fn skills_grid(skills: Vec<SkillCard>, empty_text: &'static str) -> AnyView {
    if skills.is_empty() {
        return view! { <p class="text-base-content/50 text-muted">{empty_text}</p> }.into_any();
    }
    view! {
        <div class="grid grid-cols-1 md:grid-cols-3 gap-3 skills-grid">
            {skills
                .into_iter()
                .map(|skill| view! {
                    <div class="skill-item rounded-box bg-base-200 p-3">
                        <h4 class="font-semibold">
                            {skill.name}
                            {skill.verified.then(|| view! { <span class="badge badge-success badge-sm ml-2">"verified"</span> })}
                        </h4>
                        <div class="proficiency text-sm opacity-70">{skill.proficiency}</div>
                    </div>
                })
                .collect_view()}
        </div>
    }
    .into_any()
}

fn field(label: &'static str, value: String) -> impl IntoView {
    view! {
        <p><strong>{label} ": "</strong> {value}</p>
    }
}

fn gap_card(header: &'static str, gap: GapSummary) -> impl IntoView {
    let body = view! {
        <div class="space-y-1">
            {field("Gap Percentage", gap.gap_percentage)}
            {field("Missing Skills", gap.missing_skills)}
            {field("Priority Areas", gap.priority_areas)}
            {(!gap.matched_skills.is_empty()).then(|| field("Matched Skills", gap.matched_skills))}
            {(!gap.skills_to_improve.is_empty()).then(|| field("Skills to Improve", gap.skills_to_improve))}
            {gap.estimated_time.map(|time| field("Estimated Time to Bridge", time))}
        </div>
    }
    .into_any();
    card(header.to_string(), body)
}

fn career_card(career: CareerSummary) -> impl IntoView {
    let body = view! {
        <div class="space-y-1">
            {field("Current Role", career.current_role)}
            {field("Recommended Next Role", career.next_role.unwrap_or_else(|| "-".to_string()))}
            {field("Readiness", career.readiness)}
            {field("Skills Needed", career.skills_needed)}
            {field("Estimated Timeline", format!("{} months", career.timeline_months))}
        </div>
    }
    .into_any();
    card("Career Progression".to_string(), body)
}

// =========================================================
// 经理页面
// =========================================================

fn manager_dashboard(dash: ManagerDashboard, navigate: Callback<Page>) -> impl IntoView {
    let table = view! {
        <div class="overflow-x-auto">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Job Title"</th>
                        <th>"Skills"</th>
                        <th>"Assessments"</th>
                        <th>"Active Roadmaps"</th>
                        <th>"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    {dash
                        .employees
                        .into_iter()
                        .map(|emp| {
                            let id = emp.id;
                            view! {
                                <tr>
                                    <td>{emp.name}</td>
                                    <td>{emp.job_title}</td>
                                    <td>{emp.total_skills}</td>
                                    <td>{emp.total_assessments}</td>
                                    <td>{emp.active_roadmaps}</td>
                                    <td>
                                        <button class="btn btn-primary btn-sm" on:click=move |_| navigate.run(Page::EmployeeReport(id))>
                                            "View Report"
                                        </button>
                                    </td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
    .into_any();

    view! {
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            {stat("Total Employees", dash.total_employees.to_string())}
            {stat("Total Skills", dash.total_skills.to_string())}
            {stat("Active Roadmaps", dash.active_roadmaps.to_string())}
        </div>
        {card("Recent Employee Activity".to_string(), table)}
    }
}

fn employees_page(rows: Vec<EmployeeRow>, navigate: Callback<Page>) -> impl IntoView {
    let table = view! {
        <div class="overflow-x-auto">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Email"</th>
                        <th>"Job Title"</th>
                        <th>"Experience"</th>
                        <th>"Actions"</th>
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .into_iter()
                        .map(|emp| {
                            let id = emp.id;
                            view! {
                                <tr>
                                    <td>{emp.name}</td>
                                    <td>{emp.email}</td>
                                    <td>{emp.job_title}</td>
                                    <td>{emp.experience}</td>
                                    <td>
                                        <button class="btn btn-primary btn-sm" on:click=move |_| navigate.run(Page::EmployeeReport(id))>
                                            "View Details"
                                        </button>
                                    </td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
    .into_any();

    card("All Employees".to_string(), table)
}

fn employee_report(report: EmployeeReportView, navigate: Callback<Page>) -> impl IntoView {
    let info = view! {
        <div class="space-y-1">
            {field("Name", report.name)}
            {field("Email", report.email)}
            {field("Job Title", report.job_title)}
            {field("Experience", report.experience)}
        </div>
    }
    .into_any();
    let skills_header = format!("Skills ({})", report.skills.len());

    view! {
        {card("Employee Information".to_string(), info)}
        {card(skills_header, skills_grid(report.skills, "No skills submitted yet."))}
        {report.gap.map(|gap| gap_card("Gap Analysis", gap))}
        {report.career.map(career_card)}
        <button class="btn btn-secondary" on:click=move |_| navigate.run(Page::Employees)>
            "Back to Employees"
        </button>
    }
}

fn job_titles_page(
    view: JobTitlesView,
    notify: Callback<(String, bool)>,
    reload: Callback<()>,
) -> impl IntoView {
    let options: Vec<JobTitleOption> = view
        .titles
        .iter()
        .map(|t| JobTitleOption {
            id: t.id,
            title: t.title.clone(),
        })
        .collect();

    let table = if view.titles.is_empty() {
        view! { <p class="text-base-content/50">"No job titles defined yet."</p> }.into_any()
    } else {
        view! {
            <div class="overflow-x-auto">
                <table class="table table-zebra w-full">
                    <thead>
                        <tr>
                            <th>"Title"</th>
                            <th>"Level"</th>
                            <th>"Department"</th>
                            <th>"Next Level"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {view
                            .titles
                            .into_iter()
                            .map(|t| view! {
                                <tr>
                                    <td>{t.title}</td>
                                    <td>{t.level}</td>
                                    <td>{t.department}</td>
                                    <td>{t.next_level.unwrap_or_else(|| "-".to_string())}</td>
                                </tr>
                            })
                            .collect_view()}
                    </tbody>
                </table>
            </div>
        }
        .into_any()
    };

    view! {
        <JobTitleForm titles=options notify=notify reload=reload />
        {card("All Job Titles".to_string(), table)}
    }
}

fn job_descriptions_page(
    view: JobDescriptionsView,
    notify: Callback<(String, bool)>,
    reload: Callback<()>,
) -> impl IntoView {
    let list = if view.descriptions.is_empty() {
        view! { <p class="text-base-content/50">"No job descriptions yet."</p> }.into_any()
    } else {
        view.descriptions
            .into_iter()
            .map(|jd| view! {
                <div class="rounded-box bg-base-200 p-4 space-y-1">
                    <h4 class="font-semibold">{jd.job_title}</h4>
                    {field("Required Skills", jd.required_skills)}
                    {field("Required Tools", jd.required_tools)}
                    {field("Required Experience", jd.required_experience)}
                    {jd.description.map(|d| view! { <p class="opacity-70">{d}</p> })}
                </div>
            })
            .collect_view()
            .into_any()
    };

    view! {
        <JobDescriptionForm job_titles=view.job_titles notify=notify reload=reload />
        {card("All Job Descriptions".to_string(), view! { <div class="space-y-3">{list}</div> }.into_any())}
    }
}

// =========================================================
// 员工页面
// =========================================================

fn employee_dashboard(dash: EmployeeDashboard, navigate: Callback<Page>) -> impl IntoView {
    let actions = view! {
        <div class="grid grid-cols-2 md:grid-cols-4 gap-3">
            <button class="btn btn-primary" on:click=move |_| navigate.run(Page::MySkills)>"Update My Skills"</button>
            <button class="btn btn-primary" on:click=move |_| navigate.run(Page::GapAnalysis)>"View Gap Analysis"</button>
            <button class="btn btn-primary" on:click=move |_| navigate.run(Page::TakeQuiz)>"Take Quiz"</button>
            <button class="btn btn-primary" on:click=move |_| navigate.run(Page::Roadmap)>"View Roadmap"</button>
        </div>
    }
    .into_any();

    view! {
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            {stat("My Skills", dash.skills_count.to_string())}
            {stat("Active Roadmaps", dash.active_roadmaps.to_string())}
            {stat("Completed Roadmaps", dash.completed_roadmaps.to_string())}
            {stat("Assessments Taken", dash.assessments_taken.to_string())}
        </div>
        {card("Quick Actions".to_string(), actions)}
        {card(
            "My Skills Overview".to_string(),
            skills_grid(dash.skills, "No skills added yet. Click \"Update My Skills\" to add your skills."),
        )}
    }
}

fn my_skills_page(
    view: MySkillsView,
    notify: Callback<(String, bool)>,
    reload: Callback<()>,
) -> impl IntoView {
    view! {
        {card("Current Skills".to_string(), skills_grid(view.skills, "No skills added yet."))}
        <SkillsForm levels=view.levels notify=notify reload=reload />
    }
}

fn roadmap_page(
    view: RoadmapView,
    notify: Callback<(String, bool)>,
    reload: Callback<()>,
) -> impl IntoView {
    let cards = if view.roadmaps.is_empty() {
        view! { <p class="text-base-content/50">"No roadmaps yet. Generate one below."</p> }.into_any()
    } else {
        view.roadmaps
            .into_iter()
            .map(|r| {
                let target = r
                    .target_level
                    .map(|l| format!("Target: {}", l.as_str()))
                    .unwrap_or_default();
                let weeks = r
                    .estimated_weeks
                    .map(|w| format!("{} weeks", w))
                    .unwrap_or_default();
                view! {
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body space-y-2">
                            <div class="flex items-center justify-between">
                                <h3 class="card-title">{r.skill_name}</h3>
                                <span class="badge badge-outline">{r.status.label()}</span>
                            </div>
                            <p class="text-sm opacity-70">{target} " " {weeks}</p>
                            <progress class="progress progress-primary w-full" value=r.progress.to_string() max="100"></progress>
                            <ul class="list-disc list-inside text-sm">
                                {r.milestones.into_iter().map(|m| view! { <li>{m}</li> }).collect_view()}
                            </ul>
                            <ProgressControl roadmap_id=r.id progress=r.progress notify=notify reload=reload />
                        </div>
                    </div>
                }
            })
            .collect_view()
            .into_any()
    };

    view! {
        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">{cards}</div>
        <RoadmapForm suggested_skills=view.suggested_skills levels=view.levels notify=notify reload=reload />
    }
}
