use std::future::Future;

use skillpilot_shared::Role;
use skillpilot_shared::protocol::Reply;

use crate::api::SkillPilotApi;
use crate::error::{AppError, AppResult};
use crate::navigation::Page;
use crate::views::{
    EmployeeDashboard, EmployeeReportView, EmployeeRow, GapSummary, GenerateQuizView,
    JobDescriptionsView, JobTitlesView, ManagerDashboard, MySkillsView, PageContent, QuizView,
    RoadmapView,
};

// =========================================================
// 页面加载器
// =========================================================

/// 加载页面内容；任何失败都转换为内联错误面板
pub async fn load_page(api: &SkillPilotApi, role: Role, page: Page) -> PageContent {
    let result = match page {
        Page::Dashboard if role.is_manager() => manager_dashboard(api).await,
        Page::Dashboard => employee_dashboard(api).await,
        Page::Employees => employees(api).await,
        Page::EmployeeReport(id) => employee_report(api, id).await,
        Page::JobTitles => job_titles(api).await,
        Page::JobDescriptions => job_descriptions(api).await,
        Page::GenerateQuiz => generate_quiz(api).await,
        Page::MySkills => my_skills(api).await,
        Page::GapAnalysis => gap_analysis(api).await,
        Page::TakeQuiz => take_quiz(api).await,
        Page::Roadmap => roadmap(api).await,
    };

    result.unwrap_or_else(|err| {
        crate::log_error!("{} error: {}", page.title(), err);
        PageContent::Error(panel_message(page, &err))
    })
}

/// 错误面板文本
///
/// 仪表盘与员工相关页面只显示通用文本；其它页面优先显示服务端的 detail。
pub fn panel_message(page: Page, err: &AppError) -> String {
    let generic = match page {
        Page::Dashboard => "Failed to load dashboard data",
        Page::Employees => "Failed to load employees",
        Page::EmployeeReport(_) => "Failed to load employee report",
        Page::JobTitles | Page::GenerateQuiz => "Failed to load job titles",
        Page::JobDescriptions => "Failed to load job descriptions",
        Page::MySkills => "Failed to load your skills",
        Page::GapAnalysis => "Failed to load gap analysis",
        Page::TakeQuiz => "Failed to load quiz questions",
        Page::Roadmap => "Failed to load your roadmaps",
    };
    match (page, err.api_message()) {
        (Page::Dashboard | Page::Employees | Page::EmployeeReport(_), _) | (_, None) => {
            generic.to_string()
        }
        (_, Some(detail)) => detail.to_string(),
    }
}

/// 等待响应并取出数据；`{"detail": ...}` 载荷视为失败
async fn fetch<T>(reply: impl Future<Output = AppResult<Reply<T>>>) -> AppResult<T> {
    Ok(reply.await?.into_result()?)
}

async fn manager_dashboard(api: &SkillPilotApi) -> AppResult<PageContent> {
    let employees = fetch(api.employees()).await?;
    Ok(PageContent::ManagerDashboard(ManagerDashboard::from_employees(&employees)))
}

async fn employee_dashboard(api: &SkillPilotApi) -> AppResult<PageContent> {
    let (skills, roadmaps, results) = futures::try_join!(
        fetch(api.my_skills()),
        fetch(api.my_roadmaps()),
        fetch(api.my_results()),
    )?;
    Ok(PageContent::EmployeeDashboard(EmployeeDashboard::build(
        &skills,
        &roadmaps,
        results.len(),
    )))
}

async fn employees(api: &SkillPilotApi) -> AppResult<PageContent> {
    let employees = fetch(api.employees()).await?;
    Ok(PageContent::Employees(employees.iter().map(EmployeeRow::from).collect()))
}

async fn employee_report(api: &SkillPilotApi, employee_id: i64) -> AppResult<PageContent> {
    // 职业发展建议是附加信息：员工未分配岗位时服务端返回 detail，此时不显示该卡片
    let (report, career) = futures::join!(
        fetch(api.employee_report(employee_id)),
        fetch(api.career_progression(employee_id)),
    );
    let report = report?;
    let career = match career {
        Ok(career) => Some(career),
        Err(e) => {
            crate::log_warn!("Career progression unavailable: {}", e);
            None
        }
    };
    Ok(PageContent::EmployeeReport(EmployeeReportView::build(
        &report,
        career.as_ref(),
    )))
}

async fn job_titles(api: &SkillPilotApi) -> AppResult<PageContent> {
    let titles = fetch(api.job_titles()).await?;
    Ok(PageContent::JobTitles(JobTitlesView::build(&titles)))
}

async fn job_descriptions(api: &SkillPilotApi) -> AppResult<PageContent> {
    let (titles, descriptions) =
        futures::try_join!(fetch(api.job_titles()), fetch(api.job_descriptions(None)))?;
    Ok(PageContent::JobDescriptions(JobDescriptionsView::build(
        &titles,
        &descriptions,
    )))
}

async fn generate_quiz(api: &SkillPilotApi) -> AppResult<PageContent> {
    let titles = fetch(api.job_titles()).await?;
    Ok(PageContent::GenerateQuiz(GenerateQuizView::build(&titles)))
}

async fn my_skills(api: &SkillPilotApi) -> AppResult<PageContent> {
    let skills = fetch(api.my_skills()).await?;
    Ok(PageContent::MySkills(MySkillsView::build(&skills)))
}

async fn gap_analysis(api: &SkillPilotApi) -> AppResult<PageContent> {
    let gap = fetch(api.gap_analysis()).await?;
    Ok(PageContent::GapAnalysis(GapSummary::from(&gap)))
}

async fn take_quiz(api: &SkillPilotApi) -> AppResult<PageContent> {
    let job_title_id = api.session().user().and_then(|u| u.job_title_id());
    let (questions, results) = futures::try_join!(
        fetch(api.quiz_questions(job_title_id, None)),
        fetch(api.my_results()),
    )?;
    Ok(PageContent::TakeQuiz(QuizView::build(&questions, results.len())))
}

async fn roadmap(api: &SkillPilotApi) -> AppResult<PageContent> {
    let (roadmaps, skills) =
        futures::try_join!(fetch(api.my_roadmaps()), fetch(api.my_skills()))?;
    let mut suggested: Vec<String> = skills.into_iter().map(|s| s.skill_name).collect();
    suggested.sort();
    suggested.dedup();
    Ok(PageContent::Roadmap(RoadmapView::build(&roadmaps, suggested)))
}
