//! 页面视图模型
//!
//! 加载器把服务端记录整理成这里的结构，组件只负责渲染，不再做计算。

use serde_json::Value;
use skillpilot_shared::{
    CareerProgression, EmployeeReport, EmployeeSkill, EmployeeSummary, GapAnalysis, JobDescription,
    JobTitle, ProficiencyLevel, QuizQuestion, Roadmap, RoadmapStatus, Role,
};

use crate::navigation::Page;

pub const NOT_ASSIGNED: &str = "Not assigned";

/// 内容区当前显示的内容
#[derive(Debug, Clone, PartialEq)]
pub enum PageContent {
    Loading(String),
    ManagerDashboard(ManagerDashboard),
    EmployeeDashboard(EmployeeDashboard),
    Employees(Vec<EmployeeRow>),
    EmployeeReport(EmployeeReportView),
    JobTitles(JobTitlesView),
    JobDescriptions(JobDescriptionsView),
    GenerateQuiz(GenerateQuizView),
    MySkills(MySkillsView),
    GapAnalysis(GapSummary),
    TakeQuiz(QuizView),
    Roadmap(RoadmapView),
    /// 内联错误面板
    Error(String),
}

impl PageContent {
    /// 页面的加载占位文本
    pub fn loading(page: Page, role: Role) -> Self {
        let text = match page {
            Page::Dashboard if role.is_manager() => "Loading dashboard data",
            Page::Dashboard => "Loading your dashboard",
            Page::Employees => "Loading employees",
            Page::EmployeeReport(_) => "Loading employee report",
            Page::JobTitles => "Loading job titles",
            Page::JobDescriptions => "Loading job descriptions",
            Page::GenerateQuiz => "Loading quiz generator",
            Page::MySkills => "Loading your skills",
            Page::GapAnalysis => "Loading gap analysis",
            Page::TakeQuiz => "Loading quiz questions",
            Page::Roadmap => "Loading your roadmaps",
        };
        PageContent::Loading(text.to_string())
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PageContent::Loading(_))
    }
}

// =========================================================
// 仪表盘
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub job_title: String,
    pub experience: String,
    pub total_skills: u32,
    pub total_assessments: u32,
    pub active_roadmaps: u32,
}

impl From<&EmployeeSummary> for EmployeeRow {
    fn from(emp: &EmployeeSummary) -> Self {
        Self {
            id: emp.id,
            name: emp.name.clone(),
            email: emp.email.clone(),
            job_title: job_title_or_default(emp.job_title.as_deref()),
            experience: years(emp.years_of_experience),
            total_skills: emp.total_skills,
            total_assessments: emp.total_assessments,
            active_roadmaps: emp.active_roadmaps,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManagerDashboard {
    pub total_employees: usize,
    pub total_skills: u32,
    pub active_roadmaps: u32,
    pub employees: Vec<EmployeeRow>,
}

impl ManagerDashboard {
    pub fn from_employees(employees: &[EmployeeSummary]) -> Self {
        Self {
            total_employees: employees.len(),
            total_skills: employees.iter().map(|e| e.total_skills).sum(),
            active_roadmaps: employees.iter().map(|e| e.active_roadmaps).sum(),
            employees: employees.iter().map(EmployeeRow::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillCard {
    pub name: String,
    /// 如 `intermediate - 3 years`
    pub proficiency: String,
    pub verified: bool,
}

impl From<&EmployeeSkill> for SkillCard {
    fn from(skill: &EmployeeSkill) -> Self {
        Self {
            name: skill.skill_name.clone(),
            proficiency: format!(
                "{} - {}",
                skill.proficiency_level.as_str(),
                years(skill.years_of_experience)
            ),
            verified: skill.is_verified,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDashboard {
    pub skills_count: usize,
    pub active_roadmaps: usize,
    pub completed_roadmaps: usize,
    pub assessments_taken: usize,
    pub skills: Vec<SkillCard>,
}

impl EmployeeDashboard {
    pub fn build(skills: &[EmployeeSkill], roadmaps: &[Roadmap], results_taken: usize) -> Self {
        let count = |status: RoadmapStatus| roadmaps.iter().filter(|r| r.status == status).count();
        Self {
            skills_count: skills.len(),
            active_roadmaps: count(RoadmapStatus::InProgress),
            completed_roadmaps: count(RoadmapStatus::Completed),
            assessments_taken: results_taken,
            skills: skills.iter().map(SkillCard::from).collect(),
        }
    }
}

// =========================================================
// 员工报告
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct GapSummary {
    pub gap_percentage: String,
    pub missing_skills: String,
    pub priority_areas: String,
    pub matched_skills: String,
    pub skills_to_improve: String,
    /// "N weeks"；缺失或不为正时不显示
    pub estimated_time: Option<String>,
}

impl From<&GapAnalysis> for GapSummary {
    fn from(gap: &GapAnalysis) -> Self {
        Self {
            gap_percentage: format!("{}%", gap.gap_percentage),
            missing_skills: join_skill_entries(&gap.missing_skills),
            priority_areas: join_skill_entries(&gap.priority_areas),
            matched_skills: join_skill_entries(&gap.matched_skills),
            skills_to_improve: join_skill_entries(&gap.skills_to_improve),
            estimated_time: gap
                .estimated_time_to_bridge
                .filter(|w| w.is_finite() && *w > 0.0)
                .map(|w| format!("{} weeks", w)),
        }
    }
}

fn join_skill_entries(entries: &[Value]) -> String {
    entries.iter().map(skill_entry_text).collect::<Vec<_>>().join(", ")
}

/// 差距列表项的显示文本：对象取技能名，其余同里程碑
fn skill_entry_text(value: &Value) -> String {
    match value
        .get("skill")
        .or_else(|| value.get("skill_name"))
        .and_then(Value::as_str)
    {
        Some(skill) => skill.to_string(),
        None => milestone_text(value),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CareerSummary {
    pub current_role: String,
    pub next_role: Option<String>,
    pub readiness: String,
    pub skills_needed: String,
    pub timeline_months: u32,
}

impl From<&CareerProgression> for CareerSummary {
    fn from(career: &CareerProgression) -> Self {
        Self {
            current_role: career.current_job_title.clone(),
            next_role: career.recommended_next_role.clone(),
            readiness: format!("{}%", career.readiness_percentage),
            skills_needed: career.skills_needed.join(", "),
            timeline_months: career.estimated_timeline_months,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeReportView {
    pub name: String,
    pub email: String,
    pub job_title: String,
    pub experience: String,
    pub skills: Vec<SkillCard>,
    pub gap: Option<GapSummary>,
    pub career: Option<CareerSummary>,
}

impl EmployeeReportView {
    pub fn build(report: &EmployeeReport, career: Option<&CareerProgression>) -> Self {
        Self {
            name: report.user.name.clone(),
            email: report.user.email.clone(),
            job_title: job_title_or_default(report.user.job_title.as_deref()),
            experience: years(report.user.years_of_experience),
            skills: report.skills.iter().map(SkillCard::from).collect(),
            gap: report.gap_analysis.as_ref().map(GapSummary::from),
            career: career.map(CareerSummary::from),
        }
    }
}

// =========================================================
// 岗位管理
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct JobTitleRow {
    pub id: i64,
    pub title: String,
    pub level: i32,
    pub department: String,
    pub next_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobTitlesView {
    pub titles: Vec<JobTitleRow>,
}

impl JobTitlesView {
    pub fn build(titles: &[JobTitle]) -> Self {
        let rows = titles
            .iter()
            .map(|t| JobTitleRow {
                id: t.id,
                title: t.title.clone(),
                level: t.level,
                department: t.department.clone().unwrap_or_else(|| "-".to_string()),
                next_level: t.next_level_job_id.map(|id| title_name(titles, id)),
            })
            .collect();
        Self { titles: rows }
    }
}

/// 下拉框选项
#[derive(Debug, Clone, PartialEq)]
pub struct JobTitleOption {
    pub id: i64,
    pub title: String,
}

pub fn job_title_options(titles: &[JobTitle]) -> Vec<JobTitleOption> {
    titles
        .iter()
        .map(|t| JobTitleOption {
            id: t.id,
            title: t.title.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobDescriptionCard {
    pub id: i64,
    pub job_title: String,
    pub required_skills: String,
    pub required_tools: String,
    pub required_experience: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobDescriptionsView {
    pub job_titles: Vec<JobTitleOption>,
    pub descriptions: Vec<JobDescriptionCard>,
}

impl JobDescriptionsView {
    pub fn build(titles: &[JobTitle], descriptions: &[JobDescription]) -> Self {
        Self {
            job_titles: job_title_options(titles),
            descriptions: descriptions
                .iter()
                .map(|jd| JobDescriptionCard {
                    id: jd.id,
                    job_title: title_name(titles, jd.job_title_id),
                    required_skills: jd.required_skills.join(", "),
                    required_tools: jd.required_tools.join(", "),
                    required_experience: years(jd.required_years_of_experience),
                    description: jd.description.clone().filter(|d| !d.is_empty()),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateQuizView {
    pub job_titles: Vec<JobTitleOption>,
    pub levels: Vec<ProficiencyLevel>,
}

impl GenerateQuizView {
    pub fn build(titles: &[JobTitle]) -> Self {
        Self {
            job_titles: job_title_options(titles),
            levels: ProficiencyLevel::ALL.to_vec(),
        }
    }
}

// =========================================================
// 员工页面
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MySkillsView {
    pub skills: Vec<SkillCard>,
    pub levels: Vec<ProficiencyLevel>,
}

impl MySkillsView {
    pub fn build(skills: &[EmployeeSkill]) -> Self {
        Self {
            skills: skills.iter().map(SkillCard::from).collect(),
            levels: ProficiencyLevel::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizOption {
    pub key: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizQuestionView {
    pub id: i64,
    pub skill: String,
    pub text: String,
    pub options: Vec<QuizOption>,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizView {
    pub questions: Vec<QuizQuestionView>,
    pub attempts: usize,
}

impl QuizView {
    pub fn build(questions: &[QuizQuestion], attempts: usize) -> Self {
        Self {
            questions: questions
                .iter()
                .map(|q| QuizQuestionView {
                    id: q.id,
                    skill: q.skill_name.clone(),
                    text: q.question_text.clone(),
                    options: q
                        .options
                        .iter()
                        .map(|(key, text)| QuizOption {
                            key: key.clone(),
                            text: text.clone(),
                        })
                        .collect(),
                    points: q.points,
                })
                .collect(),
            attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoadmapCard {
    pub id: i64,
    pub skill_name: String,
    pub status: RoadmapStatus,
    pub progress: f64,
    pub target_level: Option<ProficiencyLevel>,
    pub estimated_weeks: Option<u32>,
    pub milestones: Vec<String>,
}

impl From<&Roadmap> for RoadmapCard {
    fn from(r: &Roadmap) -> Self {
        Self {
            id: r.id,
            skill_name: r.skill_name.clone(),
            status: r.status,
            progress: r.progress_percentage,
            target_level: r.target_level,
            estimated_weeks: r.estimated_completion_weeks,
            milestones: r.milestones.iter().map(milestone_text).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoadmapView {
    pub roadmaps: Vec<RoadmapCard>,
    /// 可以生成路线的技能：仅来自已提交的技能，已排序去重
    pub suggested_skills: Vec<String>,
    pub levels: Vec<ProficiencyLevel>,
}

impl RoadmapView {
    pub fn build(roadmaps: &[Roadmap], suggested_skills: Vec<String>) -> Self {
        Self {
            roadmaps: roadmaps.iter().map(RoadmapCard::from).collect(),
            suggested_skills,
            levels: ProficiencyLevel::ALL.to_vec(),
        }
    }
}

// =========================================================
// 格式化辅助
// =========================================================

pub fn years(value: f64) -> String {
    format!("{} years", value)
}

fn job_title_or_default(title: Option<&str>) -> String {
    match title {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => NOT_ASSIGNED.to_string(),
    }
}

fn title_name(titles: &[JobTitle], id: i64) -> String {
    titles
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.title.clone())
        .unwrap_or_else(|| format!("#{}", id))
}

/// 里程碑是自由格式的 JSON：字符串原样显示，对象取标题类字段
pub fn milestone_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(obj) => {
            let title = ["title", "milestone", "goal", "name"]
                .iter()
                .find_map(|k| obj.get(*k).and_then(Value::as_str));
            let week = obj.get("week").and_then(Value::as_u64);
            match (week, title) {
                (Some(w), Some(t)) => format!("Week {}: {}", w, t),
                (None, Some(t)) => t.to_string(),
                _ => value.to_string(),
            }
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary(id: i64, skills: u32, roadmaps: u32, title: Option<&str>) -> EmployeeSummary {
        serde_json::from_value(json!({
            "id": id, "name": format!("E{}", id), "email": "e@example.com",
            "job_title": title, "years_of_experience": 2.5,
            "total_skills": skills, "total_assessments": 1, "active_roadmaps": roadmaps
        }))
        .unwrap()
    }

    #[test]
    fn manager_totals_are_sums() {
        let employees = vec![
            summary(1, 4, 1, Some("Engineer")),
            summary(2, 6, 2, None),
            summary(3, 0, 0, Some("")),
        ];

        let dash = ManagerDashboard::from_employees(&employees);

        assert_eq!(dash.total_employees, 3);
        assert_eq!(dash.total_skills, 10);
        assert_eq!(dash.active_roadmaps, 3);
        assert_eq!(dash.employees[1].job_title, NOT_ASSIGNED);
        assert_eq!(dash.employees[2].job_title, NOT_ASSIGNED);
        assert_eq!(dash.employees[0].experience, "2.5 years");
    }

    #[test]
    fn employee_dashboard_counts_roadmaps_by_status() {
        let roadmaps: Vec<Roadmap> = serde_json::from_value(json!([
            {"id": 1, "skill_name": "Rust", "status": "in_progress"},
            {"id": 2, "skill_name": "SQL", "status": "completed"},
            {"id": 3, "skill_name": "Go", "status": "in_progress"},
            {"id": 4, "skill_name": "K8s", "status": "not_started"}
        ]))
        .unwrap();
        let skills: Vec<EmployeeSkill> = serde_json::from_value(json!([
            {"skill_name": "Rust", "proficiency_level": "intermediate", "years_of_experience": 3}
        ]))
        .unwrap();

        let dash = EmployeeDashboard::build(&skills, &roadmaps, 5);

        assert_eq!(dash.skills_count, 1);
        assert_eq!(dash.active_roadmaps, 2);
        assert_eq!(dash.completed_roadmaps, 1);
        assert_eq!(dash.assessments_taken, 5);
        assert_eq!(dash.skills[0].proficiency, "intermediate - 3 years");
    }

    #[test]
    fn job_titles_resolve_next_level_names() {
        let titles: Vec<JobTitle> = serde_json::from_value(json!([
            {"id": 1, "title": "Junior", "level": 1, "next_level_job_id": 2},
            {"id": 2, "title": "Senior", "level": 2, "department": "Engineering", "next_level_job_id": 9}
        ]))
        .unwrap();

        let view = JobTitlesView::build(&titles);

        assert_eq!(view.titles[0].next_level.as_deref(), Some("Senior"));
        assert_eq!(view.titles[0].department, "-");
        assert_eq!(view.titles[1].next_level.as_deref(), Some("#9"));
    }

    #[test]
    fn milestones_render_from_strings_and_objects() {
        assert_eq!(milestone_text(&json!("Read the book")), "Read the book");
        assert_eq!(
            milestone_text(&json!({"week": 2, "title": "Ownership"})),
            "Week 2: Ownership"
        );
        assert_eq!(milestone_text(&json!({"goal": "Ship it"})), "Ship it");
        assert_eq!(milestone_text(&json!(3)), "3");
    }

    #[test]
    fn gap_summary_accepts_object_entries_and_fractional_weeks() {
        let gap: GapAnalysis = serde_json::from_value(json!({
            "gap_percentage": 40,
            "missing_skills": ["Go"],
            "skills_to_improve": [
                {"skill": "SQL", "current_level": "beginner", "required_level": "advanced"},
                {"skill_name": "Rust"},
                "Docker"
            ],
            "estimated_time_to_bridge": 8.5
        }))
        .unwrap();

        let summary = GapSummary::from(&gap);

        assert_eq!(summary.skills_to_improve, "SQL, Rust, Docker");
        assert_eq!(summary.missing_skills, "Go");
        assert_eq!(summary.estimated_time.as_deref(), Some("8.5 weeks"));
    }

    #[test]
    fn gap_summary_hides_missing_or_zero_weeks() {
        let none = GapSummary::from(&GapAnalysis::default());
        assert!(none.estimated_time.is_none());

        let zero: GapAnalysis =
            serde_json::from_value(json!({"estimated_time_to_bridge": 0})).unwrap();
        assert!(GapSummary::from(&zero).estimated_time.is_none());
    }
}
