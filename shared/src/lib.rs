use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 浏览器存储中保存 Bearer Token 的键
pub const TOKEN_KEY: &str = "skillpilot_token";
/// 浏览器存储中保存用户资料 (JSON) 的键
pub const USER_KEY: &str = "skillpilot_user";

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

// =========================================================
// 用户与会话 (Users & Session)
// =========================================================

/// 用户角色，决定导航菜单与默认视图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "OD_MANAGER")]
    OdManager,
    #[serde(rename = "EMPLOYEE")]
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::OdManager => "OD_MANAGER",
            Role::Employee => "EMPLOYEE",
        }
    }

    /// 展示用名称：`OD_MANAGER` -> `OD MANAGER`
    pub fn label(&self) -> String {
        self.as_str().replacen('_', " ", 1)
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, Role::OdManager)
    }
}

/// 登录后保存在本地的用户资料
///
/// 服务端返回的其余字段（如 `job_title_id`）原样保存在 `extra` 中，
/// 保证写回存储时不丢字段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn job_title_id(&self) -> Option<i64> {
        self.extra.get("job_title_id").and_then(Value::as_i64)
    }
}

/// 已认证会话：令牌 + 用户资料
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// `/auth/login` 与 `/auth/register` 的响应体
///
/// 两个字段都可能缺失：调用方必须检查 `access_token` 是否存在。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

// =========================================================
// 技能与评估 (Skills & Assessment)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ProficiencyLevel {
    pub const ALL: [ProficiencyLevel; 4] = [
        ProficiencyLevel::Beginner,
        ProficiencyLevel::Intermediate,
        ProficiencyLevel::Advanced,
        ProficiencyLevel::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "beginner",
            ProficiencyLevel::Intermediate => "intermediate",
            ProficiencyLevel::Advanced => "advanced",
            ProficiencyLevel::Expert => "expert",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == value)
    }
}

/// 员工提交的单项技能
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSubmission {
    pub skill_name: String,
    pub proficiency_level: ProficiencyLevel,
    pub years_of_experience: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_assessment_score: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSkill {
    #[serde(default)]
    pub id: Option<i64>,
    pub skill_name: String,
    pub proficiency_level: ProficiencyLevel,
    #[serde(default)]
    pub years_of_experience: f64,
    #[serde(default)]
    pub self_assessment_score: Option<i32>,
    #[serde(default)]
    pub is_verified: bool,
}

/// 服务端计算的技能差距分析
///
/// 列表项可能是技能名，也可能是对象（如 `{"skill": .., "current_level": ..}`），
/// 因此按任意 JSON 保存；估算周数可能带小数。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    #[serde(default)]
    pub gap_percentage: f64,
    #[serde(default)]
    pub missing_skills: Vec<Value>,
    #[serde(default)]
    pub priority_areas: Vec<Value>,
    #[serde(default)]
    pub matched_skills: Vec<Value>,
    #[serde(default)]
    pub skills_to_improve: Vec<Value>,
    #[serde(default)]
    pub estimated_time_to_bridge: Option<f64>,
}

// =========================================================
// 岗位 (Jobs)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobTitle {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub next_level_job_id: Option<i64>,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewJobTitle {
    pub title: String,
    pub level: i32,
    #[serde(default)]
    pub next_level_job_id: Option<i64>,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub id: i64,
    pub job_title_id: i64,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub required_tools: Vec<String>,
    #[serde(default)]
    pub required_years_of_experience: f64,
    #[serde(default)]
    pub competency_weightage: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub expected_proficiency_levels: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub preferred_skills: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewJobDescription {
    pub job_title_id: i64,
    pub required_skills: Vec<String>,
    pub required_tools: Vec<String>,
    pub required_years_of_experience: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =========================================================
// 测验 (Quiz)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateQuiz {
    pub job_title_id: i64,
    pub skill_name: String,
    pub experience_level_years: f64,
    pub difficulty_level: ProficiencyLevel,
    pub num_questions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub id: i64,
    pub question_text: String,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuiz {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub questions: Vec<GeneratedQuestion>,
}

/// 员工可见的测验题目（不含正确答案）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: i64,
    #[serde(default)]
    pub job_title_id: Option<i64>,
    pub skill_name: String,
    pub question_text: String,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default)]
    pub difficulty_level: Option<ProficiencyLevel>,
    #[serde(default)]
    pub experience_level_years: Option<f64>,
    #[serde(default)]
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub quiz_question_id: i64,
    pub selected_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken_seconds: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizSubmitSummary {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub total_score: u32,
    #[serde(default)]
    pub total_possible_points: u32,
    #[serde(default)]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub id: i64,
    pub quiz_question_id: i64,
    #[serde(default)]
    pub selected_answer: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub points_earned: u32,
    #[serde(default)]
    pub attempted_at: Option<NaiveDateTime>,
}

// =========================================================
// 学习路线 (Roadmaps)
// =========================================================

/// 学习路线状态
///
/// 服务端新增的状态值反序列化为 `Unknown`，不会导致整张列表解析失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum RoadmapStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Paused,
    Unknown,
}

impl From<String> for RoadmapStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "not_started" => RoadmapStatus::NotStarted,
            "in_progress" => RoadmapStatus::InProgress,
            "completed" => RoadmapStatus::Completed,
            "paused" => RoadmapStatus::Paused,
            _ => RoadmapStatus::Unknown,
        }
    }
}

impl RoadmapStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RoadmapStatus::NotStarted => "Not started",
            RoadmapStatus::InProgress => "In progress",
            RoadmapStatus::Completed => "Completed",
            RoadmapStatus::Paused => "Paused",
            RoadmapStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    pub id: i64,
    pub skill_name: String,
    #[serde(default)]
    pub current_level: Option<ProficiencyLevel>,
    #[serde(default)]
    pub target_level: Option<ProficiencyLevel>,
    #[serde(default)]
    pub gap_percentage: Option<f64>,
    #[serde(default)]
    pub milestones: Vec<Value>,
    #[serde(default)]
    pub estimated_completion_weeks: Option<u32>,
    #[serde(default)]
    pub status: RoadmapStatus,
    #[serde(default)]
    pub progress_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub roadmap: Option<Roadmap>,
}

// =========================================================
// 报表 (Reports)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub job_title_id: Option<i64>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub years_of_experience: f64,
    #[serde(default)]
    pub total_skills: u32,
    #[serde(default)]
    pub total_assessments: u32,
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub active_roadmaps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportUser {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub job_title_id: Option<i64>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub years_of_experience: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeReport {
    pub user: ReportUser,
    #[serde(default)]
    pub skills: Vec<EmployeeSkill>,
    #[serde(default)]
    pub gap_analysis: Option<GapAnalysis>,
    #[serde(default)]
    pub roadmaps: Vec<Roadmap>,
    #[serde(default)]
    pub assessment_score: f64,
    #[serde(default)]
    pub total_assessments: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerProgression {
    #[serde(default)]
    pub current_job_title: String,
    #[serde(default)]
    pub recommended_next_role: Option<String>,
    #[serde(default)]
    pub readiness_percentage: f64,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub skills_needed: Vec<String>,
    #[serde(default)]
    pub estimated_timeline_months: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_profile_keeps_unknown_fields() {
        let raw = r#"{"id":7,"name":"Ada","email":"ada@example.com","role":"EMPLOYEE","job_title_id":3,"years_of_experience":4.5}"#;
        let user: UserProfile = serde_json::from_str(raw).unwrap();

        assert_eq!(user.role, Role::Employee);
        assert_eq!(user.job_title_id(), Some(3));

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["years_of_experience"], 4.5);
        assert_eq!(back["role"], "EMPLOYEE");
    }

    #[test]
    fn role_label_replaces_underscore() {
        assert_eq!(Role::OdManager.label(), "OD MANAGER");
        assert_eq!(Role::Employee.label(), "EMPLOYEE");
    }

    #[test]
    fn unknown_roadmap_status_does_not_fail() {
        let raw = r#"[{"id":1,"skill_name":"Rust","status":"archived","progress_percentage":10},
                      {"id":2,"skill_name":"Go","status":"in_progress","progress_percentage":55.5}]"#;
        let roadmaps: Vec<Roadmap> = serde_json::from_str(raw).unwrap();

        assert_eq!(roadmaps[0].status, RoadmapStatus::Unknown);
        assert_eq!(roadmaps[1].status, RoadmapStatus::InProgress);
        assert_eq!(roadmaps[1].progress_percentage, 55.5);
    }

    #[test]
    fn assessment_result_parses_naive_timestamp() {
        let raw = r#"{"id":1,"quiz_question_id":9,"selected_answer":"B","is_correct":true,
                      "points_earned":10,"attempted_at":"2024-03-01T09:30:15.123456"}"#;
        let result: AssessmentResult = serde_json::from_str(raw).unwrap();

        let at = result.attempted_at.unwrap();
        assert_eq!(at.format("%Y-%m-%d %H:%M").to_string(), "2024-03-01 09:30");
    }

    #[test]
    fn proficiency_parse_matches_wire_names() {
        assert_eq!(
            ProficiencyLevel::parse("advanced"),
            Some(ProficiencyLevel::Advanced)
        );
        assert_eq!(ProficiencyLevel::parse("guru"), None);
    }
}
