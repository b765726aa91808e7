use crate::{
    CareerProgression, EmployeeReport, EmployeeSkill, EmployeeSummary, GapAnalysis,
    GenerateQuiz, GeneratedQuiz, JobDescription, JobTitle, LoginResponse, NewJobDescription,
    NewJobTitle, ProficiencyLevel, ProgressUpdate, QuizAnswer, QuizQuestion, QuizSubmitSummary,
    Roadmap, Role, SkillSubmission, AssessmentResult,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the bearer token is attached.
    const AUTHENTICATED: bool = true;
    /// Whether non-2xx statuses are surfaced as errors instead of parsed payloads.
    const STRICT_STATUS: bool = false;

    /// The URL path relative to the API base, including path parameters.
    fn path(&self) -> String;

    /// Query parameters; `None` values are omitted from the URL.
    fn query(&self) -> Vec<(&'static str, Option<String>)> {
        Vec::new()
    }

    /// Only POST endpoints carry a JSON body.
    fn has_body(&self) -> bool {
        Self::METHOD == HttpMethod::Post
    }
}

// =========================================================
// Response envelope
// =========================================================

/// Error payload returned by the server, e.g. `{"detail": "Incorrect email or password"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDetail {
    pub detail: Value,
}

impl ApiDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            detail: Value::String(message.into()),
        }
    }

    /// Human-readable text. Validation errors arrive as a list of `{msg}` objects.
    pub fn message(&self) -> String {
        match &self.detail {
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.get("msg")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| item.to_string())
                })
                .collect::<Vec<_>>()
                .join("; "),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// A response body as the server sent it: either the expected record or an error payload.
///
/// The HTTP status is not consulted; callers decide what an error payload means.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Data(T),
    Detail(ApiDetail),
}

impl<T: DeserializeOwned> Reply<T> {
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(body)?;
        if let Some(detail) = value.as_object().and_then(|obj| obj.get("detail")) {
            return Ok(Reply::Detail(ApiDetail {
                detail: detail.clone(),
            }));
        }
        serde_json::from_value(value).map(Reply::Data)
    }
}

impl<T> Reply<T> {
    pub fn into_result(self) -> Result<T, ApiDetail> {
        match self {
            Reply::Data(data) => Ok(data),
            Reply::Detail(detail) => Err(detail),
        }
    }

    pub fn data(self) -> Option<T> {
        match self {
            Reply::Data(data) => Some(data),
            Reply::Detail(_) => None,
        }
    }

    pub fn is_detail(&self) -> bool {
        matches!(self, Reply::Detail(_))
    }
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/auth/login".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl ApiRequest for RegisterRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/auth/register".to_string()
    }
}

// =========================================================
// Jobs
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListJobTitlesRequest;

impl ApiRequest for ListJobTitlesRequest {
    type Response = Vec<JobTitle>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/job/titles".to_string()
    }
}

impl ApiRequest for NewJobTitle {
    type Response = JobTitle;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/job/titles".to_string()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListJobDescriptionsRequest {
    #[serde(skip)]
    pub job_title_id: Option<i64>,
}

impl ApiRequest for ListJobDescriptionsRequest {
    type Response = Vec<JobDescription>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/job/descriptions".to_string()
    }

    fn query(&self) -> Vec<(&'static str, Option<String>)> {
        vec![("job_title_id", self.job_title_id.map(|id| id.to_string()))]
    }
}

impl ApiRequest for NewJobDescription {
    type Response = JobDescription;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/job/descriptions".to_string()
    }
}

// =========================================================
// Assessment
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitSkillsRequest {
    pub skills: Vec<SkillSubmission>,
}

impl ApiRequest for SubmitSkillsRequest {
    type Response = Vec<EmployeeSkill>;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/assessment/submit-skills".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MySkillsRequest;

impl ApiRequest for MySkillsRequest {
    type Response = Vec<EmployeeSkill>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/assessment/my-skills".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GapAnalysisRequest;

impl ApiRequest for GapAnalysisRequest {
    type Response = GapAnalysis;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/assessment/gap-analysis".to_string()
    }
}

// =========================================================
// Quiz
// =========================================================

impl ApiRequest for GenerateQuiz {
    type Response = GeneratedQuiz;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/quiz/generate".to_string()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QuizQuestionsRequest {
    #[serde(skip)]
    pub job_title_id: Option<i64>,
    #[serde(skip)]
    pub skill_name: Option<String>,
}

impl ApiRequest for QuizQuestionsRequest {
    type Response = Vec<QuizQuestion>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/quiz/questions".to_string()
    }

    fn query(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("job_title_id", self.job_title_id.map(|id| id.to_string())),
            (
                "skill_name",
                self.skill_name.clone().filter(|name| !name.is_empty()),
            ),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitQuizRequest {
    pub answers: Vec<QuizAnswer>,
}

impl ApiRequest for SubmitQuizRequest {
    type Response = QuizSubmitSummary;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/quiz/submit".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MyResultsRequest;

impl ApiRequest for MyResultsRequest {
    type Response = Vec<AssessmentResult>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/quiz/results".to_string()
    }
}

// =========================================================
// Roadmap
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRoadmapRequest {
    pub skill_name: String,
    pub target_level: ProficiencyLevel,
}

impl ApiRequest for GenerateRoadmapRequest {
    type Response = Roadmap;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/roadmap/generate".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MyRoadmapsRequest;

impl ApiRequest for MyRoadmapsRequest {
    type Response = Vec<Roadmap>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/roadmap/my-roadmaps".to_string()
    }
}

/// Progress travels in the query string; the request has no body.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRoadmapProgressRequest {
    #[serde(skip)]
    pub roadmap_id: i64,
    #[serde(skip)]
    pub progress_percentage: f64,
}

impl ApiRequest for UpdateRoadmapProgressRequest {
    type Response = ProgressUpdate;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/roadmap/roadmaps/{}/progress", self.roadmap_id)
    }

    fn query(&self) -> Vec<(&'static str, Option<String>)> {
        vec![(
            "progress_percentage",
            Some(self.progress_percentage.to_string()),
        )]
    }
}

// =========================================================
// Reports (OD Manager)
// =========================================================

/// List employees. The only endpoint whose HTTP status is checked by default.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEmployeesRequest;

impl ApiRequest for ListEmployeesRequest {
    type Response = Vec<EmployeeSummary>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const STRICT_STATUS: bool = true;

    fn path(&self) -> String {
        "/reports/employees".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmployeeReportRequest {
    #[serde(skip)]
    pub employee_id: i64,
}

impl ApiRequest for EmployeeReportRequest {
    type Response = EmployeeReport;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/reports/employee/{}", self.employee_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CareerProgressionRequest {
    #[serde(skip)]
    pub employee_id: i64,
}

impl ApiRequest for CareerProgressionRequest {
    type Response = CareerProgression;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/reports/career-progression/{}", self.employee_id)
    }
}
