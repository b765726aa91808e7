use std::sync::Arc;

use skillpilot_shared::protocol::{
    ApiRequest, CareerProgressionRequest, EmployeeReportRequest, GapAnalysisRequest,
    GenerateRoadmapRequest, ListEmployeesRequest, ListJobDescriptionsRequest,
    ListJobTitlesRequest, LoginRequest, MyResultsRequest, MyRoadmapsRequest, MySkillsRequest,
    QuizQuestionsRequest, RegisterRequest, Reply, SubmitQuizRequest, SubmitSkillsRequest,
    UpdateRoadmapProgressRequest,
};
use skillpilot_shared::{
    AssessmentResult, CONTENT_TYPE_JSON, CareerProgression, EmployeeReport, EmployeeSkill,
    EmployeeSummary, GapAnalysis, GenerateQuiz, GeneratedQuiz, HEADER_CONTENT_TYPE,
    JobDescription, JobTitle, LoginResponse, NewJobDescription, NewJobTitle, ProficiencyLevel,
    ProgressUpdate, QuizAnswer, QuizQuestion, QuizSubmitSummary, Roadmap, Role, SkillSubmission,
};

use crate::config::{AppConfig, AuthFailurePolicy};
use crate::error::{AppError, AppResult};
use crate::request::{HttpClient, HttpRequest};
use crate::session::SessionStore;

// =========================================================
// API 客户端
// =========================================================

/// 按端点划分的 API 客户端
///
/// 除员工列表外，端点不检查 HTTP 状态码：响应体原样解析为 [`Reply`]，
/// 由调用方决定 `{"detail": ...}` 载荷如何展示。
#[derive(Clone)]
pub struct SkillPilotApi {
    base_url: String,
    policy: AuthFailurePolicy,
    session: SessionStore,
    http: Arc<dyn HttpClient>,
}

impl SkillPilotApi {
    pub fn new(config: &AppConfig, session: SessionStore, http: Arc<dyn HttpClient>) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            policy: config.auth_failure_policy,
            session,
            http,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 拼接路径与查询参数，值为 None 的参数被省略
    pub fn build_url<R: ApiRequest>(&self, req: &R) -> String {
        let url = self.url(&req.path());
        let params: Vec<(&str, String)> = req
            .query()
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect();
        if params.is_empty() {
            return url;
        }

        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &params {
            query.append_pair(k, v);
        }
        format!("{}?{}", url, query.finish())
    }

    fn build_request<R: ApiRequest>(&self, req: &R) -> AppResult<HttpRequest> {
        let mut http_req = HttpRequest::new(&self.build_url(req), R::METHOD);

        if R::AUTHENTICATED {
            for (k, v) in self.session.auth_headers() {
                http_req = http_req.with_header(&k, &v);
            }
        } else {
            http_req = http_req.with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);
        }

        if req.has_body() {
            let body = serde_json::to_string(req).map_err(|e| {
                AppError::serialization(e.to_string()).in_op_with("api.encode", req.path())
            })?;
            http_req = http_req.with_body(body);
        }
        Ok(http_req)
    }

    fn clears_session_on_401<R: ApiRequest>(&self) -> bool {
        R::AUTHENTICATED
            && (R::STRICT_STATUS || self.policy == AuthFailurePolicy::AllEndpoints)
    }

    /// 发送任意端点请求
    pub async fn send<R: ApiRequest>(&self, req: &R) -> AppResult<Reply<R::Response>> {
        let path = req.path();
        let http_req = self.build_request(req)?;
        let resp = self
            .http
            .send(http_req)
            .await
            .map_err(|e| e.in_op_with("api.send", &path))?;

        if resp.status == 401 && self.clears_session_on_401::<R>() {
            crate::log_error!("Unauthorized - token may be invalid ({})", path);
            self.session.logout();
            return Err(AppError::unauthorized().in_op_with("api.send", &path));
        }

        if R::STRICT_STATUS && !resp.is_success() {
            crate::log_error!("API error: {} {}", resp.status, path);
            return Err(AppError::http(resp.status, format!("API error: {}", resp.status))
                .in_op_with("api.send", &path));
        }

        Reply::from_json(&resp.body)
            .map_err(|e| AppError::parse(e.to_string()).in_op_with("api.decode", &path))
    }

    // --- Auth ---

    pub async fn login(&self, email: &str, password: &str) -> AppResult<Reply<LoginResponse>> {
        self.send(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> AppResult<Reply<LoginResponse>> {
        self.send(&RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
        })
        .await
    }

    // --- Jobs ---

    pub async fn job_titles(&self) -> AppResult<Reply<Vec<JobTitle>>> {
        self.send(&ListJobTitlesRequest).await
    }

    pub async fn create_job_title(&self, data: &NewJobTitle) -> AppResult<Reply<JobTitle>> {
        self.send(data).await
    }

    pub async fn job_descriptions(
        &self,
        job_title_id: Option<i64>,
    ) -> AppResult<Reply<Vec<JobDescription>>> {
        self.send(&ListJobDescriptionsRequest { job_title_id }).await
    }

    pub async fn create_job_description(
        &self,
        data: &NewJobDescription,
    ) -> AppResult<Reply<JobDescription>> {
        self.send(data).await
    }

    // --- Assessment ---

    pub async fn submit_skills(
        &self,
        skills: Vec<SkillSubmission>,
    ) -> AppResult<Reply<Vec<EmployeeSkill>>> {
        self.send(&SubmitSkillsRequest { skills }).await
    }

    pub async fn my_skills(&self) -> AppResult<Reply<Vec<EmployeeSkill>>> {
        self.send(&MySkillsRequest).await
    }

    pub async fn gap_analysis(&self) -> AppResult<Reply<GapAnalysis>> {
        self.send(&GapAnalysisRequest).await
    }

    // --- Quiz ---

    pub async fn generate_quiz(&self, data: &GenerateQuiz) -> AppResult<Reply<GeneratedQuiz>> {
        self.send(data).await
    }

    pub async fn quiz_questions(
        &self,
        job_title_id: Option<i64>,
        skill_name: Option<&str>,
    ) -> AppResult<Reply<Vec<QuizQuestion>>> {
        self.send(&QuizQuestionsRequest {
            job_title_id,
            skill_name: skill_name.map(str::to_string),
        })
        .await
    }

    pub async fn submit_quiz(&self, answers: Vec<QuizAnswer>) -> AppResult<Reply<QuizSubmitSummary>> {
        self.send(&SubmitQuizRequest { answers }).await
    }

    pub async fn my_results(&self) -> AppResult<Reply<Vec<AssessmentResult>>> {
        self.send(&MyResultsRequest).await
    }

    // --- Roadmap ---

    pub async fn generate_roadmap(
        &self,
        skill_name: &str,
        target_level: ProficiencyLevel,
    ) -> AppResult<Reply<Roadmap>> {
        self.send(&GenerateRoadmapRequest {
            skill_name: skill_name.to_string(),
            target_level,
        })
        .await
    }

    pub async fn my_roadmaps(&self) -> AppResult<Reply<Vec<Roadmap>>> {
        self.send(&MyRoadmapsRequest).await
    }

    pub async fn update_roadmap_progress(
        &self,
        roadmap_id: i64,
        progress_percentage: f64,
    ) -> AppResult<Reply<ProgressUpdate>> {
        self.send(&UpdateRoadmapProgressRequest {
            roadmap_id,
            progress_percentage,
        })
        .await
    }

    // --- Reports ---

    /// 员工列表：401 清除会话，其它非 2xx 返回 [`AppError::http`]
    pub async fn employees(&self) -> AppResult<Reply<Vec<EmployeeSummary>>> {
        self.send(&ListEmployeesRequest).await
    }

    pub async fn employee_report(&self, employee_id: i64) -> AppResult<Reply<EmployeeReport>> {
        self.send(&EmployeeReportRequest { employee_id }).await
    }

    pub async fn career_progression(
        &self,
        employee_id: i64,
    ) -> AppResult<Reply<CareerProgression>> {
        self.send(&CareerProgressionRequest { employee_id }).await
    }
}

#[cfg(test)]
mod tests;
