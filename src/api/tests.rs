use super::*;
use crate::error::AppErrorKind;
use crate::request::HttpMethod;
use crate::testing::{Harness, employee, manager};
use serde_json::json;

#[tokio::test]
async fn authenticated_request_carries_bearer_and_json_headers() {
    let h = Harness::signed_in(employee());
    h.http.on_json(HttpMethod::Get, "/api/assessment/my-skills", json!([]));

    let skills = h.api.my_skills().await.unwrap().data().unwrap();
    assert!(skills.is_empty());

    let req = h.http.last_request().unwrap();
    assert_eq!(req.url, "http://api.test/api/assessment/my-skills");
    assert_eq!(req.header("Authorization"), Some("Bearer test-token"));
    assert_eq!(req.header("Content-Type"), Some("application/json"));
    assert!(req.body.is_none());
}

#[tokio::test]
async fn missing_token_still_sends_placeholder_authorization() {
    let h = Harness::new();
    h.http.on(
        HttpMethod::Get,
        "/api/job/titles",
        401,
        r#"{"detail":"Not authenticated"}"#,
    );

    let reply = h.api.job_titles().await.unwrap();

    assert!(reply.is_detail());
    let req = h.http.last_request().unwrap();
    assert_eq!(req.header("Authorization"), Some("Bearer null"));
    // 默认策略下普通端点的 401 不会清除会话
    assert_eq!(h.redirect.entry_count(), 0);
}

#[tokio::test]
async fn login_request_is_unauthenticated_post_with_json_body() {
    let h = Harness::signed_in(manager());
    h.http.on(
        HttpMethod::Post,
        "/api/auth/login",
        401,
        r#"{"detail":"Incorrect email or password"}"#,
    );

    let reply = h.api.login("a@b.c", "pw").await.unwrap();

    assert!(reply.is_detail());
    let req = h.http.last_request().unwrap();
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.header("Authorization"), None);
    let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"email": "a@b.c", "password": "pw"}));
}

#[tokio::test]
async fn query_parameters_are_encoded_and_empty_filters_dropped() {
    let h = Harness::signed_in(employee());
    h.http.on_json(
        HttpMethod::Get,
        "/api/quiz/questions?job_title_id=3&skill_name=Machine+Learning",
        json!([]),
    );
    h.http.on_json(HttpMethod::Get, "/api/quiz/questions", json!([]));
    h.http.on_json(HttpMethod::Get, "/api/job/descriptions?job_title_id=4", json!([]));

    h.api
        .quiz_questions(Some(3), Some("Machine Learning"))
        .await
        .unwrap();
    h.api.quiz_questions(None, Some("")).await.unwrap();
    h.api.job_descriptions(Some(4)).await.unwrap();

    let urls: Vec<String> = h.http.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "http://api.test/api/quiz/questions?job_title_id=3&skill_name=Machine+Learning",
            "http://api.test/api/quiz/questions",
            "http://api.test/api/job/descriptions?job_title_id=4",
        ]
    );
}

#[tokio::test]
async fn progress_update_is_put_with_query_and_no_body() {
    let h = Harness::signed_in(employee());
    h.http.on_json(
        HttpMethod::Put,
        "/api/roadmap/roadmaps/12/progress?progress_percentage=50",
        json!({"message": "Progress updated"}),
    );

    let update = h
        .api
        .update_roadmap_progress(12, 50.0)
        .await
        .unwrap()
        .data()
        .unwrap();

    assert_eq!(update.message, "Progress updated");
    let req = h.http.last_request().unwrap();
    assert_eq!(req.method, HttpMethod::Put);
    assert!(req.body.is_none());
}

#[tokio::test]
async fn employee_list_401_logs_out_exactly_once() {
    let h = Harness::signed_in(manager());
    h.http.on(
        HttpMethod::Get,
        "/api/reports/employees",
        401,
        r#"{"detail":"Could not validate credentials"}"#,
    );

    let err = h.api.employees().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.status, Some(401));
    assert_eq!(h.redirect.entry_count(), 1);
    assert!(!h.session().is_authenticated());
    assert!(h.session().user().is_none());
}

#[tokio::test]
async fn employee_list_server_error_keeps_session() {
    let h = Harness::signed_in(manager());
    h.http.on(
        HttpMethod::Get,
        "/api/reports/employees",
        500,
        "Internal Server Error",
    );

    let err = h.api.employees().await.unwrap_err();

    assert_eq!(err.kind, AppErrorKind::Http);
    assert_eq!(err.status, Some(500));
    assert_eq!(h.redirect.entry_count(), 0);
    assert!(h.session().is_authenticated());
}

#[tokio::test]
async fn non_strict_endpoint_returns_detail_payload_on_error_status() {
    let h = Harness::signed_in(employee());
    h.http.on(
        HttpMethod::Get,
        "/api/assessment/gap-analysis",
        400,
        r#"{"detail":"Please submit your skills first"}"#,
    );

    let reply = h.api.gap_analysis().await.unwrap();

    match reply {
        Reply::Detail(detail) => assert_eq!(detail.message(), "Please submit your skills first"),
        Reply::Data(_) => panic!("expected detail payload"),
    }
    assert!(h.session().is_authenticated());
}

#[tokio::test]
async fn all_endpoints_policy_logs_out_on_any_401() {
    let h = Harness::with_policy(AuthFailurePolicy::AllEndpoints);
    h.api.session().begin("stale", &employee()).unwrap();
    h.http.on(
        HttpMethod::Get,
        "/api/roadmap/my-roadmaps",
        401,
        r#"{"detail":"Not authenticated"}"#,
    );

    let err = h.api.my_roadmaps().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(h.redirect.entry_count(), 1);
    assert!(!h.session().is_authenticated());
}

#[tokio::test]
async fn transport_failure_propagates_as_network_error() {
    let h = Harness::signed_in(employee());
    h.http.fail(HttpMethod::Get, "/api/quiz/results");

    let err = h.api.my_results().await.unwrap_err();

    assert_eq!(err.kind, AppErrorKind::Network);
    assert_eq!(err.spans()[0].operation, "api.send");
}

#[tokio::test]
async fn non_json_body_is_a_parse_error() {
    let h = Harness::signed_in(employee());
    h.http.on(HttpMethod::Get, "/api/quiz/results", 502, "<html>Bad Gateway</html>");

    let err = h.api.my_results().await.unwrap_err();

    assert_eq!(err.kind, AppErrorKind::Parse);
}

#[tokio::test]
async fn submit_skills_wraps_list_in_skills_field() {
    let h = Harness::signed_in(employee());
    h.http.on_json(HttpMethod::Post, "/api/assessment/submit-skills", json!([]));

    h.api
        .submit_skills(vec![SkillSubmission {
            skill_name: "Rust".into(),
            proficiency_level: ProficiencyLevel::Advanced,
            years_of_experience: 3.0,
            self_assessment_score: None,
        }])
        .await
        .unwrap();

    let req = h.http.last_request().unwrap();
    let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({"skills": [{"skill_name": "Rust", "proficiency_level": "advanced", "years_of_experience": 3.0}]})
    );
}
