//! 表单提交动作
//!
//! 每个动作先做本地校验，再调用对应端点，成功时返回通知文本。

use skillpilot_shared::protocol::Reply;
use skillpilot_shared::{
    GenerateQuiz, NewJobDescription, NewJobTitle, ProficiencyLevel, QuizAnswer, QuizSubmitSummary,
    SkillSubmission,
};

use crate::api::SkillPilotApi;
use crate::error::{AppError, AppResult};

/// 单次生成题目数量的上限
pub const MAX_QUIZ_QUESTIONS: u32 = 20;

fn data<T>(reply: AppResult<Reply<T>>) -> AppResult<T> {
    Ok(reply?.into_result()?)
}

/// 逗号分隔的列表输入：去除空白与空项
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn clamp_progress(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

// --- Manager ---

pub async fn create_job_title(api: &SkillPilotApi, mut form: NewJobTitle) -> AppResult<String> {
    form.title = form.title.trim().to_string();
    if form.title.is_empty() {
        return Err(AppError::invalid_input("Job title is required"));
    }
    if form.level < 1 {
        return Err(AppError::invalid_input("Level must be at least 1"));
    }
    form.department = form.department.map(|d| d.trim().to_string()).filter(|d| !d.is_empty());

    let created = data(api.create_job_title(&form).await)?;
    crate::log_info!("Job title created: #{}", created.id);
    Ok(format!("Job title \"{}\" created", created.title))
}

pub async fn create_job_description(
    api: &SkillPilotApi,
    form: NewJobDescription,
) -> AppResult<String> {
    if form.required_skills.is_empty() {
        return Err(AppError::invalid_input("At least one required skill is needed"));
    }
    if form.required_years_of_experience < 0.0 {
        return Err(AppError::invalid_input("Experience cannot be negative"));
    }

    let created = data(api.create_job_description(&form).await)?;
    crate::log_info!("Job description created: #{}", created.id);
    Ok("Job description created".to_string())
}

pub async fn generate_quiz(api: &SkillPilotApi, mut form: GenerateQuiz) -> AppResult<String> {
    form.skill_name = form.skill_name.trim().to_string();
    if form.skill_name.is_empty() {
        return Err(AppError::invalid_input("Skill name is required"));
    }
    if !(1..=MAX_QUIZ_QUESTIONS).contains(&form.num_questions) {
        return Err(AppError::invalid_input(format!(
            "Number of questions must be between 1 and {}",
            MAX_QUIZ_QUESTIONS
        )));
    }

    let quiz = data(api.generate_quiz(&form).await)?;
    if quiz.message.is_empty() {
        Ok(format!("Generated {} quiz questions", quiz.questions.len()))
    } else {
        Ok(quiz.message)
    }
}

// --- Employee ---

pub async fn submit_skills(api: &SkillPilotApi, skills: Vec<SkillSubmission>) -> AppResult<String> {
    let skills: Vec<SkillSubmission> = skills
        .into_iter()
        .filter(|s| !s.skill_name.trim().is_empty())
        .map(|mut s| {
            s.skill_name = s.skill_name.trim().to_string();
            s.years_of_experience = s.years_of_experience.max(0.0);
            s
        })
        .collect();
    if skills.is_empty() {
        return Err(AppError::invalid_input("Add at least one skill"));
    }

    let saved = data(api.submit_skills(skills).await)?;
    Ok(format!("Saved {} skills", saved.len()))
}

pub async fn submit_quiz(api: &SkillPilotApi, answers: Vec<QuizAnswer>) -> AppResult<QuizSubmitSummary> {
    if answers.is_empty() {
        return Err(AppError::invalid_input("Answer at least one question"));
    }
    data(api.submit_quiz(answers).await)
}

/// 测验结果的通知文本
pub fn quiz_summary_text(summary: &QuizSubmitSummary) -> String {
    format!(
        "Score: {}/{} correct ({:.1}%)",
        summary.correct_answers, summary.total_questions, summary.percentage
    )
}

pub async fn generate_roadmap(
    api: &SkillPilotApi,
    skill_name: &str,
    target_level: ProficiencyLevel,
) -> AppResult<String> {
    let skill_name = skill_name.trim();
    if skill_name.is_empty() {
        return Err(AppError::invalid_input("Choose a skill for the roadmap"));
    }

    let roadmap = data(api.generate_roadmap(skill_name, target_level).await)?;
    Ok(format!("Roadmap for {} generated", roadmap.skill_name))
}

pub async fn update_roadmap_progress(
    api: &SkillPilotApi,
    roadmap_id: i64,
    progress: f64,
) -> AppResult<String> {
    let update = data(api.update_roadmap_progress(roadmap_id, clamp_progress(progress)).await)?;
    if update.message.is_empty() {
        Ok("Progress updated".to_string())
    } else {
        Ok(update.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppErrorKind;
    use crate::request::HttpMethod;
    use crate::testing::{Harness, employee, manager};
    use serde_json::json;

    #[test]
    fn list_input_is_trimmed() {
        assert_eq!(parse_list(" Rust, SQL ,, Go "), vec!["Rust", "SQL", "Go"]);
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(clamp_progress(-5.0), 0.0);
        assert_eq!(clamp_progress(140.0), 100.0);
        assert_eq!(clamp_progress(f64::NAN), 0.0);
        assert_eq!(clamp_progress(42.5), 42.5);
    }

    #[tokio::test]
    async fn progress_update_sends_clamped_value() {
        let h = Harness::signed_in(employee());
        h.http.on_json(
            HttpMethod::Put,
            "/api/roadmap/roadmaps/4/progress?progress_percentage=100",
            json!({"message": "Progress updated successfully"}),
        );

        let notice = update_roadmap_progress(&h.api, 4, 250.0).await.unwrap();

        assert_eq!(notice, "Progress updated successfully");
    }

    #[tokio::test]
    async fn blank_job_title_is_rejected_locally() {
        let h = Harness::signed_in(manager());

        let err = create_job_title(
            &h.api,
            NewJobTitle {
                title: "   ".into(),
                level: 1,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind, AppErrorKind::InvalidInput);
        assert!(h.http.requests().is_empty());
    }

    #[tokio::test]
    async fn job_title_creation_reports_server_detail() {
        let h = Harness::signed_in(manager());
        h.http.on(
            HttpMethod::Post,
            "/api/job/titles",
            403,
            r#"{"detail":"Only OD Managers can perform this action"}"#,
        );

        let err = create_job_title(
            &h.api,
            NewJobTitle {
                title: "Engineer".into(),
                level: 2,
                department: Some("  ".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.user_message(), "Only OD Managers can perform this action");
        let body = h.http.last_request().unwrap().body.unwrap();
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["department"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn submitted_skills_skip_blank_rows() {
        let h = Harness::signed_in(employee());
        h.http.on_json(
            HttpMethod::Post,
            "/api/assessment/submit-skills",
            json!([{"skill_name": "Rust", "proficiency_level": "advanced"}]),
        );

        let notice = submit_skills(
            &h.api,
            vec![
                SkillSubmission {
                    skill_name: " Rust ".into(),
                    proficiency_level: ProficiencyLevel::Advanced,
                    years_of_experience: 2.0,
                    self_assessment_score: None,
                },
                SkillSubmission {
                    skill_name: "".into(),
                    proficiency_level: ProficiencyLevel::Beginner,
                    years_of_experience: 0.0,
                    self_assessment_score: None,
                },
            ],
        )
        .await
        .unwrap();

        assert_eq!(notice, "Saved 1 skills");
        let body = h.http.last_request().unwrap().body.unwrap();
        assert!(body.contains(r#""skill_name":"Rust""#));
    }

    #[tokio::test]
    async fn quiz_submission_returns_summary() {
        let h = Harness::signed_in(employee());
        h.http.on_json(
            HttpMethod::Post,
            "/api/quiz/submit",
            json!({"message": "Quiz submitted successfully", "total_questions": 4,
                   "correct_answers": 3, "total_score": 30, "total_possible_points": 40, "percentage": 75.0}),
        );

        let summary = submit_quiz(
            &h.api,
            vec![QuizAnswer {
                quiz_question_id: 1,
                selected_answer: "A".into(),
                time_taken_seconds: None,
            }],
        )
        .await
        .unwrap();

        assert_eq!(quiz_summary_text(&summary), "Score: 3/4 correct (75.0%)");
    }
}
