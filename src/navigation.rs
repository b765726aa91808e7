use std::sync::{Arc, Mutex, MutexGuard};

use skillpilot_shared::Role;

use crate::api::SkillPilotApi;
use crate::loaders::load_page;
use crate::views::PageContent;

// =========================================================
// 页面定义
// =========================================================

/// 仪表盘内的页面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Dashboard,
    Employees,
    JobTitles,
    JobDescriptions,
    GenerateQuiz,
    MySkills,
    GapAnalysis,
    TakeQuiz,
    Roadmap,
    /// 从员工表格下钻的单个员工报告
    EmployeeReport(i64),
}

impl Page {
    pub fn slug(&self) -> String {
        match self {
            Page::Dashboard => "dashboard".into(),
            Page::Employees => "employees".into(),
            Page::JobTitles => "job-titles".into(),
            Page::JobDescriptions => "job-descriptions".into(),
            Page::GenerateQuiz => "generate-quiz".into(),
            Page::MySkills => "my-skills".into(),
            Page::GapAnalysis => "gap-analysis".into(),
            Page::TakeQuiz => "take-quiz".into(),
            Page::Roadmap => "roadmap".into(),
            Page::EmployeeReport(id) => format!("employee-report/{}", id),
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        let page = match slug {
            "dashboard" => Page::Dashboard,
            "employees" => Page::Employees,
            "job-titles" => Page::JobTitles,
            "job-descriptions" => Page::JobDescriptions,
            "generate-quiz" => Page::GenerateQuiz,
            "my-skills" => Page::MySkills,
            "gap-analysis" => Page::GapAnalysis,
            "take-quiz" => Page::TakeQuiz,
            "roadmap" => Page::Roadmap,
            other => {
                let id = other.strip_prefix("employee-report/")?.parse().ok()?;
                Page::EmployeeReport(id)
            }
        };
        Some(page)
    }

    /// 内容区上方的标题
    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Employees => "Employee Management",
            Page::JobTitles => "Job Titles",
            Page::JobDescriptions => "Job Descriptions",
            Page::GenerateQuiz => "Generate Quiz",
            Page::MySkills => "My Skills",
            Page::GapAnalysis => "Gap Analysis",
            Page::TakeQuiz => "Take Assessment Quiz",
            Page::Roadmap => "Learning Roadmap",
            Page::EmployeeReport(_) => "Employee Report",
        }
    }

    /// 该页面对应高亮的菜单项
    pub fn menu_page(&self) -> Page {
        match self {
            Page::EmployeeReport(_) => Page::Employees,
            other => *other,
        }
    }
}

// =========================================================
// 角色菜单
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub page: Page,
    pub icon: &'static str,
}

const MANAGER_MENU: [MenuItem; 5] = [
    MenuItem { label: "Dashboard", page: Page::Dashboard, icon: "📊" },
    MenuItem { label: "Employees", page: Page::Employees, icon: "👥" },
    MenuItem { label: "Job Titles", page: Page::JobTitles, icon: "💼" },
    MenuItem { label: "Job Descriptions", page: Page::JobDescriptions, icon: "📝" },
    MenuItem { label: "Generate Quiz", page: Page::GenerateQuiz, icon: "❓" },
];

const EMPLOYEE_MENU: [MenuItem; 5] = [
    MenuItem { label: "Dashboard", page: Page::Dashboard, icon: "📊" },
    MenuItem { label: "My Skills", page: Page::MySkills, icon: "⭐" },
    MenuItem { label: "Gap Analysis", page: Page::GapAnalysis, icon: "📈" },
    MenuItem { label: "Take Quiz", page: Page::TakeQuiz, icon: "✍️" },
    MenuItem { label: "Learning Roadmap", page: Page::Roadmap, icon: "🗺️" },
];

pub fn menu_for(role: Role) -> &'static [MenuItem] {
    match role {
        Role::OdManager => &MANAGER_MENU,
        Role::Employee => &EMPLOYEE_MENU,
    }
}

// =========================================================
// 页面路由
// =========================================================

/// 一次导航的凭据；只有最新一次导航的凭据可以写入内容区
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTicket {
    generation: u64,
    page: Page,
}

impl NavigationTicket {
    pub fn page(&self) -> Page {
        self.page
    }
}

struct RouterState {
    generation: u64,
    active: Page,
    content: PageContent,
}

/// 仪表盘的页面状态机
///
/// 初始页面为 `Dashboard`，角色在构造时固定。每次导航发放递增的代号，
/// 被后续导航取代的加载结果在 `commit` 时丢弃。
#[derive(Clone)]
pub struct PageRouter {
    role: Role,
    state: Arc<Mutex<RouterState>>,
}

impl PageRouter {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            state: Arc::new(Mutex::new(RouterState {
                generation: 0,
                active: Page::Dashboard,
                content: PageContent::loading(Page::Dashboard, role),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn menu(&self) -> &'static [MenuItem] {
        menu_for(self.role)
    }

    pub fn active(&self) -> Page {
        self.lock().active
    }

    pub fn content(&self) -> PageContent {
        self.lock().content.clone()
    }

    /// 切换活动页面并显示加载占位
    pub fn begin(&self, page: Page) -> NavigationTicket {
        let mut state = self.lock();
        state.generation += 1;
        state.active = page;
        state.content = PageContent::loading(page, self.role);
        crate::log_info!("Navigate -> {} (#{})", page.slug(), state.generation);
        NavigationTicket {
            generation: state.generation,
            page,
        }
    }

    pub fn is_current(&self, ticket: &NavigationTicket) -> bool {
        self.lock().generation == ticket.generation
    }

    /// 写入加载结果；凭据已过期时丢弃并返回 false
    pub fn commit(&self, ticket: &NavigationTicket, content: PageContent) -> bool {
        let mut state = self.lock();
        if state.generation != ticket.generation {
            crate::log_info!(
                "Discarding stale result for {} (#{} < #{})",
                ticket.page.slug(),
                ticket.generation,
                state.generation
            );
            return false;
        }
        state.content = content;
        true
    }

    /// 完整的一次导航：开始、加载、提交
    pub async fn navigate(&self, api: &SkillPilotApi, page: Page) -> bool {
        let ticket = self.begin(page);
        let content = load_page(api, self.role, page).await;
        self.commit(&ticket, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpMethod, HttpResponse};
    use crate::testing::{Harness, manager};
    use serde_json::json;

    #[test]
    fn menus_follow_role() {
        let labels: Vec<&str> = menu_for(Role::OdManager).iter().map(|m| m.label).collect();
        assert_eq!(
            labels,
            ["Dashboard", "Employees", "Job Titles", "Job Descriptions", "Generate Quiz"]
        );

        let pages: Vec<Page> = menu_for(Role::Employee).iter().map(|m| m.page).collect();
        assert_eq!(
            pages,
            [Page::Dashboard, Page::MySkills, Page::GapAnalysis, Page::TakeQuiz, Page::Roadmap]
        );
        assert_eq!(menu_for(Role::Employee)[3].icon, "✍️");
    }

    #[test]
    fn slugs_round_trip() {
        let pages = [
            Page::Dashboard,
            Page::Employees,
            Page::JobTitles,
            Page::JobDescriptions,
            Page::GenerateQuiz,
            Page::MySkills,
            Page::GapAnalysis,
            Page::TakeQuiz,
            Page::Roadmap,
            Page::EmployeeReport(42),
        ];
        for page in pages {
            assert_eq!(Page::from_slug(&page.slug()), Some(page));
        }
        assert_eq!(Page::from_slug("employee-report/abc"), None);
        assert_eq!(Page::from_slug("settings"), None);
    }

    #[test]
    fn report_highlights_employees_menu() {
        assert_eq!(Page::EmployeeReport(5).menu_page(), Page::Employees);
        assert_eq!(Page::EmployeeReport(5).title(), "Employee Report");
        assert_eq!(Page::TakeQuiz.title(), "Take Assessment Quiz");
    }

    #[test]
    fn router_starts_on_dashboard_and_rejects_old_tickets() {
        let router = PageRouter::new(Role::Employee);
        assert_eq!(router.active(), Page::Dashboard);

        let first = router.begin(Page::MySkills);
        let second = router.begin(Page::Roadmap);

        assert!(!router.commit(&first, PageContent::Error("late".into())));
        assert!(router.commit(&second, PageContent::Error("fresh".into())));
        assert_eq!(router.active(), Page::Roadmap);
        assert_eq!(router.content(), PageContent::Error("fresh".into()));
    }

    #[tokio::test]
    async fn superseded_navigation_is_discarded() {
        let h = Harness::signed_in(manager());
        let release = h.http.gate(HttpMethod::Get, "/api/reports/employees");
        h.http.on_json(
            HttpMethod::Get,
            "/api/job/titles",
            json!([{"id": 1, "title": "Engineer", "level": 1}]),
        );
        let router = PageRouter::new(Role::OdManager);

        let slow = router.navigate(&h.api, Page::Employees);
        let fast = async {
            let committed = router.navigate(&h.api, Page::JobTitles).await;
            release
                .send(HttpResponse::new(200, r#"[{"id": 2, "name": "Late"}]"#))
                .unwrap();
            committed
        };
        let (slow_committed, fast_committed) = futures::join!(slow, fast);

        assert!(!slow_committed);
        assert!(fast_committed);
        assert_eq!(router.active(), Page::JobTitles);
        assert!(matches!(router.content(), PageContent::JobTitles(_)));
    }
}
