//! Route table and access rules
//!
//! Maps request paths to pages and applies the sign-in gate in front of the
//! dashboard. Menus are exposed as data so a client can render them.

use serde::Serialize;

pub mod routes {
    pub const HOME: &str = "/";
    pub const PLANS: &str = "/plans";
    pub const ABOUT: &str = "/about";
    pub const COMMUNITY: &str = "/community";
    pub const FAQ: &str = "/faq";
    pub const AFFILIATE: &str = "/affiliate";
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const DASHBOARD: &str = "/dashboard";
    pub const DASHBOARD_OVERVIEW: &str = "/dashboard/overview";
    pub const DASHBOARD_WORKOUTS: &str = "/dashboard/workouts";
    pub const DASHBOARD_NUTRITION: &str = "/dashboard/nutrition";
    pub const DASHBOARD_PROGRESS: &str = "/dashboard/progress";
    pub const DASHBOARD_PROFILE: &str = "/dashboard/profile";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Plans,
    About,
    Community,
    Faq,
    Affiliate,
    Login,
    Register,
    DashboardOverview,
    DashboardWorkouts,
    DashboardNutrition,
    DashboardProgress,
    DashboardProfile,
}

impl Page {
    pub fn is_dashboard(self) -> bool {
        matches!(
            self,
            Page::DashboardOverview
                | Page::DashboardWorkouts
                | Page::DashboardNutrition
                | Page::DashboardProgress
                | Page::DashboardProfile
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Resolution {
    Render(Page),
    Redirect(&'static str),
    NotFound,
}

/// Resolve a request path for a caller
pub fn resolve(path: &str, authenticated: bool) -> Resolution {
    let path = normalize(path);

    if is_dashboard_path(path) && !authenticated {
        return Resolution::Redirect(routes::LOGIN);
    }

    match path {
        routes::DASHBOARD => Resolution::Redirect(routes::DASHBOARD_OVERVIEW),
        routes::LOGIN | routes::REGISTER if authenticated => {
            Resolution::Redirect(routes::DASHBOARD_OVERVIEW)
        }
        _ => page_for(path).map_or(Resolution::NotFound, Resolution::Render),
    }
}

fn page_for(path: &str) -> Option<Page> {
    let page = match path {
        routes::HOME => Page::Home,
        routes::PLANS => Page::Plans,
        routes::ABOUT => Page::About,
        routes::COMMUNITY => Page::Community,
        routes::FAQ => Page::Faq,
        routes::AFFILIATE => Page::Affiliate,
        routes::LOGIN => Page::Login,
        routes::REGISTER => Page::Register,
        routes::DASHBOARD_OVERVIEW => Page::DashboardOverview,
        routes::DASHBOARD_WORKOUTS => Page::DashboardWorkouts,
        routes::DASHBOARD_NUTRITION => Page::DashboardNutrition,
        routes::DASHBOARD_PROGRESS => Page::DashboardProgress,
        routes::DASHBOARD_PROFILE => Page::DashboardProfile,
        _ => return None,
    };
    Some(page)
}

/// Drop the query string, fragment and trailing slashes
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        routes::HOME
    } else {
        trimmed
    }
}

fn is_dashboard_path(path: &str) -> bool {
    path == routes::DASHBOARD
        || path
            .strip_prefix(routes::DASHBOARD)
            .is_some_and(|rest| rest.starts_with('/'))
}

// ============================================
// Menus
// ============================================

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

const fn item(label: &'static str, path: &'static str) -> NavItem {
    NavItem { label, path }
}

#[derive(Debug, Clone, Serialize)]
pub struct Menus {
    pub main: Vec<NavItem>,
    pub auth: Vec<NavItem>,
    pub dashboard: Vec<NavItem>,
    pub footer: Vec<NavItem>,
}

pub fn menus() -> Menus {
    Menus {
        main: vec![
            item("Home", routes::HOME),
            item("Plans", routes::PLANS),
            item("About", routes::ABOUT),
            item("Community", routes::COMMUNITY),
            item("FAQ", routes::FAQ),
        ],
        auth: vec![item("Login", routes::LOGIN), item("Sign up", routes::REGISTER)],
        dashboard: vec![
            item("Overview", routes::DASHBOARD_OVERVIEW),
            item("My Workouts", routes::DASHBOARD_WORKOUTS),
            item("My Nutrition", routes::DASHBOARD_NUTRITION),
            item("My Progress", routes::DASHBOARD_PROGRESS),
            item("My Profile", routes::DASHBOARD_PROFILE),
        ],
        footer: vec![
            item("About Us", routes::ABOUT),
            item("Plans", routes::PLANS),
            item("FAQ", routes::FAQ),
            item("Affiliate Program", routes::AFFILIATE),
        ],
    }
}
