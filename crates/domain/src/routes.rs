//! Public route table and access guards

use std::fmt;

use crate::policy::can_administer;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/` - the public feed
    Home,
    /// `/dashboard` - the reading list, signed-in users only
    Dashboard,
    /// `/admin` - the generation console, administrators only
    Admin,
    Login,
    Register,
    /// `/article/:slug`
    Article(String),
}

impl Route {
    /// Parse a request path; unknown paths yield `None`
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Some(Route::Home),
            "/dashboard" => Some(Route::Dashboard),
            "/admin" => Some(Route::Admin),
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            other => {
                let slug = other.strip_prefix("/article/")?;
                if slug.is_empty() || slug.contains('/') {
                    None
                } else {
                    Some(Route::Article(slug.to_string()))
                }
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Article(slug) => format!("/article/{}", slug),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(Route),
}

/// Check whether the session may view a route
pub fn guard(route: &Route, session: &Session) -> RouteDecision {
    match route {
        Route::Dashboard if !session.is_signed_in() => RouteDecision::Redirect(Route::Login),
        Route::Admin if !can_administer(session) => RouteDecision::Redirect(Route::Home),
        _ => RouteDecision::Allow,
    }
}
