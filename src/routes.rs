//! Application route table.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every view the application can show, its path, and the guard that gates
//! it. Navigation events carry a [`Route`] rather than a raw path.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::util::guard::Guard;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    /// Default authenticated view.
    Dashboard,
    Journal,
    Habits,
    Analytics,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::Journal,
        Route::Habits,
        Route::Analytics,
    ];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/",
            Self::Journal => "/journal",
            Self::Habits => "/habits",
            Self::Analytics => "/analytics",
        }
    }

    /// Match a path exactly, ignoring one trailing slash.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let normalized = match path.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        Self::ALL.into_iter().find(|route| route.path() == normalized)
    }

    #[must_use]
    pub fn guard(self) -> Guard {
        match self {
            Self::Login | Self::Register => Guard::PublicOnly,
            Self::Dashboard | Self::Journal | Self::Habits | Self::Analytics => Guard::Protected,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
