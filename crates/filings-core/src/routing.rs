//! Navigable pages and redirects between them

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Landing,
    Upload,
    Benchmarking,
    Compliance,
    NotFound,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Upload => "/upload",
            Route::Benchmarking => "/benchmarking",
            Route::Compliance => "/compliance",
            Route::NotFound => "/404",
        }
    }

    /// Anything that is not a known page resolves to `NotFound`.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        match trimmed {
            "/" | "" => Route::Landing,
            "/upload" => Route::Upload,
            "/benchmarking" => Route::Benchmarking,
            "/compliance" => Route::Compliance,
            _ => Route::NotFound,
        }
    }

    /// Entries of the navigation bar, in display order
    pub fn navigation() -> [(Route, &'static str); 3] {
        [
            (Route::Upload, "Upload"),
            (Route::Benchmarking, "Benchmark"),
            (Route::Compliance, "Compliance"),
        ]
    }
}

/// A page refused to mount and sends the user elsewhere with a notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRedirect {
    pub to: Route,
    pub notice: String,
}

impl PageRedirect {
    pub fn to_upload(notice: impl Into<String>) -> Self {
        Self {
            to: Route::Upload,
            notice: notice.into(),
        }
    }
}
