//! Route-level access control
//!
//! Protected flows call [`check_access`] before they start and follow the
//! redirect when access is refused.

use std::fmt;
use tracing::debug;

use crate::{models::SessionPhase, session::SessionContext};

/// Application screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Trips,
    Trip { id: String },
    Upload { collection_id: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Trips => "/trips".to_string(),
            Route::Trip { id } => format!("/trip/{}", id),
            Route::Upload { collection_id } => format!("/trip/{}/upload", collection_id),
        }
    }

    /// Whether the route needs an established backend session
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Navigation signal returned by flows that end on another screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    /// The target screen must reload its data
    pub refresh: bool,
}

impl Navigation {
    pub fn to(route: Route) -> Self {
        Self {
            route,
            refresh: false,
        }
    }

    pub fn with_refresh(mut self) -> Self {
        self.refresh = true;
        self
    }
}

/// Result of an access check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(Route),
}

/// Decide whether the current session may enter `route`
pub async fn check_access(context: &SessionContext, route: &Route) -> Access {
    if !route.is_protected() {
        return Access::Allow;
    }

    let phase = context.phase().await;
    if phase == SessionPhase::Established {
        Access::Allow
    } else {
        debug!(%route, %phase, "Access refused");
        Access::Redirect(Route::Login)
    }
}
