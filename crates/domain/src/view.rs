use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vetclinic_core::AppError;

/// Navigation targets reachable after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Login screen.
    Login,
    /// Account registration screen.
    Register,
    /// Landing view after login.
    Dashboard,
    /// Patient list.
    PatientList,
}

impl View {
    /// Returns the route path of the view.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::PatientList => "/dashboard/listar",
        }
    }
}

impl Display for View {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.path())
    }
}

impl FromStr for View {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "/login" => Ok(Self::Login),
            "/register" => Ok(Self::Register),
            "/dashboard" => Ok(Self::Dashboard),
            "/dashboard/listar" => Ok(Self::PatientList),
            _ => Err(AppError::Validation(format!("unknown view path '{value}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::View;

    #[test]
    fn paths_parse_back_to_views() {
        for view in [View::Login, View::Register, View::Dashboard, View::PatientList] {
            assert_eq!(view.path().parse::<View>().ok(), Some(view));
        }
        assert!("/admin".parse::<View>().is_err());
    }
}
