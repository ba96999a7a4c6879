use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dashboard tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    Overview,
    Analytics,
    Insights,
    /// Admin only
    LoginHistory,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Analytics, Tab::Insights, Tab::LoginHistory];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Analytics => "analytics",
            Tab::Insights => "insights",
            Tab::LoginHistory => "login-history",
        }
    }

    pub fn is_admin_only(&self) -> bool {
        matches!(self, Tab::LoginHistory)
    }

    /// Whether `session` may see this tab
    pub fn visible_to(&self, session: &Session) -> bool {
        !self.is_admin_only() || session.is_admin()
    }

    /// Tabs `session` may open, in display order
    pub fn visible_for(session: &Session) -> Vec<Tab> {
        Tab::ALL
            .into_iter()
            .filter(|tab| tab.visible_to(session))
            .collect()
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "overview" => Ok(Tab::Overview),
            "analytics" => Ok(Tab::Analytics),
            "insights" => Ok(Tab::Insights),
            "login-history" | "history" => Ok(Tab::LoginHistory),
            _ => Err(format!(
                "Unknown tab: {} (expected overview, analytics, insights or login-history)",
                s
            )),
        }
    }
}
