use super::Tab;
use crate::session::AuthError;
use thiserror::Error;

/// Errors from dashboard commands.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("The {0} tab is only available to administrators")]
    TabNotPermitted(Tab),

    #[error(transparent)]
    Auth(#[from] AuthError),
}
