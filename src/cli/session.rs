//! Login, logout and whoami commands

use crate::api::{DashboardApi, UserLoginStats};
use crate::cli::{LoginArgs, WhoamiArgs};
use crate::session::{Session, SessionStore};
use crate::view::panels::format_timestamp;
use colored::Colorize;
use serde::Serialize;
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Error text for commands that need a session
pub const NOT_LOGGED_IN: &str = "Not logged in. Run `sentinel login --username <name>` first.";

/// Prompt shown before reading a password from stdin
pub(crate) const PASSWORD_PROMPT: &str = "Password (input is echoed): ";

/// Read a password line from `input`, prompting on stderr.
///
/// Terminal echo is left on.
fn prompt_password(input: &mut impl BufRead) -> Result<String, std::io::Error> {
    eprint!("{}", PASSWORD_PROMPT);
    std::io::stderr().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Handle `sentinel login`
pub async fn handle_login(
    args: &LoginArgs,
    store: &SessionStore,
) -> Result<String, Box<dyn std::error::Error>> {
    let password = match args.password {
        Some(ref password) => password.clone(),
        None => prompt_password(&mut std::io::stdin().lock())?,
    };

    let session = store.login(&args.username, &password).await?;
    Ok(format!(
        "{} Logged in as {} ({})",
        "✓".green(),
        session.username.bold(),
        session.role
    ))
}

/// Handle `sentinel logout`
pub fn handle_logout(store: &SessionStore) -> String {
    let had_session = store.restore().is_some();
    store.logout();
    if had_session {
        format!("{} Logged out", "✓".green())
    } else {
        "No active session".to_string()
    }
}

#[derive(Serialize)]
struct Whoami<'a> {
    #[serde(flatten)]
    session: &'a Session,
    #[serde(skip_serializing_if = "Option::is_none")]
    login_stats: Option<&'a UserLoginStats>,
}

/// Handle `sentinel whoami`
///
/// Login statistics are best-effort; an unreachable backend still reports
/// the stored session.
pub async fn handle_whoami(
    args: &WhoamiArgs,
    store: &SessionStore,
    api: Arc<dyn DashboardApi>,
) -> Result<String, Box<dyn std::error::Error>> {
    let session = store.restore().ok_or(NOT_LOGGED_IN)?;

    let stats = match api.login_stats().await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::debug!(error = %e, "Login stats unavailable");
            Default::default()
        }
    };
    let user_stats = stats.get(&session.username);

    if args.json {
        return Ok(serde_json::to_string_pretty(&Whoami {
            session: &session,
            login_stats: user_stats,
        })?);
    }

    Ok(format_whoami(&session, user_stats))
}

fn format_whoami(session: &Session, stats: Option<&UserLoginStats>) -> String {
    let mut lines = vec![format!(
        "{} {} ({})",
        "User:".bold(),
        session.username,
        session.role
    )];
    if let Some(at) = session.logged_in_at {
        lines.push(format!(
            "{} {}",
            "Since:".bold(),
            at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    if let Some(stats) = stats {
        lines.push(format!("{} {}", "Total logins:".bold(), stats.total_logins));
        if let Some(ref last) = stats.last_login {
            lines.push(format!("{} {}", "Last login:".bold(), format_timestamp(last)));
        }
    }
    lines.join("\n")
}
