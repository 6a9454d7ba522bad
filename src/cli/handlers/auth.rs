use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::Serialize;

use crate::cli::commands::LoginArgs;
use crate::io::config_io::ConfigError;
use crate::io::remote_store;
use crate::io::session;
use crate::model::AppConfig;

const PASSWORD_ENV: &str = "TASKLIST_PASSWORD";

#[derive(Serialize)]
struct LoginJson<'a> {
    user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Serialize)]
struct LogoutJson {
    signed_out: bool,
}

/// Sign in against the configured remote and store the session.
pub fn cmd_login(args: LoginArgs, home: &Path, config: &AppConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let remote = config.remote.as_ref().ok_or(ConfigError::MissingRemote)?;
    let password = match args.password {
        Some(p) => p,
        None => match std::env::var(PASSWORD_ENV) {
            Ok(p) if !p.is_empty() => p,
            _ => read_password_line()?,
        },
    };

    let session = remote_store::sign_in(remote, &args.email, &password)?;
    session::write_session(home, &session)?;

    if json {
        let out = LoginJson {
            user_id: &session.user_id,
            email: session.email.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let who = session.email.as_deref().unwrap_or(&session.user_id);
        println!("Signed in as {}", who);
    }
    Ok(())
}

pub fn cmd_logout(home: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let signed_out = session::clear_session(home)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&LogoutJson { signed_out })?);
    } else if signed_out {
        println!("Signed out");
    } else {
        println!("Not signed in");
    }
    Ok(())
}

fn read_password_line() -> io::Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
