// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account commands and the on-disk session token.

use std::io::Write;
use std::path::Path;

use colored::Colorize;

use reclaim_core::{ReclaimError, SessionProvider};

use crate::app::App;

pub fn read_session_token(path: &str) -> Result<Option<String>, ReclaimError> {
    match std::fs::read_to_string(path) {
        Ok(token) => {
            let token = token.trim().to_string();
            Ok((!token.is_empty()).then_some(token))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(ReclaimError::remote_with("failed to read session file", err)),
    }
}

fn write_session_token(path: &str, token: &str) -> Result<(), ReclaimError> {
    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| ReclaimError::remote_with("failed to create session directory", err))?;
    }
    std::fs::write(path, token)
        .map_err(|err| ReclaimError::remote_with("failed to write session file", err))
}

fn clear_session_token(path: &str) -> Result<(), ReclaimError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(ReclaimError::remote_with("failed to remove session file", err)),
    }
}

fn prompt_password(prompt: &str) -> Result<String, ReclaimError> {
    print!("{prompt}: ");
    std::io::stdout()
        .flush()
        .map_err(|err| ReclaimError::Internal(err.to_string()))?;
    rpassword::read_password().map_err(|err| ReclaimError::Internal(err.to_string()))
}

pub async fn signup(app: &App, email: &str) -> Result<(), ReclaimError> {
    let password = prompt_password("Choose a password")?;
    let user = app.sessions.sign_up(email, &password).await?;
    println!("{} account created for {}", "ok:".green(), user.email.bold());
    println!("run {} to sign in", "reclaim login".cyan());
    Ok(())
}

pub async fn login(app: &App, email: &str) -> Result<(), ReclaimError> {
    let password = prompt_password("Password")?;
    let ctx = app.sessions.sign_in(email, &password).await?;
    write_session_token(&app.config.auth.session_file, &ctx.token)?;
    println!("{} signed in as {}", "ok:".green(), ctx.user.email.bold());
    Ok(())
}

pub async fn logout(app: &App) -> Result<(), ReclaimError> {
    if let Some(token) = read_session_token(&app.config.auth.session_file)? {
        // Resume so the provider knows which session row to invalidate.
        if app.sessions.resume(&token).await.is_ok() {
            app.sessions.sign_out().await?;
        }
    }
    clear_session_token(&app.config.auth.session_file)?;
    println!("{} signed out", "ok:".green());
    Ok(())
}
