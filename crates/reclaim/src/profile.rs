// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile commands: view the lazily created profile, update its fields,
//! set an avatar.

use std::path::PathBuf;

use colored::Colorize;

use reclaim_core::ReclaimError;
use reclaim_workflow::ProfilePatch;

use crate::app::App;

fn field(label: &str, value: &Option<String>) {
    match value {
        Some(value) => println!("{label}: {value}"),
        None => println!("{label}: {}", "unset".dimmed()),
    }
}

pub async fn show(app: &App) -> Result<(), ReclaimError> {
    let ctx = app.require_session().await?;
    let profile = app.service.get_or_create_profile(&ctx).await?;
    println!("{} ({})", ctx.user.email.bold(), profile.id.dimmed());
    field("name", &profile.full_name);
    field("student id", &profile.student_id);
    field("department", &profile.department);
    field("phone", &profile.phone);
    match profile.year_of_study {
        Some(year) => println!("year of study: {year}"),
        None => println!("year of study: {}", "unset".dimmed()),
    }
    field("avatar", &profile.avatar_url);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn update(
    app: &App,
    full_name: Option<String>,
    student_id: Option<String>,
    department: Option<String>,
    phone: Option<String>,
    year_of_study: Option<i64>,
    avatar: Option<PathBuf>,
) -> Result<(), ReclaimError> {
    let ctx = app.require_session().await?;

    let avatar_url = match avatar {
        Some(path) => {
            let bytes = std::fs::read(&path)
                .map_err(|err| ReclaimError::remote_with("failed to read avatar file", err))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            Some(app.service.upload_avatar(&ctx, &name, &bytes).await?)
        }
        None => None,
    };

    app.service
        .update_profile(
            &ctx,
            ProfilePatch {
                full_name,
                student_id,
                department,
                phone,
                year_of_study,
                avatar_url,
            },
        )
        .await?;
    println!("{} profile updated", "ok:".green());
    Ok(())
}
