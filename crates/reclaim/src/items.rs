// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Item board commands: report, list, show, status, delete.

use chrono::NaiveDate;
use colored::Colorize;

use reclaim_core::{Item, ItemKind, ItemStatus, ReclaimError};
use reclaim_workflow::{ItemQuery, NewItem};

use crate::app::App;

fn paint_status(status: ItemStatus) -> colored::ColoredString {
    match status {
        ItemStatus::Open => status.to_string().green(),
        ItemStatus::InProgress => status.to_string().yellow(),
        ItemStatus::Resolved => status.to_string().blue(),
    }
}

fn print_item_line(item: &Item) {
    println!(
        "{}  [{}] {}  {}  {} @ {}",
        item.id.dimmed(),
        item.kind,
        item.title.bold(),
        paint_status(item.status),
        item.date,
        item.location
    );
}

#[allow(clippy::too_many_arguments)]
pub async fn report(
    app: &App,
    title: String,
    description: String,
    category: String,
    kind: ItemKind,
    location: String,
    date: NaiveDate,
    image: Option<std::path::PathBuf>,
) -> Result<(), ReclaimError> {
    let ctx = app.require_session().await?;

    let image_url = match image {
        Some(path) => {
            let bytes = std::fs::read(&path)
                .map_err(|err| ReclaimError::remote_with("failed to read image file", err))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            Some(app.service.upload_item_image(&ctx, &name, &bytes).await?)
        }
        None => None,
    };

    let item = app
        .service
        .report_item(
            &ctx,
            NewItem {
                title,
                description,
                category,
                kind,
                location,
                date,
                image_url,
            },
        )
        .await?;
    println!("{} item reported", "ok:".green());
    print_item_line(&item);
    Ok(())
}

pub async fn list(
    app: &App,
    category: Option<String>,
    kind: Option<ItemKind>,
    status: Option<ItemStatus>,
    search: Option<String>,
    oldest: bool,
) -> Result<(), ReclaimError> {
    let items = app
        .service
        .list_items(&ItemQuery {
            category,
            kind,
            status,
            search,
            oldest_first: oldest,
        })
        .await?;
    if items.is_empty() {
        println!("no items match");
        return Ok(());
    }
    for item in &items {
        print_item_line(item);
    }
    Ok(())
}

pub async fn show(app: &App, item_id: &str) -> Result<(), ReclaimError> {
    let (item, profile) = app.service.item_with_owner_profile(item_id).await?;
    print_item_line(&item);
    println!("{}", item.description);
    println!("category: {}", item.category);
    if let Some(url) = &item.image_url {
        println!("image: {url}");
    }
    match profile.and_then(|p| p.full_name) {
        Some(name) => println!("reported by: {name} ({})", item.user_id.dimmed()),
        None => println!("reported by: {}", item.user_id.dimmed()),
    }

    let claims = app.service.claims_for_item(item_id).await?;
    if !claims.is_empty() {
        println!("\n{}", "claims:".bold());
        for claim in &claims {
            println!(
                "  {}  by {}  {}  proof: {}",
                claim.id.dimmed(),
                claim.claimed_by,
                claim.status,
                claim.proof_of_ownership
            );
        }
    }

    let comments = app.service.comments_for_item(item_id).await?;
    if !comments.is_empty() {
        println!("\n{}", "comments:".bold());
        for comment in &comments {
            println!(
                "  {} {}: {}",
                comment.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                comment.user_id,
                comment.content
            );
        }
    }
    Ok(())
}

pub async fn status(app: &App, item_id: &str, status: ItemStatus) -> Result<(), ReclaimError> {
    let ctx = app.require_session().await?;
    let item = app.service.change_item_status(&ctx, item_id, status).await?;
    println!("{} status is now {}", "ok:".green(), paint_status(item.status));
    Ok(())
}

pub async fn delete(app: &App, item_id: &str) -> Result<(), ReclaimError> {
    let ctx = app.require_session().await?;
    app.service.delete_item(&ctx, item_id).await?;
    println!("{} item deleted", "ok:".green());
    Ok(())
}
