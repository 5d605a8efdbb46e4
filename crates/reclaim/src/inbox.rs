// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Comment, message, and notification commands.

use colored::Colorize;

use reclaim_core::ReclaimError;
use reclaim_workflow::NOTIFICATION_LIMIT;

use crate::app::App;

pub async fn comment(app: &App, item_id: &str, content: &str) -> Result<(), ReclaimError> {
    let ctx = app.require_session().await?;
    app.service.post_comment(&ctx, item_id, content).await?;
    println!("{} comment posted", "ok:".green());
    Ok(())
}

pub async fn send_message(
    app: &App,
    item_id: &str,
    recipient: &str,
    content: &str,
) -> Result<(), ReclaimError> {
    let ctx = app.require_session().await?;
    app.service
        .post_message(&ctx, item_id, recipient, content)
        .await?;
    println!("{} message sent to {recipient}", "ok:".green());
    Ok(())
}

pub async fn show_messages(app: &App, item_id: &str) -> Result<(), ReclaimError> {
    let ctx = app.require_session().await?;
    let thread = app.service.messages_for_item(&ctx, item_id).await?;
    if thread.is_empty() {
        println!("no messages on this item");
        return Ok(());
    }
    for message in &thread {
        let direction = if message.sender_id == ctx.user_id() {
            format!("to {}", message.recipient_id).dimmed()
        } else {
            format!("from {}", message.sender_id).cyan()
        };
        println!(
            "{} {direction}: {}",
            message.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            message.content
        );
    }
    Ok(())
}

pub async fn notifications(app: &App) -> Result<(), ReclaimError> {
    let ctx = app.require_session().await?;
    let inbox = app
        .service
        .notifications_for(&ctx, NOTIFICATION_LIMIT)
        .await?;
    if inbox.is_empty() {
        println!("no notifications");
        return Ok(());
    }
    for n in &inbox {
        let marker = if n.read { " ".normal() } else { "*".yellow() };
        println!(
            "{marker} {}  [{}] {}  (item {})",
            n.id.dimmed(),
            n.kind,
            n.content,
            n.item_id.dimmed()
        );
    }
    Ok(())
}

pub async fn mark_read(app: &App, notification_id: &str) -> Result<(), ReclaimError> {
    let ctx = app.require_session().await?;
    app.service
        .mark_notification_read(&ctx, notification_id)
        .await?;
    println!("{} marked read", "ok:".green());
    Ok(())
}
