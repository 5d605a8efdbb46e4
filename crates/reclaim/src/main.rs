// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reclaim - a campus lost-and-found service.
//!
//! This is the command-line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use reclaim_core::{ClaimDecision, ItemKind, ItemStatus, ReclaimError};

mod app;
mod auth;
mod claims;
mod inbox;
mod items;
mod profile;

use app::App;

/// Reclaim - report, find, and claim lost items on campus.
#[derive(Parser, Debug)]
#[command(name = "reclaim", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a new account.
    Signup { email: String },
    /// Sign in and persist the session.
    Login { email: String },
    /// Sign out and invalidate the session.
    Logout,
    /// Report a lost or found item.
    Report {
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: String,
        /// lost or found
        #[arg(long)]
        kind: ItemKind,
        #[arg(long)]
        location: String,
        /// Date the item was lost or found (YYYY-MM-DD).
        #[arg(long)]
        date: NaiveDate,
        /// Optional photo to attach.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Browse the item board.
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        kind: Option<ItemKind>,
        #[arg(long)]
        status: Option<ItemStatus>,
        /// Substring match on title, description, and location.
        #[arg(long)]
        search: Option<String>,
        /// Oldest reports first instead of newest.
        #[arg(long)]
        oldest: bool,
    },
    /// Show one item with its claims and comments.
    Show { item_id: String },
    /// Change the status of an item you reported.
    Status {
        item_id: String,
        /// open, in_progress, or resolved
        status: ItemStatus,
    },
    /// Delete an item you reported.
    Delete { item_id: String },
    /// Comment on an item.
    Comment { item_id: String, content: String },
    /// Claim an item with a proof-of-ownership image.
    Claim {
        item_id: String,
        /// Path to the proof image.
        #[arg(long)]
        proof: PathBuf,
    },
    /// Decide a pending claim on an item you reported.
    Adjudicate {
        claim_id: String,
        /// approved or rejected
        decision: ClaimDecision,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Send a direct message about an item.
    Message {
        item_id: String,
        recipient: String,
        content: String,
    },
    /// Show your message thread on an item.
    Messages { item_id: String },
    /// List your latest notifications.
    Notifications,
    /// Mark a notification as read.
    Read { notification_id: String },
    /// Show or update your profile.
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        student_id: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        year: Option<i64>,
        /// Path to a new avatar image.
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match reclaim_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            reclaim_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.service.log_level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: reclaim_config::ReclaimConfig) -> Result<(), ReclaimError> {
    let app = App::init(config).await?;

    match cli.command {
        Commands::Signup { email } => auth::signup(&app, &email).await,
        Commands::Login { email } => auth::login(&app, &email).await,
        Commands::Logout => auth::logout(&app).await,
        Commands::Report {
            title,
            description,
            category,
            kind,
            location,
            date,
            image,
        } => {
            items::report(
                &app,
                title,
                description,
                category,
                kind,
                location,
                date,
                image,
            )
            .await
        }
        Commands::List {
            category,
            kind,
            status,
            search,
            oldest,
        } => items::list(&app, category, kind, status, search, oldest).await,
        Commands::Show { item_id } => items::show(&app, &item_id).await,
        Commands::Status { item_id, status } => items::status(&app, &item_id, status).await,
        Commands::Delete { item_id } => items::delete(&app, &item_id).await,
        Commands::Comment { item_id, content } => inbox::comment(&app, &item_id, &content).await,
        Commands::Claim { item_id, proof } => claims::submit(&app, &item_id, proof).await,
        Commands::Adjudicate {
            claim_id,
            decision,
            notes,
        } => claims::adjudicate(&app, &claim_id, decision, notes).await,
        Commands::Message {
            item_id,
            recipient,
            content,
        } => inbox::send_message(&app, &item_id, &recipient, &content).await,
        Commands::Messages { item_id } => inbox::show_messages(&app, &item_id).await,
        Commands::Notifications => inbox::notifications(&app).await,
        Commands::Read { notification_id } => inbox::mark_read(&app, &notification_id).await,
        Commands::Profile {
            name,
            student_id,
            department,
            phone,
            year,
            avatar,
        } => {
            if name.is_none()
                && student_id.is_none()
                && department.is_none()
                && phone.is_none()
                && year.is_none()
                && avatar.is_none()
            {
                profile::show(&app).await
            } else {
                profile::update(&app, name, student_id, department, phone, year, avatar).await
            }
        }
    }
}
