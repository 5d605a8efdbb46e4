// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Claim commands: submit with a proof image, adjudicate as the owner.

use std::path::PathBuf;

use colored::Colorize;

use reclaim_core::{ClaimDecision, ReclaimError};

use crate::app::App;

pub async fn submit(app: &App, item_id: &str, proof: PathBuf) -> Result<(), ReclaimError> {
    let ctx = app.require_session().await?;

    let bytes = std::fs::read(&proof)
        .map_err(|err| ReclaimError::remote_with("failed to read proof file", err))?;
    let name = proof
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let proof_url = app.service.upload_proof(&ctx, item_id, &name, &bytes).await?;

    let claim = app.service.submit_claim(&ctx, item_id, &proof_url).await?;
    println!("{} claim {} submitted", "ok:".green(), claim.id.dimmed());
    println!("the item owner has been notified");
    Ok(())
}

pub async fn adjudicate(
    app: &App,
    claim_id: &str,
    decision: ClaimDecision,
    notes: Option<String>,
) -> Result<(), ReclaimError> {
    let ctx = app.require_session().await?;
    let claim = app
        .service
        .adjudicate_claim(&ctx, claim_id, decision, notes)
        .await?;
    let verdict = match decision {
        ClaimDecision::Approved => "approved".green(),
        ClaimDecision::Rejected => "rejected".red(),
    };
    println!("{} claim {} {verdict}", "ok:".green(), claim.id.dimmed());
    if decision == ClaimDecision::Approved {
        println!("the item is now resolved");
    }
    Ok(())
}
