//! Interactive prompts using dialoguer

use std::path::Path;

use anyhow::Result;
use dialoguer::Confirm;

use crate::pipeline::Stage;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Prompt user before a stage rewrites the file it reads.
///
/// Refinement and rebalancing are not idempotent, so re-running them on
/// their own output appends records again or reshuffles labels.
pub fn confirm_overwrite(stage: Stage, path: &Path) -> Result<bool> {
    let message = format!(
        "{} will overwrite {} in place and is not idempotent. Continue?",
        stage.title(),
        path.display()
    );
    confirm_step(&message)
}
