use anyhow::Result;
use console::style;
use dialoguer::Confirm;
use std::path::PathBuf;

pub fn confirm_processing(paths: &[PathBuf], no_confirm: bool) -> Result<bool> {
    if no_confirm {
        return Ok(true);
    }
    if paths.is_empty() {
        println!("No files to process.");
        return Ok(false);
    }

    for path in paths {
        println!("  {}", style(path.display()).dim());
    }
    let prompt = format!("Rewrite {} files in place?", style(paths.len()).cyan());

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;

    if !confirmed {
        println!("Aborted by user.");
    }

    Ok(confirmed)
}
