//! Command handlers

pub mod auth;
pub mod config;
pub mod project;
pub mod qualification;
pub mod resume;
pub mod skill;
pub mod status;
pub mod watch;

use anyhow::{bail, Result};

use folio_core::{CollectionService, Record};

/// Resolve a full id or unique prefix against a collection
pub(crate) async fn resolve_id<R: Record>(
    service: &CollectionService<R>,
    id_or_prefix: &str,
) -> Result<String> {
    let records = service.read().await?;

    if records.iter().any(|r| r.id() == id_or_prefix) {
        return Ok(id_or_prefix.to_string());
    }

    let matches: Vec<&str> = records
        .iter()
        .map(|r| r.id())
        .filter(|id| id.starts_with(id_or_prefix))
        .collect();

    match matches.len() {
        0 => bail!("No match for id '{}'", id_or_prefix),
        1 => Ok(matches[0].to_string()),
        n => bail!(
            "Id '{}' is ambiguous ({} matches). Use more characters.",
            id_or_prefix,
            n
        ),
    }
}

/// Ask a yes/no question on stdin
pub(crate) fn confirm(prompt: &str) -> Result<bool> {
    use std::io::{self, Write};

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Read a line from stdin for values not passed as flags
pub(crate) fn prompt(label: &str) -> Result<String> {
    use std::io::{self, Write};

    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
