//! Watch command handler
//!
//! Follows one collection and prints a line for every change until
//! interrupted. In remote mode this includes the periodic re-fetch, so
//! edits made from another session show up within the poll interval.

use anyhow::{bail, Result};
use serde::Serialize;

use folio_core::{Portfolio, Watch, WatchEvent};

use crate::output::Output;

/// Follow a collection by name
pub async fn run(portfolio: &Portfolio, collection: &str, output: &Output) -> Result<()> {
    match collection {
        "projects" => {
            follow(portfolio.projects().watch(), output, |records| {
                format!("projects: {} item(s)", records.len())
            })
            .await
        }
        "experience" | "skills" => {
            follow(portfolio.experience().watch(), output, |records| {
                format!("experience: {} item(s)", records.len())
            })
            .await
        }
        "qualification" => {
            follow(portfolio.qualification().watch(), output, |records| {
                format!("qualification: {} item(s)", records.len())
            })
            .await
        }
        "resume" => {
            follow(portfolio.resume().watch(), output, |resume| {
                if resume.url.is_empty() {
                    "resume: not set".to_string()
                } else {
                    format!("resume: {}", resume.url)
                }
            })
            .await
        }
        other => bail!(
            "Unknown collection '{}'. Use projects, experience, qualification or resume.",
            other
        ),
    }
}

/// Print snapshots as they arrive; Ctrl-C stops the watch
async fn follow<T, F>(mut watch: Watch<T>, output: &Output, describe: F) -> Result<()>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                output.message("Stopped.");
                return Ok(());
            }
            event = watch.next() => {
                match event {
                    Some(WatchEvent::Updated(value)) => {
                        if output.is_json() {
                            println!("{}", serde_json::to_string(&value)?);
                        } else {
                            output.message(&describe(&value));
                        }
                    }
                    Some(WatchEvent::Error(message)) => {
                        eprintln!("⚠ {}", message);
                    }
                    None => return Ok(()),
                }
            }
        }
    }
}
