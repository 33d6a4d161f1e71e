//! Status command handler

use anyhow::Result;

use folio_core::Portfolio;

use crate::output::{Output, OutputFormat};

/// Show backend mode, auth state and collection counts
pub async fn show(portfolio: &Portfolio, output: &Output) -> Result<()> {
    let config = portfolio.config();
    let auth = portfolio.auth().state();

    let projects = portfolio.projects().read().await?.len();
    let skills = portfolio.experience().read().await?.len();
    let qualifications = portfolio.qualification().read().await?.len();
    let resume = portfolio.resume().read().await?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "backend": if portfolio.is_remote() { "remote" } else { "local" },
                    "endpoint": config.base_url(),
                    "data_dir": config.data_dir,
                    "auth": auth,
                    "counts": {
                        "projects": projects,
                        "experience": skills,
                        "qualification": qualifications,
                    },
                    "resume_set": !resume.url.is_empty(),
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", if portfolio.is_remote() { "remote" } else { "local" });
        }
        OutputFormat::Human => {
            if portfolio.is_remote() {
                println!("Backend:       remote");
                println!(
                    "Endpoint:      {}",
                    config.base_url().unwrap_or_default()
                );
            } else {
                println!("Backend:       local");
                println!("Data dir:      {}", config.data_dir.display());
            }
            println!(
                "Admin:         {}",
                if !auth.is_configured {
                    "not configured".to_string()
                } else if auth.is_authenticated {
                    format!("logged in as {}", auth.email)
                } else {
                    "logged out".to_string()
                }
            );
            println!();
            println!("Projects:      {}", projects);
            println!("Skills:        {}", skills);
            println!("Qualification: {}", qualifications);
            println!(
                "Resume:        {}",
                if resume.url.is_empty() {
                    "not set"
                } else {
                    &resume.url
                }
            );
        }
    }

    Ok(())
}
