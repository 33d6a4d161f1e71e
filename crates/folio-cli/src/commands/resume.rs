//! Resume command handlers

use std::path::Path;

use anyhow::{Context, Result};

use folio_core::{Portfolio, Resume};

use crate::output::Output;

/// Show the current resume record
pub async fn show(portfolio: &Portfolio, output: &Output) -> Result<()> {
    let resume = portfolio.resume().read().await?;
    output.print_resume(&resume);
    Ok(())
}

/// Point the resume at an already-hosted URL
pub async fn set(
    portfolio: &Portfolio,
    url: &str,
    file_name: Option<String>,
    output: &Output,
) -> Result<()> {
    let resume = Resume::new(url, file_name.unwrap_or_default());
    let stored = portfolio
        .resume()
        .update(resume)
        .await
        .context("Failed to update resume")?;

    output.success("Resume updated");
    output.print_resume(&stored);
    Ok(())
}

/// Upload a resume file and point the record at its public URL
pub async fn upload(
    portfolio: &Portfolio,
    file: &Path,
    file_name: Option<String>,
    output: &Output,
) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read resume file {:?}", file))?;
    let original_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("Resume.pdf");
    let content_type = match file.extension().and_then(|ext| ext.to_str()) {
        Some("pdf") => Some("application/pdf"),
        _ => None,
    };

    let url = portfolio
        .media()
        .upload_resume(bytes, original_name, content_type)
        .await
        .context("Resume upload failed")?;

    let display_name = file_name.unwrap_or_else(|| original_name.to_string());
    let stored = portfolio
        .resume()
        .update(Resume::new(url, display_name))
        .await
        .context("Failed to update resume record")?;

    output.success("Resume uploaded");
    output.print_resume(&stored);
    Ok(())
}
