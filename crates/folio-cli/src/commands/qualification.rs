//! Qualification timeline command handlers

use anyhow::{Context, Result};

use folio_core::{Portfolio, QualificationCategory, QualificationItem};

use crate::commands::{confirm, resolve_id};
use crate::output::Output;

/// Add a timeline entry
pub async fn create(
    portfolio: &Portfolio,
    title: &str,
    subtitle: &str,
    period: &str,
    category: &str,
    output: &Output,
) -> Result<()> {
    let category: QualificationCategory = category.parse()?;

    let stored = portfolio
        .qualification()
        .add(QualificationItem::new(title, subtitle, period, category))
        .await
        .context("Failed to add qualification entry")?;

    output.success(&format!("Added entry: {}", stored.title));
    Ok(())
}

/// List timeline entries, optionally filtered by category
pub async fn list(portfolio: &Portfolio, category: Option<&str>, output: &Output) -> Result<()> {
    let mut items = portfolio.qualification().read().await?;

    if let Some(category) = category {
        let category: QualificationCategory = category.parse()?;
        items.retain(|item| item.category == category);
    }

    output.print_qualifications(&items);
    Ok(())
}

/// Edit a timeline entry
pub async fn edit(
    portfolio: &Portfolio,
    id: &str,
    title: Option<String>,
    subtitle: Option<String>,
    period: Option<String>,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(portfolio.qualification(), id).await?;
    let mut item = portfolio
        .qualification()
        .get(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Qualification entry not found: {}", id))?;

    if let Some(title) = title {
        item.title = title;
    }
    if let Some(subtitle) = subtitle {
        item.subtitle = subtitle;
    }
    if let Some(period) = period {
        item.period = period;
    }
    if let Some(category) = category {
        item.category = category.parse()?;
    }

    let stored = portfolio
        .qualification()
        .update(item)
        .await
        .context("Failed to update qualification entry")?;

    output.success(&format!("Updated entry: {}", stored.title));
    Ok(())
}

/// Delete a timeline entry
pub async fn delete(portfolio: &Portfolio, id: &str, output: &Output) -> Result<()> {
    let id = resolve_id(portfolio.qualification(), id).await?;
    let item = portfolio
        .qualification()
        .get(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Qualification entry not found: {}", id))?;

    if output.should_prompt() {
        println!("Delete entry: {} - {}", item.title, item.subtitle);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    portfolio
        .qualification()
        .remove(&id)
        .await
        .context("Failed to delete qualification entry")?;

    output.success(&format!("Deleted entry: {}", id));
    Ok(())
}

/// Move one entry to another's position
pub async fn reorder(
    portfolio: &Portfolio,
    source: &str,
    target: &str,
    output: &Output,
) -> Result<()> {
    let source = resolve_id(portfolio.qualification(), source).await?;
    let target = resolve_id(portfolio.qualification(), target).await?;

    let reordered = portfolio
        .qualification()
        .reorder(&source, &target)
        .await
        .context("Failed to reorder qualification entries")?;

    output.success("Entries reordered");
    output.print_qualifications(&reordered);
    Ok(())
}
