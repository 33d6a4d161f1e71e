//! Skill (experience) command handlers

use anyhow::{Context, Result};

use folio_core::{ExperienceItem, Portfolio, SkillCategory, SkillLevel};

use crate::commands::{confirm, resolve_id};
use crate::output::Output;

/// Add a skill entry
pub async fn create(
    portfolio: &Portfolio,
    skill: &str,
    level: &str,
    category: &str,
    output: &Output,
) -> Result<()> {
    let level: SkillLevel = level.parse()?;
    let category: SkillCategory = category.parse()?;

    let stored = portfolio
        .experience()
        .add(ExperienceItem::new(skill, level, category))
        .await
        .context("Failed to add skill")?;

    output.success(&format!("Added skill: {}", stored.skill));
    Ok(())
}

/// List skills, optionally filtered by category
pub async fn list(portfolio: &Portfolio, category: Option<&str>, output: &Output) -> Result<()> {
    let mut items = portfolio.experience().read().await?;

    if let Some(category) = category {
        let category: SkillCategory = category.parse()?;
        items.retain(|item| item.category == category);
    }

    output.print_skills(&items);
    Ok(())
}

/// Edit a skill entry
pub async fn edit(
    portfolio: &Portfolio,
    id: &str,
    skill: Option<String>,
    level: Option<String>,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(portfolio.experience(), id).await?;
    let mut item = portfolio
        .experience()
        .get(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Skill not found: {}", id))?;

    if let Some(skill) = skill {
        item.skill = skill;
    }
    if let Some(level) = level {
        item.level = level.parse()?;
    }
    if let Some(category) = category {
        item.category = category.parse()?;
    }

    let stored = portfolio
        .experience()
        .update(item)
        .await
        .context("Failed to update skill")?;

    output.success(&format!("Updated skill: {}", stored.skill));
    Ok(())
}

/// Delete a skill entry
pub async fn delete(portfolio: &Portfolio, id: &str, output: &Output) -> Result<()> {
    let id = resolve_id(portfolio.experience(), id).await?;
    let item = portfolio
        .experience()
        .get(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Skill not found: {}", id))?;

    if output.should_prompt() {
        println!("Delete skill: {}", item.skill);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    portfolio
        .experience()
        .remove(&id)
        .await
        .context("Failed to delete skill")?;

    output.success(&format!("Deleted skill: {}", id));
    Ok(())
}

/// Move one skill to another's position
pub async fn reorder(
    portfolio: &Portfolio,
    source: &str,
    target: &str,
    output: &Output,
) -> Result<()> {
    let source = resolve_id(portfolio.experience(), source).await?;
    let target = resolve_id(portfolio.experience(), target).await?;

    let reordered = portfolio
        .experience()
        .reorder(&source, &target)
        .await
        .context("Failed to reorder skills")?;

    output.success("Skills reordered");
    output.print_skills(&reordered);
    Ok(())
}
