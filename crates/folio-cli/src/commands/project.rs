//! Project command handlers

use std::path::Path;

use anyhow::{Context, Result};

use folio_core::{Portfolio, Project};

use crate::commands::{confirm, resolve_id};
use crate::output::Output;

pub struct CreateArgs {
    pub title: String,
    pub image: Option<String>,
    pub github: Option<String>,
    pub demo: Option<String>,
    pub tags: Vec<String>,
    pub desc: Option<String>,
    pub is_new: bool,
    pub is_featured: bool,
    pub is_popular: bool,
}

pub struct EditArgs {
    pub title: Option<String>,
    pub image: Option<String>,
    pub github: Option<String>,
    pub demo: Option<String>,
    pub tags: Vec<String>,
    pub desc: Option<String>,
    pub is_new: Option<bool>,
    pub is_featured: Option<bool>,
    pub is_popular: Option<bool>,
}

/// Create a new project
pub async fn create(portfolio: &Portfolio, args: CreateArgs, output: &Output) -> Result<()> {
    let mut project = Project::new(args.title);
    project.image = args.image.unwrap_or_default();
    project.github = args.github.unwrap_or_default();
    project.demo = args.demo.unwrap_or_default();
    project.tags = args.tags;
    project.desc = args.desc.unwrap_or_default();
    project.is_new = args.is_new;
    project.is_featured = args.is_featured;
    project.is_popular = args.is_popular;

    let stored = portfolio
        .projects()
        .add(project)
        .await
        .context("Failed to create project")?;

    output.success(&format!("Created project: {}", stored.id));
    output.print_project(&stored);
    Ok(())
}

/// List all projects
pub async fn list(portfolio: &Portfolio, output: &Output) -> Result<()> {
    let projects = portfolio.projects().read().await?;
    output.print_projects(&projects);
    Ok(())
}

/// Show a single project
pub async fn show(portfolio: &Portfolio, id: &str, output: &Output) -> Result<()> {
    let id = resolve_id(portfolio.projects(), id).await?;
    let project = portfolio
        .projects()
        .get(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Project not found: {}", id))?;

    output.print_project(&project);
    Ok(())
}

/// Edit fields of a project
pub async fn edit(
    portfolio: &Portfolio,
    id: &str,
    args: EditArgs,
    output: &Output,
) -> Result<()> {
    let id = resolve_id(portfolio.projects(), id).await?;
    let mut project = portfolio
        .projects()
        .get(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Project not found: {}", id))?;

    if let Some(title) = args.title {
        project.title = title;
    }
    if let Some(image) = args.image {
        project.image = image;
    }
    if let Some(github) = args.github {
        project.github = github;
    }
    if let Some(demo) = args.demo {
        project.demo = demo;
    }
    if !args.tags.is_empty() {
        project.tags = args.tags;
    }
    if let Some(desc) = args.desc {
        project.desc = desc;
    }
    if let Some(is_new) = args.is_new {
        project.is_new = is_new;
    }
    if let Some(is_featured) = args.is_featured {
        project.is_featured = is_featured;
    }
    if let Some(is_popular) = args.is_popular {
        project.is_popular = is_popular;
    }

    let stored = portfolio
        .projects()
        .update(project)
        .await
        .context("Failed to update project")?;

    output.success("Project updated");
    output.print_project(&stored);
    Ok(())
}

/// Delete a project
pub async fn delete(portfolio: &Portfolio, id: &str, output: &Output) -> Result<()> {
    let id = resolve_id(portfolio.projects(), id).await?;
    let project = portfolio
        .projects()
        .get(&id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Project not found: {}", id))?;

    if output.should_prompt() {
        println!("Delete project: {}", project.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    portfolio
        .projects()
        .remove(&id)
        .await
        .context("Failed to delete project")?;

    output.success(&format!("Deleted project: {}", id));
    Ok(())
}

/// Move one project to another's position
pub async fn reorder(
    portfolio: &Portfolio,
    source: &str,
    target: &str,
    output: &Output,
) -> Result<()> {
    let source = resolve_id(portfolio.projects(), source).await?;
    let target = resolve_id(portfolio.projects(), target).await?;

    let reordered = portfolio
        .projects()
        .reorder(&source, &target)
        .await
        .context("Failed to reorder projects")?;

    output.success("Projects reordered");
    output.print_projects(&reordered);
    Ok(())
}

/// Upload an image and print its hosted URL
pub async fn upload_image(portfolio: &Portfolio, file: &Path, output: &Output) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read image file {:?}", file))?;
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image");

    let url = portfolio
        .media()
        .upload_image(bytes, file_name)
        .await
        .context("Image upload failed")?;

    output.success("Image uploaded");
    output.message(&url);
    if output.is_quiet() {
        println!("{}", url);
    }
    Ok(())
}
