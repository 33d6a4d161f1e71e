//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use chrono::DateTime;

use folio_core::{AuthState, ExperienceItem, Project, QualificationItem, Resume};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is in JSON mode
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single project with all fields
    pub fn print_project(&self, project: &Project) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", project.id);
                println!("Title:    {}", project.title);
                if !project.image.is_empty() {
                    println!("Image:    {}", project.image);
                }
                if !project.github.is_empty() {
                    println!("GitHub:   {}", project.github);
                }
                if !project.demo.is_empty() {
                    println!("Demo:     {}", project.demo);
                }
                if !project.tags.is_empty() {
                    println!("Tags:     {}", project.tags.join(", "));
                }
                if !project.desc.is_empty() {
                    println!("About:    {}", project.desc);
                }
                let badges = badge_list(project);
                if !badges.is_empty() {
                    println!("Badges:   {}", badges.join(", "));
                }
                println!("Created:  {}", format_millis(project.created_at));
                println!("Position: {}", project.sort_order);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(project).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", project.id);
            }
        }
    }

    /// Print the project list
    pub fn print_projects(&self, projects: &[Project]) {
        match self.format {
            OutputFormat::Human => {
                if projects.is_empty() {
                    println!("No projects found.");
                    return;
                }
                for project in projects {
                    let badges = badge_list(project);
                    let badge_suffix = if badges.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", badges.join(","))
                    };
                    println!(
                        "{} | {}{} | {}",
                        short_id(&project.id),
                        truncate(&project.title, 40),
                        badge_suffix,
                        truncate(&project.tags.join(", "), 40)
                    );
                }
                println!("\n{} project(s)", projects.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(projects).unwrap());
            }
            OutputFormat::Quiet => {
                for project in projects {
                    println!("{}", project.id);
                }
            }
        }
    }

    /// Print skill entries grouped by category
    pub fn print_skills(&self, items: &[ExperienceItem]) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("No skills found.");
                    return;
                }
                for item in items {
                    println!(
                        "{} | {:<9} | {:<12} | {}",
                        short_id(&item.id),
                        item.category,
                        item.level,
                        item.skill
                    );
                }
                println!("\n{} skill(s)", items.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(items).unwrap());
            }
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item.id);
                }
            }
        }
    }

    /// Print qualification timeline entries
    pub fn print_qualifications(&self, items: &[QualificationItem]) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("No qualification entries found.");
                    return;
                }
                for item in items {
                    println!(
                        "{} | {:<10} | {} - {} ({})",
                        short_id(&item.id),
                        item.category,
                        item.title,
                        item.subtitle,
                        item.period
                    );
                }
                println!("\n{} entr(ies)", items.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(items).unwrap());
            }
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item.id);
                }
            }
        }
    }

    /// Print the resume record
    pub fn print_resume(&self, resume: &Resume) {
        match self.format {
            OutputFormat::Human => {
                if resume.url.is_empty() {
                    println!("No resume uploaded yet.");
                } else {
                    println!("URL:       {}", resume.url);
                }
                println!("File name: {}", resume.file_name);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(resume).unwrap());
            }
            OutputFormat::Quiet => {
                if !resume.url.is_empty() {
                    println!("{}", resume.url);
                }
            }
        }
    }

    /// Print the admin auth state
    pub fn print_auth_state(&self, state: &AuthState) {
        match self.format {
            OutputFormat::Human => {
                if !state.is_configured {
                    println!("Admin is not configured.");
                    println!("Set FOLIO_ADMIN_EMAIL and FOLIO_ADMIN_PASSWORD_HASH,");
                    println!("or run: folio admin set-credentials --email you@example.com");
                } else if state.is_authenticated {
                    println!("Logged in as {}", state.email);
                } else {
                    println!("Not logged in.");
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(state).unwrap());
            }
            OutputFormat::Quiet => {
                if state.is_authenticated {
                    println!("{}", state.email);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn badge_list(project: &Project) -> Vec<&'static str> {
    let mut badges = Vec::new();
    if project.is_new {
        badges.push("new");
    }
    if project.is_featured {
        badges.push("featured");
    }
    if project.is_popular {
        badges.push("popular");
    }
    badges
}

/// Leading id segment shown in list output
fn short_id(id: &str) -> String {
    id.chars().take(13).collect()
}

/// Epoch millis as a calendar date, or a dash when unset
fn format_millis(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("1754000000000-a1b2c3"), "1754000000000");
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(0), "1970-01-01 00:00");
        let formatted = format_millis(1754000000000);
        assert!(formatted.starts_with("2025-"));
    }

    #[test]
    fn test_badge_list() {
        let mut project = Project::new("X");
        assert!(badge_list(&project).is_empty());
        project.is_featured = true;
        project.is_new = true;
        assert_eq!(badge_list(&project), vec!["new", "featured"]);
    }
}
