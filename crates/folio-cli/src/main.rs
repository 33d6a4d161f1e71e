//! folio CLI
//!
//! The admin panel for folio portfolio content, plus read-only views of
//! every collection. Content persists to local JSON files or to a remote
//! endpoint depending on configuration; the commands are identical in
//! both modes.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use folio_core::Portfolio;

mod commands;
mod logging;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "folio - portfolio content with an embedded admin panel")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in as the admin
    Login {
        /// Admin email
        #[arg(long)]
        email: String,
        /// Admin password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// End the admin session
    Logout,
    /// Show backend mode, auth state and collection counts
    Status,
    /// Admin credential management
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Manage portfolio projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Manage experience skills
    Skill {
        #[command(subcommand)]
        command: SkillCommands,
    },
    /// Manage the qualification timeline
    Qualification {
        #[command(subcommand)]
        command: QualificationCommands,
    },
    /// Show or update the resume
    Resume {
        #[command(subcommand)]
        command: ResumeCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Follow a collection and print every change
    Watch {
        /// projects, experience, qualification or resume
        collection: String,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Show whether admin is configured and who is logged in
    Show,
    /// Store admin credentials in the data directory
    SetCredentials {
        /// Admin email
        #[arg(long)]
        email: String,
        /// Admin password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// Add a new project (goes to the front of the grid)
    #[command(alias = "add")]
    Create {
        /// Project title
        title: String,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        github: Option<String>,
        #[arg(long)]
        demo: Option<String>,
        /// Tags, repeatable
        #[arg(short, long)]
        tag: Vec<String>,
        /// Short description
        #[arg(long)]
        desc: Option<String>,
        /// Badge flags
        #[arg(long)]
        new: bool,
        #[arg(long)]
        featured: bool,
        #[arg(long)]
        popular: bool,
    },
    /// List all projects
    #[command(alias = "ls")]
    List,
    /// Show project details
    Show {
        /// Project id (full or prefix)
        id: String,
    },
    /// Edit fields of a project
    Edit {
        /// Project id (full or prefix)
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        github: Option<String>,
        #[arg(long)]
        demo: Option<String>,
        /// Replace the tag list, repeatable
        #[arg(short, long)]
        tag: Vec<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        new: Option<bool>,
        #[arg(long)]
        featured: Option<bool>,
        #[arg(long)]
        popular: Option<bool>,
    },
    /// Delete a project
    #[command(alias = "rm")]
    Delete {
        /// Project id (full or prefix)
        id: String,
    },
    /// Move one project to another's position
    Reorder {
        /// Id of the project to move
        source: String,
        /// Id of the project whose position it takes
        target: String,
    },
    /// Upload a project image, printing the hosted URL
    UploadImage {
        /// Image file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum SkillCommands {
    /// Add a new skill entry
    #[command(alias = "add")]
    Create {
        /// Skill name
        skill: String,
        /// basic, intermediate or proficient
        #[arg(long, default_value = "intermediate")]
        level: String,
        /// frontend or backend
        #[arg(long, default_value = "frontend")]
        category: String,
    },
    /// List skills
    #[command(alias = "ls")]
    List {
        /// Filter: frontend or backend
        #[arg(long)]
        category: Option<String>,
    },
    /// Edit a skill entry
    Edit {
        /// Skill id (full or prefix)
        id: String,
        #[arg(long)]
        skill: Option<String>,
        #[arg(long)]
        level: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a skill entry
    #[command(alias = "rm")]
    Delete {
        /// Skill id (full or prefix)
        id: String,
    },
    /// Move one skill to another's position
    Reorder {
        source: String,
        target: String,
    },
}

#[derive(Subcommand)]
enum QualificationCommands {
    /// Add a timeline entry
    #[command(alias = "add")]
    Create {
        /// Degree or role
        title: String,
        /// Institution or company
        #[arg(long)]
        subtitle: String,
        /// Free-text period, e.g. "2022 - 2026"
        #[arg(long)]
        period: String,
        /// education or experience
        #[arg(long, default_value = "education")]
        category: String,
    },
    /// List timeline entries
    #[command(alias = "ls")]
    List {
        /// Filter: education or experience
        #[arg(long)]
        category: Option<String>,
    },
    /// Edit a timeline entry
    Edit {
        /// Entry id (full or prefix)
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        subtitle: Option<String>,
        #[arg(long)]
        period: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a timeline entry
    #[command(alias = "rm")]
    Delete {
        /// Entry id (full or prefix)
        id: String,
    },
    /// Move one entry to another's position
    Reorder {
        source: String,
        target: String,
    },
}

#[derive(Subcommand)]
enum ResumeCommands {
    /// Show the current resume record
    Show,
    /// Point the resume at an already-hosted URL
    Set {
        #[arg(long)]
        url: String,
        /// Download file name shown to visitors
        #[arg(long)]
        file_name: Option<String>,
    },
    /// Upload a resume file and point the record at it
    Upload {
        /// Resume file (PDF)
        file: PathBuf,
        /// Download file name shown to visitors (defaults to the file's name)
        #[arg(long)]
        file_name: Option<String>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (see `folio config show`)
        key: String,
        /// Configuration value; empty or "none" clears optional keys
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug, cli.quiet);
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands work without opening the content system
    if let Commands::Config { command } = &cli.command {
        return commands::config::handle(command.clone(), &output);
    }

    let portfolio = Portfolio::open()?;
    tracing::debug!(
        backend = if portfolio.is_remote() { "remote" } else { "local" },
        "content system opened"
    );

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&portfolio, &email, password, &output)
        }
        Commands::Logout => commands::auth::logout(&portfolio, &output),
        Commands::Status => commands::status::show(&portfolio, &output).await,
        Commands::Admin { command } => match command {
            AdminCommands::Show => commands::auth::show(&portfolio, &output),
            AdminCommands::SetCredentials { email, password } => {
                commands::auth::set_credentials(&portfolio, &email, password, &output)
            }
        },
        Commands::Project { command } => {
            handle_project_command(command, &portfolio, &output).await
        }
        Commands::Skill { command } => handle_skill_command(command, &portfolio, &output).await,
        Commands::Qualification { command } => {
            handle_qualification_command(command, &portfolio, &output).await
        }
        Commands::Resume { command } => handle_resume_command(command, &portfolio, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Watch { collection } => {
            commands::watch::run(&portfolio, &collection, &output).await
        }
    }
}

async fn handle_project_command(
    command: ProjectCommands,
    portfolio: &Portfolio,
    output: &Output,
) -> Result<()> {
    match command {
        ProjectCommands::Create {
            title,
            image,
            github,
            demo,
            tag,
            desc,
            new,
            featured,
            popular,
        } => {
            commands::project::create(
                portfolio,
                commands::project::CreateArgs {
                    title,
                    image,
                    github,
                    demo,
                    tags: tag,
                    desc,
                    is_new: new,
                    is_featured: featured,
                    is_popular: popular,
                },
                output,
            )
            .await
        }
        ProjectCommands::List => commands::project::list(portfolio, output).await,
        ProjectCommands::Show { id } => commands::project::show(portfolio, &id, output).await,
        ProjectCommands::Edit {
            id,
            title,
            image,
            github,
            demo,
            tag,
            desc,
            new,
            featured,
            popular,
        } => {
            commands::project::edit(
                portfolio,
                &id,
                commands::project::EditArgs {
                    title,
                    image,
                    github,
                    demo,
                    tags: tag,
                    desc,
                    is_new: new,
                    is_featured: featured,
                    is_popular: popular,
                },
                output,
            )
            .await
        }
        ProjectCommands::Delete { id } => commands::project::delete(portfolio, &id, output).await,
        ProjectCommands::Reorder { source, target } => {
            commands::project::reorder(portfolio, &source, &target, output).await
        }
        ProjectCommands::UploadImage { file } => {
            commands::project::upload_image(portfolio, &file, output).await
        }
    }
}

async fn handle_skill_command(
    command: SkillCommands,
    portfolio: &Portfolio,
    output: &Output,
) -> Result<()> {
    match command {
        SkillCommands::Create {
            skill,
            level,
            category,
        } => commands::skill::create(portfolio, &skill, &level, &category, output).await,
        SkillCommands::List { category } => {
            commands::skill::list(portfolio, category.as_deref(), output).await
        }
        SkillCommands::Edit {
            id,
            skill,
            level,
            category,
        } => commands::skill::edit(portfolio, &id, skill, level, category, output).await,
        SkillCommands::Delete { id } => commands::skill::delete(portfolio, &id, output).await,
        SkillCommands::Reorder { source, target } => {
            commands::skill::reorder(portfolio, &source, &target, output).await
        }
    }
}

async fn handle_qualification_command(
    command: QualificationCommands,
    portfolio: &Portfolio,
    output: &Output,
) -> Result<()> {
    match command {
        QualificationCommands::Create {
            title,
            subtitle,
            period,
            category,
        } => {
            commands::qualification::create(portfolio, &title, &subtitle, &period, &category, output)
                .await
        }
        QualificationCommands::List { category } => {
            commands::qualification::list(portfolio, category.as_deref(), output).await
        }
        QualificationCommands::Edit {
            id,
            title,
            subtitle,
            period,
            category,
        } => {
            commands::qualification::edit(portfolio, &id, title, subtitle, period, category, output)
                .await
        }
        QualificationCommands::Delete { id } => {
            commands::qualification::delete(portfolio, &id, output).await
        }
        QualificationCommands::Reorder { source, target } => {
            commands::qualification::reorder(portfolio, &source, &target, output).await
        }
    }
}

async fn handle_resume_command(
    command: ResumeCommands,
    portfolio: &Portfolio,
    output: &Output,
) -> Result<()> {
    match command {
        ResumeCommands::Show => commands::resume::show(portfolio, output).await,
        ResumeCommands::Set { url, file_name } => {
            commands::resume::set(portfolio, &url, file_name, output).await
        }
        ResumeCommands::Upload { file, file_name } => {
            commands::resume::upload(portfolio, &file, file_name, output).await
        }
    }
}
