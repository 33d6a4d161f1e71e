//! Config command handlers

use anyhow::{bail, Context, Result};

use folio_core::Config;

use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;

/// Dispatch a config subcommand (defaults to show)
pub fn handle(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => show(output),
        Some(ConfigCommands::Set { key, value }) => set(key, value, output),
    }
}

/// Show current configuration
///
/// Secrets are reported as set/not-set rather than echoed back.
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "supabase_url": config.supabase_url,
                    "supabase_key_set": config.supabase_key.is_some(),
                    "projects_table": config.projects_table,
                    "experience_table": config.experience_table,
                    "qualification_table": config.qualification_table,
                    "resume_table": config.resume_table,
                    "resume_bucket": config.resume_bucket,
                    "resume_folder": config.resume_folder,
                    "cloudinary_cloud_name": config.cloudinary_cloud_name,
                    "cloudinary_upload_preset_set": config.cloudinary_upload_preset.is_some(),
                    "cloudinary_folder": config.cloudinary_folder,
                    "poll_interval_secs": config.poll_interval_secs,
                    "max_upload_bytes": config.max_upload_bytes,
                    "admin_email": config.admin_email,
                    "admin_password_hash_set": config.admin_password_hash.is_some(),
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  data_dir:                 {}", config.data_dir.display());
            println!(
                "  supabase_url:             {}",
                config.supabase_url.as_deref().unwrap_or("(not set)")
            );
            println!(
                "  supabase_key:             {}",
                set_or_not(config.supabase_key.is_some())
            );
            println!("  projects_table:           {}", config.projects_table);
            println!("  experience_table:         {}", config.experience_table);
            println!("  qualification_table:      {}", config.qualification_table);
            println!("  resume_table:             {}", config.resume_table);
            println!("  resume_bucket:            {}", config.resume_bucket);
            println!("  resume_folder:            {}", config.resume_folder);
            println!(
                "  cloudinary_cloud_name:    {}",
                config
                    .cloudinary_cloud_name
                    .as_deref()
                    .unwrap_or("(not set)")
            );
            println!(
                "  cloudinary_upload_preset: {}",
                set_or_not(config.cloudinary_upload_preset.is_some())
            );
            println!("  cloudinary_folder:        {}", config.cloudinary_folder);
            println!("  poll_interval_secs:       {}", config.poll_interval_secs);
            println!("  max_upload_bytes:         {}", config.max_upload_bytes);
            println!(
                "  admin_email:              {}",
                config.admin_email.as_deref().unwrap_or("(not set)")
            );
            println!(
                "  admin_password_hash:      {}",
                set_or_not(config.admin_password_hash.is_some())
            );
            println!();
            println!("Config file: {}", Config::config_file_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value and save the file
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    let cleared = value.is_empty() || value == "none";
    let optional = |value: &str| {
        if value.is_empty() || value == "none" {
            None
        } else {
            Some(value.to_string())
        }
    };

    match key.as_str() {
        "data_dir" => config.data_dir = value.clone().into(),
        "supabase_url" => config.supabase_url = optional(&value),
        "supabase_key" => config.supabase_key = optional(&value),
        "projects_table" => config.projects_table = value.clone(),
        "experience_table" => config.experience_table = value.clone(),
        "qualification_table" => config.qualification_table = value.clone(),
        "resume_table" => config.resume_table = value.clone(),
        "resume_bucket" => config.resume_bucket = value.clone(),
        "resume_folder" => config.resume_folder = value.clone(),
        "cloudinary_cloud_name" => config.cloudinary_cloud_name = optional(&value),
        "cloudinary_upload_preset" => config.cloudinary_upload_preset = optional(&value),
        "cloudinary_folder" => config.cloudinary_folder = value.clone(),
        "poll_interval_secs" => {
            config.poll_interval_secs = value
                .parse()
                .context("Invalid value for poll_interval_secs. Use a number of seconds.")?;
        }
        "max_upload_bytes" => {
            config.max_upload_bytes = value
                .parse()
                .context("Invalid value for max_upload_bytes. Use a number of bytes.")?;
        }
        "admin_email" => config.admin_email = optional(&value),
        "admin_password_hash" => config.admin_password_hash = optional(&value),
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, supabase_url, supabase_key, projects_table, \
                 experience_table, qualification_table, resume_table, resume_bucket, \
                 resume_folder, cloudinary_cloud_name, cloudinary_upload_preset, \
                 cloudinary_folder, poll_interval_secs, max_upload_bytes, admin_email, \
                 admin_password_hash",
                key
            );
        }
    }

    config.save().context("Failed to save configuration")?;

    if cleared {
        output.success(&format!("Cleared {}", key));
    } else {
        output.success(&format!("Set {} = {}", key, value));
    }

    Ok(())
}

fn set_or_not(is_set: bool) -> &'static str {
    if is_set {
        "(set)"
    } else {
        "(not set)"
    }
}
