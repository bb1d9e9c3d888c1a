// src/cli.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "retailor")]
#[command(version)]
#[command(about = "Tailor a LaTeX resume to a job description with Gemini and compile it to PDF")]
pub struct Cli {
    /// Job description as text
    #[arg(short = 'd', long, conflicts_with = "job_file")]
    pub job_description: Option<String>,

    /// Path to a text file containing the job description
    #[arg(short = 'f', long)]
    pub job_file: Option<PathBuf>,

    /// Job title, used for output file naming
    #[arg(short = 't', long)]
    pub job_title: Option<String>,

    /// Gemini API key (falls back to the GEMINI_API_KEY environment variable)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Directory holding config.toml and prompts.toml (default: current directory)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Override the configured AI model for this run only
    #[arg(long)]
    pub model: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage configuration and prompt settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Manage saved job descriptions
    Job {
        #[command(subcommand)]
        command: JobCommand,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Setting in section.key form, e.g. ai.model
        setting: String,
        value: String,
    },
    /// Validate current configuration
    Validate,
    /// Reset configuration to built-in defaults
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show the AI prompt rendered with sample inputs
    Prompt,
    /// Edit a prompt piece
    EditPrompt {
        /// Prompt section, e.g. system
        section: String,
        /// Key within the section, e.g. role
        key: String,
        value: String,
    },
    /// List known AI models
    Models,
}

#[derive(Subcommand)]
pub enum JobCommand {
    /// Interactively create a job description file
    New,
}
