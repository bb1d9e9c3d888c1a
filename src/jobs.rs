// src/jobs.rs
//! Job description input: inline text, files, and an interactive helper that
//! saves a posting for later runs.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::error::TailorError;
use crate::output::sanitize_job_title;

/// Free-form posting text plus an optional title used for artifact naming.
#[derive(Debug, Clone)]
pub struct JobDescription {
    pub title: Option<String>,
    pub text: String,
}

impl JobDescription {
    pub fn from_text(text: &str, title: Option<String>) -> crate::error::Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TailorError::EmptyJobDescription);
        }
        Ok(Self {
            title,
            text: text.to_string(),
        })
    }

    pub fn from_file(path: &Path, title: Option<String>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Job description file not found at {}", path.display()))?;
        Self::from_text(&content, title)
    }
}

/// Interactive creator: prompts for a title, reads the posting from stdin
/// until EOF, and writes `<title>.txt` into the job descriptions directory.
/// Prints the generation command to run next.
pub fn create_job_file(settings: &Settings) -> Result<PathBuf> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("Job Description Creator");
    println!("{}", "=".repeat(35));
    print!("Job title: ");
    stdout.flush()?;

    let mut title = String::new();
    stdin.lock().read_line(&mut title)?;
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("Job title is required");
    }

    println!("\nPaste the job description below (Ctrl+D when done):");
    println!("{}", "-".repeat(50));

    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        lines.push(line?);
    }
    let content = lines.join("\n");
    let content = content.trim();
    if content.is_empty() {
        anyhow::bail!("Job description cannot be empty");
    }

    let path = save_job_file(settings, title, content)?;

    println!("\nSaved: {}", path.display());
    println!("\nRun the customizer with:");
    println!(
        "  retailor --job-file {} --job-title \"{}\"",
        path.display(),
        title
    );

    Ok(path)
}

/// Write a posting into the configured job descriptions directory under a
/// filename derived from the title.
pub fn save_job_file(settings: &Settings, title: &str, content: &str) -> Result<PathBuf> {
    let dir = settings.job_descriptions_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let max_len = settings.output.max_job_title_length.max(0) as usize;
    let file_name = format!("{}.txt", sanitize_job_title(title, max_len).to_lowercase());
    let path = dir.join(file_name);

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
