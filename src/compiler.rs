// src/compiler.rs
//! External LaTeX compiler wrapped behind a capability interface so calling
//! code never inspects raw process plumbing.

use anyhow::Context;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{Result, TailorError};

/// Lines of compiler output surfaced to the user on failure. The full log
/// stays on disk next to the artifact.
const LOG_TAIL_LINES: usize = 25;

/// Outcome of a successful compilation: the produced PDF plus the captured
/// log text of the final pass.
#[derive(Debug, Clone)]
pub struct CompilationResult {
    pub pdf_path: PathBuf,
    pub log: String,
}

/// Capability interface over the external PDF compiler.
pub trait LatexCompiler {
    fn compile(&self, tex_path: &Path) -> Result<CompilationResult>;
}

/// Drives the configured compiler (`pdflatex` by default) in the artifact's
/// directory. Runs the configured number of passes; standard LaTeX needs a
/// second pass to resolve cross-references.
pub struct PdfLatexCompiler {
    program: String,
    options: Vec<String>,
    passes: u32,
}

impl PdfLatexCompiler {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            program: settings.latex.compiler.clone(),
            options: settings.compiler_options(),
            passes: settings.latex.compilation_passes.max(1) as u32,
        }
    }

    fn run_pass(&self, dir: &Path, file_name: &str) -> Result<String> {
        let output = Command::new(&self.program)
            .args(&self.options)
            .arg(file_name)
            .current_dir(dir)
            .output()
            .with_context(|| format!("Failed to execute {}", self.program))?;

        let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
        log.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(TailorError::CompilationFailed {
                log_tail: log_tail(&log, LOG_TAIL_LINES),
            });
        }

        Ok(log)
    }
}

impl LatexCompiler for PdfLatexCompiler {
    fn compile(&self, tex_path: &Path) -> Result<CompilationResult> {
        let dir = tex_path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = tex_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid tex path: {}", tex_path.display()))?;

        let mut log = String::new();
        for pass in 1..=self.passes {
            debug!("{} pass {}/{} on {}", self.program, pass, self.passes, file_name);
            log = self.run_pass(dir, file_name)?;
        }

        let pdf_path = tex_path.with_extension("pdf");
        if !pdf_path.exists() {
            return Err(TailorError::CompilationFailed {
                log_tail: format!(
                    "{} exited successfully but produced no {}",
                    self.program,
                    pdf_path.display()
                ),
            });
        }

        info!("Compiled {}", pdf_path.display());
        Ok(CompilationResult { pdf_path, log })
    }
}

/// Last `lines` lines of a compiler log.
pub fn log_tail(log: &str, lines: usize) -> String {
    let all: Vec<&str> = log.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

/// Remove auxiliary files (`.aux`, `.log`, ...) left behind by the compiler.
/// Returns how many were removed.
pub fn cleanup_aux_files(tex_path: &Path, extensions: &[String]) -> usize {
    let mut removed = 0;
    for ext in extensions {
        let aux = tex_path.with_extension(ext.trim_start_matches('.'));
        if aux.exists() && std::fs::remove_file(&aux).is_ok() {
            debug!("Removed {}", aux.display());
            removed += 1;
        }
    }
    removed
}
