// src/config.rs
//! Typed settings over `config.toml` with dotted-key access.
//!
//! Every key has a built-in default; an unset key falls back to its default
//! instead of failing. The file is read-only at pipeline runtime and mutated
//! only through the `config` subcommand.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Result, TailorError};

pub const CONFIG_FILE: &str = "config.toml";

/// Tagged configuration value. Values are validated against the key's type
/// at the config boundary; the rest of the pipeline reads typed accessors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Path(PathBuf),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Str(s) => write!(f, "{}", s),
            ConfigValue::Int(i) => write!(f, "{}", i),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSection {
    pub model: String,
    pub timeout_secs: i64,
}

impl Default for AiSection {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub job_descriptions_dir: PathBuf,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("output"),
            job_descriptions_dir: PathBuf::from("job_descriptions"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesSection {
    pub resume_template: String,
    pub resume_class: String,
}

impl Default for FilesSection {
    fn default() -> Self {
        Self {
            resume_template: "resume.tex".to_string(),
            resume_class: "resume.cls".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub max_job_title_length: i64,
    pub include_timestamp: bool,
    pub cleanup_aux_files: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            max_job_title_length: 50,
            include_timestamp: true,
            cleanup_aux_files: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LatexSection {
    pub compiler: String,
    pub compilation_passes: i64,
    pub compiler_options: String,
    pub aux_extensions: String,
}

impl Default for LatexSection {
    fn default() -> Self {
        Self {
            compiler: "pdflatex".to_string(),
            compilation_passes: 2,
            compiler_options: "-interaction=nonstopmode".to_string(),
            aux_extensions: ".aux,.log,.out,.fdb_latexmk,.fls,.synctex.gz".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
struct SettingsFile {
    ai: AiSection,
    paths: PathsSection,
    files: FilesSection,
    output: OutputSection,
    latex: LatexSection,
}

/// Effective configuration: file overrides layered on built-in defaults,
/// anchored at a config directory for relative path resolution.
#[derive(Debug, Clone)]
pub struct Settings {
    pub ai: AiSection,
    pub paths: PathsSection,
    pub files: FilesSection,
    pub output: OutputSection,
    pub latex: LatexSection,
    config_dir: PathBuf,
}

/// All recognized dotted keys, in display order.
pub const KEYS: &[&str] = &[
    "ai.model",
    "ai.timeout_secs",
    "paths.templates_dir",
    "paths.output_dir",
    "paths.job_descriptions_dir",
    "files.resume_template",
    "files.resume_class",
    "output.max_job_title_length",
    "output.include_timestamp",
    "output.cleanup_aux_files",
    "latex.compiler",
    "latex.compilation_passes",
    "latex.compiler_options",
    "latex.aux_extensions",
];

impl Settings {
    /// Load settings from `config.toml` under `config_dir`, falling back to
    /// built-in defaults for anything unset. A missing file is not an error.
    pub fn load(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();
        let path = config_dir.join(CONFIG_FILE);

        let file: SettingsFile = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            SettingsFile::default()
        };

        Ok(Self {
            ai: file.ai,
            paths: file.paths,
            files: file.files,
            output: file.output,
            latex: file.latex,
            config_dir,
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get a value by dotted key. Never fails: an unknown key logs a warning
    /// and yields an empty string value.
    pub fn get(&self, key: &str) -> ConfigValue {
        match key {
            "ai.model" => ConfigValue::Str(self.ai.model.clone()),
            "ai.timeout_secs" => ConfigValue::Int(self.ai.timeout_secs),
            "paths.templates_dir" => ConfigValue::Path(self.paths.templates_dir.clone()),
            "paths.output_dir" => ConfigValue::Path(self.paths.output_dir.clone()),
            "paths.job_descriptions_dir" => {
                ConfigValue::Path(self.paths.job_descriptions_dir.clone())
            }
            "files.resume_template" => ConfigValue::Str(self.files.resume_template.clone()),
            "files.resume_class" => ConfigValue::Str(self.files.resume_class.clone()),
            "output.max_job_title_length" => ConfigValue::Int(self.output.max_job_title_length),
            "output.include_timestamp" => ConfigValue::Bool(self.output.include_timestamp),
            "output.cleanup_aux_files" => ConfigValue::Bool(self.output.cleanup_aux_files),
            "latex.compiler" => ConfigValue::Str(self.latex.compiler.clone()),
            "latex.compilation_passes" => ConfigValue::Int(self.latex.compilation_passes),
            "latex.compiler_options" => ConfigValue::Str(self.latex.compiler_options.clone()),
            "latex.aux_extensions" => ConfigValue::Str(self.latex.aux_extensions.clone()),
            _ => {
                warn!("Unknown configuration key requested: {}", key);
                ConfigValue::Str(String::new())
            }
        }
    }

    /// Set a value by dotted key, validating against the key's type.
    /// Does not persist; call `save` afterwards.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fn int(key: &str, value: &str) -> Result<i64> {
            value.parse().map_err(|_| TailorError::InvalidValue {
                key: key.to_string(),
                expected: "integer",
                value: value.to_string(),
            })
        }
        fn boolean(key: &str, value: &str) -> Result<bool> {
            match value.to_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(true),
                "false" | "no" | "0" => Ok(false),
                _ => Err(TailorError::InvalidValue {
                    key: key.to_string(),
                    expected: "boolean",
                    value: value.to_string(),
                }),
            }
        }

        match key {
            "ai.model" => self.ai.model = value.to_string(),
            "ai.timeout_secs" => self.ai.timeout_secs = int(key, value)?,
            "paths.templates_dir" => self.paths.templates_dir = PathBuf::from(value),
            "paths.output_dir" => self.paths.output_dir = PathBuf::from(value),
            "paths.job_descriptions_dir" => {
                self.paths.job_descriptions_dir = PathBuf::from(value)
            }
            "files.resume_template" => self.files.resume_template = value.to_string(),
            "files.resume_class" => self.files.resume_class = value.to_string(),
            "output.max_job_title_length" => {
                self.output.max_job_title_length = int(key, value)?
            }
            "output.include_timestamp" => self.output.include_timestamp = boolean(key, value)?,
            "output.cleanup_aux_files" => self.output.cleanup_aux_files = boolean(key, value)?,
            "latex.compiler" => self.latex.compiler = value.to_string(),
            "latex.compilation_passes" => self.latex.compilation_passes = int(key, value)?,
            "latex.compiler_options" => self.latex.compiler_options = value.to_string(),
            "latex.aux_extensions" => self.latex.aux_extensions = value.to_string(),
            _ => return Err(TailorError::InvalidKey(key.to_string())),
        }
        Ok(())
    }

    /// Restore built-in defaults, discarding overrides irreversibly, and
    /// rewrite `config.toml`.
    pub fn reset(&mut self) -> Result<()> {
        let defaults = SettingsFile::default();
        self.ai = defaults.ai;
        self.paths = defaults.paths;
        self.files = defaults.files;
        self.output = defaults.output;
        self.latex = defaults.latex;
        self.save()
    }

    /// Persist the current values to `config.toml` under the config directory.
    pub fn save(&self) -> Result<()> {
        let file = SettingsFile {
            ai: self.ai.clone(),
            paths: self.paths.clone(),
            files: self.files.clone(),
            output: self.output.clone(),
            latex: self.latex.clone(),
        };
        let content =
            toml::to_string_pretty(&file).context("Failed to serialize configuration")?;
        let path = self.config_dir.join(CONFIG_FILE);
        std::fs::write(&path, content).map_err(|source| TailorError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Non-fatal diagnostic pass over the effective configuration.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let templates_dir = self.templates_dir();
        if !templates_dir.exists() {
            issues.push(format!(
                "Templates directory not found: {}",
                templates_dir.display()
            ));
        }

        let resume_template = templates_dir.join(&self.files.resume_template);
        if !resume_template.exists() {
            issues.push(format!(
                "Resume template not found: {}",
                resume_template.display()
            ));
        }

        if find_program(&self.latex.compiler).is_none() {
            issues.push(format!(
                "LaTeX compiler not found on PATH: {}",
                self.latex.compiler
            ));
        }

        if self.latex.compilation_passes < 1 {
            issues.push(format!(
                "latex.compilation_passes must be at least 1 (currently {})",
                self.latex.compilation_passes
            ));
        }

        issues
    }

    fn resolve(&self, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.config_dir.join(relative)
        }
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.resolve(&self.paths.templates_dir)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.paths.output_dir)
    }

    pub fn job_descriptions_dir(&self) -> PathBuf {
        self.resolve(&self.paths.job_descriptions_dir)
    }

    /// Compiler options as an argument list.
    pub fn compiler_options(&self) -> Vec<String> {
        self.latex
            .compiler_options
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// Auxiliary file extensions to clean up after a successful compile.
    pub fn aux_extensions(&self) -> Vec<String> {
        self.latex
            .aux_extensions
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Human-readable summary of the effective configuration.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str("Resume Tailor Configuration\n");
        out.push_str(&"=".repeat(50));
        out.push('\n');
        out.push_str("\nAI Settings:\n");
        out.push_str(&format!("  Model: {}\n", self.ai.model));
        out.push_str(&format!("  Timeout: {}s\n", self.ai.timeout_secs));
        out.push_str("\nPaths:\n");
        out.push_str(&format!(
            "  Templates Directory: {}\n",
            self.templates_dir().display()
        ));
        out.push_str(&format!(
            "  Output Directory: {}\n",
            self.output_dir().display()
        ));
        out.push_str(&format!(
            "  Job Descriptions: {}\n",
            self.job_descriptions_dir().display()
        ));
        out.push_str("\nLaTeX Settings:\n");
        out.push_str(&format!("  Compiler: {}\n", self.latex.compiler));
        out.push_str(&format!(
            "  Compilation Passes: {}\n",
            self.latex.compilation_passes
        ));
        out.push_str(&format!(
            "  Compiler Options: {}\n",
            self.latex.compiler_options
        ));
        out.push_str("\nOutput Settings:\n");
        out.push_str(&format!(
            "  Include Timestamp: {}\n",
            self.output.include_timestamp
        ));
        out.push_str(&format!(
            "  Cleanup Aux Files: {}\n",
            self.output.cleanup_aux_files
        ));
        out.push_str(&format!(
            "  Max Job Title Length: {}\n",
            self.output.max_job_title_length
        ));
        out
    }
}

/// Locate a program on PATH.
pub fn find_program(name: &str) -> Option<PathBuf> {
    let name_path = Path::new(name);
    if name_path.is_absolute() {
        return name_path.is_file().then(|| name_path.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
