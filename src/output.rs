// src/output.rs
//! Writes the generated LaTeX to a timestamped, job-title-qualified path and
//! stages the class file alongside it for the compiler.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Settings;
use crate::error::{Result, TailorError};
use crate::templates::ResumeTemplate;

/// Replace whitespace and path-unsafe characters with underscores, keeping
/// alphanumerics, `-` and `_`, truncated to `max_len`.
pub fn sanitize_job_title(title: &str, max_len: usize) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();

    cleaned.chars().take(max_len).collect()
}

/// Deterministic output file name for one run.
pub fn artifact_file_name(
    job_title: Option<&str>,
    timestamp: DateTime<Local>,
    settings: &Settings,
) -> String {
    let stamp = timestamp.format("%Y%m%d_%H%M%S");
    let max_len = settings.output.max_job_title_length.max(0) as usize;

    let stem = match job_title.map(|t| sanitize_job_title(t, max_len)) {
        Some(clean) if !clean.is_empty() => format!("resume_{}", clean),
        _ => "resume_customized".to_string(),
    };

    if settings.output.include_timestamp {
        format!("{}_{}.tex", stem, stamp)
    } else {
        format!("{}.tex", stem)
    }
}

pub struct OutputWriter<'a> {
    settings: &'a Settings,
}

impl<'a> OutputWriter<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Write the generated LaTeX and copy the class file next to it so the
    /// compiler can resolve it by relative reference. Returns the `.tex` path.
    pub fn write(
        &self,
        generated: &str,
        template: &ResumeTemplate,
        job_title: Option<&str>,
        timestamp: DateTime<Local>,
    ) -> Result<PathBuf> {
        let output_dir = self.settings.output_dir();
        std::fs::create_dir_all(&output_dir).map_err(|source| TailorError::Write {
            path: output_dir.clone(),
            source,
        })?;

        let tex_path = output_dir.join(artifact_file_name(job_title, timestamp, self.settings));
        std::fs::write(&tex_path, generated).map_err(|source| TailorError::Write {
            path: tex_path.clone(),
            source,
        })?;
        info!("Wrote tailored resume to {}", tex_path.display());

        self.stage_class_file(template, &output_dir)?;

        Ok(tex_path)
    }

    fn stage_class_file(&self, template: &ResumeTemplate, output_dir: &Path) -> Result<()> {
        let Some(class_source) = &template.class_path else {
            return Ok(());
        };

        let dest = output_dir.join(&template.class_name);
        std::fs::copy(class_source, &dest).map_err(|source| TailorError::Write {
            path: dest.clone(),
            source,
        })?;
        info!("Copied {} to {}", template.class_name, output_dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 7, 14, 30, 5).unwrap()
    }

    fn template_with_class(dir: &Path) -> ResumeTemplate {
        let class_path = dir.join("resume.cls");
        std::fs::write(&class_path, "% class file").unwrap();
        ResumeTemplate {
            content: "tex".to_string(),
            class_path: Some(class_path),
            class_name: "resume.cls".to_string(),
        }
    }

    #[test]
    fn sanitizes_titles_for_filenames() {
        assert_eq!(sanitize_job_title("Backend Engineer", 50), "Backend_Engineer");
        assert_eq!(sanitize_job_title("C++/Go Dev!", 50), "CGo_Dev");
        assert_eq!(sanitize_job_title("  spaced  out  ", 50), "spaced__out");
        assert_eq!(sanitize_job_title("abcdef", 3), "abc");
    }

    #[test]
    fn file_name_follows_naming_rule() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(
            artifact_file_name(Some("Backend Engineer"), fixed_time(), &settings),
            "resume_Backend_Engineer_20260807_143005.tex"
        );
        assert_eq!(
            artifact_file_name(None, fixed_time(), &settings),
            "resume_customized_20260807_143005.tex"
        );
    }

    #[test]
    fn timestamp_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::load(dir.path()).unwrap();
        settings.set("output.include_timestamp", "false").unwrap();
        assert_eq!(
            artifact_file_name(Some("Dev"), fixed_time(), &settings),
            "resume_Dev.tex"
        );
    }

    #[test]
    fn writes_tex_and_copies_class_file() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        let template = template_with_class(dir.path());

        let writer = OutputWriter::new(&settings);
        let tex_path = writer
            .write("generated latex", &template, Some("Dev"), fixed_time())
            .unwrap();

        assert_eq!(std::fs::read_to_string(&tex_path).unwrap(), "generated latex");
        assert!(settings.output_dir().join("resume.cls").exists());
    }

    #[test]
    fn same_content_different_timestamps_gives_identical_copies() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        let template = ResumeTemplate {
            content: String::new(),
            class_path: None,
            class_name: "resume.cls".to_string(),
        };

        let writer = OutputWriter::new(&settings);
        let first = writer
            .write("same text", &template, Some("Dev"), fixed_time())
            .unwrap();
        let later = Local.with_ymd_and_hms(2026, 8, 7, 14, 30, 6).unwrap();
        let second = writer
            .write("same text", &template, Some("Dev"), later)
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(
            std::fs::read_to_string(&first).unwrap(),
            std::fs::read_to_string(&second).unwrap()
        );
    }
}
