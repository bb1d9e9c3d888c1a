// src/templates.rs
//! Loads the LaTeX resume source and its companion class file as opaque
//! text. The pipeline never parses LaTeX semantically, only forwards it.

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::Settings;
use crate::error::{Result, TailorError};

/// The user's resume source plus zero-or-one companion class file.
#[derive(Debug, Clone)]
pub struct ResumeTemplate {
    pub content: String,
    pub class_path: Option<PathBuf>,
    pub class_name: String,
}

impl ResumeTemplate {
    /// Load the resume template per configuration. Lookup order: the
    /// configured templates directory, then the config directory root.
    pub fn load(settings: &Settings) -> Result<Self> {
        let candidates = [
            settings.templates_dir().join(&settings.files.resume_template),
            settings.config_dir().join(&settings.files.resume_template),
        ];

        let resume_path = candidates
            .iter()
            .find(|p| p.exists())
            .ok_or_else(|| TailorError::TemplateNotFound(candidates.to_vec()))?;

        let content = std::fs::read_to_string(resume_path)
            .with_context(|| format!("Failed to read {}", resume_path.display()))?;

        let class_path = find_class_file(settings);
        if class_path.is_none() {
            warn!(
                "Class file {} not found; compiling without it",
                settings.files.resume_class
            );
        }

        Ok(Self {
            content,
            class_path,
            class_name: settings.files.resume_class.clone(),
        })
    }
}

fn find_class_file(settings: &Settings) -> Option<PathBuf> {
    let candidates = [
        settings.templates_dir().join(&settings.files.resume_class),
        settings.config_dir().join(&settings.files.resume_class),
    ];
    candidates.into_iter().find(|p: &PathBuf| p.exists())
}

/// True when `dir` already holds a copy of the class file.
pub fn class_present(dir: &Path, class_name: &str) -> bool {
    dir.join(class_name).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings_in(dir: &Path) -> Settings {
        Settings::load(dir).unwrap()
    }

    #[test]
    fn loads_from_templates_dir_first() {
        let dir = TempDir::new().unwrap();
        let templates = dir.path().join("templates");
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(templates.join("resume.tex"), "from templates").unwrap();
        std::fs::write(dir.path().join("resume.tex"), "from root").unwrap();

        let template = ResumeTemplate::load(&settings_in(dir.path())).unwrap();
        assert_eq!(template.content, "from templates");
    }

    #[test]
    fn falls_back_to_config_dir_root() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("resume.tex"), "root copy").unwrap();

        let template = ResumeTemplate::load(&settings_in(dir.path())).unwrap();
        assert_eq!(template.content, "root copy");
        assert!(template.class_path.is_none());
    }

    #[test]
    fn missing_template_names_searched_paths() {
        let dir = TempDir::new().unwrap();
        match ResumeTemplate::load(&settings_in(dir.path())) {
            Err(TailorError::TemplateNotFound(paths)) => assert_eq!(paths.len(), 2),
            other => panic!("expected TemplateNotFound, got {:?}", other),
        }
    }

    #[test]
    fn class_file_is_optional_but_found_when_present() {
        let dir = TempDir::new().unwrap();
        let templates = dir.path().join("templates");
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(templates.join("resume.tex"), "tex").unwrap();
        std::fs::write(templates.join("resume.cls"), "cls").unwrap();

        let template = ResumeTemplate::load(&settings_in(dir.path())).unwrap();
        assert_eq!(template.class_path, Some(templates.join("resume.cls")));
        assert_eq!(template.class_name, "resume.cls");
    }
}
