// src/prompt.rs
//! Prompt assembly: editable prompt pieces from `prompts.toml` rendered into
//! a fixed instruction skeleton via `{{placeholder}}` substitution.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Result, TailorError};

pub const PROMPTS_FILE: &str = "prompts.toml";

/// Instruction skeleton sent to the model. Placeholders are filled from the
/// prompt pieces plus the per-run resume and job description.
const PROMPT_TEMPLATE: &str = "\
{{role}}

{{context}}

Focus on: {{focus_areas}}

IMPORTANT REQUIREMENTS:
- {{format_requirements}}
- {{quality_guidelines}}
- {{approach}}

OUTPUT FORMAT:
Please return ONLY the complete customized LaTeX resume content. Do not \
include any explanations, markdown formatting, or additional text outside \
the LaTeX code.

Here's my current resume:
{{resume_content}}

Here's the job description:
{{job_description}}

Please provide the customized resume in LaTeX format:";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSection {
    pub role: String,
}

impl Default for SystemSection {
    fn default() -> Self {
        Self {
            role: "You are an expert resume writer and career consultant.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstructionsSection {
    pub context: String,
}

impl Default for InstructionsSection {
    fn default() -> Self {
        Self {
            context: "Customize the resume to match the job requirements while \
                      keeping the same LaTeX structure and formatting. Highlight \
                      relevant skills and experiences, align the summary with the \
                      role, and use keywords from the job description where \
                      appropriate. Don't add any content that isn't true or \
                      verifiable."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomizationSection {
    pub focus_areas: String,
}

impl Default for CustomizationSection {
    fn default() -> Self {
        Self {
            focus_areas: "skills, experience, summary, keywords".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFormatSection {
    pub format_requirements: String,
    pub quality_guidelines: String,
}

impl Default for OutputFormatSection {
    fn default() -> Self {
        Self {
            format_requirements: "Return only LaTeX code, preserving all commands \
                                  and document structure exactly."
                .to_string(),
            quality_guidelines: "Ensure proper LaTeX syntax that compiles cleanly."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSection {
    pub approach: String,
}

impl Default for StyleSection {
    fn default() -> Self {
        Self {
            approach: "Maintain a professional tone and factual accuracy.".to_string(),
        }
    }
}

/// Editable prompt pieces, persisted as `prompts.toml` next to `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptConfig {
    pub system: SystemSection,
    pub instructions: InstructionsSection,
    pub customization: CustomizationSection,
    pub output: OutputFormatSection,
    pub style: StyleSection,
    #[serde(skip)]
    config_dir: PathBuf,
}

impl PromptConfig {
    /// Load prompt pieces from `prompts.toml`, defaults for anything unset.
    pub fn load(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();
        let path = config_dir.join(PROMPTS_FILE);

        let mut config: PromptConfig = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            PromptConfig::default()
        };
        config.config_dir = config_dir;
        Ok(config)
    }

    /// Persist the prompt pieces to `prompts.toml`.
    pub fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize prompts")?;
        let path = self.config_dir.join(PROMPTS_FILE);
        std::fs::write(&path, content).map_err(|source| TailorError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Restore built-in defaults, keeping the config directory anchor, and
    /// rewrite `prompts.toml`.
    pub fn reset(&mut self) -> Result<()> {
        let defaults = PromptConfig::default();
        self.system = defaults.system;
        self.instructions = defaults.instructions;
        self.customization = defaults.customization;
        self.output = defaults.output;
        self.style = defaults.style;
        self.save()
    }

    /// Update one prompt piece by section and key. Does not persist.
    pub fn edit(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        match (section, key) {
            ("system", "role") => self.system.role = value.to_string(),
            ("instructions", "context") => self.instructions.context = value.to_string(),
            ("customization", "focus_areas") => {
                self.customization.focus_areas = value.to_string()
            }
            ("output", "format_requirements") => {
                self.output.format_requirements = value.to_string()
            }
            ("output", "quality_guidelines") => {
                self.output.quality_guidelines = value.to_string()
            }
            ("style", "approach") => self.style.approach = value.to_string(),
            _ => return Err(TailorError::InvalidKey(format!("{}.{}", section, key))),
        }
        Ok(())
    }

    /// Render the full instruction payload for one run.
    pub fn render(&self, resume_content: &str, job_description: &str) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("role".to_string(), self.system.role.clone());
        vars.insert("context".to_string(), self.instructions.context.clone());
        vars.insert(
            "focus_areas".to_string(),
            self.customization.focus_areas.clone(),
        );
        vars.insert(
            "format_requirements".to_string(),
            self.output.format_requirements.clone(),
        );
        vars.insert(
            "quality_guidelines".to_string(),
            self.output.quality_guidelines.clone(),
        );
        vars.insert("approach".to_string(), self.style.approach.clone());
        vars.insert("resume_content".to_string(), resume_content.to_string());
        vars.insert("job_description".to_string(), job_description.to_string());

        build(PROMPT_TEMPLATE, &vars)
    }
}

/// Substitute `{{name}}` placeholders. Substitution only, no conditional
/// logic. Fails with `MissingPlaceholder` if the template references a
/// variable that was not supplied.
pub fn build(template: &str, vars: &HashMap<String, String>) -> Result<String> {
    for name in placeholders(template) {
        if !vars.contains_key(&name) {
            return Err(TailorError::MissingPlaceholder(name));
        }
    }

    Ok(vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{{{}}}}}", key), value)
    }))
}

/// Placeholder names referenced by a template, in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let bytes = template.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'{' && bytes[i + 1] == b'{' {
            if let Some(end) = template[i + 2..].find("}}") {
                let name = &template[i + 2..i + 2 + end];
                if !name.is_empty()
                    && name
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    if !names.contains(&name.to_string()) {
                        names.push(name.to_string());
                    }
                    i += end + 4;
                    continue;
                }
            }
        }
        i += 1;
    }
    names
}
