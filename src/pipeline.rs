// src/pipeline.rs
//! The five-stage tailoring pipeline: template → prompt → AI → artifact →
//! PDF. Strictly sequential; every stage fails fast and aborts the rest.

use chrono::Local;
use std::path::PathBuf;
use tracing::info;

use crate::compiler::{cleanup_aux_files, LatexCompiler};
use crate::config::Settings;
use crate::error::Result;
use crate::gemini::TextGenerator;
use crate::jobs::JobDescription;
use crate::output::OutputWriter;
use crate::prompt::PromptConfig;
use crate::templates::ResumeTemplate;

/// One run's immutable output pair. Created once per invocation, never
/// mutated; cleanup on disk is left to the user.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub tex_path: PathBuf,
    pub pdf_path: PathBuf,
}

pub struct ResumeTailor<'a, G, C> {
    settings: &'a Settings,
    prompts: &'a PromptConfig,
    generator: G,
    compiler: C,
}

impl<'a, G: TextGenerator, C: LatexCompiler> ResumeTailor<'a, G, C> {
    pub fn new(
        settings: &'a Settings,
        prompts: &'a PromptConfig,
        generator: G,
        compiler: C,
    ) -> Self {
        Self {
            settings,
            prompts,
            generator,
            compiler,
        }
    }

    /// Run the full pipeline for one job description.
    pub async fn run(&self, job: &JobDescription) -> Result<Artifact> {
        println!("Reading resume template...");
        let template = ResumeTemplate::load(self.settings)?;

        println!("Building prompt...");
        let prompt = self.prompts.render(&template.content, &job.text)?;
        info!("Prompt built ({} bytes)", prompt.len());

        println!("Customizing resume with Gemini...");
        let generated = self.generator.generate(&prompt).await?;

        println!("Saving customized resume...");
        let writer = OutputWriter::new(self.settings);
        let tex_path = writer.write(&generated, &template, job.title.as_deref(), Local::now())?;

        println!("Compiling PDF...");
        let result = self.compiler.compile(&tex_path)?;

        if self.settings.output.cleanup_aux_files {
            let removed = cleanup_aux_files(&tex_path, &self.settings.aux_extensions());
            info!("Cleaned up {} auxiliary files", removed);
        }

        Ok(Artifact {
            tex_path,
            pdf_path: result.pdf_path,
        })
    }
}
