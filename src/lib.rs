//! Tailor a LaTeX resume to a job description with Gemini and compile the
//! result to PDF. The pipeline is a strict sequence: load config → load
//! templates → build the prompt → call the AI backend → validate and write
//! the output → invoke the compiler.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod gemini;
pub mod jobs;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod templates;

pub use compiler::{LatexCompiler, PdfLatexCompiler};
pub use config::Settings;
pub use error::{Result, TailorError};
pub use gemini::{GeminiClient, TextGenerator};
pub use jobs::JobDescription;
pub use pipeline::{Artifact, ResumeTailor};
pub use prompt::PromptConfig;
pub use templates::ResumeTemplate;
