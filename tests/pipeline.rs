//! End-to-end pipeline runs against mocked AI and compiler backends.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use resume_tailor::compiler::{CompilationResult, LatexCompiler};
use resume_tailor::config::Settings;
use resume_tailor::error::{Result, TailorError};
use resume_tailor::gemini::{ensure_latex, TextGenerator};
use resume_tailor::jobs::JobDescription;
use resume_tailor::pipeline::ResumeTailor;
use resume_tailor::prompt::PromptConfig;

const TAILORED: &str =
    "\\documentclass{resume}\n\\begin{document}\nRequires Go and distributed systems \
     experience.\n\\end{document}";

/// Returns a canned response after asserting the prompt carried both inputs.
struct CannedGenerator {
    response: String,
    expect_in_prompt: Vec<String>,
}

impl TextGenerator for CannedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        for needle in &self.expect_in_prompt {
            assert!(
                prompt.contains(needle),
                "prompt is missing expected text: {}",
                needle
            );
        }
        ensure_latex(&self.response)
    }
}

/// Writes a PDF plus the auxiliary droppings a real compiler leaves behind.
struct MessyCompiler;

impl LatexCompiler for MessyCompiler {
    fn compile(&self, tex_path: &Path) -> Result<CompilationResult> {
        for ext in ["aux", "log", "out"] {
            std::fs::write(tex_path.with_extension(ext), "junk").unwrap();
        }
        let pdf_path = tex_path.with_extension("pdf");
        std::fs::write(&pdf_path, b"%PDF-1.4").unwrap();
        Ok(CompilationResult {
            pdf_path,
            log: "Output written on doc.pdf".to_string(),
        })
    }
}

struct BrokenCompiler {
    log_tail: String,
}

impl LatexCompiler for BrokenCompiler {
    fn compile(&self, _tex_path: &Path) -> Result<CompilationResult> {
        Err(TailorError::CompilationFailed {
            log_tail: self.log_tail.clone(),
        })
    }
}

struct Workspace {
    _tmp: TempDir,
    settings: Settings,
    prompts: PromptConfig,
}

impl Workspace {
    fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let templates = tmp.path().join("templates");
        std::fs::create_dir_all(&templates).expect("create templates dir");
        std::fs::write(
            templates.join("resume.tex"),
            "\\documentclass{resume}\n\\begin{document}\noriginal resume\n\\end{document}",
        )
        .expect("write resume template");
        std::fs::write(templates.join("resume.cls"), "% resume class").expect("write class");

        let settings = Settings::load(tmp.path()).expect("load settings");
        let prompts = PromptConfig::load(tmp.path()).expect("load prompts");
        Self {
            _tmp: tmp,
            settings,
            prompts,
        }
    }

    fn output_files(&self) -> Vec<PathBuf> {
        let dir = self.settings.output_dir();
        if !dir.exists() {
            return Vec::new();
        }
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        files.sort();
        files
    }
}

#[tokio::test]
async fn backend_engineer_scenario_produces_expected_artifact() {
    let ws = Workspace::new();
    let job = JobDescription::from_text(
        "Requires Go and distributed systems experience.",
        Some("Backend Engineer".to_string()),
    )
    .unwrap();

    let generator = CannedGenerator {
        response: TAILORED.to_string(),
        expect_in_prompt: vec![
            "Requires Go and distributed systems experience.".to_string(),
            "original resume".to_string(),
        ],
    };

    let tailor = ResumeTailor::new(&ws.settings, &ws.prompts, generator, MessyCompiler);
    let artifact = tailor.run(&job).await.unwrap();

    let name = artifact.tex_path.file_name().unwrap().to_str().unwrap();
    assert!(
        name.starts_with("resume_Backend_Engineer_") && name.ends_with(".tex"),
        "unexpected artifact name: {}",
        name
    );
    assert_eq!(std::fs::read_to_string(&artifact.tex_path).unwrap(), TAILORED);
    assert!(artifact.pdf_path.exists());

    // The class file is staged next to the artifact for relative resolution.
    assert!(ws.settings.output_dir().join("resume.cls").exists());

    // Auxiliary droppings are cleaned up after a successful compile.
    for ext in ["aux", "log", "out"] {
        assert!(
            !artifact.tex_path.with_extension(ext).exists(),
            ".{} should have been cleaned up",
            ext
        );
    }
}

#[tokio::test]
async fn aux_cleanup_can_be_disabled() {
    let mut ws = Workspace::new();
    ws.settings.set("output.cleanup_aux_files", "false").unwrap();

    let job = JobDescription::from_text("posting", None).unwrap();
    let generator = CannedGenerator {
        response: TAILORED.to_string(),
        expect_in_prompt: Vec::new(),
    };

    let tailor = ResumeTailor::new(&ws.settings, &ws.prompts, generator, MessyCompiler);
    let artifact = tailor.run(&job).await.unwrap();
    assert!(artifact.tex_path.with_extension("aux").exists());
}

#[tokio::test]
async fn malformed_response_leaves_no_output_behind() {
    let ws = Workspace::new();
    let job = JobDescription::from_text("posting", Some("Dev".to_string())).unwrap();

    let generator = CannedGenerator {
        response: "I'm sorry, here is some prose instead of LaTeX.".to_string(),
        expect_in_prompt: Vec::new(),
    };

    let tailor = ResumeTailor::new(&ws.settings, &ws.prompts, generator, MessyCompiler);
    let err = tailor.run(&job).await.unwrap_err();

    assert!(matches!(err, TailorError::MalformedResponse(_)));
    assert_eq!(err.exit_code(), 3);
    assert!(ws.output_files().is_empty());
}

#[tokio::test]
async fn compiler_failure_message_carries_the_log_tail() {
    let ws = Workspace::new();
    let job = JobDescription::from_text("posting", Some("Dev".to_string())).unwrap();

    let generator = CannedGenerator {
        response: TAILORED.to_string(),
        expect_in_prompt: Vec::new(),
    };
    let compiler = BrokenCompiler {
        log_tail: "! Undefined control sequence.\nl.42 \\badmacro".to_string(),
    };

    let tailor = ResumeTailor::new(&ws.settings, &ws.prompts, generator, compiler);
    let err = tailor.run(&job).await.unwrap_err();

    assert_eq!(err.exit_code(), 4);
    let message = err.to_string();
    assert!(message.contains("l.42"), "log tail missing from: {}", message);

    // The .tex artifact was written before the compile stage failed.
    assert!(ws
        .output_files()
        .iter()
        .any(|p| p.extension().is_some_and(|e| e == "tex")));
}
