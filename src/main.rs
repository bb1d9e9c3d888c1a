use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use resume_tailor::cli::{Cli, Command, ConfigCommand, JobCommand};
use resume_tailor::compiler::PdfLatexCompiler;
use resume_tailor::config::Settings;
use resume_tailor::error::{Result, TailorError};
use resume_tailor::gemini::GeminiClient;
use resume_tailor::jobs::{self, JobDescription};
use resume_tailor::pipeline::ResumeTailor;
use resume_tailor::prompt::PromptConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error ({}): {}", err.stage(), err);
            std::process::exit(err.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let mut settings = Settings::load(&config_dir)?;

    if let Some(command) = cli.command {
        return match command {
            Command::Config { command } => handle_config_command(settings, command),
            Command::Job {
                command: JobCommand::New,
            } => {
                jobs::create_job_file(&settings)?;
                Ok(0)
            }
        };
    }

    if cli.show_config {
        print!("{}", settings.summary());
        return Ok(0);
    }

    // Generation run: a job description is required, by text or by file.
    let job = match (&cli.job_description, &cli.job_file) {
        (Some(text), None) => JobDescription::from_text(text, cli.job_title.clone())?,
        (None, Some(path)) => JobDescription::from_file(path, cli.job_title.clone())?,
        _ => {
            eprintln!("Error: provide a job description via --job-description or --job-file");
            eprintln!("Run with --help for usage.");
            return Ok(2);
        }
    };

    let api_key = cli
        .api_key
        .clone()
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        .ok_or_else(|| {
            TailorError::Authentication(
                "no API key; pass --api-key or set GEMINI_API_KEY".to_string(),
            )
        })?;

    if let Some(model) = &cli.model {
        settings.ai.model = model.clone();
    }

    let generator = GeminiClient::new(
        api_key,
        settings.ai.model.clone(),
        settings.ai.timeout_secs.max(1) as u64,
    )?;
    let compiler = PdfLatexCompiler::from_settings(&settings);
    let prompts = PromptConfig::load(&config_dir)?;

    let tailor = ResumeTailor::new(&settings, &prompts, generator, compiler);
    let artifact = tailor.run(&job).await?;

    println!("\nResume customization completed successfully!");
    println!("  LaTeX file: {}", artifact.tex_path.display());
    println!("  PDF file:   {}", artifact.pdf_path.display());

    Ok(0)
}

fn handle_config_command(mut settings: Settings, command: ConfigCommand) -> Result<i32> {
    match command {
        ConfigCommand::Show => {
            print!("{}", settings.summary());
        }
        ConfigCommand::Set { setting, value } => {
            settings.set(&setting, &value)?;
            settings.save()?;
            println!("Updated {} = {}", setting, value);
        }
        ConfigCommand::Validate => {
            let issues = settings.validate();
            if issues.is_empty() {
                println!("Configuration is valid");
            } else {
                println!("Configuration issues found:");
                for issue in &issues {
                    println!("  - {}", issue);
                }
                return Ok(1);
            }
        }
        ConfigCommand::Reset { yes } => {
            if !yes && !confirm("This will reset all configuration to defaults. Continue? (y/N): ")?
            {
                println!("Reset cancelled");
                return Ok(0);
            }
            settings.reset()?;
            let mut prompts = PromptConfig::load(settings.config_dir())?;
            prompts.reset()?;
            println!("Configuration reset to defaults");
        }
        ConfigCommand::Prompt => {
            let prompts = PromptConfig::load(settings.config_dir())?;
            let sample = prompts.render(
                "[Your resume content would go here]",
                "[Job description would go here]",
            )?;
            println!("Current AI prompt, rendered with sample inputs:");
            println!("{}", "=".repeat(50));
            println!("{}", sample);
        }
        ConfigCommand::EditPrompt {
            section,
            key,
            value,
        } => {
            let mut prompts = PromptConfig::load(settings.config_dir())?;
            prompts.edit(&section, &key, &value)?;
            prompts.save()?;
            println!("Updated prompt {}.{}", section, key);
        }
        ConfigCommand::Models => {
            println!("Known Gemini models:");
            println!("  gemini-1.5-flash    (fast, general purpose)");
            println!("  gemini-1.5-pro      (more capable, slower)");
            println!("  gemini-pro          (legacy, may be deprecated)");
            println!("\nAvailability depends on your API access.");
        }
    }
    Ok(0)
}

fn confirm(question: &str) -> Result<bool> {
    print!("{}", question);
    std::io::stdout().flush().map_err(anyhow::Error::from)?;
    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .map_err(anyhow::Error::from)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
