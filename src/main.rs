use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use bpmn_forge::{
    app::{ModelGateway, ProcessDescription, read_description_file},
    domain::{
        AVAILABLE_MODELS, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, GenerationError,
        GenerationParams, GenerationRequest, GenerationResult, display_name_for,
    },
    infra::llm::load_system_prompt,
};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const USER_ERROR_EXIT_CODE: u8 = 1;
const CONFIGURATION_EXIT_CODE: u8 = 2;

#[derive(Parser)]
#[command(name = "bpmn-forge")]
#[command(version, about = "Generate BPMN diagrams from process descriptions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a BPMN diagram from a process description
    Generate(GenerateArgs),
    /// List the available models and their pricing
    Models,
}

#[derive(Args)]
struct GenerateArgs {
    /// Free-text process description
    #[arg(long, conflicts_with_all = ["name", "flow"])]
    text: Option<String>,

    /// Process name (structured input)
    #[arg(long)]
    name: Option<String>,

    /// Process flow (structured input)
    #[arg(long)]
    flow: Option<String>,

    /// Read the description (or the flow, with --name) from a text file
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Model id; defaults to the first catalog entry
    #[arg(long, short)]
    model: Option<String>,

    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS, value_parser = clap::value_parser!(u32).range(1..))]
    max_tokens: u32,

    #[arg(long, env = "BPMN_FORGE_SYSTEM_PROMPT", default_value = "system_prompt.txt")]
    system_prompt: PathBuf,

    #[arg(long, short, default_value = "bpmn_files")]
    output_dir: PathBuf,
}

impl GenerateArgs {
    fn description(&self) -> Result<ProcessDescription, GenerationError> {
        let description = if self.name.is_some() || self.flow.is_some() {
            ProcessDescription::Structured {
                name: self.name.clone().unwrap_or_default(),
                flow: self.flow.clone().unwrap_or_default(),
            }
        } else {
            ProcessDescription::Simple {
                text: self.text.clone().unwrap_or_default(),
            }
        };

        match &self.file {
            Some(path) => Ok(description.with_file_contents(read_description_file(path)?)),
            None => Ok(description),
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Generate(args) => generate(&args),
        Commands::Models => {
            list_models();
            Ok(())
        }
    };

    if let Err(err) = &outcome {
        report_failure(err);
    }
    ExitCode::from(exit_status(&outcome))
}

/// Configuration problems exit with 2; anything the user can act on or retry
/// exits with 1.
fn exit_status(outcome: &Result<(), GenerationError>) -> u8 {
    match outcome {
        Ok(()) => 0,
        Err(err) if err.is_fatal() => CONFIGURATION_EXIT_CODE,
        Err(_) => USER_ERROR_EXIT_CODE,
    }
}

fn report_failure(err: &GenerationError) {
    if err.is_fatal() {
        error!(error = %err, "aborting");
        return;
    }
    if let GenerationError::GenericService { detail } | GenerationError::Unexpected { detail } =
        err
    {
        error!(detail = %detail, "generation failed");
    }
    eprintln!("{}", err.user_message());
}

fn generate(args: &GenerateArgs) -> Result<(), GenerationError> {
    let prompt = args.description()?.to_prompt()?;
    let gateway = ModelGateway::from_env()?;

    let request = GenerationRequest {
        prompt,
        system: load_system_prompt(Some(&args.system_prompt)),
        model: args.model.clone(),
        params: GenerationParams {
            temperature: args.temperature,
            max_tokens: args.max_tokens,
        },
    };

    let started = Instant::now();
    let result = gateway.generate(request)?;
    let elapsed = started.elapsed().as_secs_f64();
    info!(seconds = elapsed, "BPMN generated");

    let path = store_bpmn(&args.output_dir, &result.bpmn_xml)?;
    print_summary(&result, &path, elapsed);
    Ok(())
}

/// Writes the document to `<output_dir>/<uuid>.bpmn`.
fn store_bpmn(output_dir: &Path, bpmn_xml: &str) -> Result<PathBuf, GenerationError> {
    fs::create_dir_all(output_dir).map_err(|err| {
        GenerationError::unexpected(format!(
            "failed to create output directory '{}': {err}",
            output_dir.display()
        ))
    })?;

    let path = output_dir.join(format!("{}.bpmn", Uuid::new_v4()));
    fs::write(&path, bpmn_xml).map_err(|err| {
        GenerationError::unexpected(format!("failed to write '{}': {err}", path.display()))
    })?;
    info!(path = %path.display(), "saved BPMN file");
    Ok(path)
}

fn print_summary(result: &GenerationResult, path: &Path, elapsed_secs: f64) {
    let cost = result.cost();
    println!("BPMN file:      {}", path.display());
    println!(
        "Model:          {} ({})",
        display_name_for(&result.model),
        result.model
    );
    println!("Input tokens:   {}", result.usage.input_tokens);
    println!("Output tokens:  {}", result.usage.output_tokens);
    println!("Time:           {elapsed_secs:.2}s");
    println!("Estimated cost: ${:.6}", cost.total_cost);
}

fn list_models() {
    for model in AVAILABLE_MODELS {
        let marker = if model.id == DEFAULT_MODEL.id {
            " (default)"
        } else {
            ""
        };
        println!(
            "{:<28} {:<11} in ${:.7}/token  out ${:.7}/token{marker}",
            model.id,
            model.display_name,
            model.pricing.input_per_token,
            model.pricing.output_per_token
        );
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use bpmn_forge::domain::GenerationError;
    use clap::Parser;

    use super::{Cli, Commands, GenerateArgs, exit_status, store_bpmn};

    const BPMN: &str = r#"<?xml version="1.0" encoding="UTF-8"?><bpmn:definitions id="D"></bpmn:definitions>"#;

    fn generate_args(argv: &[&str]) -> GenerateArgs {
        let cli = Cli::try_parse_from(argv).expect("arguments should parse");
        match cli.command {
            Commands::Generate(args) => args,
            Commands::Models => panic!("expected the generate subcommand"),
        }
    }

    #[test]
    fn store_bpmn_writes_each_document_to_its_own_file() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let output_dir = dir.path().join("bpmn_files");

        let first = store_bpmn(&output_dir, BPMN).expect("first write should succeed");
        let second = store_bpmn(&output_dir, BPMN).expect("second write should succeed");

        assert_ne!(first, second);
        for path in [&first, &second] {
            assert_eq!(path.parent(), Some(output_dir.as_path()));
            assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("bpmn"));
            assert_eq!(fs::read_to_string(path).expect("file should exist"), BPMN);
        }
    }

    #[test]
    fn name_with_file_builds_structured_prompt_from_file_contents() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let flow_path = dir.path().join("flow.txt");
        fs::write(&flow_path, "Receive order, check stock, ship goods.\n")
            .expect("flow file should be written");
        let flow_arg = flow_path.to_str().expect("temp path should be UTF-8");

        let args = generate_args(&[
            "bpmn-forge",
            "generate",
            "--name",
            "Order fulfilment",
            "--file",
            flow_arg,
        ]);
        let prompt = args
            .description()
            .expect("description should load")
            .to_prompt()
            .expect("prompt should build");

        assert_eq!(
            prompt,
            "Process Name: Order fulfilment\n\nProcess Flow:\nReceive order, check stock, ship goods."
        );
    }

    #[test]
    fn text_conflicts_with_structured_flags() {
        let parsed =
            Cli::try_parse_from(["bpmn-forge", "generate", "--text", "Hire", "--name", "Hiring"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn exit_status_separates_configuration_from_user_errors() {
        assert_eq!(exit_status(&Ok(())), 0);
        assert_eq!(
            exit_status(&Err(GenerationError::configuration(
                "ANTHROPIC_API_KEY environment variable is not set"
            ))),
            2
        );
        assert_eq!(exit_status(&Err(GenerationError::ServiceOverloaded)), 1);
        assert_eq!(
            exit_status(&Err(GenerationError::validation("Process description is empty"))),
            1
        );
        assert_eq!(exit_status(&Err(GenerationError::unexpected("disk full"))), 1);
    }
}
