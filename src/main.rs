//! Wine Quality CLI
//!
//! # Commands
//!
//! - `serve` - Start the prediction page
//! - `predict` - Classify one preset case or a list of values
//! - `cases` - List the preset cases
//! - `inspect` - Show `.apr` artifact metadata

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use wine_quality::{
    artifacts::ArtifactInfo,
    cases::{case_at, EXAMPLE_CASES},
    config::{ArtifactPaths, ServerConfig, DEFAULT_HOST, DEFAULT_PORT},
    features::Feature,
    form::InputForm,
    predictor::Predictor,
    web, Result,
};

/// Wine quality predictions from chemistry measurements
#[derive(Parser)]
#[command(name = "wine-quality")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ArtifactArgs {
    /// Fitted scaler artifact (.apr)
    #[arg(long, env = "WINE_SCALER_PATH", default_value = "scaler.apr")]
    scaler: PathBuf,

    /// Fitted classifier artifact (.apr)
    #[arg(long, env = "WINE_MODEL_PATH", default_value = "wine_quality_model.apr")]
    model: PathBuf,
}

impl ArtifactArgs {
    fn into_paths(self) -> ArtifactPaths {
        ArtifactPaths {
            scaler: self.scaler,
            model: self.model,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the prediction page
    ///
    /// Examples:
    ///   wine-quality serve
    ///   wine-quality serve --port 9000 --model models/wine.apr
    Serve {
        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// Host to bind to
        #[arg(long, env = "WINE_HOST", default_value = DEFAULT_HOST)]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "WINE_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Classify one wine
    ///
    /// Examples:
    ///   wine-quality predict --case 1
    ///   wine-quality predict --values 7.3,0.65,0,1.2,0.065,15,21,0.9946,3.39,0.47,10
    Predict {
        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// Preset case number (1-6)
        #[arg(short, long, conflicts_with = "values", value_parser = clap::value_parser!(u8).range(1..=6))]
        case: Option<u8>,

        /// Eleven comma-separated values in feature order
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        values: Option<Vec<f64>>,
    },
    /// List the preset cases
    Cases,
    /// Show artifact metadata
    Inspect {
        /// Path to the .apr file
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Serve {
            artifacts,
            host,
            port,
        } => {
            let config = ServerConfig::new(artifacts.into_paths())
                .with_host(host)
                .with_port(port);
            web::serve(&config).await
        }
        Commands::Predict {
            artifacts,
            case,
            values,
        } => predict(artifacts.into_paths(), case, values),
        Commands::Cases => {
            print_cases();
            Ok(())
        }
        Commands::Inspect { path } => inspect(&path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn predict(paths: ArtifactPaths, case: Option<u8>, values: Option<Vec<f64>>) -> Result<()> {
    let record = match (case, values) {
        (_, Some(values)) => InputForm::from_values(&values)?.collect(),
        (Some(number), None) => InputForm::from_case(case_at(usize::from(number) - 1)).collect(),
        (None, None) => case_at(0).record,
    };

    let predictor = Predictor::load(&paths.scaler, &paths.model)?;
    let verdict = predictor.predict(&record)?;

    println!("This wine is predicted to be {verdict}.");
    println!();
    println!("Input Data Used:");
    for (feature, value) in record.iter() {
        println!("  {:<22} {value}", feature.label());
    }
    Ok(())
}

fn print_cases() {
    let header: Vec<&str> = Feature::ALL.iter().map(|f| f.label()).collect();
    println!("case  {}", header.join(" | "));
    for case in &EXAMPLE_CASES {
        let form = InputForm::from_case(case);
        let values: Vec<String> = form.fields().iter().map(|f| f.display_value()).collect();
        println!("{:<5} {}", case.number, values.join(" | "));
    }
}

fn inspect(path: &std::path::Path) -> Result<()> {
    let info = ArtifactInfo::from_path(path)?;

    println!("=== Artifact Info ===\n");
    println!("Path:        {}", path.display());
    println!("Type:        {:?}", info.model_type());
    println!("Name:        {}", info.name().unwrap_or("unnamed"));
    if let Some(description) = info.description() {
        println!("Description: {description}");
    }
    println!("Version:     {}.{}", info.version().0, info.version().1);
    println!("Payload:     {} bytes", info.payload_size());
    println!();
    println!("Flags:");
    println!("  Compressed: {}", if info.is_compressed() { "yes" } else { "no" });
    println!("  Encrypted:  {}", if info.is_encrypted() { "yes" } else { "no" });
    println!("  Signed:     {}", if info.is_signed() { "yes" } else { "no" });
    Ok(())
}
