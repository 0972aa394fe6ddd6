//! Affect CLI - Command-line interface for Synheart Affect
//!
//! Commands:
//! - score: Score assessment requests into report envelopes (batch mode)
//! - validate: Validate assessment request schema
//! - analyze: Run an image through the provider fallback chain
//! - combine: Score one questionnaire with optional voice readings
//! - fuse: Weighted fusion of voice, sentiment, keyword and facial components
//! - frames: Multi-frame facial stress over several images
//! - doctor: Diagnose configuration and provider availability
//! - thresholds: Print the severity classification tables

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

use synheart_affect::chain::SourceFallbackChain;
use synheart_affect::fusion::{ComponentInputs, WeightedFusion};
use synheart_affect::pipeline::{process_request, AssessmentProcessor};
use synheart_affect::report::{AffectReport, ReportEncoder};
use synheart_affect::schema::{
    AssessmentRequest, FormSpec, RequestAdapter, ValidationError, SCHEMA_VERSION,
};
use synheart_affect::scoring::DASS21_SCALE_FACTOR;
use synheart_affect::severity::{
    SeverityClassifier, EMOTION_STRESS_THRESHOLDS, FRAME_STRESS_THRESHOLDS, OVERALL_THRESHOLDS,
};
use synheart_affect::sources::ImageInput;
use synheart_affect::types::{DassCategory, VoiceReading};
use synheart_affect::{AffectConfig, AssessError, AFFECT_VERSION, PRODUCER_NAME};

/// Affect - Multi-source emotion and stress scoring engine
#[derive(Parser)]
#[command(name = "affect")]
#[command(author = "Synheart AI Inc")]
#[command(version = AFFECT_VERSION)]
#[command(about = "Score facial emotion and DASS questionnaires into stress reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score assessment requests into report envelopes (batch mode)
    Score {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,
    },

    /// Validate assessment request schema
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run an image through the provider fallback chain
    Analyze {
        /// Image file path (use - for stdin)
        #[arg(short, long)]
        image: PathBuf,

        /// User identifier forwarded to the analysis service
        #[arg(long)]
        user_id: Option<String>,

        /// Skip the availability probe and try every provider
        #[arg(long)]
        no_probe: bool,

        #[command(flatten)]
        providers: ProviderArgs,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Score one questionnaire with optional voice readings
    Combine {
        /// Comma-separated item responses (0-3)
        #[arg(long, value_delimiter = ',', required = true)]
        responses: Vec<u8>,

        /// Questionnaire form
        #[arg(long, default_value = "dass21")]
        form: FormArg,

        /// JSON file with an array of per-question voice readings
        #[arg(long)]
        voice: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Fuse voice, sentiment, keyword and facial components
    Fuse {
        /// JSON file with the component inputs (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Image to take the facial component from
        #[arg(long)]
        image: Option<PathBuf>,

        /// Skip the availability probe and try every provider
        #[arg(long)]
        no_probe: bool,

        #[command(flatten)]
        providers: ProviderArgs,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Summarize facial stress over several frames
    Frames {
        /// Frame image paths, in capture order
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Skip the availability probe and try every provider
        #[arg(long)]
        no_probe: bool,

        #[command(flatten)]
        providers: ProviderArgs,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Diagnose configuration and provider availability
    Doctor {
        #[command(flatten)]
        providers: ProviderArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the severity classification tables
    Thresholds {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Provider configuration shared by commands that reach the network
#[derive(Args)]
struct ProviderArgs {
    /// TOML configuration file
    #[arg(short, long, env = "AFFECT_CONFIG")]
    config: Option<PathBuf>,

    /// Hosted inference endpoint
    #[arg(long, env = "AFFECT_PRIMARY_URL")]
    primary_url: Option<String>,

    /// Bearer token for the hosted inference endpoint
    #[arg(long, env = "AFFECT_PRIMARY_TOKEN", hide_env_values = true)]
    primary_token: Option<String>,

    /// Base URL of the analysis service
    #[arg(long, env = "AFFECT_SECONDARY_URL")]
    secondary_url: Option<String>,
}

impl ProviderArgs {
    fn resolve(&self) -> Result<AffectConfig, AffectCliError> {
        let mut config = match &self.config {
            Some(path) => AffectConfig::load(path)?,
            None => AffectConfig::default(),
        };

        if let Some(url) = &self.primary_url {
            config.primary.url = url.clone();
        }
        if let Some(token) = &self.primary_token {
            config.primary.api_token = Some(token.clone());
        }
        if let Some(url) = &self.secondary_url {
            config.secondary.base_url = url.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one request per line)
    Ndjson,
    /// JSON array of requests
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// JSON array of records
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum FormArg {
    /// Standard DASS-21 item layout
    Dass21,
    /// Round-robin depression/anxiety/stress layout
    Interleaved,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("AFFECT_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), AffectCliError> {
    match cli.command {
        Commands::Score {
            input,
            output,
            input_format,
            output_format,
        } => cmd_score(&input, &output, input_format, output_format),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Analyze {
            image,
            user_id,
            no_probe,
            providers,
            output_format,
        } => cmd_analyze(&image, user_id, no_probe, &providers, output_format),

        Commands::Combine {
            responses,
            form,
            voice,
            output_format,
        } => cmd_combine(&responses, form, voice.as_deref(), output_format),

        Commands::Fuse {
            input,
            image,
            no_probe,
            providers,
            output_format,
        } => cmd_fuse(&input, image.as_deref(), no_probe, &providers, output_format),

        Commands::Frames {
            images,
            no_probe,
            providers,
            output_format,
        } => cmd_frames(&images, no_probe, &providers, output_format),

        Commands::Doctor { providers, json } => cmd_doctor(&providers, json),

        Commands::Thresholds { json } => cmd_thresholds(json),
    }
}

fn read_input(input: &Path) -> Result<String, AffectCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn parse_requests(
    input_data: &str,
    input_format: InputFormat,
) -> Result<Vec<AssessmentRequest>, AffectCliError> {
    let requests = match input_format {
        InputFormat::Ndjson => RequestAdapter::parse_ndjson(input_data)?,
        InputFormat::Json => RequestAdapter::parse_array(input_data)?,
    };
    if requests.is_empty() {
        return Err(AffectCliError::NoRequests);
    }
    Ok(requests)
}

fn cmd_score(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
) -> Result<(), AffectCliError> {
    let requests = parse_requests(&read_input(input)?, input_format)?;
    let encoder = ReportEncoder::new();

    let mut reports: Vec<AffectReport> = Vec::with_capacity(requests.len());
    for request in &requests {
        request.validate()?;
        reports.push(encoder.encode_assessment(process_request(request)?));
    }

    tracing::info!(count = reports.len(), "Scored assessment requests");

    let output_data = format_output(&reports, &output_format)?;
    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), AffectCliError> {
    let requests = parse_requests(&read_input(input)?, input_format)?;
    let results = RequestAdapter::validate_requests(&requests);

    let report = ValidationReport {
        total_requests: requests.len(),
        valid_requests: requests.len() - results.len(),
        invalid_requests: results.len(),
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                request_id: r.request_id.clone(),
                error: r.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total requests:   {}", report.total_requests);
        println!("Valid requests:   {}", report.valid_requests);
        println!("Invalid requests: {}", report.invalid_requests);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Request {} (index {}): {}",
                    err.request_id.as_deref().unwrap_or("unknown"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if report.invalid_requests > 0 {
        Err(AffectCliError::ValidationFailed(report.invalid_requests))
    } else {
        Ok(())
    }
}

fn cmd_analyze(
    image_path: &Path,
    user_id: Option<String>,
    no_probe: bool,
    providers: &ProviderArgs,
    output_format: OutputFormat,
) -> Result<(), AffectCliError> {
    let image = read_image(image_path, user_id)?;
    let config = providers.resolve()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(async {
        let mut processor = AssessmentProcessor::from_config(&config)?;
        if !no_probe {
            processor.prepare().await;
        }

        let cancel = cancel_on_interrupt();
        let report = processor.assess_image_with_cancel(&image, &cancel).await?;
        Ok::<_, AssessError>(processor.encoder().encode_stress(report))
    })?;

    print!("{}", format_output(&[report], &output_format)?);
    Ok(())
}

fn read_image(path: &Path, user_id: Option<String>) -> Result<ImageInput, AffectCliError> {
    let bytes = if path.to_string_lossy() == "-" {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        buffer
    } else {
        fs::read(path)?
    };
    Ok(ImageInput::new(bytes, user_id)?)
}

/// Token cancelled on Ctrl-C. Must be called inside the runtime.
fn cancel_on_interrupt() -> CancellationToken {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, abandoning in-flight request");
            on_interrupt.cancel();
        }
    });
    cancel
}

fn cmd_fuse(
    input: &Path,
    image_path: Option<&Path>,
    no_probe: bool,
    providers: &ProviderArgs,
    output_format: OutputFormat,
) -> Result<(), AffectCliError> {
    let inputs: ComponentInputs = serde_json::from_str(&read_input(input)?)?;
    let config = providers.resolve()?;

    let fused = match image_path {
        None => WeightedFusion::with_weights(config.fusion)?.fuse(&inputs)?,
        Some(path) => {
            let image = read_image(path, None)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async {
                let mut processor = AssessmentProcessor::from_config(&config)?;
                if !no_probe {
                    processor.prepare().await;
                }
                let cancel = cancel_on_interrupt();
                processor.fuse_with_image(inputs, &image, &cancel).await
            })?
        }
    };

    let report = ReportEncoder::new().encode_fusion(fused);
    print!("{}", format_output(&[report], &output_format)?);
    Ok(())
}

fn cmd_frames(
    image_paths: &[PathBuf],
    no_probe: bool,
    providers: &ProviderArgs,
    output_format: OutputFormat,
) -> Result<(), AffectCliError> {
    let frames = image_paths
        .iter()
        .map(|path| read_image(path, None))
        .collect::<Result<Vec<_>, _>>()?;
    let config = providers.resolve()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(async {
        let mut processor = AssessmentProcessor::from_config(&config)?;
        if !no_probe {
            processor.prepare().await;
        }

        let cancel = cancel_on_interrupt();
        let summary = processor.assess_frames(&frames, &cancel).await?;
        Ok::<_, AssessError>(processor.encoder().encode_frames(summary))
    })?;

    print!("{}", format_output(&[report], &output_format)?);
    Ok(())
}

fn cmd_combine(
    responses: &[u8],
    form: FormArg,
    voice: Option<&Path>,
    output_format: OutputFormat,
) -> Result<(), AffectCliError> {
    let request = combine_request(responses, form, voice)?;
    request.validate()?;

    let report = ReportEncoder::new().encode_assessment(process_request(&request)?);

    print!("{}", format_output(&[report], &output_format)?);
    Ok(())
}

/// Build the same request record the batch path scores
fn combine_request(
    responses: &[u8],
    form: FormArg,
    voice: Option<&Path>,
) -> Result<AssessmentRequest, AffectCliError> {
    let form = match form {
        FormArg::Dass21 => FormSpec::Dass21,
        FormArg::Interleaved => FormSpec::Interleaved {
            scale_factor: DASS21_SCALE_FACTOR,
        },
    };
    let responses = responses.iter().map(|r| i64::from(*r)).collect();

    let readings: Vec<VoiceReading> = match voice {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Vec::new(),
    };

    Ok(if readings.is_empty() {
        AssessmentRequest::questionnaire(form, responses)
    } else {
        AssessmentRequest::combined(form, responses, readings)
    })
}

fn cmd_doctor(providers: &ProviderArgs, json: bool) -> Result<(), AffectCliError> {
    let mut checks: Vec<DoctorCheck> = vec![
        DoctorCheck {
            name: "affect_version".to_string(),
            status: CheckStatus::Ok,
            message: format!("Affect version {}", AFFECT_VERSION),
        },
        DoctorCheck {
            name: "schema_version".to_string(),
            status: CheckStatus::Ok,
            message: format!("Input schema: {}", SCHEMA_VERSION),
        },
    ];

    match providers.resolve() {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Ok,
                message: format!(
                    "Configuration valid (probe {}s, analyze {}s)",
                    config.timeouts.probe_secs, config.timeouts.analyze_secs
                ),
            });
            checks.extend(probe_checks(&config)?);
        }
        Err(e) => checks.push(DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Error,
            message: CliError::from(e).message,
        }),
    }

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: AFFECT_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Affect Doctor Report");
        println!("====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");
        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(AffectCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

/// Unavailable providers are warnings: the chain still answers through the
/// local fallback.
fn probe_checks(config: &AffectConfig) -> Result<Vec<DoctorCheck>, AffectCliError> {
    let mut chain = SourceFallbackChain::from_config(config)?;
    if chain.is_empty() {
        return Ok(vec![DoctorCheck {
            name: "providers".to_string(),
            status: CheckStatus::Warning,
            message: "No providers enabled; every analysis will use the local fallback"
                .to_string(),
        }]);
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let probes = runtime.block_on(chain.probe());

    Ok(probes
        .into_iter()
        .map(|probe| DoctorCheck {
            name: format!("provider:{}", probe.name),
            status: if probe.available {
                CheckStatus::Ok
            } else {
                CheckStatus::Warning
            },
            message: match probe.error {
                None => format!("{} available ({} ms)", probe.kind, probe.elapsed_ms),
                Some(reason) => format!("{} unavailable: {}", probe.kind, reason),
            },
        })
        .collect())
}

fn cmd_thresholds(json: bool) -> Result<(), AffectCliError> {
    let table = ThresholdReport {
        dass: DassCategory::ALL
            .iter()
            .map(|category| DassThresholds {
                category: category.as_str().to_string(),
                normal_max: SeverityClassifier::thresholds(*category)[0],
                mild_max: SeverityClassifier::thresholds(*category)[1],
                moderate_max: SeverityClassifier::thresholds(*category)[2],
                severe_max: SeverityClassifier::thresholds(*category)[3],
            })
            .collect(),
        overall: OVERALL_THRESHOLDS,
        emotion_stress: EMOTION_STRESS_THRESHOLDS,
        frame_stress: FRAME_STRESS_THRESHOLDS,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        println!("DASS Severity Thresholds (42-point scale, inclusive upper bounds)");
        println!("=================================================================");
        println!(
            "  {:<12} {:>7} {:>5} {:>9} {:>7}",
            "category", "normal", "mild", "moderate", "severe"
        );
        for row in &table.dass {
            println!(
                "  {:<12} {:>7} {:>5} {:>9} {:>7}",
                row.category, row.normal_max, row.mild_max, row.moderate_max, row.severe_max
            );
        }
        println!("  Anything above the severe bound is extremely_severe.");
        println!();
        println!(
            "Overall (mean of subscales): normal <= {}, mild <= {}, moderate <= {}, severe <= {}",
            table.overall[0], table.overall[1], table.overall[2], table.overall[3]
        );
        println!(
            "Emotion stress score (0-100): low <= {}, moderate <= {}, high above",
            table.emotion_stress[0], table.emotion_stress[1]
        );
        println!(
            "Multi-frame stress score (0-100): moderate >= {}, high >= {}",
            table.frame_stress[0], table.frame_stress[1]
        );
    }

    Ok(())
}

// Helper functions

fn format_output<T: Serialize>(
    records: &[T],
    format: &OutputFormat,
) -> Result<String, AffectCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for record in records {
                lines.push(serde_json::to_string(record)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(records)? + "\n"),
        OutputFormat::JsonPretty => {
            if let [single] = records {
                Ok(serde_json::to_string_pretty(single)? + "\n")
            } else {
                Ok(serde_json::to_string_pretty(records)? + "\n")
            }
        }
    }
}

// Error types

#[derive(Debug)]
enum AffectCliError {
    Io(io::Error),
    Assess(AssessError),
    Json(serde_json::Error),
    Validation(ValidationError),
    NoRequests,
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for AffectCliError {
    fn from(e: io::Error) -> Self {
        AffectCliError::Io(e)
    }
}

impl From<AssessError> for AffectCliError {
    fn from(e: AssessError) -> Self {
        AffectCliError::Assess(e)
    }
}

impl From<serde_json::Error> for AffectCliError {
    fn from(e: serde_json::Error) -> Self {
        AffectCliError::Json(e)
    }
}

impl From<ValidationError> for AffectCliError {
    fn from(e: ValidationError) -> Self {
        AffectCliError::Validation(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<AffectCliError> for CliError {
    fn from(e: AffectCliError) -> Self {
        match e {
            AffectCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            AffectCliError::Assess(AssessError::Config(msg)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: msg,
                hint: Some("Run 'affect doctor' to check configuration".to_string()),
            },
            AffectCliError::Assess(AssessError::InvalidInput(msg)) => CliError {
                code: "INVALID_INPUT".to_string(),
                message: msg,
                hint: Some("Responses must be 0-3 and match the form length".to_string()),
            },
            AffectCliError::Assess(AssessError::Cancelled) => CliError {
                code: "CANCELLED".to_string(),
                message: "Request was cancelled".to_string(),
                hint: None,
            },
            AffectCliError::Assess(e) => CliError {
                code: "ASSESS_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            AffectCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            AffectCliError::Validation(e) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'affect validate' for details".to_string()),
            },
            AffectCliError::NoRequests => CliError {
                code: "NO_REQUESTS".to_string(),
                message: "No requests found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            AffectCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} requests failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            AffectCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(Serialize)]
struct ValidationReport {
    total_requests: usize,
    valid_requests: usize,
    invalid_requests: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(Serialize)]
struct ValidationErrorDetail {
    index: usize,
    request_id: Option<String>,
    error: String,
}

#[derive(Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

#[derive(Serialize)]
struct ThresholdReport {
    dass: Vec<DassThresholds>,
    overall: [f64; 4],
    emotion_stress: [u8; 2],
    frame_stress: [f64; 2],
}

#[derive(Serialize)]
struct DassThresholds {
    category: String,
    normal_max: u32,
    mild_max: u32,
    moderate_max: u32,
    severe_max: u32,
}
