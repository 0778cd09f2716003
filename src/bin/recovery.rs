//! Recovery CLI - command-line interface for the recovery engine
//!
//! Commands:
//! - evaluate: Score daily records into reports (batch mode)
//! - run: Score records streamed on stdin (streaming mode)
//! - validate: Validate daily records
//! - goals: Show week goals and weight-based targets
//! - doctor: Diagnose configuration and history files
//! - schema: Describe the input and output formats

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use recovery_engine::config::EngineConfig;
use recovery_engine::goals::{resolve_goals, RecoveryTargets};
use recovery_engine::history::ScoreHistory;
use recovery_engine::pipeline::RecoveryProcessor;
use recovery_engine::record::{DailyRecord, RecordAdapter, ValidationError};
use recovery_engine::types::{ActivityState, RecoveryReport};
use recovery_engine::{EngineError, ENGINE_VERSION, PRODUCER_NAME};

/// Recovery - post-operative activity state and recovery index engine
#[derive(Parser)]
#[command(name = "recovery")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Score daily recovery records into activity states and a recovery index", long_about = None)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RECOVERY_LOG overrides
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Patient targets, given explicitly or derived from body weight
#[derive(clap::Args)]
struct TargetArgs {
    /// Body weight (kg); derives protein and calorie targets from the config factors
    #[arg(long, conflicts_with_all = ["protein_target", "calorie_target"])]
    weight_kg: Option<f64>,

    /// Daily protein target (grams)
    #[arg(long, requires = "calorie_target")]
    protein_target: Option<f64>,

    /// Daily calorie target (kcal)
    #[arg(long, requires = "protein_target")]
    calorie_target: Option<f64>,

    /// Daily step target; defaults to the configured step target
    #[arg(long)]
    step_target: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score daily records into reports (batch mode)
    Evaluate {
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

        #[command(flatten)]
        targets: TargetArgs,

        /// Load score history from file
        #[arg(long)]
        load_history: Option<PathBuf>,

        /// Save score history to file after processing
        #[arg(long)]
        save_history: Option<PathBuf>,
    },

    /// Score records streamed on stdin (streaming mode)
    Run {
        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        #[command(flatten)]
        targets: TargetArgs,

        /// Load score history from file
        #[arg(long)]
        load_history: Option<PathBuf>,

        /// Save score history to file on exit
        #[arg(long)]
        save_history: Option<PathBuf>,

        /// Flush output after each record
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        flush: bool,
    },

    /// Validate daily records
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

    /// Show activity goals for a post-operative week and weight-based targets
    Goals {
        /// Post-operative week (1-based)
        #[arg(long)]
        week: Option<u32>,

        /// Body weight (kg)
        #[arg(long)]
        weight_kg: Option<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and history files
    Doctor {
        /// Check a score history file
        #[arg(long)]
        history: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print format information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// JSON array of records
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one report per line)
    Ndjson,
    /// JSON array of reports
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Daily record input
    Input,
    /// Recovery report output
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_json);

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

fn init_logging(level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_env("RECOVERY_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: Cli) -> Result<(), RecoveryCliError> {
    match cli.command {
        Commands::Evaluate {
            input,
            output,
            input_format,
            output_format,
            targets,
            load_history,
            save_history,
        } => cmd_evaluate(
            &load_config(cli.config.as_deref())?,
            &input,
            &output,
            input_format,
            output_format,
            &targets,
            load_history.as_deref(),
            save_history.as_deref(),
        ),

        Commands::Run {
            output_format,
            targets,
            load_history,
            save_history,
            flush,
        } => cmd_run(
            &load_config(cli.config.as_deref())?,
            output_format,
            &targets,
            load_history.as_deref(),
            save_history.as_deref(),
            flush,
        ),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Goals {
            week,
            weight_kg,
            json,
        } => cmd_goals(&load_config(cli.config.as_deref())?, week, weight_kg, json),

        Commands::Doctor { history, json } => {
            cmd_doctor(cli.config.as_deref(), history.as_deref(), json)
        }

        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, RecoveryCliError> {
    match path {
        Some(path) => {
            let config = EngineConfig::load_from_file(path)?;
            info!(path = %path.display(), "loaded engine config");
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn resolve_targets(
    config: &EngineConfig,
    args: &TargetArgs,
) -> Result<RecoveryTargets, RecoveryCliError> {
    let step_target = args.step_target.unwrap_or(config.default_step_target);

    let targets = match (args.weight_kg, args.protein_target, args.calorie_target) {
        (Some(weight_kg), _, _) => {
            let derived = RecoveryTargets::from_weight(weight_kg, config)?;
            RecoveryTargets::new(
                derived.protein_target_g,
                derived.calorie_target_kcal,
                step_target,
            )?
        }
        (None, Some(protein), Some(calories)) => {
            RecoveryTargets::new(protein, calories, step_target)?
        }
        _ => return Err(RecoveryCliError::MissingTargets),
    };
    Ok(targets)
}

fn build_processor(
    config: &EngineConfig,
    targets: &TargetArgs,
    load_history: Option<&Path>,
) -> Result<RecoveryProcessor, RecoveryCliError> {
    let targets = resolve_targets(config, targets)?;
    let mut processor = RecoveryProcessor::with_config(config.clone(), targets)?;

    if let Some(history_path) = load_history {
        let history_json = fs::read_to_string(history_path)?;
        processor.load_history(&history_json)?;
    }

    Ok(processor)
}

fn read_input(input: &Path) -> Result<String, RecoveryCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn parse_records(data: &str, format: &InputFormat) -> Result<Vec<DailyRecord>, RecoveryCliError> {
    let records = match format {
        InputFormat::Ndjson => RecordAdapter::parse_ndjson(data)?,
        InputFormat::Json => RecordAdapter::parse_array(data)?,
    };
    Ok(records)
}

#[allow(clippy::too_many_arguments)]
fn cmd_evaluate(
    config: &EngineConfig,
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    targets: &TargetArgs,
    load_history: Option<&Path>,
    save_history: Option<&Path>,
) -> Result<(), RecoveryCliError> {
    let input_data = read_input(input)?;
    let records = parse_records(&input_data, &input_format)?;

    if records.is_empty() {
        return Err(RecoveryCliError::NoRecords);
    }

    let mut processor = build_processor(config, targets, load_history)?;
    let records = RecordAdapter::into_series(records)?;

    let mut reports: Vec<RecoveryReport> = Vec::with_capacity(records.len());
    for record in &records {
        reports.push(processor.process_record(record)?);
    }

    if let Some(history_path) = save_history {
        fs::write(history_path, processor.save_history()?)?;
    }

    let output_data = format_output(&reports, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_run(
    config: &EngineConfig,
    output_format: OutputFormat,
    targets: &TargetArgs,
    load_history: Option<&Path>,
    save_history: Option<&Path>,
    flush: bool,
) -> Result<(), RecoveryCliError> {
    let mut processor = build_processor(config, targets, load_history)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for (line_num, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let record: DailyRecord = serde_json::from_str(trimmed).map_err(|e| {
            RecoveryCliError::ParseError(format!("Failed to parse line {}: {}", line_num + 1, e))
        })?;
        record.validate()?;

        let report = processor.process_record(&record)?;
        write!(stdout, "{}", format_output(&[report], &output_format)?)?;
        if flush {
            stdout.flush()?;
        }
    }
    stdout.flush()?;

    if let Some(history_path) = save_history {
        fs::write(history_path, processor.save_history()?)?;
    }

    Ok(())
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), RecoveryCliError> {
    let input_data = read_input(input)?;
    let records = parse_records(&input_data, &input_format)?;
    let results = RecordAdapter::validate_records(&records);

    let report = ValidationReport {
        total_records: records.len(),
        valid_records: records.len() - results.len(),
        invalid_records: results.len(),
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                date: r.date.to_string(),
                error: r.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total records:   {}", report.total_records);
        println!("Valid records:   {}", report.valid_records);
        println!("Invalid records: {}", report.invalid_records);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - {} (index {}): {}", err.date, err.index, err.error);
            }
        }
    }

    if report.invalid_records > 0 {
        Err(RecoveryCliError::ValidationFailed(report.invalid_records))
    } else {
        Ok(())
    }
}

fn cmd_goals(
    config: &EngineConfig,
    week: Option<u32>,
    weight_kg: Option<f64>,
    json: bool,
) -> Result<(), RecoveryCliError> {
    let goals = resolve_goals(week);
    let targets = weight_kg
        .map(|w| RecoveryTargets::from_weight(w, config))
        .transpose()?;

    let report = GoalsReport {
        post_op_week: week,
        goal_moments_per_day: goals.goal_moments_per_day,
        max_sitting_streak_min: goals.max_sitting_streak_min,
        micro_walk_min: goals.micro_walk_min,
        active_minutes_target: goals.active_minutes_target,
        targets,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match week {
            Some(week) => println!("Goals for post-op week {}", week),
            None => println!("Goals (week unknown, using week 1)"),
        }
        println!("=========================");
        println!("Movement moments per day: {}", report.goal_moments_per_day);
        println!("Max sitting streak (min): {}", report.max_sitting_streak_min);
        println!("Micro walk (min):         {}", report.micro_walk_min);
        println!("Active minutes target:    {}", report.active_minutes_target);

        if let Some(targets) = &report.targets {
            println!("\nDaily targets:");
            println!("  Protein (g):   {}", targets.protein_target_g);
            println!("  Calories:      {}", targets.calorie_target_kcal);
            println!("  Steps:         {}", targets.step_target);
        }
    }

    Ok(())
}

fn cmd_doctor(config: Option<&Path>, history: Option<&Path>, json: bool) -> Result<(), RecoveryCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "engine_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Recovery engine version {}", ENGINE_VERSION),
    });

    checks.push(match config {
        Some(path) => match EngineConfig::load_from_file(path) {
            Ok(config) => DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Ok,
                message: format!(
                    "Config valid (step target {}, history window {} days)",
                    config.default_step_target, config.history_window_days
                ),
            },
            Err(e) => DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Error,
                message: e.to_string(),
            },
        },
        None => DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Ok,
            message: "Using built-in defaults".to_string(),
        },
    });

    if let Some(history_path) = history {
        let check = if history_path.exists() {
            match fs::read_to_string(history_path) {
                Ok(content) => match ScoreHistory::from_json(&content) {
                    Ok(history) => DoctorCheck {
                        name: "history".to_string(),
                        status: CheckStatus::Ok,
                        message: format!(
                            "History file valid ({} of {} days recorded)",
                            history.len(),
                            history.window_size()
                        ),
                    },
                    Err(e) => DoctorCheck {
                        name: "history".to_string(),
                        status: CheckStatus::Error,
                        message: format!("Invalid history JSON: {}", e),
                    },
                },
                Err(e) => DoctorCheck {
                    name: "history".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read history file: {}", e),
                },
            }
        } else {
            DoctorCheck {
                name: "history".to_string(),
                status: CheckStatus::Warning,
                message: "History file does not exist".to_string(),
            }
        };
        checks.push(check);
    }

    checks.push(DoctorCheck {
        name: "stdin".to_string(),
        status: CheckStatus::Ok,
        message: if atty::is(atty::Stream::Stdin) {
            "stdin is a TTY (interactive mode)".to_string()
        } else {
            "stdin is a pipe (streaming mode ready)".to_string()
        },
    });

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: ENGINE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Recovery Doctor Report");
        println!("======================");
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

    if report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error)) {
        Err(RecoveryCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), RecoveryCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", input_json_schema());
            } else {
                println!("Input: daily record (one per patient per day)");
                println!();
                println!("- date: YYYY-MM-DD (required)");
                println!("- patient_id, post_op_week (1-based)");
                println!("- protein (g), calories (kcal): default 0");
                println!("- steps, activity_minutes: optional, absent is not zero");
                println!("- check-in (optional):");
                println!("  - movement_moments, longest_sitting_streak_min");
                println!("  - fatigue_score, pain_score, perceived_exertion_rpe (0-10)");
                println!("  - sleep_hours (0-24), sit_to_stand_count");
                println!();
                println!("Days with no steps, activity minutes or movement moments are DATA_SPARSE.");
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", output_json_schema());
            } else {
                println!("Output: recovery report");
                println!();
                println!("- report_version, producer {{ name, version, instance_id }}");
                println!("- computed_at_utc, date, patient_id, post_op_week");
                println!("- activity: {{ state, label, color, gauge_position, response, actions, goals, metrics }}");
                println!("  states: {}", state_names().join(", "));
                println!("- recovery_index: {{ score, protein_score, activity_score, adl_score,");
                println!("    risk_level, risk_label, score_band, trend, day_over_day }}");
                println!("- alert: {{ notable, reasons }}");
            }
        }
    }

    Ok(())
}

fn state_names() -> Vec<&'static str> {
    ActivityState::ALL.iter().map(|s| s.as_str()).collect()
}

fn format_output(reports: &[RecoveryReport], format: &OutputFormat) -> Result<String, RecoveryCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for report in reports {
                lines.push(serde_json::to_string(report)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(reports)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(reports)?),
    }
}

fn input_json_schema() -> String {
    let optional_number = serde_json::json!({ "type": "number", "minimum": 0 });
    let scale = serde_json::json!({ "type": "number", "minimum": 0, "maximum": 10 });

    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "recovery.daily_record.v1",
        "description": "Daily nutrition, activity and check-in aggregate for one patient",
        "type": "object",
        "required": ["date"],
        "properties": {
            "date": { "type": "string", "format": "date" },
            "patient_id": { "type": "string" },
            "post_op_week": { "type": "integer", "minimum": 1 },
            "protein": optional_number,
            "calories": optional_number,
            "steps": optional_number,
            "activity_minutes": optional_number,
            "movement_moments": optional_number,
            "longest_sitting_streak_min": optional_number,
            "sit_to_stand_count": optional_number,
            "fatigue_score": scale,
            "pain_score": scale,
            "perceived_exertion_rpe": scale,
            "sleep_hours": { "type": "number", "minimum": 0, "maximum": 24 }
        }
    })
    .to_string()
}

fn output_json_schema() -> String {
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "recovery.report.v1",
        "description": "Daily recovery report",
        "type": "object",
        "required": ["report_version", "producer", "computed_at_utc", "date", "activity", "recovery_index", "alert"],
        "properties": {
            "report_version": { "type": "string" },
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string" }
                }
            },
            "computed_at_utc": { "type": "string", "format": "date-time" },
            "date": { "type": "string", "format": "date" },
            "activity": {
                "type": "object",
                "properties": {
                    "state": { "type": "string", "enum": state_names() },
                    "label": { "type": "string" },
                    "color": { "type": "string", "enum": ["green", "orange", "red", "gray"] },
                    "gauge_position": { "type": "integer", "minimum": 0, "maximum": 100 },
                    "actions": { "type": "array", "items": { "type": "string" } }
                }
            },
            "recovery_index": {
                "type": "object",
                "properties": {
                    "score": { "type": "integer", "minimum": 0, "maximum": 100 },
                    "risk_level": { "type": "string", "enum": ["low", "medium", "high"] },
                    "trend": { "type": "string", "enum": ["improving", "stable", "declining", "unknown"] }
                }
            },
            "alert": {
                "type": "object",
                "properties": {
                    "notable": { "type": "boolean" },
                    "reasons": { "type": "array", "items": { "type": "string" } }
                }
            }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum RecoveryCliError {
    Io(io::Error),
    Engine(EngineError),
    Json(serde_json::Error),
    Validation(ValidationError),
    MissingTargets,
    NoRecords,
    ValidationFailed(usize),
    DoctorFailed,
    ParseError(String),
}

impl From<io::Error> for RecoveryCliError {
    fn from(e: io::Error) -> Self {
        RecoveryCliError::Io(e)
    }
}

impl From<EngineError> for RecoveryCliError {
    fn from(e: EngineError) -> Self {
        RecoveryCliError::Engine(e)
    }
}

impl From<serde_json::Error> for RecoveryCliError {
    fn from(e: serde_json::Error) -> Self {
        RecoveryCliError::Json(e)
    }
}

impl From<ValidationError> for RecoveryCliError {
    fn from(e: ValidationError) -> Self {
        RecoveryCliError::Validation(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<RecoveryCliError> for CliError {
    fn from(e: RecoveryCliError) -> Self {
        match e {
            RecoveryCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            RecoveryCliError::Engine(e) => {
                let (code, hint) = match &e {
                    EngineError::InvalidTarget(_) => {
                        ("INVALID_TARGET", "Targets must be positive numbers")
                    }
                    EngineError::ConfigError(_) => {
                        ("CONFIG_ERROR", "Run 'recovery doctor --config <file>' for details")
                    }
                    EngineError::InvalidRecord(_) => {
                        ("VALIDATION_ERROR", "Run 'recovery validate' for details")
                    }
                    _ => ("PARSE_ERROR", "Ensure input matches 'recovery schema input'"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            RecoveryCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            RecoveryCliError::Validation(e) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'recovery validate' for details".to_string()),
            },
            RecoveryCliError::MissingTargets => CliError {
                code: "MISSING_TARGETS".to_string(),
                message: "No patient targets given".to_string(),
                hint: Some(
                    "Pass --weight-kg, or both --protein-target and --calorie-target".to_string(),
                ),
            },
            RecoveryCliError::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "No daily records found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            RecoveryCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            RecoveryCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
            RecoveryCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Check input format".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_records: usize,
    valid_records: usize,
    invalid_records: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    date: String,
    error: String,
}

#[derive(serde::Serialize)]
struct GoalsReport {
    post_op_week: Option<u32>,
    goal_moments_per_day: f64,
    max_sitting_streak_min: f64,
    micro_walk_min: f64,
    active_minutes_target: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    targets: Option<RecoveryTargets>,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUN_ARGS: [&str; 6] = [
        "recovery",
        "run",
        "--protein-target",
        "90",
        "--calorie-target",
        "1800",
    ];

    fn run_flush(extra: &[&str]) -> bool {
        let args = RUN_ARGS.iter().chain(extra.iter()).copied();
        match Cli::try_parse_from(args).unwrap().command {
            Commands::Run { flush, .. } => flush,
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_run_flushes_by_default() {
        assert!(run_flush(&[]));
    }

    #[test]
    fn test_run_flush_can_be_disabled() {
        assert!(!run_flush(&["--flush", "false"]));
        assert!(run_flush(&["--flush", "true"]));
    }
}
