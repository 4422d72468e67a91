use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use tenant_contracts::config::AppConfig;
use tenant_contracts::error::AppError;
use tenant_contracts::telemetry;
use tenant_contracts::templates::{
    missing_required, template_name_from_file_name, ContractTemplateService, DetectedVariable,
    DocumentFormat, FillRequest, TemplateError,
};
use tracing::warn;

#[derive(Args, Debug)]
pub(crate) struct ScanArgs {
    /// Template file (.docx or .pdf)
    pub(crate) file: PathBuf,
    /// Override the format inferred from the file extension
    #[arg(long, value_parser = parse_format)]
    pub(crate) format: Option<DocumentFormat>,
    /// Print the detected variables as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct FillArgs {
    /// DOCX template to fill
    pub(crate) file: PathBuf,
    /// JSON object mapping variable names to values
    #[arg(long)]
    pub(crate) values: Option<PathBuf>,
    /// Inline value as NAME=VALUE; overrides the values file
    #[arg(long = "set", value_parser = parse_assignment)]
    pub(crate) set: Vec<(String, String)>,
    /// Where to write the filled document
    #[arg(long, short)]
    pub(crate) output: PathBuf,
    /// Override the format inferred from the file extension
    #[arg(long, value_parser = parse_format)]
    pub(crate) format: Option<DocumentFormat>,
}

pub(crate) fn run_template_scan(args: ScanArgs) -> Result<(), AppError> {
    let service = cli_service()?;
    let variables = scan_template(&service, &args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&variables)?);
    } else {
        print!("{}", render_scan_report(&args.file, &variables));
    }
    Ok(())
}

pub(crate) fn run_template_fill(args: FillArgs) -> Result<(), AppError> {
    let service = cli_service()?;
    let applied = fill_template(&service, &args)?;
    println!(
        "Wrote {} ({} values applied)",
        args.output.display(),
        applied
    );
    Ok(())
}

fn cli_service() -> Result<ContractTemplateService, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(ContractTemplateService::new(config.templates))
}

pub(crate) fn scan_template(
    service: &ContractTemplateService,
    args: &ScanArgs,
) -> Result<Vec<DetectedVariable>, AppError> {
    let format = detect_format(&args.file, args.format)?;
    let bytes = fs::read(&args.file)?;
    Ok(service.scan(&bytes, format)?)
}

/// Fills the template and writes it to `args.output`, returning the number of values supplied.
pub(crate) fn fill_template(
    service: &ContractTemplateService,
    args: &FillArgs,
) -> Result<usize, AppError> {
    let format = detect_format(&args.file, args.format)?;
    let bytes = fs::read(&args.file)?;

    let mut values = match &args.values {
        Some(path) => load_values(path)?,
        None => FillRequest::new(),
    };
    values.extend(args.set.iter().cloned());

    if format.supports_fill() {
        let variables = service.suggest(&bytes, format)?;
        for name in missing_required(&variables, &values) {
            warn!(variable = %name, "no value supplied; placeholder left in document");
        }
    }

    let filled = service.fill(&bytes, format, &values)?;
    fs::write(&args.output, filled)?;
    Ok(values.len())
}

pub(crate) fn load_values(path: &Path) -> Result<FillRequest, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Explicit `--format` wins; otherwise the MIME type guessed from the extension decides.
pub(crate) fn detect_format(
    path: &Path,
    explicit: Option<DocumentFormat>,
) -> Result<DocumentFormat, TemplateError> {
    if let Some(format) = explicit {
        return Ok(format);
    }

    match mime_guess::from_path(path).first() {
        Some(mime) => DocumentFormat::from_mime_type(mime.essence_str()),
        None => Err(TemplateError::UnsupportedFormat(path.display().to_string())),
    }
}

fn parse_format(raw: &str) -> Result<DocumentFormat, String> {
    raw.parse().map_err(|err: TemplateError| err.to_string())
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}

pub(crate) fn render_scan_report(path: &Path, variables: &[DetectedVariable]) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut report = format!(
        "Template: {}\n",
        template_name_from_file_name(&file_name)
    );

    if variables.is_empty() {
        report.push_str("No variables found\n");
        return report;
    }

    report.push_str(&format!("{} variables\n", variables.len()));
    for variable in variables {
        report.push_str(&format!(
            "- {:<32} {:<14} {} (x{})\n    {}\n",
            variable.placeholder,
            variable.suggested_type.label(),
            variable.suggested_label,
            variable.occurrences,
            variable.suggested_type.input_hint()
        ));
    }
    report
}
