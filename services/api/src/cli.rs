use crate::commands::{run_template_fill, run_template_scan, FillArgs, ScanArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tenant_contracts::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Contract Template Service",
    about = "Scan and fill rental contract templates, or serve them over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Work with contract template files on disk
    Template {
        #[command(subcommand)]
        command: TemplateCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TemplateCommand {
    /// List the variables detected in a DOCX or PDF template
    Scan(ScanArgs),
    /// Write a filled copy of a DOCX template
    Fill(FillArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Template {
            command: TemplateCommand::Scan(args),
        } => run_template_scan(args),
        Command::Template {
            command: TemplateCommand::Fill(args),
        } => run_template_fill(args),
    }
}
