use crate::operator::{run_mapping_generate, run_submit, MappingGenerateArgs, SubmitArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use guardian_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Guardian Intake",
    about = "Forward clinician applications to Jotform and maintain the field mapping",
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
    /// Inspect the live Jotform form and regenerate the field mapping
    Mapping {
        #[command(subcommand)]
        command: MappingCommand,
    },
    /// Encode a payload and submit it to a hiring stage's form
    Submit(SubmitArgs),
}

#[derive(Subcommand, Debug)]
enum MappingCommand {
    /// Match form labels to semantic fields and write the mapping for review
    Generate(MappingGenerateArgs),
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
        Command::Mapping {
            command: MappingCommand::Generate(args),
        } => run_mapping_generate(args).await,
        Command::Submit(args) => run_submit(args).await,
    }
}
