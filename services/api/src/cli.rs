use crate::demo::{run_actions, run_classify, run_demo, ActionsArgs, ClassifyArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use propertyhub::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "PropertyHub Admin",
    about = "Run and explore the PropertyHub moderation back office from the command line",
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
    /// Show the quick actions offered for a listing status
    Actions(ActionsArgs),
    /// Classify a raw authentication error into user-facing copy
    Classify(ClassifyArgs),
    /// Walk seeded listings through the moderation workflow
    Demo(DemoArgs),
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
        Command::Actions(args) => run_actions(args),
        Command::Classify(args) => run_classify(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
