use clap::Parser;
use colored::Colorize;
use contactx_lib::Repository;
use sysexits::ExitCode;
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

mod contact;

#[derive(Parser, Debug)]
#[command(name = "contactx")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: contact::Command,

    /// Log what the store is doing
    #[arg(short, long, global = true)]
    verbose: bool,
}

fn main() -> ExitCode {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set up logging: {e}");
    }

    let repo = match Repository::new() {
        Ok(repo) => repo,
        Err(e) => {
            error!("Failed to open the contact database: {e}");
            eprintln!("{} {e}", "error:".red().bold());
            return ExitCode::CantCreat;
        }
    };

    contact::handle(&repo, &cli.command)
}
