mod exec;

use std::process::ExitCode;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use log::{debug, error};

use devsh::config::Config;
use devsh::dispatch::{Action, DispatchError};
use devsh::process::{ProcessError, SystemRunner};

#[derive(Parser, Debug)]
#[command(name = "devsh", version, about = "Developer shell helper")]
struct Cli {
    /// Log file path (mirrors devsh's own log records, see RUST_LOG)
    #[arg(long)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print banner
    Banner,
    /// Print quickstart guide
    Quickstart,
    /// Print welcome notice
    Welcome,
    /// Open developer's guide
    Guide,
    /// Run an extension command
    Exec(exec::ExecArgs),
}

impl From<Commands> for Action {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Banner => Action::Banner,
            Commands::Quickstart => Action::Quickstart,
            Commands::Welcome => Action::Welcome,
            Commands::Guide => Action::Guide,
            Commands::Exec(args) => args.into(),
        }
    }
}

/// The clap command, with the display name and extension listing filled in.
fn command(config: &Config) -> clap::Command {
    let listing = config.extensions.render().to_string();
    Cli::command()
        .about(format!("{} developer shell", config.name))
        .mut_subcommand("exec", |exec| {
            if listing.is_empty() {
                exec
            } else {
                exec.after_help(listing)
            }
        })
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Configuration is required before anything else, including help output
    let config = Config::from_env()?;
    let cli = Cli::from_arg_matches(&command(&config).get_matches())?;

    let log_file = cli
        .log_file
        .as_ref()
        .map(std::fs::File::create)
        .transpose()?;
    devsh::logger::init(log_file);

    let Some(subcommand) = cli.command else {
        command(&config).print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let action = Action::from(subcommand);
    match devsh::run(&config, SystemRunner, std::io::stdout().lock(), &action) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            // Children report their own failures; only surface what they could not
            match &e {
                DispatchError::Process(ProcessError::Launch { .. }) | DispatchError::Output(_) => {
                    error!("{e}");
                }
                DispatchError::Process(_) => debug!("{e}"),
            }
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}
