use crate::demo::{
    run_capacity_check, run_demo, run_eligibility_check, CapacityArgs, EligibilityArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use cpa_compliance::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "CPA Compliance",
    about = "Evaluate NP practice-authority eligibility and physician supervision capacity",
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
    /// Classify FPA eligibility for a license in a single state
    Eligibility(EligibilityArgs),
    /// Check whether a physician can take on one more NP in a state
    Capacity(CapacityArgs),
    /// Walk the bundled sample licenses and physicians through both evaluators
    Demo,
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
        Command::Eligibility(args) => run_eligibility_check(args),
        Command::Capacity(args) => run_capacity_check(args),
        Command::Demo => run_demo(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["cpa-compliance-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_eligibility_arguments() {
        let cli = Cli::try_parse_from([
            "cpa-compliance-api",
            "eligibility",
            "--state-code",
            "fl",
            "--hours",
            "1200",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Eligibility(args)) => {
                assert_eq!(args.state_code, "fl");
                assert_eq!(args.hours, Some(1200));
                assert_eq!(args.years, None);
            }
            other => panic!("expected eligibility command, got {other:?}"),
        }
    }
}
