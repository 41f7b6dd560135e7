//! Command dispatch logic for bioc-status

use super::{
    DashboardArgs, DownloadsArgs, InitArgs, IssuesArgs, PackagesArgs, StatusArgs, ValidateArgs, init_config, list_packages,
    process_dashboard, process_downloads, process_issues, process_status, validate_config,
};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "bioc-status", bin_name = "bioc-status", version, author, long_about = None)]
#[command(about = "Monitor Bioconductor build reports, downloads and issues for your packages")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape the build status of packages from the build reports
    Status(Box<StatusArgs>),
    /// Report monthly download statistics of packages
    Downloads(Box<DownloadsArgs>),
    /// List the open issues of packages
    Issues(Box<IssuesArgs>),
    /// List the packages Bioconductor publishes
    Packages(Box<PackagesArgs>),
    /// Build the full dashboard from a cached snapshot, refreshing it when stale
    Dashboard(Box<DashboardArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        Command::Status(args) => process_status(host, args).await,
        Command::Downloads(args) => process_downloads(host, args).await,
        Command::Issues(args) => process_issues(host, args).await,
        Command::Packages(args) => list_packages(host, args).await,
        Command::Dashboard(args) => process_dashboard(host, args).await,
        Command::Init(args) => init_config(host, args),
        Command::Validate(args) => validate_config(host, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_status_arguments() {
        let cli = Cli::parse_from(["bioc-status", "status", "BiocCheck,S4Vectors", "--channel", "devel", "--csv", "out.csv"]);
        let Command::Status(args) = cli.command else {
            unreachable!("expected the status command");
        };
        assert_eq!(args.packages, vec!["BiocCheck,S4Vectors".to_string()]);
        assert_eq!(args.common.channels, vec![crate::facts::Channel::Devel]);
        assert_eq!(args.report.csv.as_deref().map(camino::Utf8Path::as_str), Some("out.csv"));
    }

    #[test]
    fn test_parse_dashboard_force() {
        let cli = Cli::parse_from(["bioc-status", "dashboard", "--force"]);
        let Command::Dashboard(args) = cli.command else {
            unreachable!("expected the dashboard command");
        };
        assert!(args.force);
        assert!(args.packages.is_empty());
    }
}
