//! Argument handling and report output shared by the data-collecting commands.

use super::config::Config;
use super::{Host, ProgressReporter};
use crate::Result;
use crate::facts::status::LogLevel as BuildLevel;
use crate::facts::{Channel, Collector, CollectorSettings, Snapshot};
use crate::reports::{
    generate_console, generate_downloads_csv, generate_html, generate_issues_csv, generate_json, generate_status_csv, generate_xlsx,
};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::{Args, ValueEnum};
use core::time::Duration;
use directories::BaseDirs;
use ohno::{IntoAppError, app_err, bail};
use std::fs;
use std::io::{IsTerminal, Write, stderr, stdout};
use std::path::PathBuf;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

impl ColorMode {
    fn enabled(self, is_terminal: impl FnOnce() -> bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => is_terminal(),
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments shared by every command that collects data
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// GitHub personal access token, used to list open issues
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Path to configuration file (default is `bioc-status.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Release channels to report on, overriding the configured channels
    #[arg(long = "channel", value_name = "CHANNEL", value_delimiter = ',')]
    pub channels: Vec<Channel>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Directory where fetched pages and the dashboard snapshot are cached
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,

    /// Ignore cached data and fetch everything fresh
    #[arg(long)]
    pub ignore_cached: bool,
}

/// Where to write the reports of a command
#[derive(Args, Debug, Default, Clone)]
pub struct ReportArgs {
    /// Output results to an Excel spreadsheet file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub excel: Option<Utf8PathBuf>,

    /// Output results to an HTML dashboard file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub html: Option<Utf8PathBuf>,

    /// Output results to a CSV file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub csv: Option<Utf8PathBuf>,

    /// Output results to a JSON file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub json: Option<Utf8PathBuf>,

    /// Output results to the console. If omitted, console output is shown only when no
    /// other reports are generated.
    #[arg(long, help_heading = "Report Output")]
    pub console: bool,
}

impl ReportArgs {
    pub(super) const fn writes_files(&self) -> bool {
        self.html.is_some() || self.excel.is_some() || self.csv.is_some() || self.json.is_some()
    }
}

/// Exit criteria for commands that report build statuses
#[derive(Args, Debug, Default, Clone, Copy)]
pub struct FailureArgs {
    /// Exit with status code 1 if any build has an error or timed out
    #[arg(long)]
    pub error_if_failing: bool,

    /// Exit with status code 1 if any build has warnings, errors or timed out
    #[arg(long)]
    pub error_if_warnings: bool,
}

impl FailureArgs {
    /// Fail when the snapshot contains builds the flags do not tolerate.
    pub fn check(self, snapshot: &Snapshot) -> Result<()> {
        let count = |accept: fn(BuildLevel) -> bool| snapshot.statuses.iter().filter(|s| accept(s.log_level)).count();

        if self.error_if_warnings {
            let failing = count(BuildLevel::is_failure);
            if failing > 0 {
                bail!("{failing} build(s) reported warnings, errors or timeouts");
            }
        }

        if self.error_if_failing {
            let failing = count(|level| matches!(level, BuildLevel::Error | BuildLevel::Timeout));
            if failing > 0 {
                bail!("{failing} build(s) reported errors or timeouts");
            }
        }

        Ok(())
    }
}

/// The table a CSV report holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvTable {
    Statuses,
    Downloads,
    Issues,
}

pub struct Common<'a, H: Host> {
    pub collector: Collector,
    pub config: Config,
    pub channels: Vec<Channel>,
    pub cache_dir: PathBuf,
    host: &'a mut H,
    color: ColorMode,
}

impl<'a, H: Host> Common<'a, H> {
    /// Set up logging, load the configuration and create the collector
    pub fn new(host: &'a mut H, args: &CommonArgs) -> Result<Self> {
        init_logging(args.log_level);

        let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;

        let cache_dir = if let Some(cache_path) = &args.cache_dir {
            cache_path.as_std_path().to_path_buf()
        } else {
            BaseDirs::new()
                .into_app_err("could not determine cache directory")?
                .cache_dir()
                .join("bioc-status")
        };

        let github_token = resolve_github_token(args.github_token.as_deref(), config.github_token_file.as_deref())?;

        let channels = if args.channels.is_empty() {
            config.channels.clone()
        } else {
            let mut channels = Vec::with_capacity(args.channels.len());
            for channel in &args.channels {
                if !channels.contains(channel) {
                    channels.push(*channel);
                }
            }
            channels
        };

        let delay = if args.log_level == LogLevel::None {
            Duration::from_millis(300)
        } else {
            Duration::from_hours(365 * 24)
        };

        let progress_reporter = ProgressReporter::new(delay, args.color.enabled(|| stderr().is_terminal()));

        let settings = CollectorSettings {
            base_url: config.base_url.clone(),
            github_api_url: config.github_api_url.clone(),
            github_token,
            cache_dir: cache_dir.clone(),
            cache_ttl: config.cache_ttl,
            request_timeout: config.request_timeout,
            ignore_cached: args.ignore_cached,
        };

        let collector = Collector::new(&settings, Utc::now(), progress_reporter)?;

        Ok(Self {
            collector,
            config,
            channels,
            cache_dir,
            host,
            color: args.color,
        })
    }

    /// The channel used for package categories and issue lookups
    pub fn primary_channel(&self) -> Channel {
        self.channels.first().copied().unwrap_or(Channel::Release)
    }

    /// The packages named on the command line, or else those listed in the package list file
    pub fn package_names(&self, args: &[String]) -> Result<Vec<String>> {
        let names = parse_package_args(args);
        if !names.is_empty() {
            return Ok(names);
        }

        let Some(path) = &self.config.packages_file else {
            bail!("no packages given on the command line and no packages_file configured");
        };

        let names = read_package_list(path)?;
        if names.is_empty() {
            bail!("no packages given on the command line and the package list '{path}' is empty");
        }

        Ok(names)
    }

    /// Write text to the command's output stream
    pub fn print(&mut self, text: &str) {
        let _ = write!(self.host.output(), "{text}");
    }

    /// Produce the requested reports for a snapshot
    pub fn report(&mut self, snapshot: &Snapshot, args: &ReportArgs, csv_table: CsvTable) -> Result<()> {
        let now = self.collector.now();

        if args.console || !args.writes_files() {
            let mut console_output = String::new();
            generate_console(snapshot, self.color.enabled(|| stdout().is_terminal()), &mut console_output)?;
            self.print(&console_output);
        }

        if let Some(filename) = &args.html {
            let mut html = String::new();
            generate_html(snapshot, now, &mut html)?;
            fs::write(filename, html).into_app_err_with(|| format!("writing HTML report '{filename}'"))?;
        }

        if let Some(filename) = &args.excel {
            let mut file = fs::File::create(filename).into_app_err_with(|| format!("creating Excel report '{filename}'"))?;
            generate_xlsx(snapshot, &mut file)?;
        }

        if let Some(filename) = &args.csv {
            let mut csv_output = Vec::new();
            match csv_table {
                CsvTable::Statuses => generate_status_csv(&snapshot.statuses, &mut csv_output)?,
                CsvTable::Downloads => generate_downloads_csv(&snapshot.downloads, &mut csv_output)?,
                CsvTable::Issues => generate_issues_csv(&snapshot.issues, &mut csv_output)?,
            }
            fs::write(filename, csv_output).into_app_err_with(|| format!("writing CSV report '{filename}'"))?;
        }

        if let Some(filename) = &args.json {
            let mut json_output = String::new();
            generate_json(snapshot, now, &mut json_output)?;
            fs::write(filename, json_output).into_app_err_with(|| format!("writing JSON report '{filename}'"))?;
        }

        Ok(())
    }
}

/// Initialize logger based on log level
fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // a second command in the same process keeps the first logger
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// Split package arguments on whitespace and commas, dropping duplicates.
pub fn parse_package_args(args: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in args.iter().flat_map(|arg| arg.split(|c: char| c == ',' || c.is_whitespace())) {
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    names
}

/// Read a package list file: one name per line, `#` starts a comment.
pub fn read_package_list(path: &Utf8Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).into_app_err_with(|| format!("reading package list '{path}'"))?;
    let lines: Vec<String> = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim().to_string())
        .collect();

    Ok(parse_package_args(&lines))
}

/// The token given on the command line or in the environment, else the one in the token file
fn resolve_github_token(token: Option<&str>, token_file: Option<&Utf8Path>) -> Result<Option<String>> {
    if let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(Some(token.to_string()));
    }

    let Some(path) = token_file else {
        return Ok(None);
    };

    let text = fs::read_to_string(path).into_app_err_with(|| format!("reading GitHub token file '{path}'"))?;
    let token = text.trim();
    if token.is_empty() {
        return Err(app_err!("GitHub token file '{path}' is empty"));
    }

    Ok(Some(token.to_string()))
}
