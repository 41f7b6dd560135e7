use super::Host;
use super::common::{Common, CommonArgs, CsvTable, FailureArgs, ReportArgs};
use crate::Result;
use crate::facts::SnapshotCache;
use camino::Utf8PathBuf;
use clap::Parser;

/// File name of the dashboard written when no other report is requested
const DEFAULT_DASHBOARD_FILE: &str = "bioc-status.html";

#[derive(Parser, Debug)]
pub struct DashboardArgs {
    /// Packages to monitor, separated by spaces or commas (default is the package list file)
    #[arg(value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Collect fresh data even when the last snapshot is recent enough
    #[arg(long)]
    pub force: bool,

    /// Snapshot file (default is `snapshot.json` in the cache directory)
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub report: ReportArgs,

    #[command(flatten)]
    pub failure: FailureArgs,
}

pub async fn process_dashboard<H: Host>(host: &mut H, args: &DashboardArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;
    let names = common.package_names(&args.packages)?;

    let snapshot_path = args
        .snapshot
        .as_ref()
        .map_or_else(|| common.cache_dir.join("snapshot.json"), |p| p.as_std_path().to_path_buf());
    let mut cache = SnapshotCache::open(snapshot_path, common.config.snapshot_ttl);
    let snapshot = cache.get(&common.collector, &names, &common.channels, args.force).await?;

    let report = with_default_dashboard(&args.report);
    common.report(snapshot, &report, CsvTable::Statuses)?;
    if let Some(path) = &report.html {
        let age = snapshot.age_hours(common.collector.now());
        common.print(&format!("Wrote dashboard to {path} (data {age} hour(s) old)\n"));
    }

    args.failure.check(snapshot)
}

fn with_default_dashboard(report: &ReportArgs) -> ReportArgs {
    let mut report = report.clone();
    if !report.writes_files() {
        report.html = Some(Utf8PathBuf::from(DEFAULT_DASHBOARD_FILE));
    }

    report
}
