use super::Host;
use super::common::{Common, CommonArgs, CsvTable, ReportArgs};
use crate::Result;
use crate::facts::Snapshot;
use crate::facts::issues::IssueLookup;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct IssuesArgs {
    /// Packages to report on, separated by spaces or commas (default is the package list file)
    #[arg(value_name = "PACKAGE")]
    pub packages: Vec<String>,

    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub report: ReportArgs,
}

pub async fn process_issues<H: Host>(host: &mut H, args: &IssuesArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;
    let names = common.package_names(&args.packages)?;

    let channel = common.primary_channel();
    let packages = common.collector.resolve_packages(channel, &names).await?;
    let issues = common
        .collector
        .issues(&packages, channel)
        .await
        .into_iter()
        .map(|(name, result)| (name, IssueLookup::from(result)))
        .collect();

    let snapshot = Snapshot {
        channels: vec![channel],
        packages,
        issues,
        ..Snapshot::new(common.collector.now())
    };

    common.report(&snapshot, &args.report, CsvTable::Issues)
}
