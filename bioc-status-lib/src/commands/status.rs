use super::Host;
use super::common::{Common, CommonArgs, CsvTable, FailureArgs, ReportArgs};
use crate::Result;
use crate::facts::Snapshot;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Packages to check, separated by spaces or commas (default is the package list file)
    #[arg(value_name = "PACKAGE")]
    pub packages: Vec<String>,

    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub report: ReportArgs,

    #[command(flatten)]
    pub failure: FailureArgs,
}

pub async fn process_status<H: Host>(host: &mut H, args: &StatusArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;
    let names = common.package_names(&args.packages)?;

    let packages = common.collector.resolve_packages(common.primary_channel(), &names).await?;
    let statuses = common.collector.statuses(&packages, &common.channels).await?;

    let snapshot = Snapshot {
        channels: common.channels.clone(),
        packages,
        statuses,
        ..Snapshot::new(common.collector.now())
    };

    common.report(&snapshot, &args.report, CsvTable::Statuses)?;
    args.failure.check(&snapshot)
}
