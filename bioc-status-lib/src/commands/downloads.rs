use super::Host;
use super::common::{Common, CommonArgs, CsvTable, ReportArgs};
use crate::Result;
use crate::facts::Snapshot;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct DownloadsArgs {
    /// Packages to report on, separated by spaces or commas (default is the package list file)
    #[arg(value_name = "PACKAGE")]
    pub packages: Vec<String>,

    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub report: ReportArgs,
}

pub async fn process_downloads<H: Host>(host: &mut H, args: &DownloadsArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;
    let names = common.package_names(&args.packages)?;

    let packages = common.collector.resolve_packages(common.primary_channel(), &names).await?;
    let downloads = common.collector.download_stats(&packages).await?;

    let snapshot = Snapshot {
        channels: common.channels.clone(),
        packages,
        downloads,
        ..Snapshot::new(common.collector.now())
    };

    common.report(&snapshot, &args.report, CsvTable::Downloads)
}
