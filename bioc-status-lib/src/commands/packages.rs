use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::facts::packages::{PackageRecord, PackageType};
use camino::Utf8PathBuf;
use clap::Parser;
use core::fmt::Write;
use ohno::{IntoAppError, bail};
use std::fs;

#[derive(Parser, Debug)]
pub struct PackagesArgs {
    /// Only list packages of these categories
    #[arg(long = "type", value_name = "TYPE", value_delimiter = ',')]
    pub package_types: Vec<PackageType>,

    /// Write the package names to this file, one per line
    #[arg(long, value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Write the package names to the configured package list file
    #[arg(long, conflicts_with = "output")]
    pub save: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn list_packages<H: Host>(host: &mut H, args: &PackagesArgs) -> Result<()> {
    let mut common = Common::new(host, &args.common)?;

    let packages: Vec<PackageRecord> = common
        .collector
        .list_packages(common.primary_channel())
        .await?
        .into_iter()
        .filter(|p| args.package_types.is_empty() || args.package_types.contains(&p.package_type))
        .collect();

    let destination = if args.save {
        let Some(path) = common.config.packages_file.clone() else {
            bail!("--save needs a packages_file in the configuration");
        };
        Some(path)
    } else {
        args.output.clone()
    };

    if let Some(path) = destination {
        let mut list = String::with_capacity(packages.len() * 12);
        for package in &packages {
            writeln!(list, "{}", package.name)?;
        }
        fs::write(&path, list).into_app_err_with(|| format!("writing package list '{path}'"))?;
        common.print(&format!("Wrote {} package name(s) to {path}\n", packages.len()));
        return Ok(());
    }

    common.print(&format_package_table(&packages));
    Ok(())
}

fn format_package_table(packages: &[PackageRecord]) -> String {
    let width = packages.iter().map(|p| p.name.len()).max().unwrap_or(0);
    let mut table = String::new();
    for package in packages {
        let _ = writeln!(table, "{:<width$}  {}", package.name, package.package_type);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_package_table_aligns_names() {
        let table = format_package_table(&[
            PackageRecord::new("a4", PackageType::Software),
            PackageRecord::new("BiocCheck", PackageType::Software),
            PackageRecord::new("rnaseqGene", PackageType::Workflow),
        ]);
        assert_eq!(table, "a4          Software\nBiocCheck   Software\nrnaseqGene  Workflow\n");
    }

    #[test]
    fn test_format_empty_table() {
        assert_eq!(format_package_table(&[]), "");
    }
}
