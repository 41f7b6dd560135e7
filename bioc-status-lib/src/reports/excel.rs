use super::common;
use super::table::StatusTable;
use crate::Result;
use crate::facts::Snapshot;
use crate::facts::issues::IssueLookup;
use crate::facts::status::LogLevel;
use rust_xlsxwriter::{Color, DocProperties, Format, FormatAlign, Workbook, Worksheet};
use std::io::Write;
use strum::IntoEnumIterator;

/// Column of the log level in the status table.
const LOG_LEVEL_COLUMN: usize = 5;

/// Write a workbook with one sheet per collected section, plus the package list.
pub fn generate<W: Write>(snapshot: &Snapshot, writer: &mut W) -> Result<()> {
    let mut workbook = Workbook::new();

    let properties = DocProperties::new().set_author("bioc-status");
    let _ = workbook.set_properties(&properties);

    let header_format = Format::new().set_bold().set_background_color(Color::RGB(0x00FE_D7AA)).set_align(FormatAlign::Left);

    if !snapshot.statuses.is_empty() {
        write_status_sheet(workbook.add_worksheet(), snapshot, &header_format)?;
    }

    if !snapshot.downloads.is_empty() {
        write_downloads_sheet(workbook.add_worksheet(), snapshot, &header_format)?;
    }

    if !snapshot.issues.is_empty() {
        write_issues_sheet(workbook.add_worksheet(), snapshot, &header_format)?;
    }

    write_packages_sheet(workbook.add_worksheet(), snapshot, &header_format)?;

    let data = workbook.save_to_buffer()?;
    writer.write_all(&data)?;

    Ok(())
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
fn write_headers<S: AsRef<str>>(worksheet: &mut Worksheet, headers: &[S], format: &Format) -> Result<()> {
    for (col, header) in (0u16..).zip(headers) {
        worksheet.write_string_with_format(0, col, header.as_ref(), format)?;
    }
    worksheet.set_freeze_panes(1, 1)?;
    Ok(())
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
fn write_status_sheet(worksheet: &mut Worksheet, snapshot: &Snapshot, header_format: &Format) -> Result<()> {
    worksheet.set_name("Status")?;

    let level_formats: Vec<(LogLevel, Format)> = LogLevel::iter()
        .map(|level| {
            let format = Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(common::level_rgb(level)));
            (level, format)
        })
        .collect();

    let table = StatusTable::new(&snapshot.statuses);
    write_headers(worksheet, &table.headers(), header_format)?;

    for ((row, cells), record) in (1u32..).zip(table.rows()).zip(&snapshot.statuses) {
        for (col, cell) in (0u16..).zip(&cells) {
            let Some(value) = cell else {
                continue;
            };

            let level_format = level_formats.iter().find(|(level, _)| *level == record.log_level).map(|(_, f)| f);
            match level_format {
                Some(format) if usize::from(col) == LOG_LEVEL_COLUMN => {
                    worksheet.write_string_with_format(row, col, value, format)?;
                }
                _ => {
                    worksheet.write_string(row, col, value)?;
                }
            }
        }
    }

    worksheet.autofit();
    Ok(())
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
#[expect(clippy::cast_precision_loss, reason = "Intentional conversion to f64 for Excel output")]
fn write_downloads_sheet(worksheet: &mut Worksheet, snapshot: &Snapshot, header_format: &Format) -> Result<()> {
    worksheet.set_name("Downloads")?;
    write_headers(worksheet, &["Name", "Month", "Downloads", "Distinct IPs"], header_format)?;

    for (row, stat) in (1u32..).zip(&snapshot.downloads) {
        worksheet.write_string(row, 0, &stat.name)?;
        worksheet.write_string(row, 1, stat.month.to_string())?;
        worksheet.write_number(row, 2, stat.downloads as f64)?;
        worksheet.write_number(row, 3, stat.distinct_ips as f64)?;
    }

    worksheet.autofit();
    Ok(())
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
#[expect(clippy::cast_precision_loss, reason = "Intentional conversion to f64 for Excel output")]
fn write_issues_sheet(worksheet: &mut Worksheet, snapshot: &Snapshot, header_format: &Format) -> Result<()> {
    worksheet.set_name("Issues")?;
    write_headers(
        worksheet,
        &["Package", "Number", "Title", "Labeled", "Bug", "Assigned", "URL", "Note"],
        header_format,
    )?;

    let mut row = 1u32;
    for (name, lookup) in &snapshot.issues {
        match lookup {
            IssueLookup::Known { issues } => {
                for issue in issues {
                    worksheet.write_string(row, 0, name)?;
                    worksheet.write_number(row, 1, issue.number as f64)?;
                    worksheet.write_string(row, 2, &issue.title)?;
                    worksheet.write_boolean(row, 3, issue.is_labeled)?;
                    worksheet.write_boolean(row, 4, issue.is_bug)?;
                    worksheet.write_boolean(row, 5, issue.is_assigned)?;
                    worksheet.write_url(row, 6, issue.url.as_str())?;
                    row += 1;
                }
            }
            IssueLookup::Unknown { reason } => {
                worksheet.write_string(row, 0, name)?;
                worksheet.write_string(row, 7, reason)?;
                row += 1;
            }
        }
    }

    worksheet.autofit();
    Ok(())
}

#[expect(unused_results, reason = "rust_xlsxwriter methods return &mut Worksheet for chaining")]
fn write_packages_sheet(worksheet: &mut Worksheet, snapshot: &Snapshot, header_format: &Format) -> Result<()> {
    worksheet.set_name("Packages")?;
    write_headers(worksheet, &["Name", "Type"], header_format)?;

    for (row, package) in (1u32..).zip(&snapshot.packages) {
        worksheet.write_string(row, 0, &package.name)?;
        worksheet.write_string(row, 1, package.package_type.to_string())?;
    }

    worksheet.autofit();
    Ok(())
}
