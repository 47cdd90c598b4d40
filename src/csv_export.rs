use std::path::Path;

use anyhow::Context;
use log::info;

use crate::schema::FestivalRecord;

/// Column names of the exported file, in order.
pub const HEADER: [&str; 6] = [
    "date_iso",
    "date_label",
    "day",
    "festival",
    "month",
    "source_url",
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct WriteReport {
    pub written: usize,
    pub dated: usize,
}

impl WriteReport {
    pub fn undated(&self) -> usize {
        self.written - self.dated
    }
}

/// Serializes the records (header first) into a CSV document.
/// Records without a festival name are left out.
pub fn to_csv<'a>(
    records: impl IntoIterator<Item = &'a FestivalRecord>,
) -> anyhow::Result<(Vec<u8>, WriteReport)> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);
    writer.write_record(HEADER)?;
    let mut report = WriteReport {
        written: 0,
        dated: 0,
    };
    for record in records {
        if record.festival().trim().is_empty() {
            continue;
        }
        writer.serialize(record)?;
        report.written += 1;
        if record.date().is_some() {
            report.dated += 1;
        }
    }
    let bytes = writer
        .into_inner()
        .map_err(csv::IntoInnerError::into_error)
        .context("Failed to flush CSV buffer")?;
    Ok((bytes, report))
}

/// Writes the records to `path`, replacing any previous file.
///
/// Returns `None` without touching the file system if there are no records at all.
pub fn write_csv(path: &Path, records: &[FestivalRecord]) -> anyhow::Result<Option<WriteReport>> {
    if records.is_empty() {
        info!("No rows to write, skipping CSV creation.");
        return Ok(None);
    }
    let (bytes, report) = to_csv(records)?;
    fs_err::write(path, bytes).with_context(|| format!("While writing festivals to {path:?}"))?;
    info!("Wrote {} festival rows to {:?}", report.written, path);
    info!(
        "Summary: {} rows with valid dates, {} rows without dates",
        report.dated,
        report.undated()
    );
    Ok(Some(report))
}
