//! CSV reading and writing for schedules.

use std::io::{Read, Write};
use std::path::PathBuf;

use super::{FileSchedule, Result, TransferItem};
use crate::error::ScheduleError;
use crate::models::config::ScheduleColumns;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(super) fn write_schedule<W: Write>(schedule: &FileSchedule, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let cols = &schedule.config.columns;

    let mut header = vec![
        cols.full_path.as_str(),
        cols.file_name.as_str(),
        cols.extension.as_str(),
        cols.modified.as_str(),
    ];
    header.extend(schedule.columns.iter().map(String::as_str));
    wtr.write_record(&header)?;

    for entry in &schedule.entries {
        let mut record = vec![
            entry.full_path.to_string_lossy().into_owned(),
            entry.file_name.clone(),
            entry.extension.clone(),
            entry
                .modified
                .map(|m| m.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        ];
        record.extend(
            (0..schedule.columns.len())
                .map(|i| entry.fields.get(i).cloned().flatten().unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Read a copy/move plan from a schedule CSV.
///
/// The source column is required; the destination column is optional and
/// rows without it are skipped when transferring.
pub fn read_transfer_plan<R: Read>(reader: R, columns: &ScheduleColumns) -> Result<Vec<TransferItem>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let position = |name: &str| headers.iter().position(|h| h.trim() == name);
    let source_col = position(&columns.full_path)
        .ok_or_else(|| ScheduleError::MissingColumn(columns.full_path.clone()))?;
    let destination_col = position(&columns.copy_move_path);

    let mut plan = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let source = record.get(source_col).unwrap_or_default().trim();
        if source.is_empty() {
            continue;
        }
        let destination = destination_col
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(PathBuf::from);

        plan.push(TransferItem {
            source: PathBuf::from(source),
            destination,
        });
    }

    Ok(plan)
}
