//! Tabular CSV reader and writer.
//!
//! The tabular source travels as one CSV file whose header row names the
//! schema fields; reading resolves the [`ColumnSchema`] from that row and
//! returns the header-stripped data rows.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use rostermerge_core::{CellValue, ColumnSchema};

use crate::error::CsvResult;
use crate::options::CsvOptions;

/// Read the tabular source: the resolved schema plus header-stripped rows
pub fn read_table<P: AsRef<Path>>(
    path: P,
    options: &CsvOptions,
) -> CsvResult<(ColumnSchema, Vec<Vec<CellValue>>)> {
    read_table_from(File::open(path)?, options)
}

/// Read the tabular source from a reader
pub fn read_table_from<R: Read>(
    reader: R,
    options: &CsvOptions,
) -> CsvResult<(ColumnSchema, Vec<Vec<CellValue>>)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = csv_reader.records();

    let schema = match records.next() {
        Some(header) => {
            let cells: Vec<CellValue> = header?.iter().map(CellValue::from).collect();
            ColumnSchema::from_header_row(&cells)?
        }
        None => ColumnSchema::default(),
    };

    let mut rows = Vec::new();
    for result in records {
        let record = result?;
        rows.push(record.iter().map(CellValue::from).collect());
    }

    Ok((schema, rows))
}

/// Write output rows (header row included) to a file
pub fn write_rows<P: AsRef<Path>>(
    rows: &[Vec<CellValue>],
    path: P,
    options: &CsvOptions,
) -> CsvResult<()> {
    write_rows_to(rows, File::create(path)?, options)
}

/// Write output rows to a writer
pub fn write_rows_to<W: Write>(
    rows: &[Vec<CellValue>],
    writer: W,
    options: &CsvOptions,
) -> CsvResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);
    for row in rows {
        csv_writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}
