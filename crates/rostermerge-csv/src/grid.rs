//! Grid CSV reader and writer.
//!
//! A grid is carried as two CSV files of identical shape: one holding cell
//! values, one holding background color strings. Short rows are padded to
//! the widest row so that merged-cell exports with trailing blanks still
//! form a rectangular matrix.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use rostermerge_core::{CellValue, Color, GridData};

use crate::error::CsvResult;
use crate::options::CsvOptions;

/// Read a grid from a values file and a backgrounds file
pub fn read_grid<P: AsRef<Path>>(
    values_path: P,
    backgrounds_path: P,
    options: &CsvOptions,
) -> CsvResult<GridData> {
    let values = File::open(values_path)?;
    let backgrounds = File::open(backgrounds_path)?;
    read_grid_from(values, backgrounds, options)
}

/// Read a grid from a pair of readers
pub fn read_grid_from<R: Read>(
    values: R,
    backgrounds: R,
    options: &CsvOptions,
) -> CsvResult<GridData> {
    let value_rows = read_matrix(values, options)?;
    let background_rows = read_matrix(backgrounds, options)?;

    let width = value_rows
        .iter()
        .map(Vec::len)
        .chain(background_rows.iter().map(Vec::len))
        .max()
        .unwrap_or(0);

    let values: Vec<Vec<CellValue>> = value_rows
        .into_iter()
        .map(|row| {
            let mut cells: Vec<CellValue> = row.iter().map(|field| detect_cell(field)).collect();
            cells.resize(width, CellValue::Empty);
            cells
        })
        .collect();

    let backgrounds: Vec<Vec<Color>> = background_rows
        .into_iter()
        .map(|row| {
            let mut colors: Vec<Color> = row.iter().map(|field| Color::parse(field)).collect();
            colors.resize(width, Color::Default);
            colors
        })
        .collect();

    Ok(GridData::new(values, backgrounds)?)
}

/// Write a grid to a values file and a backgrounds file
pub fn write_grid<P: AsRef<Path>>(
    grid: &GridData,
    values_path: P,
    backgrounds_path: P,
    options: &CsvOptions,
) -> CsvResult<()> {
    write_grid_to(
        grid,
        File::create(values_path)?,
        File::create(backgrounds_path)?,
        options,
    )
}

/// Write a grid to a pair of writers
pub fn write_grid_to<W: Write>(
    grid: &GridData,
    values: W,
    backgrounds: W,
    options: &CsvOptions,
) -> CsvResult<()> {
    let mut value_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(values);
    for row in grid.values() {
        value_writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    value_writer.flush()?;

    let mut background_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(backgrounds);
    for row in grid.backgrounds() {
        background_writer.write_record(row.iter().map(|color| color.to_hex()))?;
    }
    background_writer.flush()?;

    Ok(())
}

fn read_matrix<R: Read>(reader: R, options: &CsvOptions) -> CsvResult<Vec<Vec<String>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

/// Detect the cell type of a field value
fn detect_cell(field: &str) -> CellValue {
    let field = field.trim();
    if field.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(n) = field.parse::<f64>() {
        return CellValue::Number(n);
    }
    CellValue::text(field)
}
