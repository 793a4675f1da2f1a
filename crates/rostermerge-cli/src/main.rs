//! Rostermerge CLI - shift roster reconciliation tool

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rostermerge_core::{GridData, GridLayout};
use rostermerge_csv::CsvOptions;
use rostermerge_engine::{merge_departments, parse_grid, split_grid};

#[derive(Parser)]
#[command(name = "rostermerge")]
#[command(
    author,
    version,
    about = "Reconcile roster grids with tabular shift data"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a directory of roster grids with a tabular shift file
    Merge {
        /// Directory of `<dept>.values.csv` / `<dept>.bgs.csv` pairs
        #[arg(long)]
        gantt_dir: PathBuf,

        /// Tabular shift CSV (header row names the columns)
        #[arg(long)]
        rdb: PathBuf,

        /// Output directory
        #[arg(short, long)]
        out_dir: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// List the shifts parsed from one roster grid
    Shifts {
        /// Grid values CSV
        values: PathBuf,

        /// Grid backgrounds CSV
        bgs: PathBuf,

        /// Department name to report under
        #[arg(long, default_value = "-")]
        dept: String,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Field delimiter (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },
}

/// The grid layout offsets, 0-based
#[derive(Args)]
struct LayoutArgs {
    /// First data row
    #[arg(long, default_value_t = 3)]
    first_data_row: usize,

    /// First data column
    #[arg(long, default_value_t = 2)]
    first_data_col: usize,

    /// Row holding the time-axis labels
    #[arg(long, default_value_t = 2)]
    time_axis_row: usize,

    /// Column holding the member ids
    #[arg(long, default_value_t = 1)]
    member_id_col: usize,
}

impl LayoutArgs {
    fn to_layout(&self) -> GridLayout {
        GridLayout {
            first_data_row: self.first_data_row,
            first_data_col: self.first_data_col,
            time_axis_row: self.time_axis_row,
            member_id_col: self.member_id_col,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Merge {
            gantt_dir,
            rdb,
            out_dir,
            layout,
            delimiter,
        } => merge(&gantt_dir, &rdb, &out_dir, &layout.to_layout(), delimiter),
        Commands::Shifts {
            values,
            bgs,
            dept,
            layout,
            delimiter,
        } => list_shifts(&values, &bgs, &dept, &layout.to_layout(), delimiter),
    }
}

fn merge(
    gantt_dir: &Path,
    rdb: &Path,
    out_dir: &Path,
    layout: &GridLayout,
    delimiter: char,
) -> Result<()> {
    let options = csv_options(delimiter)?;

    let grids = load_grids(gantt_dir, &options)?;
    if grids.is_empty() {
        bail!("no `<dept>.values.csv` files found in '{}'", gantt_dir.display());
    }

    let (schema, rows) = rostermerge_csv::read_table(rdb, &options)
        .with_context(|| format!("Failed to read '{}'", rdb.display()))?;

    let report = merge_departments(&grids, layout, &rows, &schema)
        .context("Reconciliation failed")?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create '{}'", out_dir.display()))?;

    for (dept, grid) in &report.grids {
        let values_path = out_dir.join(format!("{dept}.values.csv"));
        let bgs_path = out_dir.join(format!("{dept}.bgs.csv"));
        rostermerge_csv::write_grid(grid, &values_path, &bgs_path, &options)
            .with_context(|| format!("Failed to write grid for department '{dept}'"))?;
    }
    rostermerge_csv::write_rows(&report.tabular_rows, out_dir.join("merged.csv"), &options)?;
    rostermerge_csv::write_rows(&report.conflict_rows, out_dir.join("conflicts.csv"), &options)?;
    rostermerge_csv::write_rows(&report.error_rows, out_dir.join("errors.csv"), &options)?;

    eprintln!(
        "{} departments merged: {} valid, {} conflicting, {} errors",
        report.grids.len(),
        report.stats.valid_shifts,
        report.stats.conflict_shifts,
        report.stats.error_records,
    );
    if !report.failures.is_empty() {
        for failure in &report.failures {
            eprintln!("failed: {}: {}", failure.dept, failure.error);
        }
        bail!("{} department(s) failed", report.failures.len());
    }

    Ok(())
}

fn list_shifts(
    values: &Path,
    bgs: &Path,
    dept: &str,
    layout: &GridLayout,
    delimiter: char,
) -> Result<()> {
    let options = csv_options(delimiter)?;

    let grid = rostermerge_csv::read_grid(values, bgs, &options)
        .with_context(|| format!("Failed to read '{}'", values.display()))?;
    let split = split_grid(&grid, layout).context("Failed to split grid")?;
    let parse = parse_grid(&split, dept);

    println!(
        "{} members, {} slots, {} shifts, {} errors",
        split.member_ids.iter().filter(|id| !id.is_empty()).count(),
        split.axis.slot_count(),
        parse.shifts.shift_count(),
        parse.errors.len(),
    );

    for shift in parse.shifts.iter_shifts() {
        println!(
            "{}\t{}-{}\t{:?}\t{}",
            shift.member_date_id,
            shift.start.format("%H:%M"),
            shift.end.format("%H:%M"),
            shift.job,
            shift.background.to_hex(),
        );
    }
    for error in &parse.errors {
        println!("error\t{}\t{}", error.member_date_id, error.message);
    }

    Ok(())
}

/// Find every `<dept>.values.csv` in the directory and pair it with its
/// `<dept>.bgs.csv`
fn load_grids(dir: &Path, options: &CsvOptions) -> Result<BTreeMap<String, GridData>> {
    let mut grids = BTreeMap::new();

    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read '{}'", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(dept) = name.strip_suffix(".values.csv") else {
            continue;
        };

        let bgs_path = dir.join(format!("{dept}.bgs.csv"));
        if !bgs_path.exists() {
            bail!(
                "'{}' has no matching '{}.bgs.csv'",
                path.display(),
                dept
            );
        }

        let grid = rostermerge_csv::read_grid(&path, &bgs_path, options)
            .with_context(|| format!("Failed to read grid for department '{dept}'"))?;
        grids.insert(dept.to_string(), grid);
    }

    Ok(grids)
}

fn csv_options(delimiter: char) -> Result<CsvOptions> {
    if !delimiter.is_ascii() {
        bail!("delimiter must be an ASCII character");
    }
    Ok(CsvOptions {
        delimiter: delimiter as u8,
    })
}
