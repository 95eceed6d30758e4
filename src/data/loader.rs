use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use chrono::NaiveDateTime;

use super::model::Dataset;
use crate::error::LoadError;

/// Zero-based source columns holding X and Y. The first column (a row index
/// in the instrument exports) is skipped.
const X_COLUMN: usize = 1;
const Y_COLUMN: usize = 2;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a measurement curve from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` – first worksheet, header row, columns B and C
/// * `.csv`  – header row, columns 2 and 3
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" => load_xlsx(path),
        "csv" => load_csv(path),
        other => Err(LoadError::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Shared row handling
// ---------------------------------------------------------------------------

/// A single source cell, normalised across file formats.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Blank,
    Number(f64),
    Text(String),
}

impl Cell {
    fn from_text(s: &str) -> Cell {
        let s = s.trim();
        if s.is_empty() {
            return Cell::Blank;
        }
        match s.parse::<f64>() {
            Ok(v) => Cell::Number(v),
            Err(_) => Cell::Text(s.to_string()),
        }
    }
}

/// Turn header names plus `(line, x, y)` cells into a [`Dataset`].
///
/// Rows where both cells are blank are skipped. A single blank cell becomes
/// NaN, which the chart draws as a gap and the peak filter never selects.
/// Text that is not a number rejects the whole file.
fn build_dataset(
    x_label: String,
    y_label: String,
    rows: impl Iterator<Item = (usize, Cell, Cell)>,
) -> Result<Dataset, LoadError> {
    let mut x = Vec::new();
    let mut y = Vec::new();

    for (line, cx, cy) in rows {
        if cx == Cell::Blank && cy == Cell::Blank {
            continue;
        }
        x.push(cell_value(cx, &x_label, line)?);
        y.push(cell_value(cy, &y_label, line)?);
    }

    if x.is_empty() {
        return Err(LoadError::EmptyOrMalformed("file has no data rows".into()));
    }
    Dataset::new(x_label, y_label, x, y)
}

fn cell_value(cell: Cell, column: &str, line: usize) -> Result<f64, LoadError> {
    match cell {
        Cell::Number(v) => Ok(v),
        Cell::Blank => Ok(f64::NAN),
        Cell::Text(t) => Err(LoadError::EmptyOrMalformed(format!(
            "line {line}, column '{column}': '{t}' is not a number"
        ))),
    }
}

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn too_few_columns(found: usize) -> LoadError {
    LoadError::EmptyOrMalformed(format!(
        "expected at least {} columns (an index column followed by X and Y), found {found}",
        Y_COLUMN + 1
    ))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one sample per row.
fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(open(path)?);

    let headers = reader.headers()?.clone();
    if headers.len() <= Y_COLUMN {
        return Err(too_few_columns(headers.len()));
    }
    let x_label = headers[X_COLUMN].to_string();
    let y_label = headers[Y_COLUMN].to_string();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).map(Cell::from_text).unwrap_or(Cell::Blank);
        // +2: one for the header, one for 1-based line numbers
        rows.push((row_no + 2, cell(X_COLUMN), cell(Y_COLUMN)));
    }

    build_dataset(x_label, y_label, rows.into_iter())
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

const SECONDS_PER_DAY: f64 = 86_400.0;

fn xlsx_cell(data: Option<&Data>) -> Cell {
    match data {
        None | Some(Data::Empty) => Cell::Blank,
        Some(Data::Float(v)) => Cell::Number(*v),
        Some(Data::Int(v)) => Cell::Number(*v as f64),
        Some(Data::String(s)) => Cell::from_text(s),
        // Excel stores dates and durations as days; the time axis is seconds.
        Some(Data::DateTime(dt)) => Cell::Number(dt.as_f64() * SECONDS_PER_DAY),
        Some(other @ Data::DateTimeIso(s)) => iso_datetime_seconds(s)
            .map(Cell::Number)
            .unwrap_or_else(|| Cell::Text(other.to_string())),
        Some(other @ Data::DurationIso(s)) => iso_duration_seconds(s)
            .map(Cell::Number)
            .unwrap_or_else(|| Cell::Text(other.to_string())),
        Some(other) => Cell::Text(other.to_string()),
    }
}

/// Seconds since the Excel epoch (1899-12-30), matching serial date cells.
fn iso_datetime_seconds(s: &str) -> Option<f64> {
    let dt = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    let epoch = chrono::NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let delta = dt - epoch;
    Some(delta.num_milliseconds() as f64 / 1000.0)
}

/// Time-only ISO 8601 durations such as `PT1H2M3.5S`.
fn iso_duration_seconds(s: &str) -> Option<f64> {
    let mut rest = s.strip_prefix("PT")?;
    if rest.is_empty() {
        return None;
    }
    let mut total = 0.0;
    while !rest.is_empty() {
        let unit_at = rest.find(|c: char| c.is_ascii_alphabetic())?;
        let value: f64 = rest[..unit_at].parse().ok()?;
        total += value
            * match rest.as_bytes()[unit_at] {
                b'H' => 3600.0,
                b'M' => 60.0,
                b'S' => 1.0,
                _ => return None,
            };
        rest = &rest[unit_at + 1..];
    }
    Some(total)
}

/// Reads the first worksheet; its first row is the header.
fn load_xlsx(path: &Path) -> Result<Dataset, LoadError> {
    let mut workbook = Xlsx::new(open(path)?)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::EmptyOrMalformed("workbook has no worksheets".into()))??;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| LoadError::EmptyOrMalformed("worksheet is empty".into()))?;
    if header.len() <= Y_COLUMN {
        return Err(too_few_columns(header.len()));
    }
    let x_label = header[X_COLUMN].to_string();
    let y_label = header[Y_COLUMN].to_string();

    let cells = rows.enumerate().map(|(row_no, row)| {
        (
            row_no + 2,
            xlsx_cell(row.get(X_COLUMN)),
            xlsx_cell(row.get(Y_COLUMN)),
        )
    });

    build_dataset(x_label, y_label, cells)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use calamine::{ExcelDateTime, ExcelDateTimeType};

    use super::*;
    use crate::data::filter::peak_subset;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("silane-peak-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reads_second_and_third_csv_columns() {
        let path = scratch_file(
            "three_cols.csv",
            "No.,Time (s),Current (A)\n1,0.0,1e-6\n2,0.5,2.5e-6\n3,1.0,4e-6\n",
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.x_label(), "Time (s)");
        assert_eq!(ds.y_label(), "Current (A)");
        assert_eq!(ds.x(), &[0.0, 0.5, 1.0]);
        assert_eq!(ds.y(), &[1e-6, 2.5e-6, 4e-6]);
    }

    #[test]
    fn extra_columns_and_trailing_blank_rows_are_ignored() {
        let path = scratch_file(
            "extra.csv",
            "idx,t,i,note\n1,0.1,2.0,ok\n2,0.2,3.0,\n,,,\n",
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn uppercase_extension_is_accepted() {
        let path = scratch_file("upper.CSV", "a,b,c\n0,1,2\n");
        assert_eq!(load_file(&path).unwrap().len(), 1);
    }

    #[test]
    fn txt_is_unsupported() {
        let path = scratch_file("data.txt", "a,b,c\n0,1,2\n");
        match load_file(&path) {
            Err(LoadError::UnsupportedFormat { extension }) => assert_eq!(extension, "txt"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("silane-peak-loader-no-such-file.xlsx");
        match load_file(&path) {
            Err(LoadError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn one_column_file_is_malformed() {
        let path = scratch_file("one_col.csv", "value\n1\n2\n3\n");
        assert!(matches!(load_file(&path), Err(LoadError::EmptyOrMalformed(_))));
    }

    #[test]
    fn header_only_file_is_malformed() {
        let path = scratch_file("header_only.csv", "idx,t,i\n");
        assert!(matches!(load_file(&path), Err(LoadError::EmptyOrMalformed(_))));
    }

    #[test]
    fn non_numeric_cell_names_the_line() {
        let path = scratch_file("bad.csv", "idx,t,i\n1,0.0,1.0\n2,0.5,oops\n");
        match load_file(&path) {
            Err(LoadError::EmptyOrMalformed(msg)) => {
                assert!(msg.contains("line 3"), "{msg}");
                assert!(msg.contains("oops"), "{msg}");
            }
            other => panic!("expected EmptyOrMalformed, got {other:?}"),
        }
    }

    #[test]
    fn partly_blank_row_loads_as_a_gap() {
        let path = scratch_file("gap.csv", "idx,t,i\n1,0.0,1.0\n2,0.5,\n3,1.0,5.0\n");
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert!(ds.y()[1].is_nan());
        assert_eq!(ds.x()[1], 0.5);

        let subset = peak_subset(&ds, 0.0, -1.0);
        assert_eq!(subset.points().collect::<Vec<_>>(), vec![(0.0, 1.0), (1.0, 5.0)]);
        assert_eq!(subset.mean_y(), Some(3.0));
    }

    #[test]
    fn blank_time_cell_becomes_nan() {
        let path = scratch_file("gap_x.csv", "idx,t,i\n1,,2.0\n2,0.5,3.0\n");
        let ds = load_file(&path).unwrap();
        assert!(ds.x()[0].is_nan());
        assert_eq!(ds.y(), &[2.0, 3.0]);
    }

    #[test]
    fn excel_time_cells_become_seconds() {
        let half_day = ExcelDateTime::new(0.5, ExcelDateTimeType::TimeDelta, false);
        assert_eq!(xlsx_cell(Some(&Data::DateTime(half_day))), Cell::Number(43_200.0));
        assert_eq!(
            xlsx_cell(Some(&Data::DurationIso("PT1M2.5S".into()))),
            Cell::Number(62.5)
        );
        assert_eq!(
            xlsx_cell(Some(&Data::DateTimeIso("1899-12-31T00:00:10".into()))),
            Cell::Number(86_410.0)
        );
        assert!(matches!(
            xlsx_cell(Some(&Data::DurationIso("P1D".into()))),
            Cell::Text(_)
        ));
    }

    #[test]
    fn cell_parsing() {
        assert_eq!(Cell::from_text("  "), Cell::Blank);
        assert_eq!(Cell::from_text(" 2.5e-6 "), Cell::Number(2.5e-6));
        assert_eq!(Cell::from_text("abc"), Cell::Text("abc".into()));
        assert_eq!(xlsx_cell(Some(&Data::Int(3))), Cell::Number(3.0));
        assert_eq!(xlsx_cell(None), Cell::Blank);
    }
}
