use crate::error::{DataError, FindError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// First grid point, in time slots.
pub const GRID_START: i64 = 10;
/// Spacing between grid points, in time slots.
pub const GRID_STEP: i64 = 10;
/// Samples this close to the largest elapsed time are left off the grid.
pub const TAIL_TRIM: i64 = 30;
/// Upper bound on the number of grid points a source may span.
pub const MAX_GRID_POINTS: usize = 1 << 20;

const MISSING_MARKERS: [&str; 6] = ["", "NA", "N/A", "NaN", "nan", "null"];

/// Header names of the elapsed-time key column and the scale column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Columns {
    pub key: String,
    pub value: String,
}

impl Default for Columns {
    fn default() -> Self {
        Columns {
            key: "t_chr".into(),
            value: "x_opt".into(),
        }
    }
}

/// (elapsed time, scale) pairs as read from the optimizer output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawSamples {
    points: Vec<(i64, f64)>,
}

impl RawSamples {
    pub fn new(points: Vec<(i64, f64)>) -> Self {
        Self { points }
    }

    pub fn from_path(path: &Path, columns: &Columns) -> Result<Self, DataError> {
        let file = File::open(path).map_err(|source| DataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("reading scale table from {}", path.display());
        Self::from_reader(BufReader::new(file), columns)
    }

    /// Parse comma separated rows. The first non-blank line names the columns.
    ///
    /// Cells are split on every comma. A cell may be wrapped in double quotes,
    /// but quoted cells cannot contain commas or escaped quotes; a cell with
    /// unbalanced quotes fails with [`DataError::UnbalancedQuote`].
    pub fn from_reader<R: BufRead>(reader: R, columns: &Columns) -> Result<Self, DataError> {
        let mut lines = reader.lines().enumerate();
        let mut header = None;
        for (idx, line) in lines.by_ref() {
            let line = line?;
            if !line.trim().is_empty() {
                header = Some(split_row(line.trim_start_matches('\u{feff}'), idx + 1)?);
                break;
            }
        }
        let header = header.ok_or(DataError::MissingHeader)?;
        let key_idx = column_index(&header, &columns.key)?;
        let value_idx = column_index(&header, &columns.value)?;

        let mut points = Vec::new();
        let mut skipped = 0usize;
        for (idx, line) in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let line_no = idx + 1;
            let cells = split_row(&line, line_no)?;
            let key_cell = cells.get(key_idx).ok_or_else(|| DataError::ShortRow {
                line: line_no,
                column: columns.key.clone(),
            })?;
            let key = key_cell.parse::<i64>().map_err(|_| DataError::InvalidCell {
                line: line_no,
                column: columns.key.clone(),
                value: key_cell.clone(),
            })?;
            let value_cell = cells.get(value_idx).map(String::as_str).unwrap_or("");
            if MISSING_MARKERS.contains(&value_cell) {
                debug!(line = line_no, key, "no scale on row, left to interpolation");
                skipped += 1;
                continue;
            }
            let value = value_cell
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DataError::InvalidCell {
                    line: line_no,
                    column: columns.value.clone(),
                    value: value_cell.to_string(),
                })?;
            points.push((key, value));
        }
        if skipped > 0 {
            info!(skipped, "rows without a scale were skipped");
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(i64, f64)] {
        &self.points
    }
}

fn split_row(line: &str, line_no: usize) -> Result<Vec<String>, DataError> {
    line.split(',')
        .map(|cell| {
            let cell = cell.trim();
            let quoted = cell.len() >= 2 && cell.starts_with('"') && cell.ends_with('"');
            let inner = if quoted { &cell[1..cell.len() - 1] } else { cell };
            if inner.contains('"') {
                return Err(DataError::UnbalancedQuote {
                    line: line_no,
                    cell: cell.to_string(),
                });
            }
            Ok(inner.to_string())
        })
        .collect()
}

fn column_index(header: &[String], name: &str) -> Result<usize, DataError> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| DataError::MissingColumn(name.to_string()))
}

/// Dense scales on the uniform grid. Entry `i` belongs to grid point `10 * (i + 1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleTable {
    values: Vec<f32>,
}

impl ScaleTable {
    /// Wrap values that are already laid out on the grid.
    pub fn from_values(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn from_path(path: &Path, columns: &Columns) -> Result<Self, DataError> {
        Self::from_samples(RawSamples::from_path(path, columns)?)
    }

    pub fn from_reader<R: BufRead>(reader: R, columns: &Columns) -> Result<Self, DataError> {
        Self::from_samples(RawSamples::from_reader(reader, columns)?)
    }

    /// Sort the samples, resample them onto the grid `10, 20, .. largest - 30`
    /// and fill grid points missing from the samples by linear interpolation
    /// in elapsed time.
    ///
    /// Every grid point must be bracketed by samples: a first sample later
    /// than 10 fails with [`DataError::Uncovered`] rather than leaving the
    /// leading grid points undefined.
    pub fn from_samples(samples: RawSamples) -> Result<Self, DataError> {
        let mut points = samples.points;
        if points.len() < 2 {
            return Err(DataError::TooFewSamples(points.len()));
        }
        points.sort_by_key(|&(t, _)| t);
        if let Some(pair) = points.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(DataError::DuplicateKey(pair[0].0));
        }

        let first = points[0].0;
        let largest = points[points.len() - 1].0;
        let grid_end = match largest.checked_sub(TAIL_TRIM) {
            Some(end) if end >= GRID_START => end,
            _ => return Err(DataError::EmptyGrid { largest }),
        };
        let grid_len = ((grid_end - GRID_START) / GRID_STEP + 1) as u64;
        if grid_len > MAX_GRID_POINTS as u64 {
            return Err(DataError::GridTooLarge {
                largest,
                max: MAX_GRID_POINTS,
            });
        }
        if first > GRID_START {
            return Err(DataError::Uncovered {
                grid_point: GRID_START,
                first,
            });
        }

        let mut values = Vec::with_capacity(grid_len as usize);
        let mut upper = 0usize;
        let mut grid_point = GRID_START;
        while grid_point <= grid_end {
            // largest > grid_end, so some sample always sits at or above the grid point
            while points[upper].0 < grid_point {
                upper += 1;
            }
            let (hi_t, hi_v) = points[upper];
            let value = if hi_t == grid_point {
                hi_v
            } else {
                let (lo_t, lo_v) = points[upper - 1];
                // keys may span more than i64 can subtract
                let offset = (grid_point as i128 - lo_t as i128) as f64;
                let span = (hi_t as i128 - lo_t as i128) as f64;
                lo_v + (hi_v - lo_v) * offset / span
            };
            values.push(value as f32);
            grid_point += GRID_STEP;
        }

        let table = Self { values };
        for (grid_point, scale) in table.entries() {
            if !(scale > 0.0 && scale < 1.0) {
                warn!(grid_point, scale, "scale outside (0, 1); sampling at this point will fail");
            }
        }
        info!(
            samples = points.len(),
            entries = table.len(),
            grid_end = table.grid_end(),
            "built scale table"
        );
        Ok(table)
    }

    /// Fail unless the table holds exactly `expected` entries.
    pub fn expect_len(self, expected: usize) -> Result<Self, DataError> {
        if self.values.len() != expected {
            return Err(DataError::LengthMismatch {
                expected,
                actual: self.values.len(),
            });
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    pub fn first(&self) -> Option<f32> {
        self.values.first().copied()
    }

    pub fn last(&self) -> Option<f32> {
        self.values.last().copied()
    }

    /// Largest grid point covered by the table.
    pub fn grid_end(&self) -> i64 {
        match self.values.len() {
            0 => 0,
            n => GRID_START + GRID_STEP * (n as i64 - 1),
        }
    }

    /// `(grid point, scale)` pairs in ascending elapsed time.
    pub fn entries(&self) -> impl Iterator<Item = (i64, f32)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| (GRID_START + GRID_STEP * i as i64, v))
    }
}

/// Load and resample the table at `source`.
pub fn build_table(source: impl AsRef<Path>, columns: &Columns) -> Result<ScaleTable, FindError> {
    Ok(ScaleTable::from_path(source.as_ref(), columns)?)
}
