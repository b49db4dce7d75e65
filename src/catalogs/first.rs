//! FIRST catalog loader
//!
//! Reads a comma-separated export of the FIRST source catalog, plain or
//! gzipped. The header row names the columns; `FIRST`, `RAJ2000`, `DEJ2000`,
//! `Fint` and `c1` are required and every other column is carried through
//! untouched.
//!
//! Numeric fields must be finite and declinations must lie in [-90, 90].
//!
//! Fields are split on every comma. Surrounding quotes are stripped, but a
//! quoted field that itself contains a comma is not supported and shows up
//! as a field-count `LoadFailure`.

use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::{
    Catalog, CatalogLoader, CatalogRow, CLASS_COLUMN, DEC_COLUMN, FLUX_COLUMN, ID_COLUMN,
    RA_COLUMN,
};
use crate::coordinates::validate_dec;
use crate::FirstFieldError;
use crate::Result;

/// Loads the FIRST catalog from a CSV (or `.csv.gz`) file on every call
#[derive(Debug, Clone)]
pub struct FirstCsvLoader {
    path: PathBuf,
}

impl FirstCsvLoader {
    /// Create a loader for the catalog file at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the catalog file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_failure(&self, message: impl std::fmt::Display) -> FirstFieldError {
        FirstFieldError::LoadFailure(format!("{}: {}", self.path.display(), message))
    }

    fn open(&self) -> Result<Box<dyn BufRead>> {
        let file = File::open(&self.path).map_err(|e| self.load_failure(e))?;

        // Check if the file is empty
        let metadata = file.metadata().map_err(|e| self.load_failure(e))?;
        if metadata.len() == 0 {
            return Err(self.load_failure("catalog file is empty"));
        }

        let is_gzipped = self
            .path
            .extension()
            .map(|ext| ext == "gz")
            .unwrap_or(false);

        let reader: Box<dyn BufRead> = if is_gzipped {
            debug!("Loading gzipped FIRST catalog: {}", self.path.display());
            let decoder = flate2::read::GzDecoder::new(BufReader::new(file));
            Box::new(BufReader::new(decoder))
        } else {
            debug!("Loading FIRST catalog: {}", self.path.display());
            Box::new(BufReader::new(file))
        };
        Ok(reader)
    }

    /// Parse catalog text from any buffered reader
    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Catalog> {
        let mut lines_iter = reader.lines();
        let header = match lines_iter.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => return Err(self.load_failure(e)),
            None => return Err(self.load_failure("missing header row")),
        };

        let headers: Vec<String> = split_fields(&header).map(str::to_string).collect();
        let find_column = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| self.load_failure(format!("missing column: {}", name)))
        };

        let id_idx = find_column(ID_COLUMN)?;
        let ra_idx = find_column(RA_COLUMN)?;
        let dec_idx = find_column(DEC_COLUMN)?;
        let flux_idx = find_column(FLUX_COLUMN)?;
        let class_idx = find_column(CLASS_COLUMN)?;
        let fixed = [id_idx, ra_idx, dec_idx, flux_idx, class_idx];

        let extra_idx: Vec<usize> = (0..headers.len()).filter(|i| !fixed.contains(i)).collect();
        let extra_columns: Vec<String> = extra_idx.iter().map(|&i| headers[i].clone()).collect();

        let mut rows = Vec::new();
        let mut skipped_lines = 0;

        for (offset, line_result) in lines_iter.enumerate() {
            // Header is line 1
            let line_no = offset + 2;
            let line = line_result.map_err(|e| self.load_failure(e))?;

            if line.trim().is_empty() {
                skipped_lines += 1;
                continue;
            }

            let fields: Vec<&str> = split_fields(&line).collect();
            if fields.len() != headers.len() {
                return Err(self.load_failure(format!(
                    "line {}: expected {} fields, found {}",
                    line_no,
                    headers.len(),
                    fields.len()
                )));
            }

            let number = |idx: usize| -> Result<f64> {
                let value = fields[idx].parse::<f64>().map_err(|e| {
                    self.load_failure(format!(
                        "line {}: invalid {} value {:?}: {}",
                        line_no, headers[idx], fields[idx], e
                    ))
                })?;
                if !value.is_finite() {
                    return Err(self.load_failure(format!(
                        "line {}: {} value {:?} is not finite",
                        line_no, headers[idx], fields[idx]
                    )));
                }
                Ok(value)
            };

            let dec = validate_dec(number(dec_idx)?)
                .map_err(|e| self.load_failure(format!("line {}: {}", line_no, e)))?;

            let class = parse_class(fields[class_idx]).ok_or_else(|| {
                self.load_failure(format!(
                    "line {}: invalid {} value {:?}",
                    line_no, CLASS_COLUMN, fields[class_idx]
                ))
            })?;

            rows.push(CatalogRow {
                id: fields[id_idx].to_string(),
                ra: number(ra_idx)?,
                dec,
                flux: number(flux_idx)?,
                class,
                extra: extra_idx.iter().map(|&i| fields[i].to_string()).collect(),
            });
        }

        debug!(
            "Loaded {} FIRST sources from {} (skipped {} blank lines)",
            rows.len(),
            self.path.display(),
            skipped_lines
        );

        Ok(Catalog::with_extra_columns(rows, extra_columns))
    }
}

impl CatalogLoader for FirstCsvLoader {
    fn load(&self) -> Result<Catalog> {
        let reader = self.open()?;
        self.parse(reader)
    }
}

/// Split a CSV line, trimming whitespace and surrounding quotes from each field
fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(|field| {
        let field = field.trim();
        field
            .strip_prefix('"')
            .and_then(|f| f.strip_suffix('"'))
            .unwrap_or(field)
    })
}

/// A blank classification means "unclassified"
fn parse_class(field: &str) -> Option<char> {
    let mut chars = field.trim().chars();
    match (chars.next(), chars.next()) {
        (None, _) => Some(' '),
        (Some(c), None) => Some(c),
        _ => None,
    }
}
