//! Working out where a query is centred
//!
//! A query may name a FIRST source, give explicit coordinates, give both, or
//! give nothing at all. [`resolve_query`] walks a fixed decision order:
//!
//! 1. A source name is looked up first. If it resolves, its position wins
//!    and any explicit coordinates are ignored. If it does not, a notice is
//!    logged and the name is dropped.
//! 2. A missing right ascension is requested from the [`CoordinateInput`].
//! 3. A missing declination is requested the same way.
//!
//! The input provider is injected so that an interactive prompt, a scripted
//! test double, or a hard "input required" failure can be swapped in.

use log::{debug, warn};
use serde::Serialize;
use std::fmt;
use std::io::{BufRead, Write};

use crate::catalogs::Catalog;
use crate::coordinates::{validate_ra, SkyPoint};
use crate::{FirstFieldError, Result};

/// The effective query point, plus the source name when one resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedQuery {
    /// Position the radius search is centred on
    pub center: SkyPoint,
    /// Name of the FIRST source the position came from, if any
    pub source: Option<String>,
}

impl ResolvedQuery {
    /// Human-readable label: the source name, or the coordinates to two decimals
    pub fn search_term(&self) -> String {
        match &self.source {
            Some(name) => name.clone(),
            None => format!("{:.2} {:.2}", self.center.ra_deg(), self.center.dec_deg()),
        }
    }
}

/// Look up a FIRST source by exact, case-sensitive identifier.
///
/// When several rows share an identifier the first one in catalog order wins.
pub fn resolve_by_name(catalog: &Catalog, name: &str) -> Result<(SkyPoint, String)> {
    catalog
        .rows()
        .iter()
        .find(|row| row.id == name)
        .map(|row| (row.position(), row.id.clone()))
        .ok_or_else(|| FirstFieldError::SourceNotFound(name.to_string()))
}

/// The coordinate a [`CoordinateInput`] is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    RightAscension,
    Declination,
}

impl Axis {
    /// Prompt text shown to an operator
    pub fn prompt(&self) -> &'static str {
        match self {
            Axis::RightAscension => "Enter the right ascension (in degrees): ",
            Axis::Declination => "Enter the declination (in degrees): ",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::RightAscension => write!(f, "right ascension"),
            Axis::Declination => write!(f, "declination"),
        }
    }
}

/// Supplies a coordinate, in decimal degrees, that the caller did not give
pub trait CoordinateInput {
    /// Produce a value for `axis` or fail. A single attempt, no retries.
    fn request(&mut self, axis: Axis) -> Result<f64>;
}

impl<F> CoordinateInput for F
where
    F: FnMut(Axis) -> Result<f64>,
{
    fn request(&mut self, axis: Axis) -> Result<f64> {
        self(axis)
    }
}

/// Blocking operator prompt over any reader/writer pair (usually stdin/stdout)
pub struct PromptInput<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> PromptInput<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl PromptInput<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompt on the process terminal
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> CoordinateInput for PromptInput<R, W> {
    fn request(&mut self, axis: Axis) -> Result<f64> {
        write!(self.writer, "{}", axis.prompt())?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(FirstFieldError::InputRequired(format!(
                "no {} supplied before end of input",
                axis
            )));
        }

        let input = line.trim();
        input
            .parse::<f64>()
            .map_err(|source| FirstFieldError::InputParseFailure {
                input: input.to_string(),
                source,
            })
    }
}

/// Refuses every request; for batch runs where blocking on an operator is not allowed
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl CoordinateInput for NoInput {
    fn request(&mut self, axis: Axis) -> Result<f64> {
        Err(FirstFieldError::InputRequired(format!(
            "{} was not given and interactive input is disabled",
            axis
        )))
    }
}

enum ResolutionStep {
    ByName(String),
    RightAscension,
    Declination { ra: f64 },
    Done(ResolvedQuery),
}

/// Decide the effective query point from optional coordinates and source name.
///
/// Only a failed name lookup is absorbed here; load, parse and input errors
/// propagate to the caller unchanged. Explicit and prompted coordinates must
/// name a point on the sky, otherwise the result is `InvalidCoordinate`.
pub fn resolve_query(
    catalog: &Catalog,
    ra: Option<f64>,
    dec: Option<f64>,
    source: Option<&str>,
    input: &mut dyn CoordinateInput,
) -> Result<ResolvedQuery> {
    let mut step = match source {
        Some(name) => ResolutionStep::ByName(name.to_string()),
        None => ResolutionStep::RightAscension,
    };

    loop {
        step = match step {
            ResolutionStep::ByName(name) => match resolve_by_name(catalog, &name) {
                Ok((center, source)) => {
                    debug!("Resolved {} to {:?}", source, center);
                    ResolutionStep::Done(ResolvedQuery {
                        center,
                        source: Some(source),
                    })
                }
                Err(FirstFieldError::SourceNotFound(name)) => {
                    warn!("No matching FIRST source found: {}", name);
                    ResolutionStep::RightAscension
                }
                Err(e) => return Err(e),
            },
            ResolutionStep::RightAscension => {
                let ra = match ra {
                    Some(ra) => ra,
                    None => input.request(Axis::RightAscension)?,
                };
                ResolutionStep::Declination {
                    ra: validate_ra(ra)?,
                }
            }
            ResolutionStep::Declination { ra } => {
                let dec = match dec {
                    Some(dec) => dec,
                    None => input.request(Axis::Declination)?,
                };
                ResolutionStep::Done(ResolvedQuery {
                    center: SkyPoint::try_from_degrees(ra, dec)?,
                    source: None,
                })
            }
            ResolutionStep::Done(query) => return Ok(query),
        };
    }
}
