use crate::domain::{JanusError, ParserResult};
use std::fmt::{Display, Formatter};

/// One line of a `chisqsurface` output file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquarePoint {
    pub x_element: f64,
    pub y_element: f64,
    pub projectile: f64,
    pub target: f64,
    pub total: f64,
}

const CHISQ_COLUMNS: usize = 5;

/// Parses tab-separated rows of
/// `x element, y element, projectile chi2, target chi2, total chi2`.
pub fn parse_chisq_source(source: &str) -> ParserResult<Vec<ChiSquarePoint>> {
    let mut points = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        if fields.len() < CHISQ_COLUMNS {
            return Err(JanusError::input_validation(
                "INPUT.CHISQ_ROW",
                format!(
                    "line {} has {} tab-separated fields, expected {}",
                    line_number,
                    fields.len(),
                    CHISQ_COLUMNS
                ),
            ));
        }

        let mut values = [0.0; CHISQ_COLUMNS];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = field.parse::<f64>().map_err(|_| {
                JanusError::input_validation(
                    "INPUT.CHISQ_VALUE",
                    format!("line {}: '{}' is not a number", line_number, field),
                )
            })?;
        }

        let [x_element, y_element, projectile, target, total] = values;
        points.push(ChiSquarePoint {
            x_element,
            y_element,
            projectile,
            target,
            total,
        });
    }

    if points.is_empty() {
        return Err(JanusError::input_validation(
            "INPUT.CHISQ_EMPTY",
            "chi-square surface file contains no data rows",
        ));
    }
    Ok(points)
}

/// A nuclear level written as spin, parity and index, e.g. `2+1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelLabel {
    pub spin: String,
    pub parity: char,
    pub number: String,
}

impl LevelLabel {
    pub fn parse(raw: &str) -> ParserResult<Self> {
        let raw = raw.trim();
        let invalid = || {
            JanusError::input_validation(
                "INPUT.CHISQ_LEVEL",
                format!(
                    "level '{}' must be spin, parity and number, e.g. 2+1 for the first 2+ state",
                    raw
                ),
            )
        };

        let parity_at = raw.find(['+', '-']).ok_or_else(invalid)?;
        let spin = &raw[..parity_at];
        let number = &raw[parity_at + 1..];
        if spin.is_empty()
            || number.is_empty()
            || !number.chars().all(|character| character.is_ascii_digit())
        {
            return Err(invalid());
        }

        Ok(Self {
            spin: spin.to_string(),
            parity: raw[parity_at..].chars().next().ok_or_else(invalid)?,
            number: number.to_string(),
        })
    }
}

impl Display for LevelLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}^{}_{}", self.spin, self.parity, self.number)
    }
}

/// The two transitions whose E2 matrix elements span the surface axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionLevels {
    pub levels: [LevelLabel; 4],
}

impl TransitionLevels {
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> ParserResult<Self> {
        if raw.len() != 4 {
            return Err(JanusError::input_validation(
                "INPUT.CHISQ_LEVEL",
                format!("exactly four levels are required, got {}", raw.len()),
            ));
        }
        Ok(Self {
            levels: [
                LevelLabel::parse(raw[0].as_ref())?,
                LevelLabel::parse(raw[1].as_ref())?,
                LevelLabel::parse(raw[2].as_ref())?,
                LevelLabel::parse(raw[3].as_ref())?,
            ],
        })
    }

    pub fn x_axis_label(&self) -> String {
        format!("<{}|E2|{}> eb", self.levels[0], self.levels[1])
    }

    pub fn y_axis_label(&self) -> String {
        format!("<{}|E2|{}> eb", self.levels[2], self.levels[3])
    }
}

impl Default for TransitionLevels {
    fn default() -> Self {
        let level = |spin: &str, number: &str| LevelLabel {
            spin: spin.to_string(),
            parity: '+',
            number: number.to_string(),
        };
        Self {
            levels: [level("2", "1"), level("0", "1"), level("2", "1"), level("2", "1")],
        }
    }
}
