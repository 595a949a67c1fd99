use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Integer pixel coordinate; `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point2D {
    pub x: usize,
    pub y: usize,
}

impl Point2D {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle `(left, top, width, height)` in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
}

impl BoundingBox {
    pub const fn new(left: usize, top: usize, width: usize, height: usize) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// One past the last column.
    pub const fn right(&self) -> usize {
        self.left + self.width
    }

    /// One past the last row.
    pub const fn bottom(&self) -> usize {
        self.top + self.height
    }
}

/// Hough line in normal form `x·cos(theta) + y·sin(theta) = rho`.
///
/// `theta` lies in `[0, π)`; `rho` may be negative.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PolarLine {
    pub rho: f32,
    pub theta: f32,
    /// Accumulator votes that supported the line.
    pub votes: u32,
}

/// Recovered crossword layout: `cells[row][col]` is `true` for a black square.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridResult {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<bool>>,
}

const BLACK: char = '#';
const WHITE: char = ' ';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridParseError {
    #[error("missing '|' after the size header")]
    MissingHeader,
    #[error("malformed size header {0:?}")]
    BadHeader(String),
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row} contains unexpected character {ch:?}")]
    BadCell { row: usize, ch: char },
}

impl GridResult {
    /// Black cell count, handy for summaries.
    pub fn black_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|&&b| b).count()
    }

    /// Reference text encoding: `"{width} {height}|{row0}|...|{rowN}| "`
    /// with `#` for black and a space for white cells.
    pub fn encode(&self) -> String {
        let mut out = format!("{} {}|", self.width, self.height);
        for row in &self.cells {
            out.extend(row.iter().map(|&black| if black { BLACK } else { WHITE }));
            out.push('|');
        }
        out.push(' ');
        out
    }

    /// Parse the encoding produced by [`GridResult::encode`]. The trailing
    /// space after the final separator is optional.
    pub fn parse(text: &str) -> Result<Self, GridParseError> {
        let (header, body) = text.split_once('|').ok_or(GridParseError::MissingHeader)?;
        let mut dims = header.split_whitespace().map(str::parse::<usize>);
        let (width, height) = match (dims.next(), dims.next(), dims.next()) {
            (Some(Ok(w)), Some(Ok(h)), None) => (w, h),
            _ => return Err(GridParseError::BadHeader(header.to_string())),
        };
        let body = body
            .strip_suffix("| ")
            .or_else(|| body.strip_suffix('|'))
            .unwrap_or(body);
        let rows: Vec<&str> = if height == 0 && body.is_empty() {
            Vec::new()
        } else {
            body.split('|').collect()
        };
        if rows.len() != height {
            return Err(GridParseError::RowCount {
                expected: height,
                found: rows.len(),
            });
        }
        let mut cells = Vec::with_capacity(height);
        for (r, row) in rows.iter().enumerate() {
            let parsed = row
                .chars()
                .map(|ch| match ch {
                    BLACK => Ok(true),
                    WHITE => Ok(false),
                    other => Err(GridParseError::BadCell { row: r, ch: other }),
                })
                .collect::<Result<Vec<bool>, _>>()?;
            if parsed.len() != width {
                return Err(GridParseError::RowWidth {
                    row: r,
                    expected: width,
                    found: parsed.len(),
                });
            }
            cells.push(parsed);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }
}

impl fmt::Display for GridResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for GridResult {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GridResult::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GridResult {
        GridResult {
            width: 3,
            height: 2,
            cells: vec![vec![true, false, false], vec![false, false, true]],
        }
    }

    #[test]
    fn encode_matches_reference_layout() {
        assert_eq!(sample().encode(), "3 2|#  |  #| ");
        assert_eq!(sample().to_string(), sample().encode());
    }

    #[test]
    fn parse_accepts_encoding_with_and_without_trailing_space() {
        assert_eq!("3 2|#  |  #| ".parse::<GridResult>().unwrap(), sample());
        assert_eq!(GridResult::parse("3 2|#  |  #|").unwrap(), sample());
    }

    #[test]
    fn parse_reports_shape_errors() {
        assert_eq!(
            GridResult::parse("3 2|#  | ").unwrap_err(),
            GridParseError::RowCount {
                expected: 2,
                found: 1
            }
        );
        assert_eq!(
            GridResult::parse("3 1|# | ").unwrap_err(),
            GridParseError::RowWidth {
                row: 0,
                expected: 3,
                found: 2
            }
        );
        assert!(matches!(
            GridResult::parse("3 1|#x | "),
            Err(GridParseError::BadCell { row: 0, ch: 'x' })
        ));
        assert_eq!(
            GridResult::parse("no header").unwrap_err(),
            GridParseError::MissingHeader
        );
    }

    #[test]
    fn bounding_box_edges() {
        let b = BoundingBox::new(2, 3, 4, 5);
        assert_eq!((b.right(), b.bottom()), (6, 8));
    }
}
