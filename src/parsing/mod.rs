pub mod bpm;
pub mod notes;

use crate::chart::FootPart;
use std::{fmt, io};

#[derive(Debug)]
pub enum ChartError {
    Io(io::Error),
    Json(serde_json::Error),
    ColumnOutOfRange {
        row: usize,
        column: usize,
        column_count: usize,
    },
    DuplicateFootPart {
        row: usize,
        part: FootPart,
    },
    UnknownLayout(String),
    InvalidBpm(String),
}

impl From<io::Error> for ChartError {
    fn from(err: io::Error) -> Self {
        ChartError::Io(err)
    }
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Json(err)
    }
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::Io(e) => write!(f, "IO Error: {}", e),
            ChartError::Json(e) => write!(f, "JSON Error: {}", e),
            ChartError::ColumnOutOfRange { row, column, column_count } => write!(
                f,
                "Row {} references column {} but the layout only has {} columns",
                row, column, column_count
            ),
            ChartError::DuplicateFootPart { row, part } => {
                write!(f, "Row {} assigns {:?} to more than one note", row, part)
            }
            ChartError::UnknownLayout(name) => write!(f, "Unknown steps type: {}", name),
            ChartError::InvalidBpm(segment) => write!(f, "Invalid BPM segment: '{}'", segment),
        }
    }
}

impl std::error::Error for ChartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChartError::Io(e) => Some(e),
            ChartError::Json(e) => Some(e),
            _ => None,
        }
    }
}
