//! Dotted position strings.
//!
//! A position is the path of a node from its root, one zero-padded segment per
//! level: `"01.00.03"` is the 4th live child of the 1st live child of the 2nd root.

use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: usize = 2;
pub const DEFAULT_SEPARATOR: &str = ".";

/// Segment width and level separator used when composing positions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PositionFormat {
    /// Minimum digits per segment; longer indices are never truncated
    pub width: usize,
    /// Joins a parent position and a child segment
    pub separator: String,
}

impl Default for PositionFormat {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl PositionFormat {
    pub fn encode_segment(&self, index: usize) -> String {
        encode_segment(index, self.width)
    }

    pub fn compose(&self, parent_position: Option<&str>, segment: &str) -> String {
        match parent_position {
            Some(parent) => format!("{}{}{}", parent, self.separator, segment),
            None => segment.to_string(),
        }
    }

    /// Position of the `index`-th live member below `parent_position`.
    pub fn position_at(&self, parent_position: Option<&str>, index: usize) -> String {
        self.compose(parent_position, &self.encode_segment(index))
    }
}

/// Left-pads the decimal representation of `index` with zeros to `width` characters.
pub fn encode_segment(index: usize, width: usize) -> String {
    format!("{:0>width$}", index, width = width)
}

/// Joins with the default `"."` separator; returns `segment` alone when there is no parent.
pub fn compose(parent_position: Option<&str>, segment: &str) -> String {
    match parent_position {
        Some(parent) => format!("{}{}{}", parent, DEFAULT_SEPARATOR, segment),
        None => segment.to_string(),
    }
}
