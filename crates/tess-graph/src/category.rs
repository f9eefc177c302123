// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Closed set of block categories and their static descriptors.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Kind of shape or transform a block represents. Fixed at creation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Category {
    /// Equilateral triangle tile (root).
    Triangle,
    /// Square tile (root).
    Square,
    /// Regular hexagon tile (root).
    Hexagon,
    /// Straight line between two upstream points.
    StraightLine,
}

/// Schema entry for one block attribute.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AttributeSpec {
    /// Display name.
    pub name: &'static str,
    /// Value a freshly built block starts with.
    pub default: &'static str,
    /// Fixed set of allowed values for choice attributes; empty for free text.
    pub choices: &'static [&'static str],
}

/// Static shape of a category: connector labels and attribute schema.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CategoryDescriptor {
    /// Human-readable name, also used in persisted documents.
    pub name: &'static str,
    /// Labels of the input connectors, in order.
    pub inputs: &'static [&'static str],
    /// Labels of the output connectors, in order.
    pub outputs: &'static [&'static str],
    /// Attribute schema, in order.
    pub attributes: &'static [AttributeSpec],
}

const BORDER_CHOICES: &[&str] = &["Visible", "Invisible"];

const TILE_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec {
        name: "Rotation",
        default: "0",
        choices: &[],
    },
    AttributeSpec {
        name: "Border",
        default: "Visible",
        choices: BORDER_CHOICES,
    },
];

const LINE_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec {
        name: "E1Trim",
        default: "0",
        choices: &[],
    },
    AttributeSpec {
        name: "E2Trim",
        default: "0",
        choices: &[],
    },
    AttributeSpec {
        name: "E1Slide",
        default: "0",
        choices: &[],
    },
    AttributeSpec {
        name: "E2Slide",
        default: "0",
        choices: &[],
    },
];

const TRIANGLE: CategoryDescriptor = CategoryDescriptor {
    name: "Triangle Tile",
    inputs: &[],
    outputs: &["V1", "V2", "V3"],
    attributes: TILE_ATTRIBUTES,
};

const SQUARE: CategoryDescriptor = CategoryDescriptor {
    name: "Square Tile",
    inputs: &[],
    outputs: &["V1", "V2", "V3", "V4"],
    attributes: TILE_ATTRIBUTES,
};

const HEXAGON: CategoryDescriptor = CategoryDescriptor {
    name: "Hexagon Tile",
    inputs: &[],
    outputs: &["V1", "V2", "V3", "V4", "V5", "V6"],
    attributes: TILE_ATTRIBUTES,
};

const STRAIGHT_LINE: CategoryDescriptor = CategoryDescriptor {
    name: "Straight Line",
    inputs: &["", ""],
    outputs: &["E1", "E2"],
    attributes: LINE_ATTRIBUTES,
};

impl Category {
    /// Every category, in menu order.
    pub const ALL: [Self; 4] = [Self::Triangle, Self::Square, Self::Hexagon, Self::StraightLine];

    /// Static descriptor for this category.
    #[must_use]
    pub fn descriptor(self) -> &'static CategoryDescriptor {
        match self {
            Self::Triangle => &TRIANGLE,
            Self::Square => &SQUARE,
            Self::Hexagon => &HEXAGON,
            Self::StraightLine => &STRAIGHT_LINE,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// A category with no input connectors produces root blocks.
    #[must_use]
    pub fn is_root(self) -> bool {
        self.descriptor().inputs.is_empty()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown block category: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn only_tiles_are_roots() {
        assert!(Category::Triangle.is_root());
        assert!(Category::Square.is_root());
        assert!(Category::Hexagon.is_root());
        assert!(!Category::StraightLine.is_root());
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("square tile".parse::<Category>(), Ok(Category::Square));
        assert_eq!("STRAIGHT LINE".parse::<Category>(), Ok(Category::StraightLine));
        assert!("Pentagon Tile".parse::<Category>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn connector_counts_follow_the_shape() {
        assert_eq!(Category::Triangle.descriptor().outputs.len(), 3);
        assert_eq!(Category::Square.descriptor().outputs.len(), 4);
        assert_eq!(Category::Hexagon.descriptor().outputs.len(), 6);
        let line = Category::StraightLine.descriptor();
        assert_eq!((line.inputs.len(), line.outputs.len()), (2, 2));
        assert_eq!(line.attributes.len(), 4);
    }
}
