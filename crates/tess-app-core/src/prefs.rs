// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Editor preferences shared by tools that create or display graphs.

use serde::{Deserialize, Serialize};
use tess_graph::{Category, GraphSettings};
use tracing::warn;

/// Config key the editor preferences are stored under.
pub const PREFS_KEY: &str = "editor";

/// Saved preferences for the graph editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorPrefs {
    /// Settings new graphs start with.
    pub graph: GraphPrefs,
    /// How edges are drawn between connectors.
    pub line_style: LineStyle,
    /// Draw new blocks with point labels.
    pub show_labels: bool,
    /// Category name of the root tile placed in new graphs.
    pub default_root: DefaultRoot,
}

/// Initial graph-level settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphPrefs {
    /// Display zoom factor.
    pub display_scale: f64,
    /// Stroke width for edge lines.
    pub line_width: f64,
}

impl Default for GraphPrefs {
    fn default() -> Self {
        let settings = GraphSettings::default();
        Self {
            display_scale: settings.display_scale,
            line_width: settings.line_width,
        }
    }
}

impl GraphPrefs {
    /// Graph settings for a new graph.
    pub fn settings(&self) -> GraphSettings {
        GraphSettings {
            display_scale: self.display_scale,
            line_width: self.line_width,
        }
    }
}

/// Shape of the line drawn for an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    /// Straight segment.
    Straight,
    /// S-curve leaving and entering connectors horizontally.
    #[default]
    EaseInEaseOut,
}

/// Root category name as stored in preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultRoot(pub String);

impl Default for DefaultRoot {
    fn default() -> Self {
        Self(Category::Square.name().to_owned())
    }
}

impl DefaultRoot {
    /// The stored category, falling back to a square tile when the name is
    /// unknown or not a root category.
    pub fn category(&self) -> Category {
        match self.0.parse::<Category>() {
            Ok(category) if category.is_root() => category,
            _ => {
                warn!(name = %self.0, "default root is not a tile category, using square");
                Category::Square
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_fill_defaults() {
        let prefs: EditorPrefs =
            serde_json::from_str(r#"{"graph":{"line_width":2.5},"show_labels":true}"#).unwrap();
        assert!((prefs.graph.line_width - 2.5).abs() < f64::EPSILON);
        assert!((prefs.graph.display_scale - 1.0).abs() < f64::EPSILON);
        assert!(prefs.show_labels);
        assert_eq!(prefs.line_style, LineStyle::EaseInEaseOut);
        assert_eq!(prefs.default_root.category(), Category::Square);
    }

    #[test]
    fn default_root_rejects_non_tiles() {
        assert_eq!(
            DefaultRoot("hexagon tile".into()).category(),
            Category::Hexagon
        );
        assert_eq!(
            DefaultRoot("Straight Line".into()).category(),
            Category::Square
        );
        assert_eq!(DefaultRoot("circle".into()).category(), Category::Square);
    }
}
