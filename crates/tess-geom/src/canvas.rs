// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tile canvas: the drawing collaborator behind the graph's renderer port.

use std::collections::BTreeMap;

use tess_graph::{Block, BlockId, Category, Connector, Point, Renderer};
use tracing::trace;

use crate::shape;

/// Width and height used by [`TileCanvas::default`].
pub const DEFAULT_CANVAS_SIZE: f64 = 300.0;

/// Inset between a tile's circumscribed circle and the canvas edge, summed
/// over both sides.
const TILE_MARGIN: f64 = 30.0;

/// Stroke colour of a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    /// Visible outline.
    Black,
    /// Construction outline, hidden in the finished pattern.
    Red,
}

/// Geometry drawn for one block.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    /// Category of the block that produced it.
    pub category: Category,
    /// Polygon vertices or line end points, in output connector order.
    pub points: Vec<Point>,
    /// One label per point when drawn with labels, else empty.
    pub labels: Vec<&'static str>,
    /// Outline colour.
    pub stroke: Stroke,
}

/// Canvas holding the current drawing of every satisfied block.
#[derive(Debug, Clone)]
pub struct TileCanvas {
    width: f64,
    height: f64,
    drawings: BTreeMap<BlockId, Drawing>,
}

impl Default for TileCanvas {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_SIZE, DEFAULT_CANVAS_SIZE)
    }
}

impl TileCanvas {
    /// Empty canvas of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            drawings: BTreeMap::new(),
        }
    }

    /// Canvas width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Canvas height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Current drawing of block `id`.
    pub fn drawing(&self, id: BlockId) -> Option<&Drawing> {
        self.drawings.get(&id)
    }

    /// Every drawing, by block id.
    pub fn drawings(&self) -> impl Iterator<Item = (BlockId, &Drawing)> {
        self.drawings.iter().map(|(id, d)| (*id, d))
    }

    /// Number of drawings.
    pub fn len(&self) -> usize {
        self.drawings.len()
    }

    /// `true` when nothing is drawn.
    pub fn is_empty(&self) -> bool {
        self.drawings.is_empty()
    }

    fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    fn tile(&self, block: &Block) -> Drawing {
        let rotation = block.attribute_value(0).map_or(0.0, shape::degrees);
        let stroke = match block.attribute_value(1) {
            Some(border) if border.eq_ignore_ascii_case("visible") => Stroke::Black,
            _ => Stroke::Red,
        };
        let radius = (self.width - TILE_MARGIN) / 2.0;
        Drawing {
            category: block.category(),
            points: shape::regular_polygon(
                block.outputs().len(),
                self.center(),
                radius,
                rotation,
            ),
            labels: Vec::new(),
            stroke,
        }
    }

    fn line(block: &Block) -> Drawing {
        let factor = |index| block.attribute_value(index).map_or(0.0, shape::percent);
        let end = |index: usize| {
            block
                .inputs()
                .get(index)
                .map_or((Point::ORIGIN, Point::ORIGIN), |c| {
                    (c.value(), c.secondary_value())
                })
        };
        let points = shape::trimmed_line(
            end(0),
            end(1),
            (factor(0), factor(1)),
            (factor(2), factor(3)),
        );
        Drawing {
            category: block.category(),
            points: points.to_vec(),
            labels: Vec::new(),
            stroke: Stroke::Black,
        }
    }

    fn render(&mut self, block: &Block, labeled: bool) -> Vec<Point> {
        let mut drawing = match block.category() {
            Category::Triangle | Category::Square | Category::Hexagon => self.tile(block),
            Category::StraightLine => Self::line(block),
        };
        if labeled {
            drawing.labels = block.outputs().iter().map(Connector::label).collect();
        }
        trace!(block = %block.id(), points = drawing.points.len(), labeled, "drawn");
        let points = drawing.points.clone();
        self.drawings.insert(block.id(), drawing);
        points
    }
}

impl Renderer for TileCanvas {
    fn draw(&mut self, block: &Block) -> Vec<Point> {
        self.render(block, false)
    }

    fn draw_with_labels(&mut self, block: &Block) -> Vec<Point> {
        self.render(block, true)
    }

    fn undraw(&mut self, block: &Block) {
        if self.drawings.remove(&block.id()).is_some() {
            trace!(block = %block.id(), "undrawn");
        }
    }
}
