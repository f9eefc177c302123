// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Blocks, their connectors and attributes.
//!
//! A block is a plain record: the renderer looks it up by id and owns nothing
//! but presentation. Connector and attribute counts are fixed by the block's
//! [`Category`] once the block is built.

use crate::category::{AttributeSpec, Category};
use crate::ident::{BlockId, Direction, EdgeId};

/// 2D coordinate. Used for block placement and for connector values.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Point {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Typed attachment point owned by exactly one block.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    direction: Direction,
    label: &'static str,
    /// Attached edges in attach order. Inputs hold at most one.
    edges: Vec<EdgeId>,
    value: Point,
    secondary_value: Point,
}

impl Connector {
    fn new(direction: Direction, label: &'static str) -> Self {
        Self {
            direction,
            label,
            edges: Vec::new(),
            value: Point::ORIGIN,
            secondary_value: Point::ORIGIN,
        }
    }

    /// Input or output.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Label shown next to the connector.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Edges terminating at this connector.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// `true` when at least one edge is attached.
    pub fn is_linked(&self) -> bool {
        !self.edges.is_empty()
    }

    /// Coordinate this connector represents, as last written by a draw.
    pub fn value(&self) -> Point {
        self.value
    }

    /// Coordinate of the point following [`Self::value`] on the upstream
    /// shape. Only meaningful on inputs.
    pub fn secondary_value(&self) -> Point {
        self.secondary_value
    }

    pub(crate) fn attach(&mut self, edge: EdgeId) {
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    pub(crate) fn detach(&mut self, edge: EdgeId) {
        self.edges.retain(|e| *e != edge);
    }

    pub(crate) fn set_value(&mut self, value: Point) {
        self.value = value;
    }

    pub(crate) fn set_secondary_value(&mut self, value: Point) {
        self.secondary_value = value;
    }
}

/// Named attribute holding an opaque string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    spec: &'static AttributeSpec,
    value: String,
}

impl Attribute {
    /// Attribute name from the category schema.
    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    /// Allowed values for choice attributes (empty for free text).
    pub fn choices(&self) -> &'static [&'static str] {
        self.spec.choices
    }

    /// Current value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Node of the tile graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub(crate) id: BlockId,
    category: Category,
    is_root: bool,
    pub(crate) satisfied: bool,
    pub(crate) labeled: bool,
    pub(crate) inputs: Vec<Connector>,
    pub(crate) outputs: Vec<Connector>,
    attributes: Vec<Attribute>,
    pub(crate) position: Point,
}

impl Block {
    /// Builds a block of `category` with default attribute values.
    ///
    /// Root blocks start satisfied; every other block starts unsatisfied.
    #[must_use]
    pub fn new(id: BlockId, category: Category) -> Self {
        let desc = category.descriptor();
        let is_root = desc.inputs.is_empty();
        Self {
            id,
            category,
            is_root,
            satisfied: is_root,
            labeled: false,
            inputs: desc
                .inputs
                .iter()
                .map(|label| Connector::new(Direction::Input, *label))
                .collect(),
            outputs: desc
                .outputs
                .iter()
                .map(|label| Connector::new(Direction::Output, *label))
                .collect(),
            attributes: desc
                .attributes
                .iter()
                .map(|spec| Attribute {
                    spec,
                    value: spec.default.to_owned(),
                })
                .collect(),
            position: Point::ORIGIN,
        }
    }

    /// Replaces the attribute value at `index`, builder style. Out-of-range
    /// indices are ignored.
    #[must_use]
    pub fn with_attribute(mut self, index: usize, value: impl Into<String>) -> Self {
        if let Some(attr) = self.attributes.get_mut(index) {
            attr.value = value.into();
        }
        self
    }

    /// Sets the initial placement, builder style.
    #[must_use]
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Block id.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Block category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// `true` when the category defines no inputs.
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// `true` when every dependency is linked and satisfied (always for roots).
    pub fn is_satisfied(&self) -> bool {
        self.satisfied
    }

    /// `true` when the block is drawn with point labels.
    pub fn is_labeled(&self) -> bool {
        self.labeled
    }

    /// Input connectors in order.
    pub fn inputs(&self) -> &[Connector] {
        &self.inputs
    }

    /// Output connectors in order.
    pub fn outputs(&self) -> &[Connector] {
        &self.outputs
    }

    /// Connector on `direction` side at `index`.
    pub fn connector(&self, direction: Direction, index: usize) -> Option<&Connector> {
        match direction {
            Direction::Input => self.inputs.get(index),
            Direction::Output => self.outputs.get(index),
        }
    }

    pub(crate) fn connector_mut(
        &mut self,
        direction: Direction,
        index: usize,
    ) -> Option<&mut Connector> {
        match direction {
            Direction::Input => self.inputs.get_mut(index),
            Direction::Output => self.outputs.get_mut(index),
        }
    }

    /// Attributes in schema order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Value of the attribute at `index`.
    pub fn attribute_value(&self, index: usize) -> Option<&str> {
        self.attributes.get(index).map(Attribute::value)
    }

    pub(crate) fn set_attribute_value(&mut self, index: usize, value: String) -> bool {
        match self.attributes.get_mut(index) {
            Some(attr) => {
                attr.value = value;
                true
            }
            None => false,
        }
    }

    /// Placement owned by the rendering collaborator.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Every edge attached to any connector of this block, inputs first.
    pub fn attached_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .flat_map(|c| c.edges.iter().copied())
    }
}

/// Factory used by the store and the codec to construct blocks.
///
/// The store allocates the id; the builder decides everything else a fresh
/// block starts with (attribute defaults, placement).
pub trait BlockBuilder {
    /// Builds a block of `category` carrying `id`.
    fn build(&self, id: BlockId, category: Category) -> Block;
}

/// Builder producing blocks with the category's schema defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBlocks;

impl BlockBuilder for DefaultBlocks {
    fn build(&self, id: BlockId, category: Category) -> Block {
        Block::new(id, category)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn root_blocks_start_satisfied() {
        let square = Block::new(BlockId(0), Category::Square);
        assert!(square.is_root());
        assert!(square.is_satisfied());
        assert_eq!(square.inputs().len(), 0);
        assert_eq!(square.outputs().len(), 4);

        let line = Block::new(BlockId(1), Category::StraightLine);
        assert!(!line.is_root());
        assert!(!line.is_satisfied());
    }

    #[test]
    fn attributes_follow_the_schema() {
        let block = Block::new(BlockId(0), Category::Hexagon);
        let names: Vec<_> = block.attributes().iter().map(Attribute::name).collect();
        assert_eq!(names, ["Rotation", "Border"]);
        assert_eq!(block.attribute_value(1), Some("Visible"));
        assert_eq!(block.attributes()[1].choices(), ["Visible", "Invisible"]);
    }

    #[test]
    fn with_attribute_ignores_out_of_range() {
        let block = Block::new(BlockId(0), Category::Triangle)
            .with_attribute(0, "45")
            .with_attribute(9, "nope");
        assert_eq!(block.attribute_value(0), Some("45"));
        assert_eq!(block.attributes().len(), 2);
    }

    #[test]
    fn connector_attach_is_idempotent() {
        let mut block = Block::new(BlockId(0), Category::Square);
        let out = block.connector_mut(Direction::Output, 0).unwrap();
        out.attach(EdgeId(7));
        out.attach(EdgeId(7));
        out.attach(EdgeId(8));
        assert_eq!(out.edges(), [EdgeId(7), EdgeId(8)]);
        out.detach(EdgeId(7));
        assert_eq!(out.edges(), [EdgeId(8)]);
    }
}
