// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Graph store: the single owner of blocks, edges, selection and settings for
//! one editing session.
use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::debug;

use crate::block::{Block, BlockBuilder, Connector, DefaultBlocks, Point};
use crate::category::Category;
use crate::edge::{Edge, LinkDirection};
use crate::ident::{BlockId, ConnectorRef, Direction, EdgeId, IdAllocator};
use crate::render::{NullRenderer, Renderer};
use crate::validate::{self, LinkRejection};

/// Error returned by structural store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// No block with this id exists.
    #[error("unknown block {0}")]
    UnknownBlock(BlockId),
    /// No edge with this id exists.
    #[error("unknown edge {0}")]
    UnknownEdge(EdgeId),
    /// A root block already exists; a second one may not be created.
    #[error("graph already has a root block ({existing})")]
    RootAlreadyPresent {
        /// The current root.
        existing: BlockId,
    },
    /// The block has no attribute at this index.
    #[error("block {block} has no attribute {index}")]
    AttributeOutOfRange {
        /// Target block.
        block: BlockId,
        /// Requested attribute index.
        index: usize,
    },
    /// A [`BlockBuilder`] returned a block other than the one requested.
    #[error("builder returned {found} {found_id} when asked for {requested} {requested_id}")]
    BuilderMismatch {
        /// Category that was requested.
        requested: Category,
        /// Id that was allocated.
        requested_id: BlockId,
        /// Category the builder produced.
        found: Category,
        /// Id the builder produced.
        found_id: BlockId,
    },
}

/// Graph-level scalar settings. Opaque to the core; persisted with the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphSettings {
    /// Display zoom factor of the editing surface.
    pub display_scale: f64,
    /// Stroke width used for edge lines.
    pub line_width: f64,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            display_scale: 1.0,
            line_width: 1.0,
        }
    }
}

/// Anything the user can select on the editing surface.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Selectable {
    /// A block.
    Block(BlockId),
    /// An edge.
    Edge(EdgeId),
}

/// Blocks, edges and session state for one graph.
///
/// Blocks live in an arena keyed by [`BlockId`]; edges are referenced from
/// both of their connectors. Every mutation runs to completion and leaves the
/// invariants checked by [`GraphStore::verify`] intact.
#[derive(Debug, Clone)]
pub struct GraphStore<R = NullRenderer> {
    pub(crate) ids: IdAllocator,
    pub(crate) blocks: BTreeMap<BlockId, Block>,
    pub(crate) edges: BTreeMap<EdgeId, Edge>,
    next_edge: u64,
    pub(crate) root: Option<BlockId>,
    selection: BTreeSet<Selectable>,
    pub(crate) settings: GraphSettings,
    pub(crate) renderer: R,
}

impl Default for GraphStore<NullRenderer> {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore<NullRenderer> {
    /// Creates an empty graph without a renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_renderer(NullRenderer)
    }
}

impl<R> GraphStore<R> {
    /// Creates an empty graph that reports drawing changes to `renderer`.
    pub fn with_renderer(renderer: R) -> Self {
        Self {
            ids: IdAllocator::new(),
            blocks: BTreeMap::new(),
            edges: BTreeMap::new(),
            next_edge: 0,
            root: None,
            selection: BTreeSet::new(),
            settings: GraphSettings::default(),
            renderer,
        }
    }

    /// The renderer collaborator.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the renderer collaborator.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Consumes the store and returns its renderer.
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// The id pool backing this graph.
    pub fn allocator(&self) -> &IdAllocator {
        &self.ids
    }

    /// The root block, if one exists.
    pub fn root(&self) -> Option<BlockId> {
        self.root
    }

    /// `true` when a root block exists.
    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    /// Returns the block with `id`.
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    /// Iterates blocks in ascending id order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// `true` when the graph holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the edge with `id`.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Iterates edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// `true` when `id` exists and is satisfied.
    pub fn is_satisfied(&self, id: BlockId) -> bool {
        self.blocks.get(&id).is_some_and(Block::is_satisfied)
    }

    /// Edges attached to the connector at `at` (empty when it does not exist).
    pub fn edges_at(&self, at: ConnectorRef) -> &[EdgeId] {
        self.blocks
            .get(&at.block)
            .and_then(|b| b.connector(at.direction, at.index))
            .map(Connector::edges)
            .unwrap_or_default()
    }

    /// Distinct downstream blocks of `id`, in output-connector then attach order.
    pub fn children(&self, id: BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        if let Some(block) = self.blocks.get(&id) {
            for edge in block.outputs.iter().flat_map(|c| c.edges()) {
                if let Some(edge) = self.edges.get(edge) {
                    if !out.contains(&edge.input_block()) {
                        out.push(edge.input_block());
                    }
                }
            }
        }
        out
    }

    /// Upstream block feeding each input of `id`, in input order.
    pub fn parents(&self, id: BlockId) -> Vec<Option<BlockId>> {
        self.blocks.get(&id).map_or_else(Vec::new, |block| {
            block
                .inputs
                .iter()
                .map(|c| {
                    c.edges()
                        .first()
                        .and_then(|e| self.edges.get(e))
                        .map(Edge::output_block)
                })
                .collect()
        })
    }

    /// Graph-level settings.
    pub fn settings(&self) -> GraphSettings {
        self.settings
    }

    /// Replaces the graph-level settings.
    pub fn set_settings(&mut self, settings: GraphSettings) {
        self.settings = settings;
    }

    /// Checks whether a link between `origin` and `target` would be accepted.
    pub fn can_link(&self, origin: ConnectorRef, target: ConnectorRef) -> bool {
        validate::can_link(self, origin, target)
    }

    /// Moves a block. Placement is owned by the rendering collaborator.
    pub fn set_position(&mut self, id: BlockId, position: Point) -> Result<(), GraphError> {
        let block = self.blocks.get_mut(&id).ok_or(GraphError::UnknownBlock(id))?;
        block.position = position;
        Ok(())
    }

    /// Current selection, in id order (blocks before edges).
    pub fn selection(&self) -> impl Iterator<Item = Selectable> + '_ {
        self.selection.iter().copied()
    }

    /// `true` when `item` is selected.
    pub fn is_selected(&self, item: Selectable) -> bool {
        self.selection.contains(&item)
    }

    /// Adds an existing block or edge to the selection.
    pub fn select(&mut self, item: Selectable) -> Result<(), GraphError> {
        match item {
            Selectable::Block(id) if !self.blocks.contains_key(&id) => {
                return Err(GraphError::UnknownBlock(id));
            }
            Selectable::Edge(id) if !self.edges.contains_key(&id) => {
                return Err(GraphError::UnknownEdge(id));
            }
            _ => {}
        }
        self.selection.insert(item);
        Ok(())
    }

    /// Removes `item` from the selection. Returns `true` if it was selected.
    pub fn deselect(&mut self, item: Selectable) -> bool {
        self.selection.remove(&item)
    }

    /// Flips the selection state of `item`. Returns the new state.
    pub fn toggle_selection(&mut self, item: Selectable) -> Result<bool, GraphError> {
        if self.deselect(item) {
            return Ok(false);
        }
        self.select(item)?;
        Ok(true)
    }

    /// Empties the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Registers an edge on both connectors and feeds the output's current
    /// value into the input. Callers must have validated both endpoints.
    pub(crate) fn insert_edge(
        &mut self,
        output: ConnectorRef,
        input: ConnectorRef,
        authored: LinkDirection,
    ) -> EdgeId {
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.edges.insert(id, Edge::new(id, output, input, authored));
        for end in [output, input] {
            if let Some(connector) = self
                .blocks
                .get_mut(&end.block)
                .and_then(|b| b.connector_mut(end.direction, end.index))
            {
                connector.attach(id);
            }
        }
        self.pull_input(id);
        id
    }

    /// Detaches an edge from both connectors and forgets it.
    pub(crate) fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.remove(&id)?;
        for end in [edge.output(), edge.input()] {
            if let Some(connector) = self
                .blocks
                .get_mut(&end.block)
                .and_then(|b| b.connector_mut(end.direction, end.index))
            {
                connector.detach(id);
            }
        }
        self.selection.remove(&Selectable::Edge(id));
        Some(edge)
    }

    /// Copies the upstream output value (and the value of the output after
    /// it, wrapping) into the input connector of edge `id`.
    pub(crate) fn pull_input(&mut self, id: EdgeId) {
        let Some(edge) = self.edges.get(&id).copied() else {
            return;
        };
        let Some(source) = self.blocks.get(&edge.output_block()) else {
            return;
        };
        let count = source.outputs.len();
        let index = edge.output().index;
        let (Some(value), Some(next)) = (
            source.outputs.get(index).map(Connector::value),
            source.outputs.get((index + 1) % count.max(1)).map(Connector::value),
        ) else {
            return;
        };
        if let Some(input) = self
            .blocks
            .get_mut(&edge.input_block())
            .and_then(|b| b.connector_mut(Direction::Input, edge.input().index))
        {
            input.set_value(value);
            input.set_secondary_value(next);
        }
    }
}

impl<R: Renderer> GraphStore<R> {
    /// Creates a block of `category` with default attributes at the origin.
    ///
    /// Fails without touching the graph when `category` is a root category
    /// and a root already exists.
    pub fn create_block(&mut self, category: Category) -> Result<BlockId, GraphError> {
        self.spawn_block(category, Point::ORIGIN, &DefaultBlocks)
    }

    /// Creates a block through `builder` and places it at `position`.
    ///
    /// A new root block is drawn immediately.
    pub fn spawn_block<B>(
        &mut self,
        category: Category,
        position: Point,
        builder: &B,
    ) -> Result<BlockId, GraphError>
    where
        B: BlockBuilder + ?Sized,
    {
        if category.is_root() {
            if let Some(existing) = self.root {
                debug!(%category, root = %existing, "second root rejected");
                return Err(GraphError::RootAlreadyPresent { existing });
            }
        }
        let id = self.ids.allocate();
        let mut block = builder.build(id, category);
        if block.id() != id || block.category() != category {
            self.ids.free(id);
            return Err(GraphError::BuilderMismatch {
                requested: category,
                requested_id: id,
                found: block.category(),
                found_id: block.id(),
            });
        }
        block.position = position;
        let is_root = block.is_root();
        self.blocks.insert(id, block);
        debug!(block = %id, %category, "block created");
        if is_root {
            self.root = Some(id);
            self.mark_satisfied(id);
        }
        Ok(id)
    }

    /// Deletes a block and every edge touching it.
    ///
    /// The block and all of its descendants become unsatisfied before the
    /// edges are severed; the id returns to the pool and the root reference
    /// is cleared if this was the root.
    pub fn delete_block(&mut self, id: BlockId) -> Result<(), GraphError> {
        let block = self.blocks.get(&id).ok_or(GraphError::UnknownBlock(id))?;
        let touching: Vec<EdgeId> = block.attached_edges().collect();
        self.mark_unsatisfied(id);
        for edge in touching {
            self.remove_edge(edge);
        }
        self.blocks.remove(&id);
        self.ids.free(id);
        self.selection.remove(&Selectable::Block(id));
        if self.root == Some(id) {
            self.root = None;
        }
        debug!(block = %id, "block deleted");
        Ok(())
    }

    /// Links two connectors, in either authoring order.
    ///
    /// On success the input block is satisfied (and drawn, together with any
    /// descendants that become ready) once all of its inputs are linked to
    /// satisfied sources.
    pub fn create_link(
        &mut self,
        origin: ConnectorRef,
        target: ConnectorRef,
    ) -> Result<EdgeId, LinkRejection> {
        let plan = validate::check_link(self, origin, target).inspect_err(|reason| {
            debug!(%origin, %target, %reason, "link rejected");
        })?;
        let id = self.insert_edge(plan.output, plan.input, plan.authored);
        debug!(edge = %id, output = %plan.output, input = %plan.input, "link created");
        if self.is_eligible(plan.input.block) {
            self.mark_satisfied(plan.input.block);
        }
        Ok(id)
    }

    /// Removes an edge. The former input block and its descendants become
    /// unsatisfied.
    pub fn delete_link(&mut self, id: EdgeId) -> Result<(), GraphError> {
        let edge = *self.edges.get(&id).ok_or(GraphError::UnknownEdge(id))?;
        self.mark_unsatisfied(edge.input_block());
        self.remove_edge(id);
        debug!(edge = %id, "link deleted");
        Ok(())
    }

    /// Stores a new attribute value. A satisfied block is redrawn together
    /// with its satisfied descendants; satisfaction itself does not change.
    pub fn set_attribute(
        &mut self,
        id: BlockId,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), GraphError> {
        let block = self.blocks.get_mut(&id).ok_or(GraphError::UnknownBlock(id))?;
        if !block.set_attribute_value(index, value.into()) {
            return Err(GraphError::AttributeOutOfRange { block: id, index });
        }
        if block.satisfied {
            self.redraw_from(id);
        }
        Ok(())
    }

    /// Turns point labels on or off for a block, redrawing it if satisfied.
    pub fn set_labels(&mut self, id: BlockId, labeled: bool) -> Result<(), GraphError> {
        let block = self.blocks.get_mut(&id).ok_or(GraphError::UnknownBlock(id))?;
        block.labeled = labeled;
        if block.satisfied {
            self.draw_block(id);
        }
        Ok(())
    }

    /// Deletes every selected edge, then every selected block. Returns the
    /// number of entities removed.
    pub fn delete_selected(&mut self) -> usize {
        let selected: Vec<Selectable> = self.selection.iter().copied().collect();
        let mut removed = 0;
        for item in &selected {
            if let Selectable::Edge(id) = item {
                if self.delete_link(*id).is_ok() {
                    removed += 1;
                }
            }
        }
        for item in &selected {
            if let Selectable::Block(id) = item {
                if self.delete_block(*id).is_ok() {
                    removed += 1;
                }
            }
        }
        self.selection.clear();
        removed
    }

    /// Drops every block, edge and selection entry, forgets the root and
    /// resets the id pool. Drawn blocks are undrawn. Settings are kept.
    pub fn clear(&mut self) {
        for block in self.blocks.values().filter(|b| b.satisfied) {
            self.renderer.undraw(block);
        }
        self.blocks.clear();
        self.edges.clear();
        self.next_edge = 0;
        self.selection.clear();
        self.root = None;
        self.ids.free_all();
        debug!("graph cleared");
    }
}
