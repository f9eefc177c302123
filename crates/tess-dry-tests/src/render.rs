// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Renderer double that records draw/undraw calls without drawing anything.

use std::collections::{BTreeMap, BTreeSet};

use tess_graph::{Block, BlockId, Point, Renderer};

/// One call received by a [`RecordingRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    /// `draw` was called.
    Draw(BlockId),
    /// `draw_with_labels` was called.
    DrawWithLabels(BlockId),
    /// `undraw` was called.
    Undraw(BlockId),
}

impl RenderEvent {
    /// Block the event concerns.
    pub fn block(self) -> BlockId {
        match self {
            Self::Draw(id) | Self::DrawWithLabels(id) | Self::Undraw(id) => id,
        }
    }
}

/// Records every renderer call in order and tracks which blocks are drawn.
///
/// Draws return canned output values when configured with
/// [`with_outputs`](Self::with_outputs); a *stamping* recorder instead
/// returns `Point { x: block id, y: output index }` for every output so tests
/// can trace values through the graph.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    events: Vec<RenderEvent>,
    drawn: BTreeSet<BlockId>,
    canned: BTreeMap<BlockId, Vec<Point>>,
    stamp: bool,
}

impl RecordingRenderer {
    /// Recorder whose draws return no output values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder whose draws stamp each output with its block id and index.
    pub fn stamping() -> Self {
        Self {
            stamp: true,
            ..Self::default()
        }
    }

    /// Returns `values` whenever block `id` is drawn.
    pub fn with_outputs(mut self, id: BlockId, values: Vec<Point>) -> Self {
        self.canned.insert(id, values);
        self
    }

    /// Every call received so far, oldest first.
    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    /// Drains the recorded calls.
    pub fn take_events(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.events)
    }

    /// Blocks currently drawn (drawn and not undrawn since).
    pub fn drawn(&self) -> &BTreeSet<BlockId> {
        &self.drawn
    }

    /// `true` when block `id` is currently drawn.
    pub fn is_drawn(&self, id: BlockId) -> bool {
        self.drawn.contains(&id)
    }

    /// Number of draws (labelled or not) block `id` has received.
    pub fn draw_count(&self, id: BlockId) -> usize {
        self.events
            .iter()
            .filter(|e| !matches!(e, RenderEvent::Undraw(_)) && e.block() == id)
            .count()
    }

    #[allow(clippy::cast_precision_loss)]
    fn outputs_for(&self, block: &Block) -> Vec<Point> {
        if let Some(values) = self.canned.get(&block.id()) {
            return values.clone();
        }
        if !self.stamp {
            return Vec::new();
        }
        (0..block.outputs().len())
            .map(|i| Point::new(block.id().index() as f64, i as f64))
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, block: &Block) -> Vec<Point> {
        self.events.push(RenderEvent::Draw(block.id()));
        self.drawn.insert(block.id());
        self.outputs_for(block)
    }

    fn draw_with_labels(&mut self, block: &Block) -> Vec<Point> {
        self.events.push(RenderEvent::DrawWithLabels(block.id()));
        self.drawn.insert(block.id());
        self.outputs_for(block)
    }

    fn undraw(&mut self, block: &Block) {
        self.events.push(RenderEvent::Undraw(block.id()));
        self.drawn.remove(&block.id());
    }
}
