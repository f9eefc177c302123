// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON persistence for a [`GraphStore`].
//!
//! Encoding emits every block in ascending id order together with the
//! graph settings. Decoding is transactional: the document is parsed and
//! fully validated, every block is built, and only then is the target graph
//! cleared and repopulated. A rejected document leaves the graph untouched.
//! Satisfaction is never persisted; it is re-derived from the root after
//! loading.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::block::{Block, BlockBuilder, Point};
use crate::category::Category;
use crate::edge::LinkDirection;
use crate::ident::{BlockId, ConnectorRef};
use crate::render::Renderer;
use crate::store::{GraphError, GraphSettings, GraphStore};

/// Largest block id accepted from a document.
///
/// Restoring an id grows the id pool up to that id, so unbounded ids would
/// let a tiny document allocate an arbitrarily large pool.
pub const MAX_BLOCK_ID: usize = 1 << 16;

fn one() -> f64 {
    1.0
}

/// Persisted form of a whole graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Display zoom factor.
    #[serde(rename = "zoom", default = "one")]
    pub display_scale: f64,
    /// Stroke width for edge lines.
    #[serde(rename = "strokeWidthOfLines", default = "one")]
    pub line_width: f64,
    /// Every block, ascending by id.
    #[serde(default)]
    pub blocks: Vec<BlockRecord>,
}

/// Persisted form of one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    /// Block id, restored verbatim.
    pub id: BlockId,
    /// Must agree with the category.
    pub is_root: bool,
    /// Human-readable category name.
    pub category: String,
    /// Horizontal placement.
    #[serde(rename = "layoutX", default)]
    pub x: f64,
    /// Vertical placement.
    #[serde(rename = "layoutY", default)]
    pub y: f64,
    /// Attribute values in schema order.
    #[serde(default)]
    pub attribute_values: Vec<String>,
    /// Outgoing links grouped by output connector, in connector order.
    #[serde(default)]
    pub output_connectors: Vec<OutputRecord>,
}

/// Links leaving one output connector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Downstream input connectors fed by this output.
    #[serde(default)]
    pub children: Vec<ChildRecord>,
}

/// One link target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildRecord {
    /// Target block.
    pub id: BlockId,
    /// Input connector index on the target block.
    pub connector_index: usize,
    /// Authoring direction of the link.
    #[serde(default)]
    pub direction: LinkDirection,
}

/// Error raised while writing a document.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A graph setting is NaN or infinite and has no JSON form.
    #[error("graph setting {0} is not a finite number")]
    NonFiniteSetting(&'static str),
    /// A block position is NaN or infinite and has no JSON form.
    #[error("block {0} has a non-finite position")]
    NonFinitePosition(BlockId),
    /// The serializer failed.
    #[error("failed to serialize graph: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Error raised while reading a document. The target graph is unchanged.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The text is not a well-formed graph document.
    #[error("malformed graph document: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A block names a category that does not exist.
    #[error("block {id} has unknown category {name:?}")]
    UnknownCategory {
        /// Block id.
        id: BlockId,
        /// Recorded category name.
        name: String,
    },
    /// A block id exceeds [`MAX_BLOCK_ID`].
    #[error("block id {0} exceeds the maximum of {MAX_BLOCK_ID}")]
    IdOutOfRange(BlockId),
    /// Two records share one id.
    #[error("block id {0} appears more than once")]
    DuplicateId(BlockId),
    /// The recorded root flag contradicts the category.
    #[error("block {id} records isRoot={recorded} but is a {category}")]
    RootFlagMismatch {
        /// Block id.
        id: BlockId,
        /// Recorded flag.
        recorded: bool,
        /// Recorded category.
        category: Category,
    },
    /// More than one root block.
    #[error("more than one root block ({first} and {second})")]
    MultipleRoots {
        /// First root in document order.
        first: BlockId,
        /// Second root in document order.
        second: BlockId,
    },
    /// Attribute value count differs from the category schema.
    #[error("block {id} has {found} attribute values, expected {expected}")]
    AttributeCount {
        /// Block id.
        id: BlockId,
        /// Schema length.
        expected: usize,
        /// Recorded length.
        found: usize,
    },
    /// More output connectors recorded than the category defines.
    #[error("block {id} records {found} output connectors, category has {expected}")]
    TooManyOutputs {
        /// Block id.
        id: BlockId,
        /// Category output count.
        expected: usize,
        /// Recorded output count.
        found: usize,
    },
    /// A link names a block that is not in the document.
    #[error("{from} links to unknown block {target}")]
    UnknownTarget {
        /// Output connector the link leaves from.
        from: ConnectorRef,
        /// Missing block.
        target: BlockId,
    },
    /// A link names an input index the target block does not have.
    #[error("link target {0} does not exist")]
    ConnectorOutOfRange(ConnectorRef),
    /// A link joins a block to itself.
    #[error("{0} links its own block")]
    SelfLoop(ConnectorRef),
    /// Two links feed one input connector.
    #[error("input {0} is linked more than once")]
    InputAlreadyLinked(ConnectorRef),
    /// Links form a cycle.
    #[error("links form a cycle through block {0}")]
    Cycle(BlockId),
    /// The block builder returned an unexpected block.
    #[error(transparent)]
    Builder(#[from] GraphError),
}

/// Validated decode instructions.
struct DecodePlan {
    blocks: Vec<(BlockId, Category)>,
    links: Vec<(ConnectorRef, ConnectorRef, LinkDirection)>,
}

impl GraphDocument {
    /// Captures the persisted state of `graph`.
    pub fn capture<R>(graph: &GraphStore<R>) -> Self {
        let settings = graph.settings();
        let blocks = graph
            .blocks()
            .map(|block| BlockRecord {
                id: block.id(),
                is_root: block.is_root(),
                category: block.category().name().to_owned(),
                x: block.position().x,
                y: block.position().y,
                attribute_values: block
                    .attributes()
                    .iter()
                    .map(|a| a.value().to_owned())
                    .collect(),
                output_connectors: block
                    .outputs()
                    .iter()
                    .map(|output| OutputRecord {
                        children: output
                            .edges()
                            .iter()
                            .filter_map(|e| graph.edge(*e))
                            .map(|edge| ChildRecord {
                                id: edge.input_block(),
                                connector_index: edge.input().index,
                                direction: edge.authored(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            display_scale: settings.display_scale,
            line_width: settings.line_width,
            blocks,
        }
    }

    /// Graph settings carried by the document.
    pub fn settings(&self) -> GraphSettings {
        GraphSettings {
            display_scale: self.display_scale,
            line_width: self.line_width,
        }
    }

    fn check_finite(&self) -> Result<(), EncodeError> {
        if !self.display_scale.is_finite() {
            return Err(EncodeError::NonFiniteSetting("zoom"));
        }
        if !self.line_width.is_finite() {
            return Err(EncodeError::NonFiniteSetting("strokeWidthOfLines"));
        }
        match self
            .blocks
            .iter()
            .find(|b| !(b.x.is_finite() && b.y.is_finite()))
        {
            Some(block) => Err(EncodeError::NonFinitePosition(block.id)),
            None => Ok(()),
        }
    }

    /// Checks the document without loading it.
    pub fn validate(&self) -> Result<(), DecodeError> {
        self.plan().map(|_| ())
    }

    fn plan(&self) -> Result<DecodePlan, DecodeError> {
        let mut categories = BTreeMap::new();
        let mut blocks = Vec::with_capacity(self.blocks.len());
        let mut root: Option<BlockId> = None;
        for record in &self.blocks {
            let id = record.id;
            let category: Category =
                record
                    .category
                    .parse()
                    .map_err(|_| DecodeError::UnknownCategory {
                        id,
                        name: record.category.clone(),
                    })?;
            if id.index() > MAX_BLOCK_ID {
                return Err(DecodeError::IdOutOfRange(id));
            }
            if categories.insert(id, category).is_some() {
                return Err(DecodeError::DuplicateId(id));
            }
            if record.is_root != category.is_root() {
                return Err(DecodeError::RootFlagMismatch {
                    id,
                    recorded: record.is_root,
                    category,
                });
            }
            if category.is_root() {
                if let Some(first) = root {
                    return Err(DecodeError::MultipleRoots { first, second: id });
                }
                root = Some(id);
            }
            let desc = category.descriptor();
            if record.attribute_values.len() != desc.attributes.len() {
                return Err(DecodeError::AttributeCount {
                    id,
                    expected: desc.attributes.len(),
                    found: record.attribute_values.len(),
                });
            }
            if record.output_connectors.len() > desc.outputs.len() {
                return Err(DecodeError::TooManyOutputs {
                    id,
                    expected: desc.outputs.len(),
                    found: record.output_connectors.len(),
                });
            }
            blocks.push((id, category));
        }

        let mut links = Vec::new();
        let mut filled = BTreeSet::new();
        for record in &self.blocks {
            for (index, output) in record.output_connectors.iter().enumerate() {
                let from = ConnectorRef::output(record.id, index);
                for child in &output.children {
                    let target = categories.get(&child.id).ok_or(DecodeError::UnknownTarget {
                        from,
                        target: child.id,
                    })?;
                    let input = ConnectorRef::input(child.id, child.connector_index);
                    if child.connector_index >= target.descriptor().inputs.len() {
                        return Err(DecodeError::ConnectorOutOfRange(input));
                    }
                    if child.id == record.id {
                        return Err(DecodeError::SelfLoop(from));
                    }
                    if !filled.insert(input) {
                        return Err(DecodeError::InputAlreadyLinked(input));
                    }
                    links.push((from, input, child.direction));
                }
            }
        }
        reject_cycles(&categories, &links)?;
        Ok(DecodePlan { blocks, links })
    }
}

fn reject_cycles(
    blocks: &BTreeMap<BlockId, Category>,
    links: &[(ConnectorRef, ConnectorRef, LinkDirection)],
) -> Result<(), DecodeError> {
    let mut indegree: BTreeMap<BlockId, usize> = blocks.keys().map(|id| (*id, 0)).collect();
    let mut downstream: BTreeMap<BlockId, Vec<BlockId>> = BTreeMap::new();
    for (output, input, _) in links {
        *indegree.entry(input.block).or_default() += 1;
        downstream.entry(output.block).or_default().push(input.block);
    }
    let mut ready: Vec<BlockId> = indegree
        .iter()
        .filter(|(_, n)| **n == 0)
        .map(|(id, _)| *id)
        .collect();
    while let Some(id) = ready.pop() {
        for child in downstream.get(&id).into_iter().flatten() {
            if let Some(n) = indegree.get_mut(child) {
                *n -= 1;
                if *n == 0 {
                    ready.push(*child);
                }
            }
        }
        indegree.remove(&id);
    }
    match indegree.keys().next() {
        Some(id) => Err(DecodeError::Cycle(*id)),
        None => Ok(()),
    }
}

/// Serializes `graph` as pretty-printed JSON.
///
/// Fails when a setting or position is NaN or infinite: JSON would write it
/// as `null`, which no decoder accepts back.
pub fn encode<R>(graph: &GraphStore<R>) -> Result<String, EncodeError> {
    let doc = GraphDocument::capture(graph);
    doc.check_finite()?;
    let text = serde_json::to_string_pretty(&doc)?;
    info!(
        blocks = doc.blocks.len(),
        edges = graph.edge_count(),
        "graph encoded"
    );
    Ok(text)
}

/// Parses JSON text into a document without validating it.
pub fn parse(text: &str) -> Result<GraphDocument, DecodeError> {
    Ok(serde_json::from_str(text)?)
}

/// Replaces the contents of `graph` with `doc`.
///
/// Each block is built by `builder` with the id recorded in the document,
/// re-hydrated with its placement and attribute values, and linked. The
/// allocator is reset and every restored id is reserved, so later
/// allocations never collide with persisted ids. Settings come from the
/// document; selection starts empty.
pub fn load_document<R, B>(
    graph: &mut GraphStore<R>,
    doc: &GraphDocument,
    builder: &B,
) -> Result<(), DecodeError>
where
    R: Renderer,
    B: BlockBuilder + ?Sized,
{
    let plan = doc.plan()?;
    let mut staged: Vec<Block> = Vec::with_capacity(plan.blocks.len());
    for ((id, category), record) in plan.blocks.iter().copied().zip(&doc.blocks) {
        let mut block = builder.build(id, category);
        if block.id() != id || block.category() != category {
            return Err(GraphError::BuilderMismatch {
                requested: category,
                requested_id: id,
                found: block.category(),
                found_id: block.id(),
            }
            .into());
        }
        block.position = Point::new(record.x, record.y);
        block.satisfied = block.is_root();
        for (index, value) in record.attribute_values.iter().enumerate() {
            block.set_attribute_value(index, value.clone());
        }
        staged.push(block);
    }

    graph.clear();
    graph.set_settings(doc.settings());
    for block in staged {
        let id = block.id();
        graph.ids.mark_used(id);
        if block.is_root() {
            graph.root = Some(id);
        }
        graph.blocks.insert(id, block);
    }
    for (output, input, authored) in plan.links {
        graph.insert_edge(output, input, authored);
    }
    graph.recompute_satisfaction();
    info!(
        blocks = graph.block_count(),
        edges = graph.edge_count(),
        "graph decoded"
    );
    Ok(())
}

/// Parses `text` and loads it into `graph`. See [`load_document`].
pub fn decode_into<R, B>(
    graph: &mut GraphStore<R>,
    text: &str,
    builder: &B,
) -> Result<(), DecodeError>
where
    R: Renderer,
    B: BlockBuilder + ?Sized,
{
    let doc = parse(text)?;
    load_document(graph, &doc, builder)
}

/// Decodes `text` into a fresh graph with a default renderer.
pub fn decode<R, B>(text: &str, builder: &B) -> Result<GraphStore<R>, DecodeError>
where
    R: Renderer + Default,
    B: BlockBuilder + ?Sized,
{
    let mut graph = GraphStore::with_renderer(R::default());
    decode_into(&mut graph, text, builder)?;
    Ok(graph)
}
