// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Prebuilt graphs and saved documents for tests.
//!
//! Fixture builders only perform operations that are valid on an empty
//! graph, so a failure means the store itself is broken.

use std::error::Error;

use tess_graph::{BlockId, Category, ConnectorRef, GraphStore, Renderer};

/// Error returned by fixture builders.
pub type FixtureError = Box<dyn Error + Send + Sync>;

/// Saved graph: a square root (rotated 15°) feeding one straight line on
/// V1/V2, with the second link authored input → output.
pub const SAMPLE_DOCUMENT: &str = r#"{
  "zoom": 1.25,
  "strokeWidthOfLines": 2.0,
  "blocks": [
    {
      "id": 0,
      "isRoot": true,
      "category": "Square Tile",
      "layoutX": 40.0,
      "layoutY": 60.0,
      "attributeValues": ["15", "Visible"],
      "outputConnectors": [
        { "children": [ { "id": 3, "connectorIndex": 0 } ] },
        { "children": [ { "id": 3, "connectorIndex": 1, "direction": "inputToOutput" } ] },
        { "children": [] },
        { "children": [] }
      ]
    },
    {
      "id": 3,
      "isRoot": false,
      "category": "Straight Line",
      "layoutX": 220.0,
      "layoutY": 80.0,
      "attributeValues": ["10", "0", "0", "25"],
      "outputConnectors": [ { "children": [] }, { "children": [] } ]
    }
  ]
}"#;

/// Square root with one straight line linked on outputs 0 and 1.
///
/// Returns the graph, the root id and the line id.
pub fn linked_square_line<R: Renderer>(
    renderer: R,
) -> Result<(GraphStore<R>, BlockId, BlockId), FixtureError> {
    let mut graph = GraphStore::with_renderer(renderer);
    let root = graph.create_block(Category::Square)?;
    let line = graph.create_block(Category::StraightLine)?;
    link(&mut graph, ConnectorRef::output(root, 0), ConnectorRef::input(line, 0))?;
    link(&mut graph, ConnectorRef::output(root, 1), ConnectorRef::input(line, 1))?;
    Ok((graph, root, line))
}

/// Square root followed by `len` straight lines, each fed on both inputs by
/// the outputs of the block before it.
///
/// Returns the graph and the ids in chain order, root first.
pub fn line_chain<R: Renderer>(
    renderer: R,
    len: usize,
) -> Result<(GraphStore<R>, Vec<BlockId>), FixtureError> {
    let mut graph = GraphStore::with_renderer(renderer);
    let mut ids = vec![graph.create_block(Category::Square)?];
    for _ in 0..len {
        let prev = ids[ids.len() - 1];
        let next = graph.create_block(Category::StraightLine)?;
        link(&mut graph, ConnectorRef::output(prev, 0), ConnectorRef::input(next, 0))?;
        link(&mut graph, ConnectorRef::output(prev, 1), ConnectorRef::input(next, 1))?;
        ids.push(next);
    }
    Ok((graph, ids))
}

fn link<R: Renderer>(
    graph: &mut GraphStore<R>,
    output: ConnectorRef,
    input: ConnectorRef,
) -> Result<(), FixtureError> {
    graph.create_link(output, input)?;
    Ok(())
}
