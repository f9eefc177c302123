// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use tess_dry_tests::{line_chain, RecordingRenderer, RenderEvent, SAMPLE_DOCUMENT};
use tess_graph::codec::{self, load_document, DecodeError, GraphDocument};
use tess_graph::{
    Block, BlockBuilder, BlockId, Category, ConnectorRef, DefaultBlocks, GraphSettings,
    GraphStore, LinkDirection, NullRenderer, Point,
};

#[test]
fn sample_document_loads_with_recorded_ids() {
    let graph: GraphStore<RecordingRenderer> =
        codec::decode(SAMPLE_DOCUMENT, &DefaultBlocks).unwrap();
    assert_eq!(graph.root(), Some(BlockId(0)));
    assert_eq!(graph.block_count(), 2);
    assert_eq!(
        graph.settings(),
        GraphSettings {
            display_scale: 1.25,
            line_width: 2.0
        }
    );

    let line = graph.block(BlockId(3)).unwrap();
    assert_eq!(line.position(), Point::new(220.0, 80.0));
    assert_eq!(line.attribute_value(3), Some("25"));
    assert!(line.is_satisfied());

    let second = graph.edges_at(ConnectorRef::input(BlockId(3), 1))[0];
    assert_eq!(
        graph.edge(second).unwrap().authored(),
        LinkDirection::InputToOutput
    );
    assert_eq!(
        graph.renderer().events(),
        [RenderEvent::Draw(BlockId(0)), RenderEvent::Draw(BlockId(3))]
    );

    // Restored ids are reserved; fresh blocks fill the gaps.
    let mut graph = graph;
    assert_eq!(graph.create_block(Category::StraightLine).unwrap(), BlockId(1));
    graph.verify().unwrap();
}

#[test]
fn encode_then_decode_preserves_everything_observable() {
    let (mut graph, ids) = line_chain(NullRenderer, 3).unwrap();
    graph.delete_block(ids[1]).unwrap();
    let spare = graph.create_block(Category::StraightLine).unwrap();
    graph.set_position(spare, Point::new(-5.5, 7.25)).unwrap();
    graph.set_attribute(spare, 1, "not a number").unwrap();
    graph.set_settings(GraphSettings {
        display_scale: 0.5,
        line_width: 3.0,
    });

    let text = codec::encode(&graph).unwrap();
    let restored: GraphStore = codec::decode(&text, &DefaultBlocks).unwrap();

    assert_eq!(restored.block_count(), graph.block_count());
    assert_eq!(restored.edge_count(), graph.edge_count());
    assert_eq!(restored.settings(), graph.settings());
    for block in graph.blocks() {
        let twin = restored.block(block.id()).unwrap();
        assert_eq!(twin.category(), block.category());
        assert_eq!(twin.position(), block.position());
        assert_eq!(twin.attributes(), block.attributes());
        assert_eq!(twin.is_satisfied(), block.is_satisfied());
        assert_eq!(restored.parents(block.id()), graph.parents(block.id()));
    }
    assert_eq!(codec::encode(&restored).unwrap(), text);
    restored.verify().unwrap();
}

#[test]
fn failed_decode_keeps_the_current_graph() {
    let (mut graph, _) = line_chain(RecordingRenderer::new(), 2).unwrap();
    let before = GraphDocument::capture(&graph);
    graph.renderer_mut().take_events();

    let broken = SAMPLE_DOCUMENT.replace("\"Straight Line\"", "\"Circle\"");
    let err = codec::decode_into(&mut graph, &broken, &DefaultBlocks).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownCategory { ref name, .. } if name == "Circle"));
    assert_eq!(GraphDocument::capture(&graph), before);
    assert!(graph.renderer().events().is_empty());
}

#[test]
fn decode_replaces_the_previous_graph() {
    let (mut graph, _) = line_chain(RecordingRenderer::new(), 2).unwrap();
    graph.renderer_mut().take_events();
    codec::decode_into(&mut graph, SAMPLE_DOCUMENT, &DefaultBlocks).unwrap();
    let undraws = graph
        .renderer()
        .events()
        .iter()
        .filter(|e| matches!(e, RenderEvent::Undraw(_)))
        .count();
    assert_eq!(undraws, 3);
    assert_eq!(graph.block_count(), 2);
    assert!(graph.renderer().is_drawn(BlockId(3)));
}

struct Labelled;

impl BlockBuilder for Labelled {
    fn build(&self, id: BlockId, category: Category) -> Block {
        Block::new(id, category).with_position(Point::new(1.0, 1.0))
    }
}

struct Forgetful;

impl BlockBuilder for Forgetful {
    fn build(&self, _id: BlockId, category: Category) -> Block {
        Block::new(BlockId(99), category)
    }
}

#[test]
fn builders_construct_blocks_and_documents_override_them() {
    let doc = codec::parse(SAMPLE_DOCUMENT).unwrap();
    let mut graph = GraphStore::new();
    load_document(&mut graph, &doc, &Labelled).unwrap();
    assert_eq!(
        graph.block(BlockId(0)).unwrap().position(),
        Point::new(40.0, 60.0)
    );

    let err = load_document(&mut graph, &doc, &Forgetful).unwrap_err();
    assert!(matches!(err, DecodeError::Builder(_)));
    assert_eq!(graph.block_count(), 2);
}

#[test]
fn documents_without_a_root_load_unsatisfied() {
    let text = r#"{"zoom":1,"strokeWidthOfLines":1,"blocks":[
        {"id":4,"isRoot":false,"category":"straight line","layoutX":0,"layoutY":0,
         "attributeValues":["0","0","0","0"],"outputConnectors":[{"children":[{"id":5,"connectorIndex":0}]}]},
        {"id":5,"isRoot":false,"category":"Straight Line","layoutX":0,"layoutY":0,
         "attributeValues":["0","0","0","0"],"outputConnectors":[]}
    ]}"#;
    let graph: GraphStore = codec::decode(text, &DefaultBlocks).unwrap();
    assert!(!graph.has_root());
    assert!(graph.blocks().all(|b| !b.is_satisfied()));
    assert_eq!(graph.children(BlockId(4)), [BlockId(5)]);
    graph.verify().unwrap();
}
