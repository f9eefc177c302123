// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use tess_dry_tests::{line_chain, linked_square_line, RecordingRenderer, RenderEvent};
use tess_graph::codec::{self, BlockRecord, ChildRecord, GraphDocument, OutputRecord};
use tess_graph::{
    BlockId, Category, ConnectorRef, DefaultBlocks, GraphStore, LinkDirection, LinkRejection,
    Point, Selectable,
};

#[test]
fn square_and_line_walkthrough() {
    let mut graph = GraphStore::with_renderer(RecordingRenderer::new());
    let square = graph.create_block(Category::Square).unwrap();
    assert!(graph.is_satisfied(square));
    assert_eq!(graph.renderer().events(), [RenderEvent::Draw(square)]);

    let line = graph.create_block(Category::StraightLine).unwrap();
    assert!(!graph.is_satisfied(line));

    let first = graph
        .create_link(ConnectorRef::output(square, 0), ConnectorRef::input(line, 0))
        .unwrap();
    assert!(!graph.is_satisfied(line));
    let block = graph.block(line).unwrap();
    assert!(block.inputs()[0].is_linked());
    assert!(!block.inputs()[1].is_linked());

    graph
        .create_link(ConnectorRef::output(square, 1), ConnectorRef::input(line, 1))
        .unwrap();
    assert!(graph.is_satisfied(line));
    assert!(graph.renderer().is_drawn(line));

    graph.delete_link(first).unwrap();
    assert!(!graph.is_satisfied(line));
    assert!(!graph.renderer().is_drawn(line));
    assert!(graph.is_satisfied(square));
    graph.verify().unwrap();
}

#[test]
fn self_loops_are_rejected_regardless_of_other_checks() {
    let (mut graph, _, line) = linked_square_line(RecordingRenderer::new()).unwrap();
    assert_eq!(
        graph.create_link(ConnectorRef::output(line, 0), ConnectorRef::input(line, 0)),
        Err(LinkRejection::SelfLoop(line))
    );
    // Occupied input and satisfied source: still a self loop.
    assert_eq!(
        graph.create_link(ConnectorRef::input(line, 1), ConnectorRef::output(line, 1)),
        Err(LinkRejection::SelfLoop(line))
    );
}

#[test]
fn roots_have_no_inputs_to_link_into() {
    let (mut graph, square, line) = linked_square_line(RecordingRenderer::new()).unwrap();
    let target = ConnectorRef::input(square, 0);
    assert_eq!(
        graph.create_link(ConnectorRef::output(line, 0), target),
        Err(LinkRejection::UnknownConnector(target))
    );
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn occupied_inputs_and_unsatisfied_sources_are_rejected() {
    let (mut graph, square, line) = linked_square_line(RecordingRenderer::new()).unwrap();
    let occupied = ConnectorRef::input(line, 0);
    assert_eq!(
        graph.create_link(ConnectorRef::output(square, 3), occupied),
        Err(LinkRejection::InputOccupied(occupied))
    );

    let pending = graph.create_block(Category::StraightLine).unwrap();
    let next = graph.create_block(Category::StraightLine).unwrap();
    assert_eq!(
        graph.create_link(ConnectorRef::output(pending, 0), ConnectorRef::input(next, 0)),
        Err(LinkRejection::SourceNotSatisfied(pending))
    );
    assert!(!graph.can_link(ConnectorRef::output(pending, 0), ConnectorRef::input(next, 0)));
    assert!(graph.can_link(ConnectorRef::output(line, 0), ConnectorRef::input(next, 0)));
}

#[test]
fn deleting_a_block_cascades_to_descendants_only() {
    let (mut graph, ids) = line_chain(RecordingRenderer::new(), 3).unwrap();
    let (root, middle, tail) = (ids[0], ids[2], ids[3]);
    graph.renderer_mut().take_events();

    graph.delete_block(middle).unwrap();
    assert!(graph.block(middle).is_none());
    assert!(!graph.is_satisfied(tail));
    assert!(graph.is_satisfied(ids[1]));
    assert!(graph.is_satisfied(root));
    assert_eq!(
        graph.renderer().events(),
        [RenderEvent::Undraw(middle), RenderEvent::Undraw(tail)]
    );
    assert!(graph.edges_at(ConnectorRef::input(tail, 0)).is_empty());
    assert!(graph.edges_at(ConnectorRef::output(ids[1], 0)).is_empty());
    assert_eq!(graph.create_block(Category::StraightLine).unwrap(), middle);
    graph.verify().unwrap();
}

#[test]
fn relinking_restores_the_whole_chain() {
    let (mut graph, ids) = line_chain(RecordingRenderer::new(), 4).unwrap();
    let edge = graph.edges_at(ConnectorRef::input(ids[1], 0))[0];
    graph.delete_link(edge).unwrap();
    assert!(ids[1..].iter().all(|id| !graph.is_satisfied(*id)));

    graph
        .create_link(ConnectorRef::output(ids[0], 2), ConnectorRef::input(ids[1], 0))
        .unwrap();
    assert!(ids.iter().all(|id| graph.is_satisfied(*id)));
    graph.verify().unwrap();
}

#[test]
fn attribute_changes_redraw_satisfied_descendants_in_order() {
    let (mut graph, ids) = line_chain(RecordingRenderer::new(), 2).unwrap();
    let loose = graph.create_block(Category::StraightLine).unwrap();
    graph
        .create_link(ConnectorRef::output(ids[2], 0), ConnectorRef::input(loose, 0))
        .unwrap();
    graph.renderer_mut().take_events();

    graph.set_attribute(ids[0], 0, "30").unwrap();
    assert_eq!(
        graph.renderer().events(),
        [
            RenderEvent::Draw(ids[0]),
            RenderEvent::Draw(ids[1]),
            RenderEvent::Draw(ids[2]),
        ]
    );
    assert!(!graph.is_satisfied(loose));

    graph.renderer_mut().take_events();
    graph.set_attribute(loose, 2, "10").unwrap();
    assert!(graph.renderer().events().is_empty());
}

#[test]
fn drawn_values_flow_to_child_inputs() {
    let (graph, root, line) = linked_square_line(RecordingRenderer::stamping()).unwrap();
    let r = root.index() as f64;
    let inputs = graph.block(line).unwrap().inputs();
    assert_eq!(inputs[0].value(), Point::new(r, 0.0));
    assert_eq!(inputs[0].secondary_value(), Point::new(r, 1.0));
    assert_eq!(inputs[1].value(), Point::new(r, 1.0));
    assert_eq!(inputs[1].secondary_value(), Point::new(r, 2.0));
}

#[test]
fn labeled_blocks_are_drawn_with_labels() {
    let (mut graph, root, line) = linked_square_line(RecordingRenderer::new()).unwrap();
    graph.set_labels(line, true).unwrap();
    graph.renderer_mut().take_events();
    graph.set_attribute(root, 1, "Invisible").unwrap();
    assert_eq!(
        graph.renderer().events(),
        [RenderEvent::Draw(root), RenderEvent::DrawWithLabels(line)]
    );
}

#[test]
fn delete_selected_removes_edges_then_blocks() {
    let (mut graph, root, line) = linked_square_line(RecordingRenderer::new()).unwrap();
    let edge = graph.edges_at(ConnectorRef::input(line, 1))[0];
    graph.select(Selectable::Edge(edge)).unwrap();
    graph.select(Selectable::Block(root)).unwrap();
    assert_eq!(graph.delete_selected(), 2);
    assert!(!graph.has_root());
    assert_eq!(graph.block_count(), 1);
    assert_eq!(graph.edge_count(), 0);
    assert!(!graph.is_satisfied(line));
    assert_eq!(graph.selection().count(), 0);
    graph.verify().unwrap();
}

#[test]
fn clear_undraws_and_resets_ids() {
    let (mut graph, ids) = line_chain(RecordingRenderer::new(), 2).unwrap();
    graph.clear();
    assert!(graph.renderer().drawn().is_empty());
    assert_eq!(graph.create_block(Category::Triangle).unwrap(), ids[0]);
}

/// Square root followed by `len` lines, each fed on both inputs by the
/// block before it.
fn chain_document(len: usize) -> GraphDocument {
    let link = |target: usize, connector_index: usize| OutputRecord {
        children: vec![ChildRecord {
            id: BlockId(target),
            connector_index,
            direction: LinkDirection::OutputToInput,
        }],
    };
    let blocks = (0..=len)
        .map(|id| {
            let category = if id == 0 {
                Category::Square
            } else {
                Category::StraightLine
            };
            let output_connectors = if id == len {
                Vec::new()
            } else {
                vec![link(id + 1, 0), link(id + 1, 1)]
            };
            BlockRecord {
                id: BlockId(id),
                is_root: id == 0,
                category: category.name().to_owned(),
                x: 0.0,
                y: 0.0,
                attribute_values: category
                    .descriptor()
                    .attributes
                    .iter()
                    .map(|a| a.default.to_owned())
                    .collect(),
                output_connectors,
            }
        })
        .collect();
    GraphDocument {
        display_scale: 1.0,
        line_width: 1.0,
        blocks,
    }
}

#[test]
fn redraw_handles_very_long_chains() {
    const LEN: usize = 20_000;
    let mut graph = GraphStore::with_renderer(RecordingRenderer::new());
    codec::load_document(&mut graph, &chain_document(LEN), &DefaultBlocks).unwrap();
    let tail = BlockId(LEN);
    assert!(graph.is_satisfied(tail));

    graph.renderer_mut().take_events();
    graph.set_attribute(BlockId(0), 0, "15").unwrap();
    let events = graph.renderer().events();
    assert_eq!(events.len(), LEN + 1);
    assert_eq!(events[0], RenderEvent::Draw(BlockId(0)));
    assert_eq!(events[LEN], RenderEvent::Draw(tail));
    assert_eq!(graph.renderer().draw_count(tail), 1);
    assert!(graph.is_satisfied(tail));
}
