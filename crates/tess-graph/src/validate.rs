// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Link validation: decides whether a proposed edge may be created.
//!
//! Pure with respect to the graph. A rejection is an ordinary negative
//! answer, not a fault; the caller just discards the provisional link.

use thiserror::Error;

use crate::edge::LinkDirection;
use crate::ident::{BlockId, ConnectorRef, Direction};
use crate::store::GraphStore;

/// Why a proposed link was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinkRejection {
    /// The connector does not exist (unknown block or index out of range).
    #[error("no connector at {0}")]
    UnknownConnector(ConnectorRef),
    /// Both ends are inputs or both are outputs.
    #[error("{origin} and {target} face the same direction")]
    SameDirection {
        /// Where the link started.
        origin: ConnectorRef,
        /// Where the link ended.
        target: ConnectorRef,
    },
    /// Both ends belong to the same block.
    #[error("cannot link block {0} to itself")]
    SelfLoop(BlockId),
    /// The input end already has an edge.
    #[error("input {0} is already linked")]
    InputOccupied(ConnectorRef),
    /// The block on the output end is not satisfied yet.
    #[error("source block {0} is not satisfied")]
    SourceNotSatisfied(BlockId),
}

/// Normalised form of an accepted link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPlan {
    /// Output end.
    pub output: ConnectorRef,
    /// Input end.
    pub input: ConnectorRef,
    /// Which end the user started from.
    pub authored: LinkDirection,
}

/// Runs every link check in order: type, self loop, single input, source
/// ready. Returns the normalised link on success.
pub fn check_link<R>(
    graph: &GraphStore<R>,
    origin: ConnectorRef,
    target: ConnectorRef,
) -> Result<LinkPlan, LinkRejection> {
    for end in [origin, target] {
        let exists = graph
            .block(end.block)
            .and_then(|b| b.connector(end.direction, end.index))
            .is_some();
        if !exists {
            return Err(LinkRejection::UnknownConnector(end));
        }
    }

    if origin.direction == target.direction {
        return Err(LinkRejection::SameDirection { origin, target });
    }

    if origin.block == target.block {
        return Err(LinkRejection::SelfLoop(origin.block));
    }

    let (output, input, authored) = match origin.direction {
        Direction::Output => (origin, target, LinkDirection::OutputToInput),
        Direction::Input => (target, origin, LinkDirection::InputToOutput),
    };

    if !graph.edges_at(input).is_empty() {
        return Err(LinkRejection::InputOccupied(input));
    }

    if !graph.is_satisfied(output.block) {
        return Err(LinkRejection::SourceNotSatisfied(output.block));
    }

    Ok(LinkPlan {
        output,
        input,
        authored,
    })
}

/// `true` when [`check_link`] would accept the link.
pub fn can_link<R>(graph: &GraphStore<R>, origin: ConnectorRef, target: ConnectorRef) -> bool {
    check_link(graph, origin, target).is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::category::Category;

    #[test]
    fn normalises_input_to_output_links() {
        let mut graph = GraphStore::new();
        let root = graph.create_block(Category::Square).unwrap();
        let line = graph.create_block(Category::StraightLine).unwrap();
        let plan = check_link(
            &graph,
            ConnectorRef::input(line, 1),
            ConnectorRef::output(root, 2),
        )
        .unwrap();
        assert_eq!(plan.output, ConnectorRef::output(root, 2));
        assert_eq!(plan.input, ConnectorRef::input(line, 1));
        assert_eq!(plan.authored, LinkDirection::InputToOutput);
    }

    #[test]
    fn same_direction_is_rejected_first() {
        let mut graph = GraphStore::new();
        let a = graph.create_block(Category::StraightLine).unwrap();
        let b = graph.create_block(Category::StraightLine).unwrap();
        let origin = ConnectorRef::input(a, 0);
        let target = ConnectorRef::input(b, 0);
        assert_eq!(
            check_link(&graph, origin, target),
            Err(LinkRejection::SameDirection { origin, target })
        );
    }

    #[test]
    fn missing_connectors_are_rejected() {
        let mut graph = GraphStore::new();
        let root = graph.create_block(Category::Triangle).unwrap();
        let line = graph.create_block(Category::StraightLine).unwrap();
        let bad = ConnectorRef::output(root, 3);
        assert_eq!(
            check_link(&graph, bad, ConnectorRef::input(line, 0)),
            Err(LinkRejection::UnknownConnector(bad))
        );
        let gone = ConnectorRef::input(BlockId(42), 0);
        assert!(!can_link(&graph, ConnectorRef::output(root, 0), gone));
    }
}
