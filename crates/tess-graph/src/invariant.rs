// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Structural invariant checker.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::ident::{BlockId, ConnectorRef, Direction, EdgeId};
use crate::store::GraphStore;

/// First invariant found broken by [`GraphStore::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// More than one block has a root category.
    #[error("more than one root block: {first} and {second}")]
    MultipleRoots {
        /// Lowest-id root.
        first: BlockId,
        /// Next root found.
        second: BlockId,
    },
    /// The stored root reference disagrees with the blocks present.
    #[error("root reference {recorded:?} does not match root block {actual:?}")]
    RootMismatch {
        /// Stored root reference.
        recorded: Option<BlockId>,
        /// Root block actually present.
        actual: Option<BlockId>,
    },
    /// An input connector holds more than one edge.
    #[error("input {0} holds more than one edge")]
    InputOverfilled(ConnectorRef),
    /// An edge endpoint names a missing block or connector, or the edge runs
    /// the wrong way.
    #[error("edge {0} has a dangling or misdirected endpoint")]
    DanglingEdge(EdgeId),
    /// An edge is missing from one of its own connectors.
    #[error("edge {edge} is not registered on {at}")]
    EdgeNotRegistered {
        /// The edge.
        edge: EdgeId,
        /// Connector that should list it.
        at: ConnectorRef,
    },
    /// A connector lists an edge that does not exist or ends elsewhere.
    #[error("connector {at} lists unknown edge {edge}")]
    UnknownAttachedEdge {
        /// The connector.
        at: ConnectorRef,
        /// The listed edge.
        edge: EdgeId,
    },
    /// An edge joins a block to itself.
    #[error("edge {0} is a self loop")]
    SelfLoop(EdgeId),
    /// A block's satisfied flag disagrees with the satisfaction rule.
    #[error("block {block} is marked satisfied={actual} but should be {expected}")]
    SatisfactionMismatch {
        /// The block.
        block: BlockId,
        /// Stored flag.
        actual: bool,
        /// Flag derived from the root and the block's inputs.
        expected: bool,
    },
    /// A live block id is marked available in the id pool.
    #[error("block {0} is live but its id is available for allocation")]
    IdNotReserved(BlockId),
}

impl<R> GraphStore<R> {
    /// Checks every structural invariant of the graph.
    ///
    /// Satisfaction is checked inductively: a block must be satisfied exactly
    /// when it is the root, or all of its inputs are linked to satisfied
    /// sources.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        self.verify_roots()?;
        self.verify_edges()?;
        self.verify_connectors()?;
        for block in self.blocks.values() {
            if self.ids.is_available(block.id()) {
                return Err(InvariantViolation::IdNotReserved(block.id()));
            }
            let expected = block.is_root() || self.is_eligible(block.id());
            if block.is_satisfied() != expected {
                return Err(InvariantViolation::SatisfactionMismatch {
                    block: block.id(),
                    actual: block.is_satisfied(),
                    expected,
                });
            }
        }
        Ok(())
    }

    fn verify_roots(&self) -> Result<(), InvariantViolation> {
        let mut roots = self.blocks.values().filter(|b| b.is_root()).map(|b| b.id());
        let actual = roots.next();
        if let (Some(first), Some(second)) = (actual, roots.next()) {
            return Err(InvariantViolation::MultipleRoots { first, second });
        }
        if actual != self.root {
            return Err(InvariantViolation::RootMismatch {
                recorded: self.root,
                actual,
            });
        }
        Ok(())
    }

    fn verify_edges(&self) -> Result<(), InvariantViolation> {
        for edge in self.edges.values() {
            let (output, input) = (edge.output(), edge.input());
            if output.direction != Direction::Output || input.direction != Direction::Input {
                return Err(InvariantViolation::DanglingEdge(edge.id()));
            }
            if output.block == input.block {
                return Err(InvariantViolation::SelfLoop(edge.id()));
            }
            for end in [output, input] {
                let connector = self
                    .block(end.block)
                    .and_then(|b| b.connector(end.direction, end.index))
                    .ok_or(InvariantViolation::DanglingEdge(edge.id()))?;
                if !connector.edges().contains(&edge.id()) {
                    return Err(InvariantViolation::EdgeNotRegistered {
                        edge: edge.id(),
                        at: end,
                    });
                }
            }
        }
        Ok(())
    }

    fn verify_connectors(&self) -> Result<(), InvariantViolation> {
        for block in self.blocks.values() {
            let sides = [
                (Direction::Input, block.inputs()),
                (Direction::Output, block.outputs()),
            ];
            for (direction, connectors) in sides {
                for (index, connector) in connectors.iter().enumerate() {
                    let at = ConnectorRef {
                        block: block.id(),
                        direction,
                        index,
                    };
                    if direction == Direction::Input && connector.edges().len() > 1 {
                        return Err(InvariantViolation::InputOverfilled(at));
                    }
                    let mut listed = BTreeSet::new();
                    for &edge in connector.edges() {
                        let matches = self.edges.get(&edge).is_some_and(|e| match direction {
                            Direction::Input => e.input() == at,
                            Direction::Output => e.output() == at,
                        });
                        if !matches || !listed.insert(edge) {
                            return Err(InvariantViolation::UnknownAttachedEdge { at, edge });
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
