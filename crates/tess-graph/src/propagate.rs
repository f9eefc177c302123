// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Satisfaction propagation.
//!
//! A block is satisfied when it is the root, or when every input is linked
//! to a satisfied source. Gaining satisfaction spreads forward only to
//! children that become eligible; losing it spreads forward unconditionally.
//! Each pass touches a block at most once and terminates because links can
//! only be made from already-satisfied sources, which rules out cycles.

use std::collections::BTreeSet;

use tracing::trace;

use crate::block::Point;
use crate::ident::{BlockId, EdgeId};
use crate::render::Renderer;
use crate::store::GraphStore;

impl<R> GraphStore<R> {
    /// `true` when every input of `id` holds exactly one edge whose source is
    /// satisfied. Roots are never eligible: they are satisfied by definition.
    pub fn is_eligible(&self, id: BlockId) -> bool {
        let Some(block) = self.blocks.get(&id) else {
            return false;
        };
        !block.is_root()
            && block.inputs().iter().all(|input| match input.edges() {
                [edge] => self
                    .edges
                    .get(edge)
                    .is_some_and(|e| self.is_satisfied(e.output_block())),
                _ => false,
            })
    }
}

impl<R: Renderer> GraphStore<R> {
    /// Re-derives satisfaction for the whole graph from the root.
    ///
    /// Used after restoring a persisted graph; satisfaction is never stored.
    pub fn recompute_satisfaction(&mut self) {
        if let Some(root) = self.root {
            self.mark_satisfied(root);
        }
    }

    /// Marks `start` satisfied, draws it, and satisfies every descendant that
    /// becomes eligible as a result.
    pub(crate) fn mark_satisfied(&mut self, start: BlockId) {
        let mut done = BTreeSet::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if !done.insert(id) {
                continue;
            }
            let Some(block) = self.blocks.get_mut(&id) else {
                continue;
            };
            block.satisfied = true;
            trace!(block = %id, "satisfied");
            self.draw_block(id);
            for child in self.children(id).into_iter().rev() {
                if !done.contains(&child) && self.is_eligible(child) {
                    stack.push(child);
                }
            }
        }
    }

    /// Marks `start` and every block reachable downstream of it unsatisfied,
    /// undrawing each.
    pub(crate) fn mark_unsatisfied(&mut self, start: BlockId) {
        let mut done = BTreeSet::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if !done.insert(id) {
                continue;
            }
            let Some(block) = self.blocks.get_mut(&id) else {
                continue;
            };
            block.satisfied = false;
            trace!(block = %id, "unsatisfied");
            if let Some(block) = self.blocks.get(&id) {
                self.renderer.undraw(block);
            }
            stack.extend(self.children(id).into_iter().rev());
        }
    }

    /// Redraws `start` and its satisfied descendants, parents before
    /// children, without changing any satisfaction state.
    pub(crate) fn redraw_from(&mut self, start: BlockId) {
        let order = self.satisfied_postorder(start);
        for id in order.into_iter().rev() {
            trace!(block = %id, "redraw");
            self.draw_block(id);
        }
    }

    /// Postorder over `start` and its satisfied descendants. Each frame holds
    /// a block, its children and the next child to visit.
    fn satisfied_postorder(&self, start: BlockId) -> Vec<BlockId> {
        let mut seen = BTreeSet::from([start]);
        let mut order = Vec::new();
        let mut stack = vec![(start, self.children(start), 0_usize)];
        while let Some((id, children, cursor)) = stack.last_mut() {
            let next = children.get(*cursor).copied();
            *cursor += 1;
            match next {
                Some(child) => {
                    if self.is_satisfied(child) && seen.insert(child) {
                        stack.push((child, self.children(child), 0));
                    }
                }
                None => {
                    order.push(*id);
                    stack.pop();
                }
            }
        }
        order
    }

    /// Draws one block (with labels when flagged) and pushes the returned
    /// output values downstream.
    pub(crate) fn draw_block(&mut self, id: BlockId) {
        let Some(block) = self.blocks.get(&id) else {
            return;
        };
        let values = if block.labeled {
            self.renderer.draw_with_labels(block)
        } else {
            self.renderer.draw(block)
        };
        self.apply_outputs(id, &values);
    }

    fn apply_outputs(&mut self, id: BlockId, values: &[Point]) {
        if values.is_empty() {
            return;
        }
        let Some(block) = self.blocks.get_mut(&id) else {
            return;
        };
        for (connector, value) in block.outputs.iter_mut().zip(values) {
            connector.set_value(*value);
        }
        let edges: Vec<EdgeId> = block
            .outputs
            .iter()
            .flat_map(|c| c.edges().iter().copied())
            .collect();
        for edge in edges {
            self.pull_input(edge);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::category::Category;
    use crate::ident::ConnectorRef;
    use crate::store::GraphStore;

    #[test]
    fn diamond_child_waits_for_both_parents() {
        let mut graph = GraphStore::new();
        let root = graph.create_block(Category::Square).unwrap();
        let a = graph.create_block(Category::StraightLine).unwrap();
        let b = graph.create_block(Category::StraightLine).unwrap();
        let c = graph.create_block(Category::StraightLine).unwrap();

        graph
            .create_link(ConnectorRef::output(root, 0), ConnectorRef::input(a, 0))
            .unwrap();
        graph
            .create_link(ConnectorRef::output(root, 1), ConnectorRef::input(a, 1))
            .unwrap();
        graph
            .create_link(ConnectorRef::output(root, 2), ConnectorRef::input(b, 0))
            .unwrap();
        graph
            .create_link(ConnectorRef::output(a, 0), ConnectorRef::input(c, 0))
            .unwrap();
        assert!(!graph.is_satisfied(c));

        let late = graph
            .create_link(ConnectorRef::output(root, 3), ConnectorRef::input(b, 1))
            .unwrap();
        graph
            .create_link(ConnectorRef::output(b, 1), ConnectorRef::input(c, 1))
            .unwrap();
        assert!(graph.is_satisfied(c));

        graph.delete_link(late).unwrap();
        assert!(!graph.is_satisfied(b));
        assert!(!graph.is_satisfied(c));
        assert!(graph.is_satisfied(a));
        assert!(graph.verify().is_ok());
    }

    #[test]
    fn relinking_to_an_unsatisfied_parent_keeps_child_unsatisfied() {
        let mut graph = GraphStore::new();
        let root = graph.create_block(Category::Triangle).unwrap();
        let a = graph.create_block(Category::StraightLine).unwrap();
        let c = graph.create_block(Category::StraightLine).unwrap();
        let first = graph
            .create_link(ConnectorRef::output(root, 0), ConnectorRef::input(a, 0))
            .unwrap();
        graph
            .create_link(ConnectorRef::output(root, 1), ConnectorRef::input(a, 1))
            .unwrap();
        graph
            .create_link(ConnectorRef::output(a, 0), ConnectorRef::input(c, 0))
            .unwrap();
        graph.delete_link(first).unwrap();
        assert!(!graph.is_satisfied(a));

        graph
            .create_link(ConnectorRef::output(root, 2), ConnectorRef::input(c, 1))
            .unwrap();
        assert!(!graph.is_satisfied(c), "c still depends on unsatisfied a");
        assert!(graph.verify().is_ok());
    }
}
