// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Renderer port driven by satisfaction propagation.

use crate::block::{Block, Point};

/// Drawing collaborator notified whenever a block's drawn state changes.
///
/// Renderers are dumb: they draw what they are handed and never touch
/// topology. A draw returns the block's output connector values in output
/// order; the store writes them back and hands them downstream before any
/// child is drawn. Returning an empty vector leaves connector values as they
/// were.
pub trait Renderer {
    /// (Re)draw a satisfied block.
    fn draw(&mut self, block: &Block) -> Vec<Point>;

    /// (Re)draw a satisfied block with its points labelled.
    fn draw_with_labels(&mut self, block: &Block) -> Vec<Point> {
        self.draw(block)
    }

    /// Remove a block's drawing.
    fn undraw(&mut self, block: &Block);
}

/// Renderer that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _block: &Block) -> Vec<Point> {
        Vec::new()
    }

    fn undraw(&mut self, _block: &Block) {}
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn draw(&mut self, block: &Block) -> Vec<Point> {
        (**self).draw(block)
    }

    fn draw_with_labels(&mut self, block: &Block) -> Vec<Point> {
        (**self).draw_with_labels(block)
    }

    fn undraw(&mut self, block: &Block) {
        (**self).undraw(block);
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn draw(&mut self, block: &Block) -> Vec<Point> {
        (**self).draw(block)
    }

    fn draw_with_labels(&mut self, block: &Block) -> Vec<Point> {
        (**self).draw_with_labels(block)
    }

    fn undraw(&mut self, block: &Block) {
        (**self).undraw(block);
    }
}
