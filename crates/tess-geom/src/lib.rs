// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Headless drawing collaborator for the tile graph.

[`TileCanvas`] implements the graph's `Renderer` port. Each draw computes
the block's geometry from its attributes and input connector values, keeps
one [`Drawing`] per block, and hands the output points back to the graph so
they flow into the next blocks.

Attribute values are interpreted leniently: text that does not parse falls
back to a neutral value (no rotation, no trim, no slide).
"]
#![forbid(unsafe_code)]

mod canvas;
/// Pure geometry helpers.
pub mod shape;

pub use canvas::{Drawing, Stroke, TileCanvas, DEFAULT_CANVAS_SIZE};
