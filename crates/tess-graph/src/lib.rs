// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! tess-graph: the graph/constraint core of the tile editor.
//!
//! Blocks of a closed set of categories are wired output → input into an
//! acyclic graph. A block becomes *satisfied* once every input is linked to a
//! satisfied source; the root tile is satisfied by definition. Satisfaction
//! changes drive a [`Renderer`], whose draws feed connector values forward to
//! the next blocks. The whole graph persists as JSON through [`codec`].
//!
//! ```
//! use tess_graph::{Category, ConnectorRef, GraphStore};
//!
//! let mut graph = GraphStore::new();
//! let square = graph.create_block(Category::Square)?;
//! let line = graph.create_block(Category::StraightLine)?;
//! graph.create_link(ConnectorRef::output(square, 0), ConnectorRef::input(line, 0))?;
//! graph.create_link(ConnectorRef::output(square, 1), ConnectorRef::input(line, 1))?;
//! assert!(graph.is_satisfied(line));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![forbid(unsafe_code)]

mod block;
mod category;
pub mod codec;
mod edge;
mod ident;
mod invariant;
mod propagate;
mod render;
mod store;
mod validate;

pub use block::{Attribute, Block, BlockBuilder, Connector, DefaultBlocks, Point};
pub use category::{AttributeSpec, Category, CategoryDescriptor, UnknownCategory};
pub use codec::{decode, decode_into, encode, DecodeError, EncodeError, GraphDocument};
pub use edge::{Edge, LinkDirection};
pub use ident::{BlockId, ConnectorRef, Direction, EdgeId, IdAllocator, POOL_CHUNK};
pub use invariant::InvariantViolation;
pub use render::{NullRenderer, Renderer};
pub use store::{GraphError, GraphSettings, GraphStore, Selectable};
pub use validate::{can_link, check_link, LinkPlan, LinkRejection};
