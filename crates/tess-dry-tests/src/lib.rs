// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for tile editor crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`fixtures`] - Prebuilt graphs and saved documents
//! - [`render`] - Renderer double that records draw/undraw calls

pub mod config;
pub mod fixtures;
pub mod render;

pub use config::InMemoryConfigStore;
pub use fixtures::{line_chain, linked_square_line, FixtureError, SAMPLE_DOCUMENT};
pub use render::{RecordingRenderer, RenderEvent};
