// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for tile editor tools (config, prefs).
//! Keeps front ends thin; the graph itself lives in `tess-graph`.

pub mod config;
pub mod prefs;
pub mod prefs_port;
