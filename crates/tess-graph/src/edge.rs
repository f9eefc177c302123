// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Directed links between an output connector and an input connector.

use serde::{Deserialize, Serialize};

use crate::ident::{BlockId, ConnectorRef, EdgeId};

/// Which end the user started from when authoring a link.
///
/// Only affects which endpoint is drawn as the start of the line; core
/// semantics always treat the edge as output → input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkDirection {
    /// Dragged from an output connector to an input connector.
    #[default]
    OutputToInput,
    /// Dragged from an input connector to an output connector.
    InputToOutput,
}

/// Immutable link between two distinct blocks. Replace, don't edit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Edge {
    id: EdgeId,
    output: ConnectorRef,
    input: ConnectorRef,
    authored: LinkDirection,
}

impl Edge {
    pub(crate) fn new(
        id: EdgeId,
        output: ConnectorRef,
        input: ConnectorRef,
        authored: LinkDirection,
    ) -> Self {
        Self {
            id,
            output,
            input,
            authored,
        }
    }

    /// Edge id.
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// The output connector this edge leaves from.
    pub fn output(&self) -> ConnectorRef {
        self.output
    }

    /// The input connector this edge feeds.
    pub fn input(&self) -> ConnectorRef {
        self.input
    }

    /// Upstream block.
    pub fn output_block(&self) -> BlockId {
        self.output.block
    }

    /// Downstream block.
    pub fn input_block(&self) -> BlockId {
        self.input.block
    }

    /// Authoring direction.
    pub fn authored(&self) -> LinkDirection {
        self.authored
    }
}
