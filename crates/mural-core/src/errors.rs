//! Error types for the Mural engine.

use crate::types::NodeId;
use thiserror::Error;

/// Errors while building a layout tree from a screen's flat node list.
///
/// Tree construction is the only fallible step: once a tree exists, a
/// layout pass always completes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("screen references unknown node {id}")]
    UnknownNode { id: NodeId },

    #[error("node {id} appears more than once in the screen")]
    DuplicateNode { id: NodeId },

    #[error("node {id} is reachable through more than one parent")]
    SharedChild { id: NodeId },

    #[error("screen is missing its root node {id}")]
    MissingRoot { id: NodeId },
}
