//! Error types produced while resolving girders and building diagrams.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::forces::{End, LoadCase};
use crate::model::{ElementId, GirderId, NodeId};

/// Identifier of any entity the model can be asked about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityId {
    /// A node of the grillage.
    Node(NodeId),
    /// A beam element of the grillage.
    Element(ElementId),
    /// A longitudinal girder.
    Girder(GirderId),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Node(id) => write!(f, "node {id}"),
            EntityId::Element(id) => write!(f, "element {id}"),
            EntityId::Girder(id) => write!(f, "girder {id}"),
        }
    }
}

/// Error returned when a girder cannot be turned into diagrams.
///
/// Every variant is final for the girder it concerns: the input is static, so
/// retrying cannot change the outcome.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DiagramError {
    /// Returned when a girder's elements do not form one chain with two ends.
    #[error("girder {girder} is not a single chain: {reason}")]
    InvalidTopology {
        /// Girder whose element set was rejected.
        girder: GirderId,
        /// Which part of the chain check failed.
        reason: TopologyFault,
    },
    /// Returned when a force record needed by a diagram is absent.
    #[error("no force record for element {element} end {end} in load case {load_case}")]
    MissingForceData {
        /// Element whose record is missing.
        element: ElementId,
        /// End of the element that was looked up.
        end: End,
        /// Load case that was requested.
        load_case: LoadCase,
    },
    /// Returned when an element's two nodes share the same coordinates.
    #[error("element {0} has zero length")]
    ZeroLengthElement(ElementId),
    /// Returned when a referenced id is absent from the model.
    #[error("{0} not found")]
    NotFound(EntityId),
    /// Returned when the same id is supplied twice while building the model.
    #[error("{0} is defined more than once")]
    DuplicateId(EntityId),
}

/// Reason a girder's element set failed the chain check.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TopologyFault {
    /// The girder has no elements at all.
    #[error("no elements")]
    Empty,
    /// The number of free ends differs from two.
    #[error("expected 2 chain endpoints, found {0}")]
    EndpointCount(usize),
    /// A node joins more than two elements of the girder.
    #[error("node {node} joins {degree} elements")]
    Branch {
        /// Node where the chain branches.
        node: NodeId,
        /// Number of girder elements meeting at the node.
        degree: usize,
    },
    /// An element starts and ends on the same node.
    #[error("element {0} connects a node to itself")]
    SelfLoop(ElementId),
    /// Traversal from the start endpoint left elements unvisited.
    #[error("{unreached} of {total} elements are not connected to the chain")]
    Disconnected {
        /// Elements the walk never reached.
        unreached: usize,
        /// Elements in the girder.
        total: usize,
    },
}

/// Error returned when pipeline configuration cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Returned when an explicit configuration path does not exist.
    #[error("missing configuration file: {0}")]
    MissingFile(PathBuf),
    /// Returned when the configuration file cannot be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// Returned when the TOML content does not describe a valid configuration.
    #[error("failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// Returned when values parse but are not usable.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
