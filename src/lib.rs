#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

mod central;
mod config;
mod diagram;
mod errors;
mod forces;
mod geometry;
mod mapper;
mod model;
mod path;
mod pipeline;

pub use central::{median_offset, select_central_girder};
pub use config::PipelineConfig;
pub use diagram::{
    build_diagram, build_girder_diagrams, oriented_value, Diagram, DiagramKind, DiagramMetadata,
    DiagramPoint,
};
pub use errors::{ConfigError, DiagramError, EntityId, TopologyFault};
pub use forces::{End, ForceComponent, ForceRecord, ForceTable, LoadCase, ResultMetadata};
pub use geometry::{compare_positions, point, Axis, Point};
pub use mapper::{
    map_diagram, map_to_3d, GirderLine, MappedPoint, MappingOptions, Polyline3d, Scale,
};
pub use model::{Element, ElementId, GeometryModel, GirderId, Node, NodeId};
pub use path::{resolve_girder, ChainLink, Girder, Orientation};
pub use pipeline::{
    build_all_diagrams, resolve_girders, run, GirderFailure, PipelineOutput,
};
