//! Shear force and bending moment diagrams along resolved girders.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::DiagramError;
use crate::forces::{ForceTable, LoadCase};
use crate::model::{GeometryModel, GirderId};
use crate::path::{Girder, Orientation};

/// Quantity plotted by a diagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    /// Shear force diagram.
    Sfd,
    /// Bending moment diagram.
    Bmd,
}

impl DiagramKind {
    /// Both diagram kinds, shear first.
    pub const ALL: [DiagramKind; 2] = [DiagramKind::Sfd, DiagramKind::Bmd];

    /// Short upper-case label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            DiagramKind::Sfd => "SFD",
            DiagramKind::Bmd => "BMD",
        }
    }

    /// Name of the plotted quantity.
    #[must_use]
    pub const fn quantity(self) -> &'static str {
        match self {
            DiagramKind::Sfd => "Shear Force",
            DiagramKind::Bmd => "Bending Moment",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A value at a distance along a girder.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DiagramPoint {
    /// Distance from the start of the girder in metres.
    pub position: f64,
    /// Diagram ordinate.
    pub value: f64,
}

impl DiagramPoint {
    /// Create a point.
    #[must_use]
    pub const fn new(position: f64, value: f64) -> Self {
        Self { position, value }
    }
}

/// Tags copied from the force table onto a diagram.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagramMetadata {
    /// Unit of the diagram ordinates.
    pub unit: String,
    /// Sign convention of the ordinates.
    pub sign_convention: String,
}

/// Ordered diagram for one girder, kind and load case.
///
/// Each element contributes two points, so adjoining elements produce two
/// points at the same position. When their values differ the step is a real
/// jump in the diagram (a reaction or point load) and is kept as is.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagram {
    /// Girder the diagram runs along.
    pub girder: GirderId,
    /// Quantity plotted.
    pub kind: DiagramKind,
    /// Load case the values belong to.
    pub load_case: LoadCase,
    /// Points in order of non-decreasing position.
    pub points: Vec<DiagramPoint>,
    /// Unit and sign tags.
    pub metadata: DiagramMetadata,
}

impl Diagram {
    /// Position of the last point, the girder length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points.last().map_or(0.0, |point| point.position)
    }

    /// Smallest and largest ordinate, or `None` for an empty diagram.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|point| point.value).fold(None, |range, value| {
            Some(match range {
                None => (value, value),
                Some((low, high)) => (low.min(value), high.max(value)),
            })
        })
    }

    /// Largest absolute ordinate, zero for an empty diagram.
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        self.points
            .iter()
            .map(|point| point.value.abs())
            .fold(0.0, f64::max)
    }
}

/// Stored value seen from the traversal direction.
///
/// Reversed elements are read back to front, which flips the sign of their
/// end forces relative to the girder's global convention.
#[must_use]
pub fn oriented_value(stored: f64, orientation: Orientation) -> f64 {
    stored * orientation.sign()
}

/// Build the diagram of `kind` along `girder` for `load_case`.
///
/// # Errors
///
/// Returns [`DiagramError::MissingForceData`] when an element end has no
/// record, [`DiagramError::ZeroLengthElement`] for coincident element nodes and
/// [`DiagramError::NotFound`] for ids absent from `model`.
pub fn build_diagram(
    model: &GeometryModel,
    girder: &Girder,
    forces: &ForceTable,
    load_case: &LoadCase,
    kind: DiagramKind,
) -> Result<Diagram, DiagramError> {
    let mut points = Vec::with_capacity(girder.len() * 2);
    let mut position = 0.0;
    for link in &girder.links {
        let start = forces.record(link.element, link.orientation.start_end(), load_case)?;
        let finish = forces.record(link.element, link.orientation.finish_end(), load_case)?;
        let length = model.element_length(link.element)?;

        points.push(DiagramPoint::new(
            position,
            oriented_value(start.value(kind), link.orientation),
        ));
        position += length;
        points.push(DiagramPoint::new(
            position,
            oriented_value(finish.value(kind), link.orientation),
        ));
    }

    debug!(
        girder = girder.id.0,
        kind = kind.label(),
        load_case = load_case.as_str(),
        points = points.len();
        "Built diagram"
    );

    let metadata = forces.metadata();
    Ok(Diagram {
        girder: girder.id,
        kind,
        load_case: load_case.clone(),
        points,
        metadata: DiagramMetadata {
            unit: metadata.unit(kind).to_owned(),
            sign_convention: metadata.sign_convention.clone(),
        },
    })
}

/// Build one diagram per entry of `kinds` for a girder and load case.
///
/// # Errors
///
/// Returns the first error raised by [`build_diagram`].
pub fn build_girder_diagrams(
    model: &GeometryModel,
    girder: &Girder,
    forces: &ForceTable,
    load_case: &LoadCase,
    kinds: &[DiagramKind],
) -> Result<Vec<Diagram>, DiagramError> {
    kinds
        .iter()
        .map(|&kind| build_diagram(model, girder, forces, load_case, kind))
        .collect()
}
