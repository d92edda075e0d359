//! Lifting 2D diagrams onto the 3D girder layout.

use std::collections::HashMap;

use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::diagram::{Diagram, DiagramKind, DiagramMetadata};
use crate::errors::{DiagramError, EntityId};
use crate::forces::LoadCase;
use crate::geometry::{Axis, Point};
use crate::model::{GeometryModel, GirderId};
use crate::path::Girder;

/// How diagram ordinates are converted into 3D offsets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Scale {
    /// Multiply every ordinate by `factor`.
    Fixed {
        /// Length per unit of ordinate.
        factor: f64,
    },
    /// Scale so the largest ordinate of a diagram kind, across all girders,
    /// is drawn `amplitude` long.
    Normalized {
        /// Length of the largest ordinate.
        amplitude: f64,
    },
}

impl Default for Scale {
    fn default() -> Self {
        Scale::Normalized { amplitude: 0.3 }
    }
}

impl Scale {
    /// Factor applied to the ordinates of `kind`.
    ///
    /// A normalised scale divides by the largest magnitude over every diagram
    /// of `kind` passed in, across all girders and load cases, rather than by
    /// each girder's own maximum. Heights therefore compare between girders.
    /// Diagrams that are zero everywhere fall back to a factor of one.
    #[must_use]
    pub fn factor_for(self, kind: DiagramKind, diagrams: &[Diagram]) -> f64 {
        match self {
            Scale::Fixed { factor } => factor,
            Scale::Normalized { amplitude } => {
                let max_abs = diagrams
                    .iter()
                    .filter(|diagram| diagram.kind == kind)
                    .map(Diagram::max_abs)
                    .fold(0.0, f64::max);
                if max_abs == 0.0 {
                    1.0
                } else {
                    amplitude / max_abs
                }
            }
        }
    }
}

/// Options for [`map_to_3d`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingOptions {
    /// Conversion from ordinates to offsets.
    #[serde(default)]
    pub scale: Scale,
    /// Axis the offsets are drawn along.
    #[serde(default)]
    pub axis: Axis,
}

/// A diagram point placed in space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MappedPoint {
    /// Distance along the girder, copied from the diagram.
    pub position: f64,
    /// Ordinate, copied from the diagram.
    pub value: f64,
    /// Point on the girder at `position`.
    pub base: Point,
    /// `base` moved along the visualisation axis by the scaled ordinate.
    pub tip: Point,
}

/// One diagram drawn along its girder in 3D.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Polyline3d {
    /// Girder the polyline belongs to.
    pub girder: GirderId,
    /// Quantity plotted.
    pub kind: DiagramKind,
    /// Load case the values belong to.
    pub load_case: LoadCase,
    /// Whether this is the central girder.
    pub central: bool,
    /// Unit and sign tags copied from the diagram.
    pub metadata: DiagramMetadata,
    /// Factor the ordinates were multiplied by.
    pub scale: f64,
    /// Points in diagram order.
    pub points: Vec<MappedPoint>,
}

/// The node line of a girder, measured by distance along the chain.
#[derive(Clone, Debug, PartialEq)]
pub struct GirderLine {
    /// Cumulative distance at each node.
    stations: Vec<f64>,
    /// Coordinates of each node.
    positions: Vec<Point>,
}

impl GirderLine {
    /// Measure the node line of a resolved girder.
    ///
    /// Stations are accumulated element by element in chain order, the same way
    /// diagram positions are.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::NotFound`] for unknown ids and
    /// [`DiagramError::ZeroLengthElement`] for coincident element nodes.
    pub fn new(model: &GeometryModel, girder: &Girder) -> Result<Self, DiagramError> {
        let positions = girder
            .nodes
            .iter()
            .map(|&node| model.node(node))
            .collect::<Result<Vec<_>, _>>()?;
        let mut stations = Vec::with_capacity(positions.len());
        let mut station = 0.0;
        stations.push(station);
        for link in &girder.links {
            station += model.element_length(link.element)?;
            stations.push(station);
        }
        Ok(Self {
            stations,
            positions,
        })
    }

    /// Total length of the line.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.stations.last().copied().unwrap_or(0.0)
    }

    /// Point at `station` along the line, clamped to the line's ends.
    #[must_use]
    pub fn point_at(&self, station: f64) -> Point {
        let Some(&first) = self.positions.first() else {
            return Point::new(0.0, 0.0, 0.0);
        };
        let station = station.clamp(0.0, self.length());
        let upper = self.stations.partition_point(|&s| s < station);
        if upper == 0 {
            return first;
        }
        if upper >= self.stations.len() {
            return self.positions[self.positions.len() - 1];
        }
        if self.stations[upper] == station {
            return self.positions[upper];
        }
        let lower = upper - 1;
        let fraction =
            (station - self.stations[lower]) / (self.stations[upper] - self.stations[lower]);
        self.positions[lower].lerp(self.positions[upper], fraction)
    }

    /// Distance along the line of the line point closest to `point`.
    #[must_use]
    pub fn station_of(&self, point: Point) -> f64 {
        let target = point.to_vector();
        let mut best = (f64::INFINITY, 0.0);
        for (index, pair) in self.positions.windows(2).enumerate() {
            let start = pair[0].to_vector();
            let segment: Vector3<f64> = pair[1].to_vector() - start;
            let span = segment.norm_squared();
            let t = if span == 0.0 {
                0.0
            } else {
                ((target - start).dot(&segment) / span).clamp(0.0, 1.0)
            };
            let distance = (start + segment * t - target).norm();
            if distance < best.0 {
                let along = self.stations[index + 1] - self.stations[index];
                best = (distance, self.stations[index] + t * along);
            }
        }
        best.1
    }
}

/// Lift one diagram onto its girder line.
#[must_use]
pub fn map_diagram(
    line: &GirderLine,
    diagram: &Diagram,
    factor: f64,
    axis: Axis,
    central: bool,
) -> Polyline3d {
    let points = diagram
        .points
        .iter()
        .map(|point| {
            let base = line.point_at(point.position);
            MappedPoint {
                position: point.position,
                value: point.value,
                base,
                tip: base.offset_along(axis, point.value * factor),
            }
        })
        .collect();
    Polyline3d {
        girder: diagram.girder,
        kind: diagram.kind,
        load_case: diagram.load_case.clone(),
        central,
        metadata: diagram.metadata.clone(),
        scale: factor,
        points,
    }
}

/// Lift every diagram onto its girder, one polyline per diagram.
///
/// Polylines come back in the order of `diagrams`. The scale factor is
/// resolved once per diagram kind over all of `diagrams`.
///
/// # Errors
///
/// Returns [`DiagramError::NotFound`] when a diagram's girder is not in
/// `girders`, and any error raised while measuring a girder line.
pub fn map_to_3d(
    model: &GeometryModel,
    girders: &[Girder],
    diagrams: &[Diagram],
    central: Option<GirderId>,
    options: &MappingOptions,
) -> Result<Vec<Polyline3d>, DiagramError> {
    let mut lines = HashMap::new();
    for girder in girders {
        lines.insert(girder.id, GirderLine::new(model, girder)?);
    }
    let factors: HashMap<DiagramKind, f64> = DiagramKind::ALL
        .into_iter()
        .map(|kind| (kind, options.scale.factor_for(kind, diagrams)))
        .collect();
    for (kind, factor) in &factors {
        debug!(kind = kind.label(), factor = *factor; "Resolved 3D scale");
    }

    diagrams
        .iter()
        .map(|diagram| {
            let line = lines
                .get(&diagram.girder)
                .ok_or(DiagramError::NotFound(EntityId::Girder(diagram.girder)))?;
            let factor = factors.get(&diagram.kind).copied().unwrap_or(1.0);
            Ok(map_diagram(
                line,
                diagram,
                factor,
                options.axis,
                central == Some(diagram.girder),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::diagram::DiagramPoint;
    use crate::geometry::point;
    use crate::model::{Element, ElementId, Node, NodeId};
    use crate::path::resolve_girder;

    /// A bent two-element girder: 3 m along X then 4 m along Z.
    fn bent_girder() -> (GeometryModel, Girder) {
        let model = GeometryModel::new(
            [
                Node::new(NodeId(1), point(0.0, 0.0, 0.0)),
                Node::new(NodeId(2), point(3.0, 0.0, 0.0)),
                Node::new(NodeId(3), point(3.0, 0.0, 4.0)),
            ],
            [
                Element::new(ElementId(1), NodeId(1), NodeId(2), GirderId(2), 1.0),
                Element::new(ElementId(2), NodeId(3), NodeId(2), GirderId(2), 1.0),
            ],
        )
        .expect("valid model");
        let girder =
            resolve_girder(&model, GirderId(2), [ElementId(1), ElementId(2)]).expect("chain");
        (model, girder)
    }

    fn diagram(kind: DiagramKind, points: &[(f64, f64)]) -> Diagram {
        Diagram {
            girder: GirderId(2),
            kind,
            load_case: LoadCase::from("LC1"),
            points: points
                .iter()
                .map(|&(position, value)| DiagramPoint::new(position, value))
                .collect(),
            metadata: DiagramMetadata {
                unit: "kN".to_owned(),
                sign_convention: "test".to_owned(),
            },
        }
    }

    #[test]
    fn line_interpolates_between_nodes() {
        let (model, girder) = bent_girder();
        let line = GirderLine::new(&model, &girder).expect("line measured");
        assert_relative_eq!(line.length(), 7.0);
        assert_eq!(line.point_at(0.0), point(0.0, 0.0, 0.0));
        assert_eq!(line.point_at(3.0), point(3.0, 0.0, 0.0));
        let mid_second = line.point_at(5.0);
        assert_relative_eq!(mid_second.x, 3.0);
        assert_relative_eq!(mid_second.z, 2.0);
        assert_eq!(line.point_at(-1.0), point(0.0, 0.0, 0.0));
        assert_eq!(line.point_at(99.0), point(3.0, 0.0, 4.0));
    }

    #[test]
    fn station_of_inverts_point_at() {
        let (model, girder) = bent_girder();
        let line = GirderLine::new(&model, &girder).expect("line measured");
        for station in [0.0, 1.25, 3.0, 4.5, 7.0] {
            assert_relative_eq!(line.station_of(line.point_at(station)), station, epsilon = 1e-12);
        }
    }

    #[test]
    fn mapping_keeps_points_values_and_jumps() {
        let (model, girder) = bent_girder();
        let sfd = diagram(
            DiagramKind::Sfd,
            &[(0.0, 2.0), (3.0, 2.0), (3.0, -4.0), (7.0, -4.0)],
        );
        let options = MappingOptions {
            scale: Scale::Fixed { factor: 0.5 },
            axis: Axis::Y,
        };
        let polylines = map_to_3d(
            &model,
            std::slice::from_ref(&girder),
            std::slice::from_ref(&sfd),
            Some(GirderId(2)),
            &options,
        )
        .expect("mapping succeeds");

        assert_eq!(polylines.len(), 1);
        let polyline = &polylines[0];
        assert!(polyline.central);
        assert_eq!(polyline.points.len(), 4);
        assert_eq!(polyline.points[1].base, polyline.points[2].base);
        assert_eq!(polyline.points[1].tip, point(3.0, 1.0, 0.0));
        assert_eq!(polyline.points[2].tip, point(3.0, -2.0, 0.0));
        for (mapped, original) in polyline.points.iter().zip(&sfd.points) {
            assert_eq!(mapped.position, original.position);
            assert_eq!(mapped.value, original.value);
        }
    }

    #[test]
    fn normalized_scale_uses_largest_value_per_kind() {
        let diagrams = [
            diagram(DiagramKind::Sfd, &[(0.0, 5.0), (7.0, -10.0)]),
            diagram(DiagramKind::Bmd, &[(0.0, 0.0), (7.0, 300.0)]),
        ];
        let scale = Scale::Normalized { amplitude: 0.3 };
        assert_relative_eq!(scale.factor_for(DiagramKind::Sfd, &diagrams), 0.03, epsilon = 1e-12);
        assert_relative_eq!(scale.factor_for(DiagramKind::Bmd, &diagrams), 0.001, epsilon = 1e-12);

        let flat = [diagram(DiagramKind::Sfd, &[(0.0, 0.0), (7.0, 0.0)])];
        assert_eq!(scale.factor_for(DiagramKind::Sfd, &flat), 1.0);
        assert_eq!(Scale::Fixed { factor: 2.0 }.factor_for(DiagramKind::Bmd, &flat), 2.0);
    }

    #[test]
    fn diagram_for_unknown_girder_is_not_found() {
        let (model, _) = bent_girder();
        let sfd = diagram(DiagramKind::Sfd, &[(0.0, 1.0)]);
        let error = map_to_3d(
            &model,
            &[],
            std::slice::from_ref(&sfd),
            None,
            &MappingOptions::default(),
        )
        .expect_err("girder was never resolved");
        assert_eq!(error, DiagramError::NotFound(EntityId::Girder(GirderId(2))));
    }
}
