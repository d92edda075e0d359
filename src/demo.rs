use grillagex::{
    point, DiagramError, Element, ElementId, End, ForceRecord, ForceTable, GeometryModel,
    GirderId, Node, NodeId, ResultMetadata,
};

/// Number of longitudinal girders in the demonstration deck.
pub const GIRDER_COUNT: u32 = 5;
/// Number of elements along each girder.
pub const BAYS: u32 = 9;
/// Length of every element in metres.
pub const BAY_LENGTH: f64 = 3.0;
/// Distance between neighbouring girders in metres.
pub const GIRDER_SPACING: f64 = 2.5;

/// Loads of one demonstration load case.
#[derive(Debug, Clone, Copy)]
struct DeckLoad {
    /// Name of the load case.
    name: &'static str,
    /// Uniformly distributed load in kN/m.
    udl: f64,
    /// Optional point load in kN and the distance it acts at.
    point_load: Option<(f64, f64)>,
}

/// Dead load spread along the span and a vehicle axle at 12 m.
const LOADS: [DeckLoad; 2] = [
    DeckLoad {
        name: "DL",
        udl: 20.0,
        point_load: None,
    },
    DeckLoad {
        name: "LL",
        udl: 0.0,
        point_load: Some((150.0, 12.0)),
    },
];

/// Simply supported span under one [`DeckLoad`], scaled by the girder's share.
///
/// The formulas are the textbook statics of a simply supported beam, see
/// <https://en.wikipedia.org/wiki/Shear_and_moment_diagram>.
struct SimpleSpan {
    /// Span length in metres.
    span: f64,
    /// Distributed load in kN/m.
    udl: f64,
    /// Point load in kN and its position.
    point_load: Option<(f64, f64)>,
}

impl SimpleSpan {
    /// Left support reaction.
    fn reaction(&self) -> f64 {
        let point = self
            .point_load
            .map_or(0.0, |(load, at)| load * (self.span - at) / self.span);
        self.udl * self.span / 2.0 + point
    }

    /// Shear just left (`after_load == false`) or right of `x`.
    fn shear(&self, x: f64, after_load: bool) -> f64 {
        let mut shear = self.reaction() - self.udl * x;
        if let Some((load, at)) = self.point_load {
            if x > at || (x == at && after_load) {
                shear -= load;
            }
        }
        shear
    }

    /// Sagging moment at `x`.
    fn moment(&self, x: f64) -> f64 {
        let mut moment = self.reaction() * x - self.udl * x * x / 2.0;
        if let Some((load, at)) = self.point_load {
            if x > at {
                moment -= load * (x - at);
            }
        }
        moment
    }
}

/// The nodes, elements and force results of the demonstration deck.
pub struct DemoDeck {
    /// Node and element tables.
    pub model: GeometryModel,
    /// End forces for every element and load case.
    pub forces: ForceTable,
}

/// Node id at station `index` of `girder`, numbered the way grillage
/// generators usually number them: support nodes first, then interior rows.
fn node_id(girder: u32, index: u32) -> NodeId {
    match index {
        0 => NodeId(girder),
        i if i == BAYS => NodeId(GIRDER_COUNT + girder),
        i => NodeId(2 * GIRDER_COUNT + (i - 1) * GIRDER_COUNT + girder),
    }
}

/// Element id of bay `bay` of `girder`.
fn element_id(girder: u32, bay: u32) -> ElementId {
    ElementId(100 * girder + bay + 1)
}

/// Every other element of the even girders is stored back to front, as mesh
/// generators do when they number members transversely.
fn is_stored_reversed(girder: u32, bay: u32) -> bool {
    girder % 2 == 0 && bay % 2 == 1
}

/// Share of the deck load carried by a girder: edge girders carry less.
fn load_share(girder: u32) -> f64 {
    if girder == 1 || girder == GIRDER_COUNT {
        0.6
    } else {
        1.0
    }
}

/// Build the five-girder demonstration deck.
pub fn build_demo_deck() -> Result<DemoDeck, DiagramError> {
    let span = f64::from(BAYS) * BAY_LENGTH;
    let mut nodes = Vec::new();
    let mut elements = Vec::new();
    let mut records = Vec::new();

    for girder in 1..=GIRDER_COUNT {
        let offset = f64::from(girder - 1) * GIRDER_SPACING;
        for index in 0..=BAYS {
            let x = f64::from(index) * BAY_LENGTH;
            nodes.push(Node::new(node_id(girder, index), point(x, 0.0, offset)));
        }

        for bay in 0..BAYS {
            let id = element_id(girder, bay);
            let (near, far) = (node_id(girder, bay), node_id(girder, bay + 1));
            let reversed = is_stored_reversed(girder, bay);
            let (node_a, node_b) = if reversed { (far, near) } else { (near, far) };
            elements.push(Element::new(id, node_a, node_b, GirderId(girder), offset));

            let x0 = f64::from(bay) * BAY_LENGTH;
            let x1 = x0 + BAY_LENGTH;
            for load in LOADS {
                let beam = SimpleSpan {
                    span,
                    udl: load.udl * load_share(girder),
                    point_load: load
                        .point_load
                        .map(|(value, at)| (value * load_share(girder), at)),
                };
                let start = (beam.shear(x0, true), beam.moment(x0));
                let finish = (beam.shear(x1, false), beam.moment(x1));
                // Stored values of a reversed element are read negated.
                let (at_a, at_b) = if reversed {
                    ((-finish.0, -finish.1), (-start.0, -start.1))
                } else {
                    (start, finish)
                };
                records.push(ForceRecord::new(id, End::A, load.name, at_a.0, at_a.1));
                records.push(ForceRecord::new(id, End::B, load.name, at_b.0, at_b.1));
            }
        }
    }

    Ok(DemoDeck {
        model: GeometryModel::new(nodes, elements)?,
        forces: ForceTable::new(ResultMetadata::default(), records),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use grillagex::{run, DiagramKind, LoadCase, PipelineConfig};

    #[test]
    fn node_numbering_is_unique() {
        let deck = build_demo_deck().expect("deck builds");
        assert_eq!(deck.model.node_count(), (GIRDER_COUNT * (BAYS + 1)) as usize);
        assert_eq!(deck.model.element_count(), (GIRDER_COUNT * BAYS) as usize);
        assert_eq!(node_id(1, 0), NodeId(1));
        assert_eq!(node_id(1, BAYS), NodeId(6));
        assert_eq!(node_id(1, 1), NodeId(11));
        assert_eq!(node_id(3, 8), NodeId(48));
    }

    #[test]
    fn central_girder_shows_axle_jump_and_zero_end_moments() {
        let deck = build_demo_deck().expect("deck builds");
        let output = run(&deck.model, &deck.forces, &PipelineConfig::default()).expect("run");
        assert!(output.failures.is_empty());
        assert_eq!(output.central, Some(GirderId(3)));

        let sfd = output
            .central_diagram(DiagramKind::Sfd, &LoadCase::from("LL"))
            .expect("central SFD");
        // Bay 3 ends at 12 m and bay 4 starts there.
        assert_eq!(sfd.points[7].position, sfd.points[8].position);
        assert_relative_eq!(sfd.points[7].value - sfd.points[8].value, 150.0, epsilon = 1e-9);

        let bmd = output
            .central_diagram(DiagramKind::Bmd, &LoadCase::from("DL"))
            .expect("central BMD");
        let first = bmd.points.first().expect("points present");
        let last = bmd.points.last().expect("points present");
        assert_relative_eq!(first.value, 0.0, epsilon = 1e-9);
        assert_relative_eq!(last.value, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn reversed_storage_does_not_change_girder_diagrams() {
        let deck = build_demo_deck().expect("deck builds");
        let output = run(&deck.model, &deck.forces, &PipelineConfig::default()).expect("run");
        let diagram = |girder: u32| {
            output
                .diagrams
                .iter()
                .find(|diagram| {
                    diagram.girder == GirderId(girder)
                        && diagram.kind == DiagramKind::Bmd
                        && diagram.load_case.as_str() == "DL"
                })
                .expect("diagram present")
        };
        // Girders 2 and 3 carry the same share; 2 stores half its elements reversed.
        for (a, b) in diagram(2).points.iter().zip(&diagram(3).points) {
            assert_eq!(a.position, b.position);
            assert_relative_eq!(a.value, b.value, epsilon = 1e-9);
        }
    }
}
