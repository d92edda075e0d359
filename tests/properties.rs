use grillagex::{
    build_diagram, map_to_3d, point, resolve_girder, DiagramKind, Element, ElementId, End,
    ForceRecord, ForceTable, GeometryModel, Girder, GirderId, GirderLine, LoadCase,
    MappingOptions, Node, NodeId, ResultMetadata,
};
use proptest::prelude::*;

/// One generated element: advance along X, drift in Y and Z, stored direction.
type Segment = (f64, f64, f64, bool);

/// A girder whose nodes march along X so node 0 is always the start.
fn girder_case() -> impl Strategy<Value = Vec<Segment>> {
    prop::collection::vec(
        (0.1f64..10.0, -2.0f64..2.0, -2.0f64..2.0, any::<bool>()),
        1..12,
    )
}

fn build_model(segments: &[Segment]) -> (GeometryModel, Vec<ElementId>) {
    let mut position = point(0.0, 0.0, 0.0);
    let mut nodes = vec![Node::new(NodeId(0), position)];
    let mut elements = Vec::new();
    for (index, &(dx, dy, dz, reversed)) in segments.iter().enumerate() {
        let index = u32::try_from(index).expect("small index");
        position = point(position.x + dx, position.y + dy, position.z + dz);
        nodes.push(Node::new(NodeId(index + 1), position));
        let (a, b) = (NodeId(index), NodeId(index + 1));
        let (a, b) = if reversed { (b, a) } else { (a, b) };
        elements.push(Element::new(ElementId(index), a, b, GirderId(1), 0.0));
    }
    let ids = elements.iter().map(|element| element.id).collect();
    (GeometryModel::new(nodes, elements).expect("valid model"), ids)
}

fn forces(ids: &[ElementId], values: &[f64]) -> ForceTable {
    let records = ids.iter().zip(values.iter().cycle()).flat_map(|(&id, &value)| {
        [
            ForceRecord::new(id, End::A, "LC1", value, 2.0 * value),
            ForceRecord::new(id, End::B, "LC1", -value, value),
        ]
    });
    ForceTable::new(ResultMetadata::default(), records)
}

fn resolve(model: &GeometryModel, ids: &[ElementId]) -> Girder {
    resolve_girder(model, GirderId(1), ids.iter().copied()).expect("chain resolves")
}

proptest! {
    #[test]
    fn chain_holds_each_element_once(segments in girder_case()) {
        let (model, ids) = build_model(&segments);
        let girder = resolve(&model, &ids);
        prop_assert_eq!(girder.len(), ids.len());
        prop_assert_eq!(girder.nodes.len(), ids.len() + 1);
        let order: Vec<ElementId> = girder.element_ids().collect();
        prop_assert_eq!(order, ids);
        for (link, segment) in girder.links.iter().zip(&segments) {
            prop_assert_eq!(link.orientation.is_reversed(), segment.3);
        }
    }

    #[test]
    fn input_order_is_irrelevant(segments in girder_case(), seed in any::<u64>()) {
        let (model, ids) = build_model(&segments);
        let forward = resolve(&model, &ids);
        let mut reversed_ids = ids.clone();
        reversed_ids.reverse();
        prop_assert_eq!(&resolve(&model, &reversed_ids), &forward);

        let mut rotated = ids.clone();
        let shift = usize::try_from(seed % ids.len() as u64).expect("fits");
        rotated.rotate_left(shift);
        prop_assert_eq!(&resolve(&model, &rotated), &forward);
    }

    #[test]
    fn positions_never_decrease(
        segments in girder_case(),
        values in prop::collection::vec(-100.0f64..100.0, 1..6),
    ) {
        let (model, ids) = build_model(&segments);
        let girder = resolve(&model, &ids);
        let table = forces(&ids, &values);
        for kind in DiagramKind::ALL {
            let diagram = build_diagram(&model, &girder, &table, &LoadCase::from("LC1"), kind)
                .expect("diagram builds");
            prop_assert_eq!(diagram.points.len(), 2 * ids.len());
            prop_assert_eq!(diagram.points[0].position, 0.0);
            for pair in diagram.points.windows(2) {
                prop_assert!(pair[0].position <= pair[1].position);
            }
        }
    }

    #[test]
    fn flipping_storage_negates_contributions(
        segments in girder_case(),
        values in prop::collection::vec(-100.0f64..100.0, 1..6),
    ) {
        let forward: Vec<Segment> = segments.iter().map(|&(x, y, z, _)| (x, y, z, false)).collect();
        let flipped: Vec<Segment> = segments.iter().map(|&(x, y, z, _)| (x, y, z, true)).collect();
        let (forward_model, ids) = build_model(&forward);
        let (flipped_model, _) = build_model(&flipped);
        let table = forces(&ids, &values);
        let case = LoadCase::from("LC1");
        for kind in DiagramKind::ALL {
            let base = build_diagram(&forward_model, &resolve(&forward_model, &ids), &table, &case, kind)
                .expect("diagram builds");
            let flip = build_diagram(&flipped_model, &resolve(&flipped_model, &ids), &table, &case, kind)
                .expect("diagram builds");
            // Each element contributes (start, finish); flipping reads them as (-finish, -start).
            for (base_pair, flip_pair) in base.points.chunks(2).zip(flip.points.chunks(2)) {
                prop_assert_eq!(flip_pair[0].value, -base_pair[1].value);
                prop_assert_eq!(flip_pair[1].value, -base_pair[0].value);
                prop_assert_eq!(flip_pair[0].position, base_pair[0].position);
            }
        }
    }

    #[test]
    fn lifted_points_keep_their_positions(
        segments in girder_case(),
        values in prop::collection::vec(-100.0f64..100.0, 1..6),
    ) {
        let (model, ids) = build_model(&segments);
        let girder = resolve(&model, &ids);
        let table = forces(&ids, &values);
        let diagram = build_diagram(&model, &girder, &table, &LoadCase::from("LC1"), DiagramKind::Sfd)
            .expect("diagram builds");
        let polylines = map_to_3d(
            &model,
            std::slice::from_ref(&girder),
            std::slice::from_ref(&diagram),
            Some(GirderId(1)),
            &MappingOptions::default(),
        )
        .expect("mapping succeeds");
        let line = GirderLine::new(&model, &girder).expect("line measured");
        let polyline = &polylines[0];
        prop_assert_eq!(polyline.points.len(), diagram.points.len());
        for (mapped, original) in polyline.points.iter().zip(&diagram.points) {
            prop_assert_eq!(mapped.value, original.value);
            let station = line.station_of(mapped.base);
            prop_assert!((station - original.position).abs() < 1e-9 * (1.0 + original.position));
        }
    }
}
