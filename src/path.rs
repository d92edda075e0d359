//! Ordering a girder's loose elements into one oriented chain.

use std::collections::{BTreeSet, HashMap, HashSet};

use log::debug;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::errors::{DiagramError, TopologyFault};
use crate::forces::End;
use crate::geometry::compare_positions;
use crate::model::{Element, ElementId, GeometryModel, GirderId, NodeId};

/// Direction an element is read in relative to its girder's traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Orientation {
    /// Stored node A is where traversal enters the element.
    Forward,
    /// Stored node B is where traversal enters the element.
    Reversed,
}

impl Orientation {
    /// Orientation of `element` when the walk reaches it through `entry`.
    ///
    /// # Examples
    /// ```
    /// use grillagex::{Element, ElementId, GirderId, NodeId, Orientation};
    ///
    /// let element = Element::new(ElementId(1), NodeId(4), NodeId(9), GirderId(1), 0.0);
    /// assert_eq!(Orientation::entering_from(&element, NodeId(4)), Orientation::Forward);
    /// assert_eq!(Orientation::entering_from(&element, NodeId(9)), Orientation::Reversed);
    /// ```
    #[must_use]
    pub fn entering_from(element: &Element, entry: NodeId) -> Orientation {
        if element.node_a == entry {
            Orientation::Forward
        } else {
            Orientation::Reversed
        }
    }

    /// Stored end met first when walking the chain.
    #[must_use]
    pub const fn start_end(self) -> End {
        match self {
            Orientation::Forward => End::A,
            Orientation::Reversed => End::B,
        }
    }

    /// Stored end met last when walking the chain.
    #[must_use]
    pub const fn finish_end(self) -> End {
        self.start_end().opposite()
    }

    /// Factor applied to stored values to keep the global sign convention.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Orientation::Forward => 1.0,
            Orientation::Reversed => -1.0,
        }
    }

    /// Whether the stored node order runs against the traversal.
    #[must_use]
    pub const fn is_reversed(self) -> bool {
        matches!(self, Orientation::Reversed)
    }
}

/// One element of a resolved chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ChainLink {
    /// Element at this position of the chain.
    pub element: ElementId,
    /// How the element's stored ends map onto the traversal.
    pub orientation: Orientation,
}

/// A girder whose elements have been ordered into a single path.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Girder {
    /// Identifier of the girder.
    pub id: GirderId,
    /// Elements in traversal order.
    pub links: Vec<ChainLink>,
    /// Nodes in traversal order, one more than there are links.
    pub nodes: Vec<NodeId>,
    /// Mean transverse offset of the girder's elements.
    pub transverse_offset: f64,
}

impl Girder {
    /// Element ids in traversal order.
    pub fn element_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.links.iter().map(|link| link.element)
    }

    /// Return the number of elements in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the chain holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Resolve the unordered `elements` of `girder` into one oriented chain.
///
/// The walk starts at the chain end that sorts first under
/// [`compare_positions`](crate::compare_positions), falling back to the lower
/// node id for coincident ends, so the result does not depend on input order.
///
/// # Errors
///
/// Returns [`DiagramError::InvalidTopology`] when the elements do not form a
/// single unbranched chain and [`DiagramError::NotFound`] for unknown ids.
pub fn resolve_girder(
    model: &GeometryModel,
    girder: GirderId,
    elements: impl IntoIterator<Item = ElementId>,
) -> Result<Girder, DiagramError> {
    let invalid = |reason| DiagramError::InvalidTopology { girder, reason };
    let ids: BTreeSet<ElementId> = elements.into_iter().collect();
    if ids.is_empty() {
        return Err(invalid(TopologyFault::Empty));
    }

    let mut graph: UnGraph<NodeId, ElementId> = UnGraph::default();
    let mut indices: HashMap<NodeId, NodeIndex> = HashMap::new();
    let mut offset_sum = 0.0;
    for &id in &ids {
        let element = model.element(id)?;
        if element.node_a == element.node_b {
            return Err(invalid(TopologyFault::SelfLoop(id)));
        }
        offset_sum += element.transverse_offset;
        let a = *indices
            .entry(element.node_a)
            .or_insert_with(|| graph.add_node(element.node_a));
        let b = *indices
            .entry(element.node_b)
            .or_insert_with(|| graph.add_node(element.node_b));
        graph.add_edge(a, b, id);
    }

    let mut ordered_nodes: Vec<NodeIndex> = graph.node_indices().collect();
    ordered_nodes.sort_by_key(|&index| graph[index]);
    let endpoints: Vec<NodeIndex> = ordered_nodes
        .iter()
        .copied()
        .filter(|&index| graph.edges(index).count() == 1)
        .collect();
    if endpoints.len() != 2 {
        return Err(invalid(TopologyFault::EndpointCount(endpoints.len())));
    }
    if let Some((node, degree)) = ordered_nodes
        .iter()
        .map(|&index| (graph[index], graph.edges(index).count()))
        .find(|&(_, degree)| degree > 2)
    {
        return Err(invalid(TopologyFault::Branch { node, degree }));
    }

    let start = choose_start(model, &graph, endpoints[0], endpoints[1])?;

    let mut visited = HashSet::new();
    let mut links = Vec::with_capacity(ids.len());
    let mut nodes = vec![graph[start]];
    let mut current = start;
    loop {
        let Some(edge) = graph
            .edges(current)
            .find(|edge| !visited.contains(&edge.id()))
        else {
            break;
        };
        visited.insert(edge.id());
        let element = model.element(*edge.weight())?;
        let next = if edge.source() == current {
            edge.target()
        } else {
            edge.source()
        };
        links.push(ChainLink {
            element: element.id,
            orientation: Orientation::entering_from(element, graph[current]),
        });
        nodes.push(graph[next]);
        current = next;
    }
    if links.len() != ids.len() {
        return Err(invalid(TopologyFault::Disconnected {
            unreached: ids.len() - links.len(),
            total: ids.len(),
        }));
    }

    let reversed = links
        .iter()
        .filter(|link| link.orientation.is_reversed())
        .count();
    debug!(
        girder = girder.0,
        elements = links.len(),
        reversed = reversed;
        "Resolved girder chain"
    );

    Ok(Girder {
        id: girder,
        transverse_offset: offset_sum / ids.len() as f64,
        links,
        nodes,
    })
}

/// Pick the chain end the walk starts from.
fn choose_start(
    model: &GeometryModel,
    graph: &UnGraph<NodeId, ElementId>,
    first: NodeIndex,
    second: NodeIndex,
) -> Result<NodeIndex, DiagramError> {
    let first_position = model.node(graph[first])?;
    let second_position = model.node(graph[second])?;
    let order = compare_positions(&first_position, &second_position)
        .then_with(|| graph[first].cmp(&graph[second]));
    Ok(if order.is_le() { first } else { second })
}
