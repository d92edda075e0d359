//! Read-only node and element tables of a grillage.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{DiagramError, EntityId};
use crate::geometry::Point;

/// Identifier of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Identifier of a beam element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

/// Identifier of a longitudinal girder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GirderId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GirderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point of the grillage mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    /// Identifier of the node.
    pub id: NodeId,
    /// Position of the node in metres.
    pub position: Point,
}

impl Node {
    /// Create a node at `position`.
    #[must_use]
    pub const fn new(id: NodeId, position: Point) -> Self {
        Self { id, position }
    }
}

/// A beam element spanning two nodes and belonging to one girder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Element {
    /// Identifier of the element.
    pub id: ElementId,
    /// First stored node, the element's end A.
    pub node_a: NodeId,
    /// Second stored node, the element's end B.
    pub node_b: NodeId,
    /// Girder the element is grouped into.
    pub girder: GirderId,
    /// Transverse offset of the element from the structure's reference line.
    pub transverse_offset: f64,
}

impl Element {
    /// Create an element joining `node_a` to `node_b`.
    #[must_use]
    pub const fn new(
        id: ElementId,
        node_a: NodeId,
        node_b: NodeId,
        girder: GirderId,
        transverse_offset: f64,
    ) -> Self {
        Self {
            id,
            node_a,
            node_b,
            girder,
            transverse_offset,
        }
    }
}

/// Immutable node and element tables.
#[derive(Clone, Debug, Default)]
pub struct GeometryModel {
    /// Nodes keyed by id.
    nodes: HashMap<NodeId, Node>,
    /// Elements keyed by id.
    elements: HashMap<ElementId, Element>,
}

impl GeometryModel {
    /// Build a model from loaded node and element tables.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::DuplicateId`] when a node or element id repeats and
    /// [`DiagramError::NotFound`] when an element references an unknown node.
    ///
    /// # Examples
    /// ```
    /// use grillagex::{point, Element, ElementId, GeometryModel, GirderId, Node, NodeId};
    ///
    /// let model = GeometryModel::new(
    ///     [
    ///         Node::new(NodeId(1), point(0.0, 0.0, 0.0)),
    ///         Node::new(NodeId(2), point(5.0, 0.0, 0.0)),
    ///     ],
    ///     [Element::new(ElementId(1), NodeId(1), NodeId(2), GirderId(1), 0.0)],
    /// )
    /// .expect("valid model");
    /// assert_eq!(model.element_length(ElementId(1)), Ok(5.0));
    /// ```
    pub fn new(
        nodes: impl IntoIterator<Item = Node>,
        elements: impl IntoIterator<Item = Element>,
    ) -> Result<Self, DiagramError> {
        let mut node_table = HashMap::new();
        for node in nodes {
            if node_table.insert(node.id, node).is_some() {
                return Err(DiagramError::DuplicateId(EntityId::Node(node.id)));
            }
        }
        let mut element_table = HashMap::new();
        for element in elements {
            for node in [element.node_a, element.node_b] {
                if !node_table.contains_key(&node) {
                    return Err(DiagramError::NotFound(EntityId::Node(node)));
                }
            }
            if element_table.insert(element.id, element).is_some() {
                return Err(DiagramError::DuplicateId(EntityId::Element(element.id)));
            }
        }
        Ok(Self {
            nodes: node_table,
            elements: element_table,
        })
    }

    /// Return the number of nodes in the model.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of elements in the model.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Coordinates of a node.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::NotFound`] when `id` is not part of the model.
    pub fn node(&self, id: NodeId) -> Result<Point, DiagramError> {
        self.nodes
            .get(&id)
            .map(|node| node.position)
            .ok_or(DiagramError::NotFound(EntityId::Node(id)))
    }

    /// Look up an element.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::NotFound`] when `id` is not part of the model.
    pub fn element(&self, id: ElementId) -> Result<&Element, DiagramError> {
        self.elements
            .get(&id)
            .ok_or(DiagramError::NotFound(EntityId::Element(id)))
    }

    /// Distance between an element's two nodes.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::NotFound`] for an unknown element and
    /// [`DiagramError::ZeroLengthElement`] when both nodes share coordinates.
    pub fn element_length(&self, id: ElementId) -> Result<f64, DiagramError> {
        let element = self.element(id)?;
        let length = self
            .node(element.node_a)?
            .distance_to(self.node(element.node_b)?);
        if length == 0.0 {
            return Err(DiagramError::ZeroLengthElement(id));
        }
        Ok(length)
    }

    /// Group elements by the girder they belong to.
    ///
    /// Both levels of the mapping are ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::NotFound`] when an id is not part of the model.
    pub fn group_by_girder(
        &self,
        elements: impl IntoIterator<Item = ElementId>,
    ) -> Result<BTreeMap<GirderId, BTreeSet<ElementId>>, DiagramError> {
        let mut groups: BTreeMap<GirderId, BTreeSet<ElementId>> = BTreeMap::new();
        for id in elements {
            let element = self.element(id)?;
            groups.entry(element.girder).or_default().insert(id);
        }
        Ok(groups)
    }

    /// Group every element of the model by girder.
    #[must_use]
    pub fn girders(&self) -> BTreeMap<GirderId, BTreeSet<ElementId>> {
        let mut groups: BTreeMap<GirderId, BTreeSet<ElementId>> = BTreeMap::new();
        for element in self.elements.values() {
            groups.entry(element.girder).or_default().insert(element.id);
        }
        groups
    }
}
