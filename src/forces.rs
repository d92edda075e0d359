//! Precomputed element end forces and the metadata that travels with them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagram::DiagramKind;
use crate::errors::DiagramError;
use crate::model::ElementId;

/// End of a beam element, named after the element's stored node order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum End {
    /// The end at the element's first node.
    A,
    /// The end at the element's second node.
    B,
}

impl End {
    /// The opposite end of the same element.
    #[must_use]
    pub const fn opposite(self) -> End {
        match self {
            End::A => End::B,
            End::B => End::A,
        }
    }
}

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            End::A => f.write_str("A"),
            End::B => f.write_str("B"),
        }
    }
}

/// Name of a load case.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadCase(String);

impl LoadCase {
    /// Create a load case from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The load case name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoadCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LoadCase {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LoadCase {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Shear and moment at one end of one element for one load case.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceRecord {
    /// Element the forces belong to.
    pub element: ElementId,
    /// End of the element the forces act at.
    pub end: End,
    /// Load case that produced the forces.
    pub load_case: LoadCase,
    /// Shear force.
    pub shear: f64,
    /// Bending moment.
    pub moment: f64,
}

impl ForceRecord {
    /// Create a record with explicit values.
    pub fn new(
        element: ElementId,
        end: End,
        load_case: impl Into<LoadCase>,
        shear: f64,
        moment: f64,
    ) -> Self {
        Self {
            element,
            end,
            load_case: load_case.into(),
            shear,
            moment,
        }
    }

    /// The stored value plotted by a diagram of `kind`.
    #[must_use]
    pub fn value(&self, kind: DiagramKind) -> f64 {
        match kind {
            DiagramKind::Sfd => self.shear,
            DiagramKind::Bmd => self.moment,
        }
    }
}

/// Unit and sign-convention tags supplied by the loader.
///
/// The tags are opaque to this crate and copied unchanged onto every output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// Unit of the shear values.
    pub shear_unit: String,
    /// Unit of the moment values.
    pub moment_unit: String,
    /// Description of the sign convention of the stored values.
    pub sign_convention: String,
}

impl ResultMetadata {
    /// Unit tag for the values of a diagram kind.
    #[must_use]
    pub fn unit(&self, kind: DiagramKind) -> &str {
        match kind {
            DiagramKind::Sfd => &self.shear_unit,
            DiagramKind::Bmd => &self.moment_unit,
        }
    }
}

impl Default for ResultMetadata {
    fn default() -> Self {
        Self {
            shear_unit: "kN".to_owned(),
            moment_unit: "kN·m".to_owned(),
            sign_convention: "sagging-positive moment, clockwise-positive shear".to_owned(),
        }
    }
}

/// Lookup of force records by element, end and load case.
#[derive(Clone, Debug, Default)]
pub struct ForceTable {
    /// Records grouped by load case, then keyed by element end.
    cases: BTreeMap<LoadCase, HashMap<(ElementId, End), ForceRecord>>,
    /// Tags copied onto every diagram.
    metadata: ResultMetadata,
}

impl ForceTable {
    /// Build a table from loaded records.
    ///
    /// A later record for the same element, end and load case replaces an
    /// earlier one.
    pub fn new(metadata: ResultMetadata, records: impl IntoIterator<Item = ForceRecord>) -> Self {
        let mut cases: BTreeMap<LoadCase, HashMap<(ElementId, End), ForceRecord>> =
            BTreeMap::new();
        for record in records {
            cases
                .entry(record.load_case.clone())
                .or_default()
                .insert((record.element, record.end), record);
        }
        Self { cases, metadata }
    }

    /// Fetch the record for one element end.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::MissingForceData`] when no record exists.
    pub fn record(
        &self,
        element: ElementId,
        end: End,
        load_case: &LoadCase,
    ) -> Result<&ForceRecord, DiagramError> {
        self.cases
            .get(load_case)
            .and_then(|records| records.get(&(element, end)))
            .ok_or_else(|| DiagramError::MissingForceData {
                element,
                end,
                load_case: load_case.clone(),
            })
    }

    /// Every load case present in the table, in name order.
    pub fn load_cases(&self) -> impl Iterator<Item = &LoadCase> {
        self.cases.keys()
    }

    /// Unit and sign tags supplied with the records.
    #[must_use]
    pub fn metadata(&self) -> &ResultMetadata {
        &self.metadata
    }

    /// Total number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.values().map(HashMap::len).sum()
    }

    /// Whether the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A force component column as labelled by analysis result files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForceComponent {
    /// Diagram the component feeds.
    pub kind: DiagramKind,
    /// Element end the component is reported at.
    pub end: End,
}

impl ForceComponent {
    /// Recognise a component label such as `Mz_i`, `SF_J` or `MZ_I_END`.
    ///
    /// Matching ignores case. Labels without an end suffix are not accepted.
    ///
    /// # Examples
    /// ```
    /// use grillagex::{DiagramKind, End, ForceComponent};
    ///
    /// let component = ForceComponent::from_label("BM_J").expect("known label");
    /// assert_eq!(component.kind, DiagramKind::Bmd);
    /// assert_eq!(component.end, End::B);
    /// assert!(ForceComponent::from_label("Fx_i").is_none());
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        let label = label.strip_suffix("_end").unwrap_or(&label);
        let (quantity, end) = label.rsplit_once('_')?;
        let end = match end {
            "i" => End::A,
            "j" => End::B,
            _ => return None,
        };
        let kind = match quantity {
            "mz" | "bm" => DiagramKind::Bmd,
            "vy" | "sf" => DiagramKind::Sfd,
            _ => return None,
        };
        Some(Self { kind, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ForceTable {
        ForceTable::new(
            ResultMetadata::default(),
            [
                ForceRecord::new(ElementId(1), End::A, "LC1", 10.0, 0.0),
                ForceRecord::new(ElementId(1), End::B, "LC1", 10.0, 50.0),
                ForceRecord::new(ElementId(1), End::A, "LC2", 4.0, 0.0),
            ],
        )
    }

    #[test]
    fn records_are_found_by_element_end_and_case() {
        let table = table();
        let record = table
            .record(ElementId(1), End::B, &LoadCase::from("LC1"))
            .expect("record present");
        assert_eq!(record.moment, 50.0);
        assert_eq!(record.value(DiagramKind::Sfd), 10.0);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn missing_record_is_reported_with_its_key() {
        let table = table();
        let error = table
            .record(ElementId(1), End::B, &LoadCase::from("LC2"))
            .expect_err("no end B record for LC2");
        assert_eq!(
            error,
            DiagramError::MissingForceData {
                element: ElementId(1),
                end: End::B,
                load_case: LoadCase::from("LC2"),
            }
        );
    }

    #[test]
    fn load_cases_are_listed_in_name_order() {
        let table = table();
        let cases: Vec<&str> = table.load_cases().map(LoadCase::as_str).collect();
        assert_eq!(cases, ["LC1", "LC2"]);
    }

    #[test]
    fn later_record_replaces_earlier_one() {
        let table = ForceTable::new(
            ResultMetadata::default(),
            [
                ForceRecord::new(ElementId(7), End::A, "LC1", 1.0, 1.0),
                ForceRecord::new(ElementId(7), End::A, "LC1", 2.0, 2.0),
            ],
        );
        assert_eq!(table.len(), 1);
        let record = table
            .record(ElementId(7), End::A, &LoadCase::from("LC1"))
            .expect("record present");
        assert_eq!(record.shear, 2.0);
    }

    #[test]
    fn component_labels_cover_known_aliases() {
        let cases = [
            ("Mz_i", DiagramKind::Bmd, End::A),
            ("MZ_J", DiagramKind::Bmd, End::B),
            ("MZ_I_END", DiagramKind::Bmd, End::A),
            ("BM_J", DiagramKind::Bmd, End::B),
            ("Vy_j", DiagramKind::Sfd, End::B),
            ("VY_I", DiagramKind::Sfd, End::A),
            ("SF_I", DiagramKind::Sfd, End::A),
        ];
        for (label, kind, end) in cases {
            assert_eq!(
                ForceComponent::from_label(label),
                Some(ForceComponent { kind, end }),
                "{label}"
            );
        }
        assert_eq!(ForceComponent::from_label("Mz"), None);
        assert_eq!(ForceComponent::from_label("Vy_k"), None);
    }

    #[test]
    fn end_opposite_flips() {
        assert_eq!(End::A.opposite(), End::B);
        assert_eq!(End::B.opposite(), End::A);
    }
}
