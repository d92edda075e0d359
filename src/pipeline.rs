//! The run from loaded tables to renderable diagrams, one stage per function.

use log::{info, warn};
use serde::{Serialize, Serializer};

use crate::central::select_central_girder;
use crate::config::PipelineConfig;
use crate::diagram::{build_girder_diagrams, Diagram, DiagramKind};
use crate::errors::DiagramError;
use crate::forces::{ForceTable, LoadCase};
use crate::mapper::{map_to_3d, Polyline3d};
use crate::model::{GeometryModel, GirderId};
use crate::path::{resolve_girder, Girder};

/// A girder left out of the output and the reason why.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GirderFailure {
    /// Girder that failed.
    pub girder: GirderId,
    /// First error raised for the girder.
    #[serde(serialize_with = "serialize_display")]
    pub error: DiagramError,
}

/// Serialise a value through its `Display` implementation.
fn serialize_display<S: Serializer>(error: &DiagramError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Everything handed to a renderer after a run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// Girders that produced all of their diagrams, in id order.
    pub girders: Vec<Girder>,
    /// Representative girder for 2D output, chosen among every resolved girder.
    /// When its diagrams failed to build it is listed in `failures` and
    /// [`PipelineOutput::central_diagrams`] yields nothing.
    pub central: Option<GirderId>,
    /// Diagrams of every girder in `girders`.
    pub diagrams: Vec<Diagram>,
    /// 3D polylines, one per entry of `diagrams` and in the same order.
    pub polylines: Vec<Polyline3d>,
    /// Girders that were skipped.
    pub failures: Vec<GirderFailure>,
}

impl PipelineOutput {
    /// 2D diagrams of the central girder.
    pub fn central_diagrams(&self) -> impl Iterator<Item = &Diagram> {
        self.diagrams
            .iter()
            .filter(move |diagram| Some(diagram.girder) == self.central)
    }

    /// The central girder's diagram of one kind and load case.
    #[must_use]
    pub fn central_diagram(&self, kind: DiagramKind, load_case: &LoadCase) -> Option<&Diagram> {
        self.central_diagrams()
            .find(|diagram| diagram.kind == kind && &diagram.load_case == load_case)
    }

    /// Serialise the output as JSON for a renderer.
    ///
    /// # Errors
    ///
    /// Returns the serialiser error, for example on non-finite values.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Collects per-girder failures, or stops at the first one.
struct FailureLog {
    /// Whether the first failure aborts the run.
    fail_fast: bool,
    /// Failures recorded so far.
    failures: Vec<GirderFailure>,
}

impl FailureLog {
    /// Record that `girder` failed with `error`.
    fn record(&mut self, girder: GirderId, error: DiagramError) -> Result<(), DiagramError> {
        if self.fail_fast {
            return Err(error);
        }
        warn!(girder = girder.0, error = error.to_string(); "Skipping girder");
        self.failures.push(GirderFailure { girder, error });
        Ok(())
    }
}

/// Resolve every girder of the model into a chain.
///
/// # Errors
///
/// Returns the first resolution error when `fail_fast` is set.
pub fn resolve_girders(
    model: &GeometryModel,
    fail_fast: bool,
) -> Result<(Vec<Girder>, Vec<GirderFailure>), DiagramError> {
    let mut log = FailureLog {
        fail_fast,
        failures: Vec::new(),
    };
    let mut girders = Vec::new();
    for (id, elements) in model.girders() {
        match resolve_girder(model, id, elements) {
            Ok(girder) => girders.push(girder),
            Err(error) => log.record(id, error)?,
        }
    }
    Ok((girders, log.failures))
}

/// Build every requested diagram for each girder.
///
/// A girder that fails any diagram contributes none and is dropped from the
/// returned girders.
///
/// # Errors
///
/// Returns the first build error when `fail_fast` is set.
pub fn build_all_diagrams(
    model: &GeometryModel,
    girders: Vec<Girder>,
    forces: &ForceTable,
    load_cases: &[LoadCase],
    kinds: &[DiagramKind],
    fail_fast: bool,
) -> Result<(Vec<Girder>, Vec<Diagram>, Vec<GirderFailure>), DiagramError> {
    let mut log = FailureLog {
        fail_fast,
        failures: Vec::new(),
    };
    let mut kept = Vec::with_capacity(girders.len());
    let mut diagrams = Vec::new();
    for girder in girders {
        let built: Result<Vec<Vec<Diagram>>, DiagramError> = load_cases
            .iter()
            .map(|load_case| build_girder_diagrams(model, &girder, forces, load_case, kinds))
            .collect();
        match built {
            Ok(built) => {
                diagrams.extend(built.into_iter().flatten());
                kept.push(girder);
            }
            Err(error) => log.record(girder.id, error)?,
        }
    }
    Ok((kept, diagrams, log.failures))
}

/// Load cases named by the configuration, or every case in the table.
fn selected_load_cases(forces: &ForceTable, config: &PipelineConfig) -> Vec<LoadCase> {
    match &config.load_cases {
        Some(names) => names.iter().map(|name| LoadCase::new(name.as_str())).collect(),
        None => forces.load_cases().cloned().collect(),
    }
}

/// Run every stage: resolve, build, select the central girder and map to 3D.
///
/// # Errors
///
/// With `fail_fast` set, returns the first per-girder error. Otherwise failing
/// girders are listed in [`PipelineOutput::failures`] and only errors that
/// concern the run as a whole are returned.
pub fn run(
    model: &GeometryModel,
    forces: &ForceTable,
    config: &PipelineConfig,
) -> Result<PipelineOutput, DiagramError> {
    let load_cases = selected_load_cases(forces, config);
    info!(
        girders = model.girders().len(),
        load_cases = load_cases.len(),
        records = forces.len();
        "Starting diagram pipeline"
    );

    let (resolved, mut failures) = resolve_girders(model, config.fail_fast)?;
    // Missing force data must not move the central girder, so selection sees
    // every resolved girder, built or not.
    let central = select_central_girder(&resolved);
    let (girders, diagrams, build_failures) = build_all_diagrams(
        model,
        resolved,
        forces,
        &load_cases,
        &config.kinds,
        config.fail_fast,
    )?;
    failures.extend(build_failures);
    failures.sort_by_key(|failure| failure.girder);

    let polylines = map_to_3d(model, &girders, &diagrams, central, &config.mapping)?;

    info!(
        girders = girders.len(),
        diagrams = diagrams.len(),
        failures = failures.len();
        "Diagram pipeline finished"
    );

    Ok(PipelineOutput {
        girders,
        central,
        diagrams,
        polylines,
        failures,
    })
}
