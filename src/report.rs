use grillagex::PipelineOutput;
use std::fmt::Write;

/// Render a textual summary of a pipeline run.
///
/// The central girder's diagrams are listed point by point so the numbers can
/// be checked against hand calculations, see
/// <https://en.wikipedia.org/wiki/Shear_and_moment_diagram>.
#[must_use]
pub fn render_summary(output: &PipelineOutput) -> String {
    let mut report = String::new();

    writeln!(
        &mut report,
        "Grillage diagrams: {} girder(s) built, {} skipped",
        output.girders.len(),
        output.failures.len()
    )
    .expect("writing to string cannot fail");

    let central = output
        .central
        .map_or_else(|| "none".to_owned(), |girder| girder.to_string());
    writeln!(&mut report, "Central girder: {central}").expect("writing to string cannot fail");

    for diagram in output.central_diagrams() {
        writeln!(
            &mut report,
            "\n{} ({}) for load case {} [{}]",
            diagram.kind.quantity(),
            diagram.kind,
            diagram.load_case,
            diagram.metadata.unit
        )
        .expect("writing to string cannot fail");
        for point in &diagram.points {
            writeln!(
                &mut report,
                "  x = {:>7.2} m  {:>+10.2}",
                point.position, point.value
            )
            .expect("writing to string cannot fail");
        }
        if let Some((low, high)) = diagram.value_range() {
            writeln!(
                &mut report,
                "  range: {low:.2} to {high:.2} {}",
                diagram.metadata.unit
            )
            .expect("writing to string cannot fail");
        }
    }

    // Only counts for the 3D output; a renderer consumes the points themselves.
    let points: usize = output
        .polylines
        .iter()
        .map(|polyline| polyline.points.len())
        .sum();
    writeln!(
        &mut report,
        "\n3D output: {} polyline(s), {points} point(s)",
        output.polylines.len()
    )
    .expect("writing to string cannot fail");

    for failure in &output.failures {
        writeln!(
            &mut report,
            "Skipped girder {}: {}",
            failure.girder, failure.error
        )
        .expect("writing to string cannot fail");
    }

    report
}
