use crate::report::TransformReport;
use crate::transform::Direction;
use std::fmt::Write;

/// Post-run tally, optionally followed by every (path, error) pair
pub fn format_summary(direction: Direction, report: &TransformReport, details: bool) -> String {
    let mut output = String::new();

    if report.is_success() {
        let _ = writeln!(
            output,
            "All done, no errors ({} {}, {} skipped)",
            report.transformed,
            direction.past_tense().to_lowercase(),
            report.skipped
        );
        return output;
    }

    let _ = writeln!(
        output,
        "{} finished with {} error(s) ({} {}, {} skipped)",
        direction.noun(),
        report.failed(),
        report.transformed,
        direction.past_tense().to_lowercase(),
        report.skipped
    );
    if details {
        for entry in &report.errors {
            let _ = writeln!(
                output,
                "{} error: {}: {}",
                direction.noun(),
                entry.path.display(),
                entry.error
            );
        }
    } else {
        let _ = writeln!(output, "Re-run with --details to list them");
    }
    output
}

/// Single-path mode reports just the first failure
pub fn format_first_error(report: &TransformReport) -> Option<String> {
    report
        .first_error()
        .map(|e| format!("{}: {}", e.path.display(), e.error))
}
