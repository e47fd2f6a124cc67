//! Human-readable rendering of feasibility reports.

use solarsite_agents::{AssessmentRequest, FeasibilityReport};
use solarsite_core::ScoreBasis;

const RULE_WIDTH: usize = 60;

/// Print what is about to be assessed.
pub fn print_assessment_banner(request: &AssessmentRequest) {
    println!();
    println!("SOLAR FEASIBILITY ASSESSMENT");
    println!("Address: {}", request.address);
    println!("System: {}, {} panels", request.system_size, request.panel_count);
    println!("{}", "=".repeat(50));
}

/// Print the summary card for a finished report.
pub fn print_report(report: &FeasibilityReport) {
    print!("{}", render_report(report));
}

pub fn render_report(report: &FeasibilityReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push('\n');
    out.push_str(&rule);
    out.push_str("\nFINAL FEASIBILITY REPORT\n");
    out.push_str(&rule);
    out.push('\n');

    field(&mut out, "Address:", &report.address);
    field(&mut out, "System:", &report.system_specs);
    field(
        &mut out,
        "Overall Score:",
        &format!("{:.1}/100", report.feasibility_score),
    );
    field(&mut out, "Decision:", report.decision.as_str());
    field(&mut out, "Risk Level:", report.risk_level.as_str());

    // Flag flat defaults; they look exactly like a computed 60.
    for (label, basis) in [
        ("Permitting basis:", &report.breakdown.permitting_basis),
        ("Research basis:", &report.breakdown.research_basis),
    ] {
        if let ScoreBasis::Fallback { reason } = basis {
            field(&mut out, label, &format!("fallback ({reason})"));
        }
    }

    out.push_str("\nJustification:\n");
    out.push_str(&report.justification);
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out
}

/// The report as pretty JSON, the only thing `--json` writes to stdout.
pub fn render_json(report: &FeasibilityReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

fn field(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("{label:<18} {value}\n"));
}
