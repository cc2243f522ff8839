use std::fmt::Write;

use crate::models::{ReportStatus, StudentReport};
use crate::rng::WeightPolicy;

pub fn status_counts(reports: &[StudentReport]) -> [(ReportStatus, usize); 3] {
    let count = |status| reports.iter().filter(|r| r.status == status).count();
    [
        (ReportStatus::Forecast, count(ReportStatus::Forecast)),
        (ReportStatus::NotEnoughData, count(ReportStatus::NotEnoughData)),
        (ReportStatus::Fallback, count(ReportStatus::Fallback)),
    ]
}

fn status_label(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Forecast => "forecast",
        ReportStatus::NotEnoughData => "not enough data",
        ReportStatus::Fallback => "fallback",
    }
}

pub fn build_report(reports: &[StudentReport], policy: WeightPolicy) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Student Progress Forecast Report");
    let _ = writeln!(
        output,
        "Generated for {} students using {}",
        reports.len(),
        policy.describe()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Status Mix");
    for (status, count) in status_counts(reports) {
        let _ = writeln!(output, "- {}: {}", status_label(status), count);
    }

    let mut forecasts: Vec<&StudentReport> =
        reports.iter().filter(|r| r.forecast.is_some()).collect();
    forecasts.sort_by_key(|r| {
        r.forecast
            .as_ref()
            .map_or(0, |f| f.long_term.overall_success_probability)
    });

    let _ = writeln!(output);
    let _ = writeln!(output, "## Forecasts (lowest success probability first)");

    if forecasts.is_empty() {
        let _ = writeln!(output, "No students had enough data for a forecast.");
    } else {
        for report in forecasts.iter() {
            let Some(forecast) = report.forecast.as_ref() else {
                continue;
            };
            let modules = if forecast.medium_term.modules_to_complete.is_empty() {
                "none".to_string()
            } else {
                forecast
                    .medium_term
                    .modules_to_complete
                    .iter()
                    .map(|m| m.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let _ = writeln!(
                output,
                "- {}: success {}% ({}), dropout risk {}%, modules next month: {}, trajectory {}, confidence {}%",
                report.display_name,
                forecast.long_term.overall_success_probability,
                forecast.long_term.projected_outcome.as_str(),
                forecast.short_term.risk_of_dropout,
                modules,
                forecast.trends.overall_trajectory.as_str(),
                forecast.confidence
            );
            let _ = writeln!(
                output,
                "  - trends: progress {}, accuracy {}, engagement {}",
                forecast.trends.progress_trend.as_str(),
                forecast.trends.accuracy_trend.as_str(),
                forecast.trends.engagement_trend.as_str()
            );
            if forecast.medium_term.intervention_needed {
                let _ = writeln!(
                    output,
                    "  - intervention: {}",
                    forecast.long_term.recommended_interventions.join("; ")
                );
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Analysis Notes");

    if reports.is_empty() {
        let _ = writeln!(output, "No students found.");
    } else {
        for report in reports.iter() {
            let _ = writeln!(
                output,
                "- {} ({} records, accuracy {:.1}%, {} sessions): {}",
                report.display_name,
                report.record_count,
                report.average_accuracy,
                report.total_sessions,
                report.observation.narrative
            );
        }
    }

    output
}
