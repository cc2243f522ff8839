use tracing::{info, info_span, warn};

use crate::analysis::{AnalysisEngine, StudentAnalyzer};
use crate::engine::PredictionEngine;
use crate::error::TelemetryError;
use crate::models::{Observation, ReportStatus, StudentReport, StudentTelemetry};
use crate::normalize::normalize;
use crate::rng::WeightPolicy;
use crate::telemetry;

/// Forecasts every student in order. A failing student yields a fallback
/// report and never stops the rest of the cohort.
pub fn forecast_cohort(students: &[StudentTelemetry], policy: WeightPolicy) -> Vec<StudentReport> {
    let mut reports = Vec::with_capacity(students.len());
    let mut failures = 0usize;

    for student in students {
        let _span = info_span!("student", id = %student.student_id).entered();
        match forecast_student(student, policy) {
            Ok(report) => reports.push(report),
            Err(err) => {
                warn!(error = %err, "forecast failed, using fallback report");
                failures += 1;
                reports.push(fallback_report(student));
            }
        }
    }

    info!(
        students = students.len(),
        failures,
        policy = %policy.describe(),
        "cohort forecast complete"
    );
    reports
}

pub fn forecast_student(
    student: &StudentTelemetry,
    policy: WeightPolicy,
) -> Result<StudentReport, TelemetryError> {
    let validated = telemetry::validate(student)?;
    let (average_accuracy, total_sessions) = telemetry::summary_metrics(&validated.records);

    let mut report = StudentReport {
        student_id: student.student_id.clone(),
        display_name: student.display_name.clone(),
        status: ReportStatus::NotEnoughData,
        record_count: validated.records.len(),
        average_accuracy,
        total_sessions,
        forecast: None,
        observation: Observation::not_enough_data(),
    };

    let Some(input) = telemetry::build_input(&validated) else {
        info!(
            records = validated.records.len(),
            minimum = telemetry::MIN_RECORDS,
            "not enough data to forecast"
        );
        return Ok(report);
    };

    // Both engines live for this student only.
    let mut rng = policy.rng();
    let engine = PredictionEngine::new(&mut rng);
    let analyzer = AnalysisEngine::new(&mut rng);

    report.forecast = Some(engine.predict(&input));
    report.observation = analyzer.analyze(&normalize(&input));
    report.status = ReportStatus::Forecast;
    Ok(report)
}

/// Zeroed report for a student whose data could not be processed.
pub fn fallback_report(student: &StudentTelemetry) -> StudentReport {
    StudentReport {
        student_id: student.student_id.clone(),
        display_name: student.display_name.clone(),
        status: ReportStatus::Fallback,
        record_count: 0,
        average_accuracy: 0.0,
        total_sessions: 0,
        forecast: None,
        observation: Observation::insufficient_data(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StoredProgress, Tier};
    use chrono::{Duration, TimeZone, Utc};

    fn student(id: &str, records: usize, successes: i64) -> StudentTelemetry {
        let anchor = Utc.with_ymd_and_hms(2026, 2, 16, 9, 30, 0).unwrap();
        StudentTelemetry {
            student_id: id.to_string(),
            display_name: format!("Student {id}"),
            level: "leve".to_string(),
            dyslexia_type: "superficial".to_string(),
            has_kinesthetic: true,
            records: (0..records)
                .map(|i| StoredProgress {
                    module_id: (i % 6) as i64 + 1,
                    attempts: 6,
                    successes,
                    recorded_at: anchor - Duration::days(i as i64 * 3),
                })
                .collect(),
        }
    }

    #[test]
    fn one_bad_student_does_not_abort_the_batch() {
        let students = vec![
            student("a", 8, 4),
            student("b", 8, 9), // successes exceed attempts
            student("c", 8, 5),
        ];
        let reports = forecast_cohort(&students, WeightPolicy::Seeded(11));

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].status, ReportStatus::Forecast);
        assert_eq!(reports[1].status, ReportStatus::Fallback);
        assert_eq!(reports[2].status, ReportStatus::Forecast);

        let fallback = &reports[1];
        assert_eq!(fallback.record_count, 0);
        assert_eq!(fallback.average_accuracy, 0.0);
        assert!(fallback.forecast.is_none());
        assert_eq!(fallback.observation.narrative, "insufficient data for analysis");
        assert_eq!(fallback.observation.risk_level, Tier::Medium);
    }

    #[test]
    fn short_history_is_reported_without_forecast() {
        let reports = forecast_cohort(&[student("d", 4, 3)], WeightPolicy::Fresh);
        let report = &reports[0];
        assert_eq!(report.status, ReportStatus::NotEnoughData);
        assert_eq!(report.record_count, 4);
        assert_eq!(report.average_accuracy, 50.0);
        assert!(report.forecast.is_none());
        assert_eq!(report.observation.narrative, "not enough data");
    }

    #[test]
    fn seeded_policy_is_reproducible_across_runs() {
        let students = vec![student("e", 10, 3)];
        let first = serde_json::to_string(&forecast_cohort(&students, WeightPolicy::Seeded(99)))
            .unwrap();
        let second = serde_json::to_string(&forecast_cohort(&students, WeightPolicy::Seeded(99)))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn forecast_carries_confidence_and_observation() {
        let report = forecast_student(&student("f", 12, 6), WeightPolicy::Seeded(3)).unwrap();
        let forecast = report.forecast.expect("forecast expected");
        assert!(forecast.confidence <= 100);
        assert!(forecast.long_term.recommended_interventions.len() <= 4);
        assert!(!report.observation.recommendations.is_empty());
        assert_eq!(report.average_accuracy, 100.0);
    }
}
