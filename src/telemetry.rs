//! Turns stored progress history into engine input.
//!
//! Weekly windows are anchored on the student's most recent record so that
//! the same history always yields the same input.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::TelemetryError;
use crate::models::{
    DyslexiaProfile, PredictionInput, RawProgressRecord, StoredProgress, StudentTelemetry,
    MODULE_COUNT,
};

/// Students with fewer records are not forecast.
pub const MIN_RECORDS: usize = 5;
/// Successful exercises that mark a module as complete.
pub const MODULE_TARGET_SUCCESSES: f64 = 20.0;
pub const WEEKS: usize = 4;

/// A student's history after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTelemetry {
    pub student_id: String,
    pub profile: DyslexiaProfile,
    pub records: Vec<RawProgressRecord>,
}

fn count(field: &'static str, value: i64) -> Result<u32, TelemetryError> {
    u32::try_from(value).map_err(|_| TelemetryError::NegativeCount { field, value })
}

pub fn validate_record(row: &StoredProgress) -> Result<RawProgressRecord, TelemetryError> {
    if !(1..=MODULE_COUNT as i64).contains(&row.module_id) {
        return Err(TelemetryError::InvalidModule(row.module_id));
    }
    let module_id = row.module_id as u8;
    let attempts = count("attempts", row.attempts)?;
    let successes = count("successes", row.successes)?;
    if successes > attempts {
        return Err(TelemetryError::SuccessesExceedAttempts {
            module: module_id,
            attempts,
            successes,
        });
    }
    Ok(RawProgressRecord {
        module_id,
        attempts,
        successes,
        recorded_at: row.recorded_at,
    })
}

pub fn validate(student: &StudentTelemetry) -> Result<ValidatedTelemetry, TelemetryError> {
    let profile = DyslexiaProfile {
        level: student.level.parse()?,
        kind: student.dyslexia_type.parse()?,
        has_kinesthetic: student.has_kinesthetic,
    };
    let records = student
        .records
        .iter()
        .map(validate_record)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedTelemetry {
        student_id: student.student_id.clone(),
        profile,
        records,
    })
}

/// Applies the minimum-record gate before aggregating.
pub fn build_input(telemetry: &ValidatedTelemetry) -> Option<PredictionInput> {
    if telemetry.records.len() < MIN_RECORDS {
        return None;
    }
    Some(aggregate(telemetry))
}

fn ratio_percent(successes: u64, attempts: u64) -> f64 {
    if attempts == 0 {
        0.0
    } else {
        successes as f64 * 100.0 / attempts as f64
    }
}

/// Week slot of a record, 0 = oldest and `WEEKS - 1` = the week ending at `as_of`.
fn week_slot(as_of: DateTime<Utc>, at: DateTime<Utc>) -> Option<usize> {
    let age_days = (as_of - at).num_days();
    if age_days < 0 {
        return None;
    }
    let weeks_ago = (age_days / 7) as usize;
    (weeks_ago < WEEKS).then(|| WEEKS - 1 - weeks_ago)
}

pub fn aggregate(telemetry: &ValidatedTelemetry) -> PredictionInput {
    let records = &telemetry.records;

    let mut module_successes = [0u64; MODULE_COUNT];
    let mut modules_touched = BTreeSet::new();
    for record in records {
        let index = usize::from(record.module_id - 1);
        module_successes[index] += u64::from(record.successes);
        modules_touched.insert(record.module_id);
    }
    let current_progress = module_successes
        .iter()
        .map(|&s| (s as f64 * 100.0 / MODULE_TARGET_SUCCESSES).min(100.0))
        .collect();

    let mut weekly_attempts = [0u64; WEEKS];
    let mut weekly_successes = [0u64; WEEKS];
    let mut weekly_sessions = [0usize; WEEKS];
    if let Some(as_of) = records.iter().map(|r| r.recorded_at).max() {
        for record in records {
            if let Some(slot) = week_slot(as_of, record.recorded_at) {
                weekly_attempts[slot] += u64::from(record.attempts);
                weekly_successes[slot] += u64::from(record.successes);
                weekly_sessions[slot] += 1;
            }
        }
    }
    let accuracy_trends: Vec<f64> = (0..WEEKS)
        .map(|w| ratio_percent(weekly_successes[w], weekly_attempts[w]))
        .collect();
    let session_frequency = weekly_sessions.iter().map(|&n| n as f64).collect();

    let active_weeks = weekly_sessions.iter().filter(|&&n| n > 0).count();
    let consistency = active_weeks as f64 * 100.0 / WEEKS as f64;
    let breadth = modules_touched.len() as f64 * 100.0 / MODULE_COUNT as f64;
    let momentum = if records.is_empty() {
        0.0
    } else {
        (50.0 + accuracy_trends[WEEKS - 1] - accuracy_trends[0]).clamp(0.0, 100.0)
    };

    PredictionInput {
        student_id: telemetry.student_id.clone(),
        current_progress,
        accuracy_trends,
        session_frequency,
        motivation_indicators: vec![consistency, breadth, momentum],
        dyslexia_profile: telemetry.profile,
    }
}

/// Overall accuracy percentage and number of sessions.
pub fn summary_metrics(records: &[RawProgressRecord]) -> (f64, usize) {
    let attempts: u64 = records.iter().map(|r| u64::from(r.attempts)).sum();
    let successes: u64 = records.iter().map(|r| u64::from(r.successes)).sum();
    (ratio_percent(successes, attempts), records.len())
}

/// One line of a progress export.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressRow {
    pub email: String,
    pub full_name: String,
    pub level: String,
    pub dyslexia_type: String,
    pub has_kinesthetic: bool,
    pub module_id: i64,
    pub attempts: i64,
    pub successes: i64,
    pub recorded_at: DateTime<Utc>,
    pub source_key: Option<String>,
}

pub fn read_csv(path: &Path) -> anyhow::Result<Vec<ProgressRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut rows = Vec::new();
    for (line, result) in reader.deserialize::<ProgressRow>().enumerate() {
        let row = result
            .with_context(|| format!("invalid row {} in {}", line + 1, path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Groups rows per student email, keeping first-seen order.
pub fn group_rows(rows: Vec<ProgressRow>) -> Vec<StudentTelemetry> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut students: Vec<StudentTelemetry> = Vec::new();

    for row in rows {
        let position = *index.entry(row.email.clone()).or_insert_with(|| {
            students.push(StudentTelemetry {
                student_id: row.email.clone(),
                display_name: row.full_name.clone(),
                level: row.level.clone(),
                dyslexia_type: row.dyslexia_type.clone(),
                has_kinesthetic: row.has_kinesthetic,
                records: Vec::new(),
            });
            students.len() - 1
        });
        students[position].records.push(StoredProgress {
            module_id: row.module_id,
            attempts: row.attempts,
            successes: row.successes,
            recorded_at: row.recorded_at,
        });
    }

    students
}

pub fn load_csv(path: &Path) -> anyhow::Result<Vec<StudentTelemetry>> {
    Ok(group_rows(read_csv(path)?))
}
