use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProfileParseError;

pub const MODULE_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DyslexiaLevel {
    Leve,
    Moderado,
    Severo,
}

impl DyslexiaLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DyslexiaLevel::Leve => "leve",
            DyslexiaLevel::Moderado => "moderado",
            DyslexiaLevel::Severo => "severo",
        }
    }
}

impl FromStr for DyslexiaLevel {
    type Err = ProfileParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "leve" => Ok(DyslexiaLevel::Leve),
            "moderado" => Ok(DyslexiaLevel::Moderado),
            "severo" => Ok(DyslexiaLevel::Severo),
            _ => Err(ProfileParseError {
                kind: "level",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DyslexiaType {
    Fonologica,
    Superficial,
    Mixta,
    Kinestesica,
}

impl DyslexiaType {
    pub fn as_str(self) -> &'static str {
        match self {
            DyslexiaType::Fonologica => "fonologica",
            DyslexiaType::Superficial => "superficial",
            DyslexiaType::Mixta => "mixta",
            DyslexiaType::Kinestesica => "kinestesica",
        }
    }

    /// The fixed intervention text recommended for every student of this type.
    pub fn strategy(self) -> &'static str {
        match self {
            DyslexiaType::Fonologica => "phonological awareness drills with sound-letter mapping",
            DyslexiaType::Superficial => "visual word recognition practice with high-frequency words",
            DyslexiaType::Mixta => "combined phonological and visual reinforcement plan",
            DyslexiaType::Kinestesica => "multisensory activities with movement and tactile letters",
        }
    }
}

impl FromStr for DyslexiaType {
    type Err = ProfileParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fonologica" => Ok(DyslexiaType::Fonologica),
            "superficial" => Ok(DyslexiaType::Superficial),
            "mixta" => Ok(DyslexiaType::Mixta),
            "kinestesica" => Ok(DyslexiaType::Kinestesica),
            _ => Err(ProfileParseError {
                kind: "type",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DyslexiaProfile {
    pub level: DyslexiaLevel,
    #[serde(rename = "type")]
    pub kind: DyslexiaType,
    pub has_kinesthetic: bool,
}

/// Aggregated telemetry handed to the engine. Short sequences are zero-padded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionInput {
    pub student_id: String,
    #[serde(default)]
    pub current_progress: Vec<f64>,
    #[serde(default)]
    pub accuracy_trends: Vec<f64>,
    #[serde(default)]
    pub session_frequency: Vec<f64>,
    #[serde(default)]
    pub motivation_indicators: Vec<f64>,
    pub dyslexia_profile: DyslexiaProfile,
}

/// One module-attempt aggregate after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProgressRecord {
    pub module_id: u8,
    pub attempts: u32,
    pub successes: u32,
    pub recorded_at: DateTime<Utc>,
}

/// A progress row exactly as storage returned it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProgress {
    pub module_id: i64,
    pub attempts: i64,
    pub successes: i64,
    pub recorded_at: DateTime<Utc>,
}

/// One student's unvalidated history.
#[derive(Debug, Clone)]
pub struct StudentTelemetry {
    pub student_id: String,
    pub display_name: String,
    pub level: String,
    pub dyslexia_type: String,
    pub has_kinesthetic: bool,
    pub records: Vec<StoredProgress>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Worsening,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trajectory {
    Positive,
    Neutral,
    Concerning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectedOutcome {
    Excellent,
    Good,
    Fair,
    Concerning,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Worsening => "worsening",
        }
    }
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
        }
    }
}

impl Trajectory {
    pub fn as_str(self) -> &'static str {
        match self {
            Trajectory::Positive => "positive",
            Trajectory::Neutral => "neutral",
            Trajectory::Concerning => "concerning",
        }
    }
}

impl ProjectedOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectedOutcome::Excellent => "excellent",
            ProjectedOutcome::Good => "good",
            ProjectedOutcome::Fair => "fair",
            ProjectedOutcome::Concerning => "concerning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortTermForecast {
    pub expected_progress: u32,
    pub expected_accuracy: u32,
    pub risk_of_dropout: u32,
    pub timeframe: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediumTermForecast {
    pub modules_to_complete: Vec<u8>,
    pub estimated_completion_time: u32,
    pub intervention_needed: bool,
    pub timeframe: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTermForecast {
    pub overall_success_probability: u32,
    pub recommended_interventions: Vec<String>,
    pub projected_outcome: ProjectedOutcome,
    pub timeframe: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    pub progress_trend: Trend,
    pub accuracy_trend: Trend,
    pub engagement_trend: Tier,
    pub overall_trajectory: Trajectory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub short_term: ShortTermForecast,
    pub medium_term: MediumTermForecast,
    pub long_term: LongTermForecast,
    pub trends: TrendSummary,
    pub confidence: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLabel {
    Excellent,
    Good,
    NeedsImprovement,
    Struggling,
}

impl PerformanceLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            PerformanceLabel::Excellent => "excellent",
            PerformanceLabel::Good => "good",
            PerformanceLabel::NeedsImprovement => "needs improvement",
            PerformanceLabel::Struggling => "struggling",
        }
    }
}

/// Qualitative output of the student analysis engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub overall_performance: PerformanceLabel,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk_level: Tier,
    pub motivation_level: Tier,
    pub narrative: String,
}

impl Observation {
    fn placeholder(narrative: &str) -> Self {
        Self {
            overall_performance: PerformanceLabel::NeedsImprovement,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            recommendations: Vec::new(),
            risk_level: Tier::Medium,
            motivation_level: Tier::Medium,
            narrative: narrative.to_string(),
        }
    }

    /// Neutral observation used when a student's processing failed.
    pub fn insufficient_data() -> Self {
        Self::placeholder("insufficient data for analysis")
    }

    /// Observation for students below the minimum record count.
    pub fn not_enough_data() -> Self {
        Self::placeholder("not enough data")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Forecast,
    NotEnoughData,
    Fallback,
}

/// Per-student outcome of a cohort run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentReport {
    pub student_id: String,
    pub display_name: String,
    pub status: ReportStatus,
    pub record_count: usize,
    pub average_accuracy: f64,
    pub total_sessions: usize,
    pub forecast: Option<PredictionResult>,
    pub observation: Observation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_tokens_parse_case_insensitively() {
        assert_eq!("Moderado".parse::<DyslexiaLevel>(), Ok(DyslexiaLevel::Moderado));
        assert_eq!(" mixta ".parse::<DyslexiaType>(), Ok(DyslexiaType::Mixta));
    }

    #[test]
    fn unknown_profile_token_is_rejected() {
        let err = "grave".parse::<DyslexiaLevel>().unwrap_err();
        assert_eq!(err.kind, "level");
        assert_eq!(err.to_string(), "unknown dyslexia level 'grave'");
    }

    #[test]
    fn prediction_input_reads_camel_case_json() {
        let json = r#"{
            "studentId": "s-1",
            "currentProgress": [80, 60],
            "accuracyTrends": [70],
            "dyslexiaProfile": {"level": "severo", "type": "kinestesica", "hasKinesthetic": true}
        }"#;
        let input: PredictionInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.current_progress, vec![80.0, 60.0]);
        assert!(input.session_frequency.is_empty());
        assert_eq!(input.dyslexia_profile.kind, DyslexiaType::Kinestesica);
        assert!(input.dyslexia_profile.has_kinesthetic);
    }
}
