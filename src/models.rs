use serde::{ Serialize, Deserialize };
use uuid::Uuid;
use chrono::{NaiveDate, DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepQuality {
    Great,
    Good,
    Okay,
    Poor,
    VeryPoor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sleep {
    pub hours: f64,
    pub quality: Option<SleepQuality>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomIntensity {
    Mild,
    Moderate,
    Severe,
}

/// Either "no symptoms today" or one reported symptom. The free-text
/// overrides apply when location/type was answered as "other".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symptoms {
    #[serde(default)]
    pub none: bool,
    pub location: Option<String>,
    pub location_other: Option<String>,
    #[serde(rename = "type")]
    pub symptom_type: Option<String>,
    pub type_other: Option<String>,
    pub intensity: Option<SymptomIntensity>,
}

impl Symptoms {
    /// The free-text answer wins when the location picker said "other".
    pub fn location_label(&self) -> Option<&str> {
        match self.location.as_deref() {
            Some("other") => Some(self.location_other.as_deref().unwrap_or("other")),
            other => other,
        }
    }

    /// Same override rule for the symptom type.
    pub fn type_label(&self) -> Option<&str> {
        match self.symptom_type.as_deref() {
            Some("other") => Some(self.type_other.as_deref().unwrap_or("other")),
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeverAnswer {
    Yes,
    No,
    Unsure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Temperature {
    pub fever: FeverAnswer,
    pub reading: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lifestyle {
    #[serde(default)]
    pub hydration: bool,
    #[serde(default)]
    pub exercise: bool,
    #[serde(default)]
    pub meditation: bool,
    #[serde(default)]
    pub low_screen_time: bool,
    #[serde(default)]
    pub social: bool,
    pub note: Option<String>,
}

/// One day's structured check-in answers. Immutable once created; only the
/// attached analysis is patched later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInEntry {
    pub date: NaiveDate,
    pub energy: i32,
    pub sleep: Sleep,
    pub symptoms: Symptoms,
    #[serde(default)]
    pub respiratory: Vec<String>,
    pub temperature: Temperature,
    pub mood: i32,
    pub appetite: Option<String>,
    pub lifestyle: Lifestyle,
    pub open_flag: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcernLevel {
    None,
    Low,
    Moderate,
    High,
}

/// Lifecycle tag for an entry's analysis, so readers can tell the fast local
/// overview apart from the externally generated one without relying on timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Provisional,
    Final,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub status: AnalysisStatus,
    pub overview: String,
    pub concern_level: ConcernLevel,
    #[serde(default)]
    pub patterns_detected: Vec<String>,
    pub recommendation: Option<String>,
}

/// Per-user checkup nudge record, persisted as a single JSON row.
/// `count` only comes back down through an explicit "completed" response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NudgeState {
    pub count: u32,
    pub last_nudge_date: Option<NaiveDate>,
    pub last_checkup_date: Option<NaiveDate>,
    pub dismissed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

/// Derived from the consistency streak, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct LoyaltyProfile {
    pub streak_days: u32,
    pub tier: LoyaltyTier,
    pub base_discount: u32,
    pub streak_bonus: u32,
    pub total_discount: u32,
}

#[derive(Debug, Serialize)]
pub struct StoredEntry {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub entry: CheckInEntry,
    pub analysis: Option<Analysis>,
    pub created_at: DateTime<Utc>,
}
