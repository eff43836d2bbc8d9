use sqlx::PgPool;
use uuid::Uuid;

use crate::concern::{ConcernStrategy, KeywordConcernClassifier};
use crate::db;
use crate::insight;
use crate::llm::AnalysisClient;
use crate::models::{Analysis, AnalysisStatus, CheckInEntry, ConcernLevel, FeverAnswer, SleepQuality};
use crate::weather;

const SYSTEM_INSTRUCTION: &str = "You are a wellness companion reviewing one day's \
self-reported check-in. Write a short, warm overview of how the person is doing, \
point out anything worth watching, and suggest at most one gentle next step. \
You are not a doctor: never diagnose, never prescribe, and recommend professional \
care only when the entry clearly warrants it.";

const FALLBACK_OVERVIEW: &str = "Your check-in was saved, but the detailed analysis \
is unavailable right now. Today's summary is based on your answers alone.";

pub enum CheckInOutcome {
    /// Entry stored; the provisional analysis is ready for immediate display.
    Created(Analysis),
    /// An entry for this (user, date) already exists.
    Duplicate,
}

/// Two-phase analysis. The synchronous phase must hand the UI an overview
/// before this function returns; the spawned phase replaces it later with
/// the externally generated narrative, or with the fixed fallback. Exactly
/// one asynchronous write happens per check-in.
pub async fn run_check_in(
    pool: &PgPool,
    user_id: Uuid,
    entry: CheckInEntry,
) -> anyhow::Result<CheckInOutcome> {
    // Weather is best-effort context for the local insight only.
    let weather = weather::fetch_weather_summary().await;
    let provisional = provisional_analysis(&entry, weather.as_deref());

    if !db::create_entry(pool, user_id, &entry, &provisional).await? {
        return Ok(CheckInOutcome::Duplicate);
    }

    let pool = pool.clone();
    let date = entry.date;
    tokio::spawn(async move {
        let generated = match AnalysisClient::from_env() {
            Some(client) => {
                client
                    .generate(SYSTEM_INSTRUCTION, &build_prompt(&entry))
                    .await
            }
            None => Err(anyhow::anyhow!("no analysis credential configured")),
        };

        let analysis = finalize(generated, &KeywordConcernClassifier);
        if let Err(e) = db::set_analysis(&pool, user_id, date, &analysis).await {
            tracing::error!("❌ Failed to store analysis for {} on {}: {}", user_id, date, e);
        }
    });

    Ok(CheckInOutcome::Created(provisional))
}

pub fn provisional_analysis(entry: &CheckInEntry, weather: Option<&str>) -> Analysis {
    Analysis {
        status: AnalysisStatus::Provisional,
        overview: insight::build_insight(entry, weather),
        concern_level: ConcernLevel::None,
        patterns_detected: vec![],
        recommendation: None,
    }
}

/// Collapses the external call's outcome into the one analysis that gets
/// written: the generated narrative stamped with a severity, or the fixed
/// fallback. Never empty, never partial.
pub fn finalize(
    generated: anyhow::Result<String>,
    classifier: &dyn ConcernStrategy,
) -> Analysis {
    match generated {
        Ok(text) => {
            let concern_level = classifier.classify(&text);
            Analysis {
                status: AnalysisStatus::Final,
                overview: text,
                concern_level,
                patterns_detected: vec![],
                recommendation: None,
            }
        }
        Err(e) => {
            tracing::warn!("⚠️ Analysis service unavailable, using fallback: {}", e);
            Analysis {
                status: AnalysisStatus::Fallback,
                overview: FALLBACK_OVERVIEW.to_string(),
                concern_level: ConcernLevel::None,
                patterns_detected: vec![],
                recommendation: None,
            }
        }
    }
}

/// Serializes the entry for the text-generation service. Field order is
/// fixed; absent or empty answers are left out entirely.
pub fn build_prompt(entry: &CheckInEntry) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("Check-in for {}:", entry.date));
    lines.push(format!("- Energy: {}/5", entry.energy));

    let mut sleep = format!("- Sleep: {} hours", entry.sleep.hours);
    if let Some(quality) = entry.sleep.quality {
        let label = match quality {
            SleepQuality::Great => "great",
            SleepQuality::Good => "good",
            SleepQuality::Okay => "okay",
            SleepQuality::Poor => "poor",
            SleepQuality::VeryPoor => "very poor",
        };
        sleep.push_str(&format!(", quality {}", label));
    }
    lines.push(sleep);

    if entry.symptoms.none {
        lines.push("- Symptoms: none".to_string());
    } else if let Some(location) = entry.symptoms.location_label() {
        let kind = entry.symptoms.type_label().unwrap_or("discomfort");
        let mut line = format!("- Symptoms: {} in {}", kind, location.replace('_', " "));
        if let Some(intensity) = entry.symptoms.intensity {
            line.push_str(&format!(", {:?} intensity", intensity).to_lowercase());
        }
        lines.push(line);
    }

    let tags: Vec<&str> = entry
        .respiratory
        .iter()
        .map(|t| t.as_str())
        .filter(|t| *t != "none")
        .collect();
    if !tags.is_empty() {
        lines.push(format!("- Respiratory: {}", tags.join(", ")));
    }

    let fever_answer = match entry.temperature.fever {
        FeverAnswer::Yes => Some("yes"),
        FeverAnswer::Unsure => Some("unsure"),
        FeverAnswer::No => None,
    };
    if let Some(answer) = fever_answer {
        let mut line = format!("- Fever: {}", answer);
        if let Some(reading) = entry.temperature.reading {
            line.push_str(&format!(" ({}°C)", reading));
        }
        lines.push(line);
    }

    lines.push(format!("- Mood: {}/5", entry.mood));

    if let Some(appetite) = entry.appetite.as_deref() {
        if !appetite.is_empty() {
            lines.push(format!("- Appetite: {}", appetite));
        }
    }

    let mut habits: Vec<&str> = Vec::new();
    if entry.lifestyle.hydration {
        habits.push("hydrated well");
    }
    if entry.lifestyle.exercise {
        habits.push("exercised");
    }
    if entry.lifestyle.meditation {
        habits.push("meditated");
    }
    if entry.lifestyle.low_screen_time {
        habits.push("kept screen time low");
    }
    if entry.lifestyle.social {
        habits.push("spent time with others");
    }
    if !habits.is_empty() {
        lines.push(format!("- Lifestyle: {}", habits.join(", ")));
    }
    if let Some(note) = entry.lifestyle.note.as_deref() {
        if !note.is_empty() {
            lines.push(format!("- Lifestyle note: {}", note));
        }
    }

    if let Some(note) = entry.open_flag.as_deref() {
        if !note.is_empty() {
            lines.push(format!("- Anything else: {}", note));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lifestyle, Sleep, SleepQuality, Symptoms, Temperature};

    fn entry() -> CheckInEntry {
        CheckInEntry {
            date: chrono::NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            energy: 2,
            sleep: Sleep { hours: 6.5, quality: Some(SleepQuality::Poor) },
            symptoms: Symptoms {
                none: false,
                location: Some("head".to_string()),
                location_other: None,
                symptom_type: Some("ache".to_string()),
                type_other: None,
                intensity: None,
            },
            respiratory: vec![],
            temperature: Temperature { fever: FeverAnswer::No, reading: None },
            mood: 3,
            appetite: None,
            lifestyle: Lifestyle::default(),
            open_flag: None,
        }
    }

    #[test]
    fn failed_generation_becomes_the_fixed_fallback() {
        let analysis = finalize(
            Err(anyhow::anyhow!("connection refused")),
            &KeywordConcernClassifier,
        );
        assert_eq!(analysis.status, AnalysisStatus::Fallback);
        assert_eq!(analysis.overview, FALLBACK_OVERVIEW);
        assert_eq!(analysis.concern_level, ConcernLevel::None);
        assert!(analysis.patterns_detected.is_empty());
    }

    #[test]
    fn successful_generation_is_classified_and_kept_verbatim() {
        let analysis = finalize(
            Ok("Please consult a clinician about the headaches.".to_string()),
            &KeywordConcernClassifier,
        );
        assert_eq!(analysis.status, AnalysisStatus::Final);
        assert_eq!(analysis.concern_level, ConcernLevel::Moderate);
        assert_eq!(
            analysis.overview,
            "Please consult a clinician about the headaches."
        );
    }

    #[test]
    fn provisional_analysis_carries_the_local_insight() {
        let analysis = provisional_analysis(&entry(), None);
        assert_eq!(analysis.status, AnalysisStatus::Provisional);
        assert_eq!(analysis.concern_level, ConcernLevel::None);
        assert!(!analysis.overview.is_empty());
    }

    #[test]
    fn prompt_skips_absent_fields_and_keeps_order() {
        let prompt = build_prompt(&entry());
        assert!(prompt.contains("- Energy: 2/5"));
        assert!(prompt.contains("- Sleep: 6.5 hours, quality poor"));
        assert!(prompt.contains("- Symptoms: ache in head"));
        assert!(!prompt.contains("Fever"));
        assert!(!prompt.contains("Appetite"));
        assert!(!prompt.contains("Respiratory"));
        let energy_at = prompt.find("Energy").unwrap();
        let mood_at = prompt.find("Mood").unwrap();
        assert!(energy_at < mood_at);
    }

    #[test]
    fn prompt_substitutes_free_text_for_other_answers() {
        let mut e = entry();
        e.symptoms = Symptoms {
            none: false,
            location: Some("other".to_string()),
            location_other: Some("left knee".to_string()),
            symptom_type: Some("other".to_string()),
            type_other: Some("stiffness".to_string()),
            intensity: None,
        };
        let prompt = build_prompt(&e);
        assert!(prompt.contains("- Symptoms: stiffness in left knee"));
        assert!(!prompt.contains("other"));
    }

    #[test]
    fn prompt_includes_fever_reading_when_present() {
        let mut e = entry();
        e.temperature = Temperature { fever: FeverAnswer::Yes, reading: Some(38.2) };
        let prompt = build_prompt(&e);
        assert!(prompt.contains("- Fever: yes (38.2°C)"));
    }

    #[test]
    fn unsure_fever_keeps_a_defined_reading() {
        let mut e = entry();
        e.temperature = Temperature { fever: FeverAnswer::Unsure, reading: Some(37.6) };
        let prompt = build_prompt(&e);
        assert!(prompt.contains("- Fever: unsure (37.6°C)"));
    }
}
