use crate::models::{CheckInEntry, FeverAnswer, SleepQuality};

/// Builds the fast local overview for one day's entry. An ordered set of
/// independent rules, each looking at one field group and contributing at
/// most one sentence. Rule order is fixed and the output is deterministic;
/// the UI test fixtures depend on the exact wording.
pub fn build_insight(entry: &CheckInEntry, weather: Option<&str>) -> String {
    let mut sentences: Vec<String> = Vec::new();

    if entry.energy <= 2 {
        sentences.push(
            "Your energy is on the lower side today, so be kind to yourself and avoid overcommitting.".to_string(),
        );
    } else if entry.energy >= 4 {
        sentences.push("You're bringing great energy into the day.".to_string());
    }

    match entry.sleep.quality {
        Some(SleepQuality::Poor) => sentences.push(
            "Last night's sleep was poor; an earlier wind-down tonight could help you recover.".to_string(),
        ),
        Some(SleepQuality::Good) => sentences.push(format!(
            "A good night of around {} hours of sleep is working in your favor.",
            entry.sleep.hours
        )),
        _ => {}
    }

    if entry.mood <= 2 {
        sentences.push(
            "Your mood seems low today; reaching out to someone you trust can make a difference.".to_string(),
        );
    }

    if !entry.symptoms.none {
        if let Some(location) = entry.symptoms.location_label() {
            let location = location.replace('_', " ");
            let kind = entry.symptoms.type_label().unwrap_or("discomfort");
            let intensity = entry
                .symptoms
                .intensity
                .map(|i| format!("{:?}", i).to_lowercase())
                .unwrap_or_else(|| "unspecified".to_string());
            sentences.push(format!(
                "You reported {} in your {} at {} intensity; keep an eye on how it develops.",
                kind, location, intensity
            ));
        }
    }

    let tags: Vec<&str> = entry
        .respiratory
        .iter()
        .map(|t| t.as_str())
        .filter(|t| *t != "none")
        .collect();
    if !tags.is_empty() {
        sentences.push(format!(
            "Respiratory symptoms ({}) are worth monitoring, especially if they persist.",
            tags.join(", ")
        ));
    }

    match entry.temperature.fever {
        FeverAnswer::Yes => sentences.push(
            "With a fever present, prioritize rest and plenty of fluids today.".to_string(),
        ),
        FeverAnswer::Unsure => sentences.push(
            "You're unsure about a fever, so it may be worth taking your temperature later.".to_string(),
        ),
        FeverAnswer::No => {}
    }

    // Known gap: hydration without exercise produces no sentence. The app has
    // always behaved this way and downstream copy reviews assume it.
    if !entry.lifestyle.hydration && !entry.lifestyle.exercise {
        sentences.push(
            "A glass of water and a short walk could give today a gentle lift.".to_string(),
        );
    } else if entry.lifestyle.exercise {
        sentences.push("Nice work fitting movement into your day.".to_string());
    }

    if let Some(weather) = weather {
        sentences.push(format!("Today's weather: {}.", weather));
    }

    if sentences.is_empty() {
        return "Everything in today's check-in looks steady. Keep up the habits that are working for you.".to_string();
    }

    sentences.push("Small consistent steps add up; see you at tomorrow's check-in.".to_string());
    sentences.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lifestyle, Sleep, SymptomIntensity, Symptoms, Temperature};

    fn neutral_entry() -> CheckInEntry {
        CheckInEntry {
            date: chrono::NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            energy: 3,
            sleep: Sleep { hours: 7.0, quality: None },
            symptoms: Symptoms {
                none: true,
                location: None,
                location_other: None,
                symptom_type: None,
                type_other: None,
                intensity: None,
            },
            respiratory: vec![],
            temperature: Temperature { fever: FeverAnswer::No, reading: None },
            mood: 3,
            appetite: None,
            lifestyle: Lifestyle {
                hydration: true,
                exercise: false,
                ..Default::default()
            },
            open_flag: None,
        }
    }

    #[test]
    fn output_is_deterministic() {
        let mut entry = neutral_entry();
        entry.energy = 1;
        entry.temperature.fever = FeverAnswer::Yes;
        let a = build_insight(&entry, Some("light rain, 12°C"));
        let b = build_insight(&entry, Some("light rain, 12°C"));
        assert_eq!(a, b);
    }

    #[test]
    fn fully_neutral_entry_gets_the_two_sentence_fallback() {
        let entry = neutral_entry();
        let out = build_insight(&entry, None);
        assert_eq!(
            out,
            "Everything in today's check-in looks steady. Keep up the habits that are working for you."
        );
    }

    #[test]
    fn energy_sentence_comes_before_fever_sentence() {
        let mut entry = neutral_entry();
        entry.energy = 2;
        entry.temperature.fever = FeverAnswer::Yes;
        let out = build_insight(&entry, None);
        let energy_at = out.find("energy is on the lower side").unwrap();
        let fever_at = out.find("fever present").unwrap();
        assert!(energy_at < fever_at);
    }

    #[test]
    fn matched_rules_get_a_closing_sentence() {
        let mut entry = neutral_entry();
        entry.energy = 5;
        let out = build_insight(&entry, None);
        assert!(out.ends_with("see you at tomorrow's check-in."));
    }

    #[test]
    fn symptom_without_type_reads_as_discomfort_and_location_is_normalized() {
        let mut entry = neutral_entry();
        entry.symptoms = Symptoms {
            none: false,
            location: Some("lower_back".to_string()),
            location_other: None,
            symptom_type: None,
            type_other: None,
            intensity: Some(SymptomIntensity::Moderate),
        };
        let out = build_insight(&entry, None);
        assert!(out.contains("discomfort in your lower back at moderate intensity"));
    }

    #[test]
    fn other_answers_are_replaced_by_their_free_text() {
        let mut entry = neutral_entry();
        entry.symptoms = Symptoms {
            none: false,
            location: Some("other".to_string()),
            location_other: Some("left knee".to_string()),
            symptom_type: Some("other".to_string()),
            type_other: Some("stiffness".to_string()),
            intensity: Some(SymptomIntensity::Mild),
        };
        let out = build_insight(&entry, None);
        assert!(out.contains("stiffness in your left knee at mild intensity"));
        assert!(!out.contains("in your other"));
    }

    #[test]
    fn other_answer_without_free_text_stays_as_other() {
        let mut entry = neutral_entry();
        entry.symptoms = Symptoms {
            none: false,
            location: Some("other".to_string()),
            location_other: None,
            symptom_type: None,
            type_other: None,
            intensity: Some(SymptomIntensity::Mild),
        };
        let out = build_insight(&entry, None);
        assert!(out.contains("discomfort in your other at mild intensity"));
    }

    #[test]
    fn symptom_without_location_degrades_to_no_sentence() {
        let mut entry = neutral_entry();
        entry.symptoms = Symptoms {
            none: false,
            location: None,
            location_other: None,
            symptom_type: Some("ache".to_string()),
            type_other: None,
            intensity: Some(SymptomIntensity::Mild),
        };
        let out = build_insight(&entry, None);
        assert!(!out.contains("ache"));
    }

    #[test]
    fn respiratory_none_tag_alone_is_ignored() {
        let mut entry = neutral_entry();
        entry.respiratory = vec!["none".to_string()];
        let out = build_insight(&entry, None);
        assert!(!out.contains("Respiratory"));
    }

    #[test]
    fn respiratory_tags_are_comma_joined() {
        let mut entry = neutral_entry();
        entry.respiratory = vec!["cough".to_string(), "sore throat".to_string()];
        let out = build_insight(&entry, None);
        assert!(out.contains("Respiratory symptoms (cough, sore throat)"));
    }

    #[test]
    fn weather_is_echoed_last_before_closing() {
        let mut entry = neutral_entry();
        entry.energy = 4;
        let out = build_insight(&entry, Some("clear sky, 21°C"));
        assert!(out.contains("Today's weather: clear sky, 21°C."));
        let weather_at = out.find("Today's weather").unwrap();
        let closing_at = out.find("Small consistent steps").unwrap();
        assert!(weather_at < closing_at);
    }

    // Known gap, kept on purpose: hydration without exercise says nothing
    // about lifestyle, while the neither-case and the exercise-case both do.
    #[test]
    fn hydration_without_exercise_produces_no_lifestyle_sentence() {
        let entry = neutral_entry();
        let out = build_insight(&entry, None);
        assert!(!out.contains("glass of water"));
        assert!(!out.contains("movement"));
    }

    #[test]
    fn no_hydration_and_no_exercise_gets_the_gentle_sentence() {
        let mut entry = neutral_entry();
        entry.lifestyle.hydration = false;
        let out = build_insight(&entry, None);
        assert!(out.contains("A glass of water and a short walk"));
    }
}
