use chrono::NaiveDate;

use crate::models::{LoyaltyProfile, LoyaltyTier};

const STREAK_BONUS_CAP: u32 = 10;

/// Tier table keyed by streak length in weeks.
pub fn tier_for_streak(streak_days: u32) -> LoyaltyTier {
    let weeks = streak_days / 7;
    match weeks {
        0..=3 => LoyaltyTier::Bronze,
        4..=11 => LoyaltyTier::Silver,
        12..=23 => LoyaltyTier::Gold,
        _ => LoyaltyTier::Platinum,
    }
}

pub fn base_discount(tier: LoyaltyTier) -> u32 {
    match tier {
        LoyaltyTier::Bronze => 5,
        LoyaltyTier::Silver => 10,
        LoyaltyTier::Gold => 15,
        LoyaltyTier::Platinum => 20,
    }
}

/// One extra percentage point per three streak days, capped.
pub fn streak_bonus(streak_days: u32) -> u32 {
    (streak_days / 3).min(STREAK_BONUS_CAP)
}

pub fn loyalty_profile(streak_days: u32) -> LoyaltyProfile {
    let tier = tier_for_streak(streak_days);
    let base = base_discount(tier);
    let bonus = streak_bonus(streak_days);
    LoyaltyProfile {
        streak_days,
        tier,
        base_discount: base,
        streak_bonus: bonus,
        total_discount: base + bonus,
    }
}

/// Consecutive days with a completed entry, counted from the newest one.
/// Today's entry may still be pending, so a run ending yesterday counts.
pub fn current_streak(dates_newest_first: &[NaiveDate], today: NaiveDate) -> u32 {
    let Some(&newest) = dates_newest_first.first() else {
        return 0;
    };
    // Future-dated entries never seed a streak; create never rejects them.
    if !(0..=1).contains(&(today - newest).num_days()) {
        return 0;
    }

    let mut streak = 1u32;
    let mut previous = newest;
    for &date in &dates_newest_first[1..] {
        if (previous - date).num_days() == 1 {
            streak += 1;
            previous = date;
        } else {
            break;
        }
    }
    streak
}
