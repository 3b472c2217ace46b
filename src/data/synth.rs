//! Synthetic profile generation.
//!
//! Reproducible in distribution, not bit-exact: every draw goes through the injected
//! [`RandomSource`], so a seeded source yields the same pool.

use crate::data::profile::Profile;
use crate::foundation::rng::{RandomSource, pick, pick_weighted, sample};

/// `(industry, min income, max income)`.
pub const INDUSTRIES: &[(&str, u64, u64)] = &[
    ("Technology", 70_000, 220_000),
    ("Finance", 60_000, 250_000),
    ("Healthcare", 45_000, 180_000),
    ("Education", 38_000, 95_000),
    ("Retail", 25_000, 65_000),
    ("Hospitality", 22_000, 60_000),
    ("Creative", 30_000, 120_000),
    ("Government", 45_000, 130_000),
    ("Construction", 35_000, 110_000),
    ("Logistics", 30_000, 85_000),
];

/// Job titles, chosen independently of industry.
pub const JOBS: &[&str] = &[
    "Engineer",
    "Data Scientist",
    "Designer",
    "Analyst",
    "Nurse",
    "Teacher",
    "Barista",
    "Courier",
    "Architect",
    "Accountant",
    "Chef",
    "Paralegal",
    "Producer",
    "Electrician",
    "Researcher",
    "Manager",
];

/// Mood weights.
pub const MOODS: &[(&str, u32)] = &[
    ("focused", 3),
    ("stressed", 2),
    ("curious", 3),
    ("flow", 2),
    ("burnout", 1),
    ("optimistic", 2),
    ("calm", 2),
    ("distracted", 1),
];

/// Per-mood risk adjustment; unknown moods have no bias.
pub fn mood_bias(mood: &str) -> i32 {
    match mood {
        "focused" => -5,
        "stressed" => 15,
        "curious" => -3,
        "flow" => -8,
        "burnout" => 20,
        "optimistic" => -10,
        "calm" => -12,
        "distracted" => 8,
        _ => 0,
    }
}

/// Income below this raises risk.
pub const LOW_INCOME: u64 = 40_000;
/// Income above this lowers risk.
pub const HIGH_INCOME: u64 = 150_000;

/// Combine a base draw in `[10, 90]` with income and mood adjustments, clamped to `[0, 100]`.
pub fn risk_score(base: i32, income: u64, mood: &str) -> u8 {
    let income_adj = if income < LOW_INCOME {
        10
    } else if income > HIGH_INCOME {
        -10
    } else {
        0
    };
    (base + income_adj + mood_bias(mood)).clamp(0, 100) as u8
}

/// Interest tag pool.
pub const INTERESTS: &[&str] = &[
    "chess", "jazz", "climbing", "film", "poetry", "cycling", "gaming", "cooking", "yoga",
    "astronomy", "vinyl", "running", "photography", "coding", "gardening", "anime", "tea",
    "sailing", "podcasts", "theater",
];

/// `(borough, area codes, latitude, longitude)`.
pub const BOROUGHS: &[(&str, &[&str], f64, f64)] = &[
    ("Manhattan", &["MN17", "MN24", "MN13", "MN40"], 40.7831, -73.9712),
    ("Brooklyn", &["BK09", "BK73", "BK60", "BK38"], 40.6782, -73.9442),
    ("Queens", &["QN31", "QN70", "QN20", "QN68"], 40.7282, -73.7949),
    ("Bronx", &["BX05", "BX40", "BX63"], 40.8448, -73.8648),
    ("Staten Island", &["SI22", "SI37", "SI01"], 40.5795, -74.1502),
];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bo", "Cyra", "Dev", "Eli", "Faye", "Gus", "Hana", "Ivo", "Juno", "Kai", "Lena",
    "Milo", "Nia", "Oren", "Pia", "Quinn", "Rhea", "Sol", "Tess",
];
const LAST_INITIALS: &[&str] = &["A.", "B.", "C.", "D.", "K.", "M.", "N.", "R.", "S.", "V."];
const GENDERS: &[&str] = &["female", "male", "nonbinary"];
const EDUCATION: &[&str] = &["high school", "associate", "bachelor", "master", "doctorate"];
const RELATIONSHIP: &[&str] = &["single", "partnered", "married", "divorced", "complicated"];
const ACTIVITIES: &[&str] = &[
    "commuting",
    "working",
    "scrolling",
    "gaming",
    "exercising",
    "sleeping",
    "reading",
    "shopping",
];

const WEEK_MS: u64 = 7 * 24 * 60 * 60 * 1000;

/// Generate one profile; `now_ms` anchors the last-active timestamp.
pub fn synth_profile(rng: &mut dyn RandomSource, now_ms: u64) -> Profile {
    let (industry, lo, hi) = *pick(rng, INDUSTRIES);
    let job = *pick(rng, JOBS);
    let mood = *pick_weighted(rng, MOODS);
    let income = round_to_thousand(rng.range_u64(lo, hi));
    let base = rng.range_u64(10, 90) as i32;
    let risk = risk_score(base, income, mood);

    let interest_count = rng.range_u64(2, 6) as usize;
    let interests = sample(rng, INTERESTS, interest_count)
        .into_iter()
        .map(str::to_string)
        .collect();

    let (borough, codes, lat, lon) = *pick(rng, BOROUGHS);
    let area_code = *pick(rng, codes);
    let coords = [
        lat + f64::from(rng.range_f32(-0.03, 0.03)),
        lon + f64::from(rng.range_f32(-0.03, 0.03)),
        f64::from(rng.range_f32(0.0, 120.0)).round(),
    ];

    Profile {
        id: format!("{:016x}", rng.next_u64()),
        name: format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_INITIALS)),
        age: rng.range_u64(18, 79) as u32,
        gender: pick(rng, GENDERS).to_string(),
        job: job.to_string(),
        industry: industry.to_string(),
        income,
        education: pick(rng, EDUCATION).to_string(),
        city: "New York".to_string(),
        borough: Some(borough.to_string()),
        area_code: Some(area_code.to_string()),
        relationship: pick(rng, RELATIONSHIP).to_string(),
        mood: mood.to_string(),
        activity: pick(rng, ACTIVITIES).to_string(),
        interests,
        risk,
        last_active_ms: now_ms.saturating_sub(rng.range_u64(0, WEEK_MS)),
        coords: Some(coords),
    }
}

/// Generate `count` profiles.
pub fn synth_profiles(rng: &mut dyn RandomSource, now_ms: u64, count: usize) -> Vec<Profile> {
    (0..count).map(|_| synth_profile(rng, now_ms)).collect()
}

fn round_to_thousand(v: u64) -> u64 {
    v.saturating_add(500) / 1000 * 1000
}

#[cfg(test)]
#[path = "../../tests/unit/data/synth.rs"]
mod tests;
