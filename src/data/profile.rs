use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::foundation::math::Fnv1a64;

/// Placeholder used for missing categorical fields.
pub const UNKNOWN: &str = "unknown";

/// Maximum number of interest tags kept on a profile.
pub const MAX_INTERESTS: usize = 6;

/// One simulated or sourced person, consumed only as display data.
///
/// Produced either by the synthetic generator or by [`Profile::from_record`]; both paths apply
/// the documented defaults, so downstream code never re-validates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Stable identifier (hex for synthetic profiles).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Gender category.
    pub gender: String,
    /// Job title.
    pub job: String,
    /// Industry category.
    pub industry: String,
    /// Annual income in currency units.
    pub income: u64,
    /// Education level.
    pub education: String,
    /// City.
    pub city: String,
    /// Borough (coarse area group).
    pub borough: Option<String>,
    /// Neighborhood-area code (fine area filter).
    pub area_code: Option<String>,
    /// Relationship status.
    pub relationship: String,
    /// Emotional-state tag.
    pub mood: String,
    /// Current activity tag.
    pub activity: String,
    /// Two to six unique interest tags.
    pub interests: Vec<String>,
    /// Risk score in `[0, 100]`.
    pub risk: u8,
    /// Last activity, unix milliseconds.
    pub last_active_ms: u64,
    /// Latitude, longitude, altitude (meters).
    pub coords: Option<[f64; 3]>,
}

/// Loosely typed record as delivered by external datasets.
///
/// Every field is optional; numeric fields accept either numbers or numeric strings.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileRecord {
    /// Identifier.
    #[serde(alias = "uid")]
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Age.
    pub age: Option<serde_json::Value>,
    /// Gender category.
    pub gender: Option<String>,
    /// Job title.
    #[serde(alias = "job_title")]
    pub job: Option<String>,
    /// Industry.
    pub industry: Option<String>,
    /// Income.
    pub income: Option<serde_json::Value>,
    /// Education level.
    pub education: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Borough.
    #[serde(alias = "boro")]
    pub borough: Option<String>,
    /// Neighborhood-area code.
    #[serde(alias = "nta", alias = "nta_code")]
    pub area_code: Option<String>,
    /// Relationship status.
    pub relationship: Option<String>,
    /// Mood tag.
    pub mood: Option<String>,
    /// Activity tag.
    pub activity: Option<String>,
    /// Interest tags.
    pub interests: Option<Vec<String>>,
    /// Risk score.
    pub risk: Option<serde_json::Value>,
    /// Last activity, unix milliseconds.
    pub last_active_ms: Option<serde_json::Value>,
    /// Latitude.
    #[serde(alias = "lat")]
    pub latitude: Option<serde_json::Value>,
    /// Longitude.
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: Option<serde_json::Value>,
    /// Altitude in meters.
    pub altitude: Option<serde_json::Value>,
}

impl Profile {
    /// Map a loose record into a profile, substituting defaults for anything missing.
    pub fn from_record(rec: ProfileRecord) -> Self {
        let name = text_or(rec.name, UNKNOWN);
        let job = text_or(rec.job, UNKNOWN);
        let id = rec
            .id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| derived_id(&name, &job));

        let coords = match (
            rec.latitude.as_ref().and_then(as_f64),
            rec.longitude.as_ref().and_then(as_f64),
        ) {
            (Some(lat), Some(lon)) => Some([
                lat,
                lon,
                rec.altitude.as_ref().and_then(as_f64).unwrap_or(0.0),
            ]),
            _ => None,
        };

        Self {
            id,
            name,
            age: rec.age.as_ref().and_then(as_u64).unwrap_or(0).min(150) as u32,
            gender: text_or(rec.gender, UNKNOWN),
            job,
            industry: text_or(rec.industry, UNKNOWN),
            income: rec.income.as_ref().and_then(as_u64).unwrap_or(0),
            education: text_or(rec.education, UNKNOWN),
            city: text_or(rec.city, ""),
            borough: non_blank(rec.borough),
            area_code: non_blank(rec.area_code),
            relationship: text_or(rec.relationship, UNKNOWN),
            mood: text_or(rec.mood, UNKNOWN),
            activity: text_or(rec.activity, UNKNOWN),
            interests: unique_interests(rec.interests.unwrap_or_default()),
            risk: rec.risk.as_ref().and_then(as_f64).unwrap_or(0.0).clamp(0.0, 100.0) as u8,
            last_active_ms: rec.last_active_ms.as_ref().and_then(as_u64).unwrap_or(0),
            coords,
        }
    }

    /// Area code or placeholder.
    pub fn area_label(&self) -> &str {
        self.area_code.as_deref().unwrap_or("N/A")
    }

    /// First character of the gender category, uppercased; `X` when blank.
    pub fn gender_initial(&self) -> char {
        self.gender
            .chars()
            .find(|c| c.is_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('X')
    }
}

fn derived_id(name: &str, job: &str) -> String {
    let mut h = Fnv1a64::new_default();
    h.write_str(name);
    h.write_str(job);
    format!("{:016x}", h.finish())
}

fn text_or(v: Option<String>, fallback: &str) -> String {
    non_blank(v).unwrap_or_else(|| fallback.to_string())
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn unique_interests(raw: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    raw.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .take(MAX_INTERESTS)
        .collect()
}

fn as_f64(v: &serde_json::Value) -> Option<f64> {
    match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

fn as_u64(v: &serde_json::Value) -> Option<u64> {
    as_f64(v).map(|f| f.max(0.0).round() as u64)
}

#[cfg(test)]
#[path = "../../tests/unit/data/profile.rs"]
mod tests;
