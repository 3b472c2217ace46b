use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::EncodingStyle;
use crate::data::profile::Profile;

/// Semantic labels whose character offsets are highlighted.
pub const KEY_LABELS: [&str; 5] = ["profile", "nta", "income", "mood", "risk"];

/// Display text for one profile under one style, with its key offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedStream {
    /// Encoded display string.
    pub text: String,
    /// Character offsets covered by a key label.
    pub keys: BTreeSet<usize>,
    char_len: usize,
}

impl EncodedStream {
    /// Encode `profile` and locate its key positions.
    pub fn new(profile: &Profile, style: EncodingStyle) -> Self {
        let text = encode(profile, style);
        let keys = key_positions_in(&text);
        let char_len = text.chars().count();
        Self {
            text,
            keys,
            char_len,
        }
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.char_len
    }
}

/// Deterministic display string for `profile` under `style`.
pub fn encode(profile: &Profile, style: EncodingStyle) -> String {
    match style {
        EncodingStyle::Kv => encode_kv(profile),
        EncodingStyle::Code => encode_code(profile),
        EncodingStyle::Json => encode_json(profile),
    }
}

/// Key offsets of `encode(profile, style)`.
pub fn key_positions(profile: &Profile, style: EncodingStyle) -> BTreeSet<usize> {
    key_positions_in(&encode(profile, style))
}

/// Every character offset covered by any occurrence of a [`KEY_LABELS`] entry.
pub fn key_positions_in(text: &str) -> BTreeSet<usize> {
    let mut keys = BTreeSet::new();
    for label in KEY_LABELS {
        let width = label.chars().count();
        for (byte_at, _) in text.match_indices(label) {
            let start = text[..byte_at].chars().count();
            keys.extend(start..start + width);
        }
    }
    keys
}

/// `95000` -> `95,000`.
pub fn format_income(income: u64) -> String {
    let digits = income.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn encode_kv(p: &Profile) -> String {
    let role: String = p
        .job
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!(
        "profile={role}_{g}{age}|nta={area}|mood={mood}|income=${income}|risk={risk}",
        g = p.gender_initial(),
        age = p.age,
        area = p.area_label(),
        mood = p.mood,
        income = format_income(p.income),
        risk = p.risk,
    )
}

fn short_id(id: &str) -> String {
    let hex: String = id
        .chars()
        .filter(char::is_ascii_hexdigit)
        .take(4)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    format!("{hex:0>4}")
}

fn encode_code(p: &Profile) -> String {
    format!(
        "profile_{id} := {{ age: {age}, job: \"{job}\", mood: \"{mood}\", nta: \"{area}\", income: {income} }};",
        id = short_id(&p.id),
        age = p.age,
        job = p.job,
        mood = p.mood,
        area = p.area_label(),
        income = p.income,
    )
}

#[derive(Serialize)]
struct CompactProfile<'a> {
    profile: String,
    nta: &'a str,
    income: u64,
    mood: &'a str,
    coords: Option<[f64; 3]>,
}

fn encode_json(p: &Profile) -> String {
    let compact = CompactProfile {
        profile: format!("{}, {}", p.job, p.age),
        nta: p.area_label(),
        income: p.income,
        mood: &p.mood,
        coords: p.coords,
    };
    serde_json::to_string(&compact).unwrap_or_else(|err| {
        tracing::debug!(%err, "compact profile serialization failed");
        String::from("{}")
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/painter.rs"]
mod tests;
