use serde::Serialize;
use utoipa::ToSchema;

use crate::constants::SIMILARITY_THRESHOLD;

#[derive(Clone, Copy, Debug, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Substring,
    Similar,
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
pub struct MemberMatch {
    pub member: String,
    pub tier: MatchTier,
}

/// `1 - levenshtein / max(len)` over chars; two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Resolves a spoken (possibly misheard) name to a roster member.
///
/// Tiers are tried in order: case-insensitive equality, containment in either
/// direction, then similarity above [`SIMILARITY_THRESHOLD`]. Within a tier
/// the first member in roster order wins.
pub fn find_member(spoken: &str, roster: &[String]) -> Option<MemberMatch> {
    let spoken = spoken.trim().to_lowercase();
    if spoken.is_empty() {
        return None;
    }
    let lowered: Vec<String> = roster.iter().map(|m| m.to_lowercase()).collect();
    let hit = |index: usize, tier: MatchTier| MemberMatch {
        member: roster[index].clone(),
        tier,
    };

    if let Some(index) = lowered.iter().position(|m| *m == spoken) {
        return Some(hit(index, MatchTier::Exact));
    }
    if let Some(index) = lowered
        .iter()
        .position(|m| !m.is_empty() && (m.contains(spoken.as_str()) || spoken.contains(m.as_str())))
    {
        return Some(hit(index, MatchTier::Substring));
    }
    lowered
        .iter()
        .position(|m| similarity(m, &spoken) > SIMILARITY_THRESHOLD)
        .map(|index| hit(index, MatchTier::Similar))
}
