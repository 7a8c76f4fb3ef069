use super::roster;
use crate::core::matcher::{MatchTier, find_member, similarity};

#[test]
fn test_exact_match_is_case_insensitive() {
    let hit = find_member("alice", &roster()).unwrap();
    assert_eq!(hit.member, "Alice");
    assert_eq!(hit.tier, MatchTier::Exact);
}

#[test]
fn test_misheard_name_matches_by_similarity() {
    let _ = env_logger::try_init();
    let hit = find_member("jon", &roster()).unwrap();
    assert_eq!(hit.member, "John");
    assert_eq!(hit.tier, MatchTier::Similar);
}

#[test]
fn test_substring_matches_in_both_directions() {
    let names = vec!["Alexander".to_string(), "Bo".to_string()];

    let hit = find_member("alex", &names).unwrap();
    assert_eq!(hit.member, "Alexander");
    assert_eq!(hit.tier, MatchTier::Substring);

    let hit = find_member("Bob", &names).unwrap();
    assert_eq!(hit.member, "Bo");
    assert_eq!(hit.tier, MatchTier::Substring);
}

#[test]
fn test_exact_wins_over_earlier_substring() {
    let names = vec!["Annabel".to_string(), "Anna".to_string()];
    let hit = find_member("anna", &names).unwrap();
    assert_eq!(hit.member, "Anna");
    assert_eq!(hit.tier, MatchTier::Exact);
}

#[test]
fn test_no_match_below_threshold() {
    assert!(find_member("Zed", &roster()).is_none());
    assert!(find_member("", &roster()).is_none());
    assert!(find_member("   ", &roster()).is_none());
}

#[test]
fn test_similarity_bounds() {
    assert_eq!(similarity("", ""), 1.0);
    assert_eq!(similarity("john", "john"), 1.0);
    assert!((similarity("john", "jon") - 0.75).abs() < 1e-9);
}
