//! Skill list normalization: comma-separated client input into a lower-cased,
//! trimmed, de-duplicated list. First occurrence wins, so the order a client
//! supplied survives into the response.

use std::collections::HashSet;

pub fn normalize_skill_csv(csv: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    csv.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_trims() {
        assert_eq!(
            normalize_skill_csv("Go, Kubernetes ,SQL"),
            vec!["go", "kubernetes", "sql"]
        );
    }

    #[test]
    fn test_case_variants_deduplicate_to_one() {
        assert_eq!(normalize_skill_csv("React, react , REACT"), vec!["react"]);
    }

    #[test]
    fn test_empty_entries_dropped() {
        assert_eq!(normalize_skill_csv(",go,, ,rust,"), vec!["go", "rust"]);
        assert!(normalize_skill_csv("").is_empty());
        assert!(normalize_skill_csv(" , ,").is_empty());
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_skill_csv("Go,Kubernetes,go");
        let twice = normalize_skill_csv(&once.join(","));
        assert_eq!(once, twice);
    }
}
