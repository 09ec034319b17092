//! Candidate admission: one business in, one normalized record out, or
//! nothing when the candidate is nameless or already known.

use std::collections::HashSet;

use uuid::Uuid;

use leadscout_common::{Business, RawBusiness};

/// Sentinel for string fields the upstream left blank.
const MISSING: &str = "N/A";

/// Deduplicating admitter for one extraction run. Owned by the
/// orchestrator's consumer loop; admission is a synchronous
/// check-then-insert, so no two admitted records ever share a key.
pub struct Admitter {
    run_id: String,
    seen: HashSet<String>,
}

impl Admitter {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            seen: HashSet::new(),
        }
    }

    /// Admit a candidate, or reject it (`None`) when it has no usable
    /// name or duplicates an already-admitted business. Admitted
    /// records get a run-scoped unique id and sentinel-normalized
    /// fields.
    pub fn admit(
        &mut self,
        raw: RawBusiness,
        batch_index: usize,
        item_index: usize,
    ) -> Option<Business> {
        let name = raw
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())?
            .to_string();

        let key = identity_key(&name, raw.phone.as_deref(), raw.address.as_deref());
        if !self.seen.insert(key) {
            return None;
        }

        Some(Business {
            id: format!("{}-{batch_index}-{item_index}", self.run_id),
            name,
            address: or_missing(raw.address),
            phone: or_missing(raw.phone),
            website: or_missing(raw.website),
            profile_link: or_missing(raw.profile_link),
            rating: raw.rating.unwrap_or(0.0),
            review_count: raw.review_count.map(|n| n.max(0.0) as u32).unwrap_or(0),
        })
    }
}

impl Default for Admitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Two records naming the same business collide here: same name plus
/// same phone (or, lacking a phone, same address), case-insensitively.
fn identity_key(name: &str, phone: Option<&str>, address: Option<&str>) -> String {
    let disambiguator = phone
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .or_else(|| address.map(str::trim).filter(|a| !a.is_empty()))
        .unwrap_or("");
    format!("{name}-{disambiguator}").to_lowercase()
}

fn or_missing(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| MISSING.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, phone: Option<&str>, address: Option<&str>) -> RawBusiness {
        RawBusiness {
            name: Some(name.to_string()),
            phone: phone.map(String::from),
            address: address.map(String::from),
            ..RawBusiness::default()
        }
    }

    #[test]
    fn nameless_candidates_are_rejected() {
        let mut admitter = Admitter::new();
        assert!(admitter.admit(RawBusiness::default(), 0, 0).is_none());
        assert!(admitter
            .admit(candidate("   ", Some("+33 1 00 00 00 00"), None), 0, 1)
            .is_none());
    }

    #[test]
    fn same_name_and_phone_is_a_duplicate_regardless_of_case() {
        let mut admitter = Admitter::new();
        assert!(admitter
            .admit(candidate("Le Pain", Some("+33 1 00 00 00 00"), None), 0, 0)
            .is_some());
        assert!(admitter
            .admit(candidate("LE PAIN", Some("+33 1 00 00 00 00"), None), 1, 0)
            .is_none());
    }

    #[test]
    fn address_disambiguates_when_phone_is_absent() {
        let mut admitter = Admitter::new();
        assert!(admitter
            .admit(candidate("Le Pain", None, Some("1 Rue A")), 0, 0)
            .is_some());
        assert!(admitter
            .admit(candidate("Le Pain", None, Some("2 Rue B")), 0, 1)
            .is_some());
        assert!(admitter
            .admit(candidate("Le Pain", None, Some("1 Rue A")), 0, 2)
            .is_none());
    }

    #[test]
    fn empty_phone_falls_back_to_address() {
        let mut admitter = Admitter::new();
        assert!(admitter
            .admit(candidate("Le Pain", Some(""), Some("1 Rue A")), 0, 0)
            .is_some());
        // Same address, so the blank phone must not make them distinct.
        assert!(admitter
            .admit(candidate("Le Pain", None, Some("1 Rue A")), 0, 1)
            .is_none());
    }

    #[test]
    fn missing_fields_are_normalized_to_sentinels() {
        let mut admitter = Admitter::new();
        let business = admitter
            .admit(candidate("Le Pain", None, None), 0, 0)
            .unwrap();
        assert_eq!(business.address, "N/A");
        assert_eq!(business.phone, "N/A");
        assert_eq!(business.website, "N/A");
        assert_eq!(business.profile_link, "N/A");
        assert_eq!(business.rating, 0.0);
        assert_eq!(business.review_count, 0);
    }

    #[test]
    fn review_counts_decoded_as_floats_are_rounded_down() {
        let mut admitter = Admitter::new();
        let raw = RawBusiness {
            name: Some("Le Pain".into()),
            review_count: Some(120.0),
            rating: Some(4.5),
            ..RawBusiness::default()
        };
        let business = admitter.admit(raw, 0, 0).unwrap();
        assert_eq!(business.review_count, 120);
        assert_eq!(business.rating, 4.5);
    }

    #[test]
    fn ids_are_unique_within_a_run() {
        let mut admitter = Admitter::new();
        let a = admitter
            .admit(candidate("A", Some("1"), None), 0, 0)
            .unwrap();
        let b = admitter
            .admit(candidate("B", Some("2"), None), 0, 1)
            .unwrap();
        let c = admitter
            .admit(candidate("C", Some("3"), None), 3, 0)
            .unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.id, c.id);
        assert_ne!(b.id, c.id);
    }
}
