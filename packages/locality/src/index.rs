//! Exact-postcode practice index.

use std::collections::BTreeMap;

use care_map_practice_models::Practice;

/// Maps normalized postcodes to the practices recorded at that exact
/// postcode. Within a key, practices keep dataset order; duplicates are
/// allowed. No partial or fuzzy matching happens here.
#[derive(Debug, Clone, Default)]
pub struct PracticeIndex {
    by_postcode: BTreeMap<String, Vec<Practice>>,
}

impl PracticeIndex {
    /// Builds the index. Practices without a postcode are skipped.
    #[must_use]
    pub fn from_practices(practices: &[Practice]) -> Self {
        let mut by_postcode: BTreeMap<String, Vec<Practice>> = BTreeMap::new();
        for practice in practices {
            let Some(postcode) = practice.postcode.as_deref() else {
                continue;
            };
            let key = care_map_postcode::normalize(postcode);
            if key.is_empty() {
                continue;
            }
            by_postcode.entry(key).or_default().push(practice.clone());
        }
        log::debug!("indexed {} postcode keys", by_postcode.len());
        Self { by_postcode }
    }

    /// Practices at this exact normalized postcode, in dataset order.
    #[must_use]
    pub fn get(&self, normalized_key: &str) -> Option<&[Practice]> {
        self.by_postcode
            .get(normalized_key)
            .map(Vec::as_slice)
    }
}
