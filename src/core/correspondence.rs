//! Cross-project case correspondence
//!
//! Target cases record the id of the case they were copied from in a
//! custom field. Resolution indexes the target cases by that value and
//! keeps the source cases whose id appears in the index.

use crate::domain::{CaseId, CustomFieldId, TestCase};
use std::collections::{BTreeMap, HashMap};

/// Mapping from source case id to target case id
///
/// Built once per run and read-only afterwards. Iteration is ordered by
/// source case id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrespondenceMap {
    entries: BTreeMap<CaseId, CaseId>,
}

impl CorrespondenceMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Target case for a source case
    pub fn get(&self, source: CaseId) -> Option<CaseId> {
        self.entries.get(&source).copied()
    }

    /// Number of mapped source cases
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was mapped
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(source, target)` pairs in source id order
    pub fn iter(&self) -> impl Iterator<Item = (CaseId, CaseId)> + '_ {
        self.entries.iter().map(|(source, target)| (*source, *target))
    }
}

impl FromIterator<(CaseId, CaseId)> for CorrespondenceMap {
    fn from_iter<I: IntoIterator<Item = (CaseId, CaseId)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A source case and the target case it resolved to, with titles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPair {
    pub source_id: CaseId,
    pub source_title: String,
    pub target_id: CaseId,
    pub target_title: String,
}

/// Output of [`resolve`]
#[derive(Debug, Clone, Default)]
pub struct Correspondence {
    /// Source to target mapping
    pub map: CorrespondenceMap,

    /// Matched cases in source list order
    pub pairs: Vec<MatchedPair>,

    /// Correlation values that did not parse as a case id
    pub unparsable_values: usize,

    /// Correlation values claimed by more than one target case
    pub duplicate_values: usize,
}

/// Resolve source cases to target cases through custom field `field`
///
/// Field values are trimmed and parsed as case ids; values that do not
/// parse are skipped. When several target cases carry the same value, the
/// one scanned last wins. Source cases without a claiming target case are
/// left out of the map.
///
/// # Example
///
/// ```
/// use qase_migrate::core::correspondence::resolve;
/// use qase_migrate::domain::{CaseId, CustomFieldId, TestCase};
///
/// let source = vec![TestCase::new(CaseId::new(1), "Login")];
/// let target = vec![TestCase::new(CaseId::new(101), "Login")
///     .with_custom_field(CustomFieldId::new(7), "1")];
///
/// let resolved = resolve(&target, &source, CustomFieldId::new(7));
/// assert_eq!(resolved.map.get(CaseId::new(1)), Some(CaseId::new(101)));
/// ```
pub fn resolve(target_cases: &[TestCase], source_cases: &[TestCase], field: CustomFieldId) -> Correspondence {
    let mut by_origin: HashMap<CaseId, &TestCase> = HashMap::new();
    let mut unparsable_values = 0;
    let mut duplicate_values = 0;

    for target in target_cases {
        for value in target.custom_field_values(field) {
            let origin = match value.trim().parse::<CaseId>() {
                Ok(origin) => origin,
                Err(_) => {
                    unparsable_values += 1;
                    tracing::debug!(
                        target_case = %target.id,
                        value = %value,
                        "Ignoring correlation value that is not a case id"
                    );
                    continue;
                }
            };

            if let Some(previous) = by_origin.insert(origin, target) {
                if previous.id != target.id {
                    duplicate_values += 1;
                    tracing::warn!(
                        source_case = %origin,
                        replaced = %previous.id,
                        kept = %target.id,
                        "Several target cases claim the same source case; keeping the last one"
                    );
                }
            }
        }
    }

    let mut entries = BTreeMap::new();
    let mut pairs = Vec::new();

    for source in source_cases {
        if let Some(target) = by_origin.get(&source.id) {
            entries.insert(source.id, target.id);
            pairs.push(MatchedPair {
                source_id: source.id,
                source_title: source.title.clone(),
                target_id: target.id,
                target_title: target.title.clone(),
            });
        }
    }

    tracing::info!(
        source_cases = source_cases.len(),
        target_cases = target_cases.len(),
        mapped = entries.len(),
        unparsable_values,
        duplicate_values,
        "Resolved case correspondence"
    );

    Correspondence {
        map: CorrespondenceMap { entries },
        pairs,
        unparsable_values,
        duplicate_values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD: CustomFieldId = CustomFieldId::new(7);

    fn case(id: u64, title: &str) -> TestCase {
        TestCase::new(CaseId::new(id), title)
    }

    #[test]
    fn test_resolve_basic_scenario() {
        let source = vec![case(1, "Login")];
        let target = vec![case(101, "Login").with_custom_field(FIELD, "1")];

        let resolved = resolve(&target, &source, FIELD);
        assert_eq!(resolved.map.len(), 1);
        assert_eq!(resolved.map.get(CaseId::new(1)), Some(CaseId::new(101)));
        assert_eq!(
            resolved.pairs,
            vec![MatchedPair {
                source_id: CaseId::new(1),
                source_title: "Login".to_string(),
                target_id: CaseId::new(101),
                target_title: "Login".to_string(),
            }]
        );
    }

    #[test]
    fn test_other_fields_and_unparsable_values_ignored() {
        let source = vec![case(1, "a"), case(2, "b"), case(3, "c")];
        let target = vec![
            case(101, "a").with_custom_field(CustomFieldId::new(8), "1"),
            case(102, "b").with_custom_field(FIELD, "two"),
            case(103, "c").with_custom_field(FIELD, " 3 "),
            case(104, "orphan"),
        ];

        let resolved = resolve(&target, &source, FIELD);
        assert_eq!(resolved.map.iter().collect::<Vec<_>>(), vec![(CaseId::new(3), CaseId::new(103))]);
        assert_eq!(resolved.unparsable_values, 1);
    }

    #[test]
    fn test_value_without_source_case_is_not_mapped() {
        let source = vec![case(1, "a")];
        let target = vec![case(101, "x").with_custom_field(FIELD, "99")];

        let resolved = resolve(&target, &source, FIELD);
        assert!(resolved.map.is_empty());
        assert!(resolved.pairs.is_empty());
    }

    #[test]
    fn test_duplicate_claim_last_target_wins() {
        let source = vec![case(1, "Login")];
        let target = vec![
            case(101, "Login").with_custom_field(FIELD, "1"),
            case(202, "Login (copy)").with_custom_field(FIELD, "1"),
        ];

        let resolved = resolve(&target, &source, FIELD);
        assert_eq!(resolved.map.get(CaseId::new(1)), Some(CaseId::new(202)));
        assert_eq!(resolved.duplicate_values, 1);

        let reversed: Vec<TestCase> = target.into_iter().rev().collect();
        let resolved = resolve(&reversed, &source, FIELD);
        assert_eq!(resolved.map.get(CaseId::new(1)), Some(CaseId::new(101)));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let source: Vec<TestCase> = (1..=50).map(|i| case(i, "s")).collect();
        let target: Vec<TestCase> = (1..=50)
            .filter(|i| i % 3 != 0)
            .map(|i| case(1000 + i, "t").with_custom_field(FIELD, i.to_string()))
            .collect();

        let first = resolve(&target, &source, FIELD);
        let second = resolve(&target, &source, FIELD);
        assert_eq!(first.map, second.map);
        assert_eq!(first.pairs, second.pairs);
        assert_eq!(first.map.len(), 34);
    }

    #[test]
    fn test_map_iterates_by_source_id() {
        let map: CorrespondenceMap = [(CaseId::new(9), CaseId::new(1)), (CaseId::new(2), CaseId::new(5))]
            .into_iter()
            .collect();
        let sources: Vec<u64> = map.iter().map(|(s, _)| s.value()).collect();
        assert_eq!(sources, vec![2, 9]);
    }
}
