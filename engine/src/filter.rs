//! Local search over the loaded page.

use crate::UserRecord;
use serde::{Deserialize, Serialize};

/// Search text entered by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Check if the query matches every record.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Check whether a single record matches.
    ///
    /// Case-insensitive substring match on first name, last name or email.
    /// Whitespace in the query is significant.
    pub fn matches(&self, record: &UserRecord) -> bool {
        let needle = self.text.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&record.first_name, &record.last_name, &record.email]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Derive the filtered view of `records`, preserving their order.
pub fn filter(records: &[UserRecord], query: &SearchQuery) -> Vec<UserRecord> {
    if query.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| query.matches(r))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<UserRecord> {
        vec![
            UserRecord::new(1, "george.bluth@reqres.in", "George", "Bluth"),
            UserRecord::new(2, "janet.weaver@reqres.in", "Janet", "Weaver"),
            UserRecord::new(3, "emma.wong@reqres.in", "Emma", "Wong"),
        ]
    }

    fn ids(records: &[UserRecord]) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn empty_query_returns_everything() {
        let records = sample();
        assert_eq!(filter(&records, &SearchQuery::default()), records);
        assert_eq!(filter(&records, &SearchQuery::new("")), records);
    }

    #[test]
    fn whitespace_is_part_of_the_query() {
        let records = sample();
        assert!(filter(&records, &SearchQuery::new("   ")).is_empty());
        assert!(filter(&records, &SearchQuery::new("Janet ")).is_empty());
        assert!(!SearchQuery::new(" ").is_empty());

        let spaced = vec![UserRecord::new(4, "mj@x.com", "Mary Jane", "Watson")];
        assert_eq!(filter(&spaced, &SearchQuery::new("y j")).len(), 1);
    }

    #[test]
    fn matches_are_case_insensitive() {
        let records = sample();
        assert_eq!(ids(&filter(&records, &SearchQuery::new("JANET"))), vec![2]);
        assert_eq!(ids(&filter(&records, &SearchQuery::new("wOnG"))), vec![3]);
    }

    #[test]
    fn email_is_searched() {
        let records = sample();
        assert_eq!(
            ids(&filter(&records, &SearchQuery::new("reqres.in"))),
            vec![1, 2, 3]
        );
        assert_eq!(ids(&filter(&records, &SearchQuery::new("george.b"))), vec![1]);
    }

    #[test]
    fn no_match_yields_empty_view() {
        assert!(filter(&sample(), &SearchQuery::new("zzz")).is_empty());
    }

    #[test]
    fn empty_page_yields_empty_view() {
        assert!(filter(&[], &SearchQuery::new("emma")).is_empty());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_record() -> impl Strategy<Value = UserRecord> {
            (1u64..1000, "[a-zA-Z ]{0,8}", "[a-zA-Z ]{0,8}", "[a-z.@]{0,12}").prop_map(
                |(id, first, last, email)| UserRecord::new(id, email, first, last),
            )
        }

        proptest! {
            #[test]
            fn prop_filter_is_matching_subsequence(
                records in prop::collection::vec(arb_record(), 0..20),
                text in "[a-zA-Z.@ ]{0,3}",
            ) {
                let query = SearchQuery::new(text.clone());
                let needle = text.to_lowercase();

                let expected: Vec<UserRecord> = records
                    .iter()
                    .filter(|r| {
                        r.first_name.to_lowercase().contains(&needle)
                            || r.last_name.to_lowercase().contains(&needle)
                            || r.email.to_lowercase().contains(&needle)
                    })
                    .cloned()
                    .collect();

                prop_assert_eq!(filter(&records, &query), expected);
            }

            #[test]
            fn prop_filter_is_deterministic(
                records in prop::collection::vec(arb_record(), 0..20),
                text in "[a-z]{0,2}",
            ) {
                let query = SearchQuery::new(text);
                prop_assert_eq!(filter(&records, &query), filter(&records, &query));
            }
        }
    }
}
