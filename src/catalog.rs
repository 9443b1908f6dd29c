//! The sorted record set and the filtered view derived from it.
//!
//! Every filter is evaluated against the full sorted set, so filters never
//! stack: the most recent call decides what is visible.

use std::collections::BTreeSet;

use tracing::debug;

use crate::ordering::sort_records;
use crate::record::{RawRecord, Record};
use crate::sanitize::sanitize;

/// The query that produced the visible view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    /// Decimal id contains the query.
    Id(String),
    /// Lowercased name contains the lowercased query.
    Name(String),
    Group(i64),
}

impl Filter {
    pub fn id(query: &str) -> Self {
        if query.is_empty() {
            Filter::All
        } else {
            Filter::Id(query.to_string())
        }
    }

    pub fn id_or_name(query: &str) -> Self {
        if query.is_empty() {
            Filter::All
        } else if is_decimal(query) {
            Filter::Id(query.to_string())
        } else {
            Filter::Name(query.to_lowercase())
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(query) => record.id().to_string().contains(query.as_str()),
            Filter::Name(folded) => record.name().to_lowercase().contains(folded.as_str()),
            Filter::Group(group_id) => record.group_id() == *group_id,
        }
    }
}

fn is_decimal(query: &str) -> bool {
    !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    records: Vec<Record>,
    // Indices into `records`, ascending, so the view is always an ordered
    // subsequence of the full set.
    visible: Vec<usize>,
    filter: Filter,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_raw<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut catalog = Self::new();
        catalog.load(raw);
        catalog
    }

    /// Sanitizes, sorts and replaces the whole catalog. The view resets to
    /// every record.
    pub fn load<I>(&mut self, raw: I)
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let raw: Vec<RawRecord> = raw.into_iter().collect();
        let received = raw.len();
        let mut records = sanitize(raw);
        sort_records(&mut records);

        debug!(
            received,
            kept = records.len(),
            dropped = received - records.len(),
            "catalog loaded"
        );

        let visible = (0..records.len()).collect();
        *self = Self {
            records,
            visible,
            filter: Filter::All,
        };
    }

    pub fn all_records(&self) -> &[Record] {
        &self.records
    }

    pub fn visible_records(&self) -> impl ExactSizeIterator<Item = &Record> + '_ {
        self.visible.iter().map(move |&index| &self.records[index])
    }

    pub fn visible_record(&self, position: usize) -> Option<&Record> {
        self.visible
            .get(position)
            .and_then(|&index| self.records.get(index))
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn active_filter(&self) -> &Filter {
        &self.filter
    }

    pub fn unique_group_ids(&self) -> BTreeSet<i64> {
        self.records.iter().map(Record::group_id).collect()
    }

    pub fn show_all(&mut self) {
        self.apply(Filter::All);
    }

    pub fn filter_by_id(&mut self, query: &str) {
        self.apply(Filter::id(query));
    }

    pub fn filter_by_id_or_name(&mut self, query: &str) {
        self.apply(Filter::id_or_name(query));
    }

    pub fn filter_by_group(&mut self, group_id: i64) {
        self.apply(Filter::Group(group_id));
    }

    pub fn apply(&mut self, filter: Filter) {
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| filter.matches(record))
            .map(|(index, _)| index)
            .collect();
        self.filter = filter;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<RawRecord> {
        vec![
            RawRecord::new(1, 1, Some("123 Shampoo")),
            RawRecord::new(2, 2, Some("Apple")),
            RawRecord::new(3, 3, Some("Banana 42")),
            RawRecord::new(4, 3, Some("Banana 10")),
            RawRecord::new(5, 2, Some("Carrot")),
            RawRecord::new(6, 1, Some("123 Soap")),
            RawRecord::new(7, 1, None),
            RawRecord::new(8, 2, Some("")),
        ]
    }

    fn visible_ids(catalog: &Catalog) -> Vec<i64> {
        catalog.visible_records().map(Record::id).collect()
    }

    fn visible_names(catalog: &Catalog) -> Vec<&str> {
        catalog.visible_records().map(Record::name).collect()
    }

    #[test]
    fn test_load_sanitizes_and_sorts() {
        let catalog = Catalog::from_raw(fixture());

        assert_eq!(catalog.all_records().len(), 6);
        assert_eq!(
            visible_names(&catalog),
            [
                "123 Shampoo",
                "123 Soap",
                "Apple",
                "Carrot",
                "Banana 10",
                "Banana 42"
            ]
        );
        assert_eq!(catalog.active_filter(), &Filter::All);
    }

    #[test]
    fn test_load_is_idempotent() {
        let once = Catalog::from_raw(fixture());
        let mut twice = Catalog::new();
        twice.load(fixture());
        twice.load(fixture());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_load_replaces_state_and_resets_view() {
        let mut catalog = Catalog::from_raw(fixture());
        catalog.filter_by_group(3);
        catalog.load(vec![RawRecord::new(10, 9, Some("Item 10"))]);

        assert_eq!(visible_ids(&catalog), [10]);
        assert_eq!(catalog.active_filter(), &Filter::All);
        assert_eq!(catalog.unique_group_ids(), BTreeSet::from([9]));
    }

    #[test]
    fn test_load_empty() {
        let mut catalog = Catalog::from_raw(fixture());
        catalog.load(Vec::new());
        assert!(catalog.is_empty());
        assert_eq!(catalog.visible_len(), 0);
        assert!(catalog.unique_group_ids().is_empty());
        assert!(catalog.visible_record(0).is_none());
    }

    #[test]
    fn test_filter_by_id_is_substring() {
        let mut catalog = Catalog::from_raw(fixture());
        catalog.filter_by_id("4");
        assert_eq!(visible_ids(&catalog), [4]);

        catalog.load(vec![
            RawRecord::new(14, 1, Some("a")),
            RawRecord::new(41, 1, Some("b")),
            RawRecord::new(5, 1, Some("c")),
        ]);
        catalog.filter_by_id("4");
        assert_eq!(visible_ids(&catalog), [14, 41]);
    }

    #[test]
    fn test_filter_by_id_ignores_names() {
        let mut catalog = Catalog::from_raw(fixture());
        catalog.filter_by_id("x");
        assert_eq!(catalog.visible_len(), 0);
        assert_eq!(catalog.active_filter(), &Filter::Id("x".to_string()));

        catalog.filter_by_id("Apple");
        assert_eq!(catalog.visible_len(), 0);
    }

    #[test]
    fn test_text_query_is_name_filter() {
        let mut catalog = Catalog::from_raw(fixture());
        catalog.filter_by_id_or_name("BAN");
        assert_eq!(catalog.active_filter(), &Filter::Name("ban".to_string()));
        assert_eq!(catalog.visible_len(), 2);
        assert!(catalog
            .visible_records()
            .all(|record| record.name().starts_with("Banana")));
    }

    #[test]
    fn test_filter_by_id_empty_shows_all() {
        let mut catalog = Catalog::from_raw(fixture());
        catalog.filter_by_id("");
        assert_eq!(catalog.visible_len(), 6);
        assert_eq!(catalog.active_filter(), &Filter::All);
    }

    #[test]
    fn test_filter_by_name_is_case_insensitive() {
        let mut catalog = Catalog::from_raw(fixture());
        catalog.filter_by_id_or_name("ban");
        assert_eq!(visible_names(&catalog), ["Banana 10", "Banana 42"]);

        catalog.filter_by_id_or_name("SHAMP");
        assert_eq!(visible_ids(&catalog), [1]);
    }

    #[test]
    fn test_digit_query_matches_ids_not_names() {
        let mut catalog = Catalog::from_raw(fixture());
        // "123" appears in names but no id contains it
        catalog.filter_by_id_or_name("123");
        assert_eq!(catalog.visible_len(), 0);
        assert_eq!(catalog.active_filter(), &Filter::Id("123".to_string()));

        catalog.filter_by_id_or_name("6");
        assert_eq!(visible_ids(&catalog), [6]);
    }

    #[test]
    fn test_mixed_query_is_name_query() {
        let mut catalog = Catalog::from_raw(fixture());
        catalog.filter_by_id_or_name("123 s");
        assert_eq!(visible_ids(&catalog), [1, 6]);

        catalog.filter_by_id_or_name("(.*");
        assert_eq!(catalog.visible_len(), 0);
    }

    #[test]
    fn test_filter_by_group_keeps_catalog_order() {
        let mut catalog = Catalog::from_raw(fixture());
        catalog.filter_by_group(2);
        assert_eq!(visible_ids(&catalog), [2, 5]);

        catalog.filter_by_group(42);
        assert_eq!(catalog.visible_len(), 0);
    }

    #[test]
    fn test_filters_do_not_stack() {
        let mut catalog = Catalog::from_raw(fixture());
        catalog.filter_by_group(3);
        catalog.filter_by_id_or_name("apple");
        assert_eq!(visible_ids(&catalog), [2]);

        catalog.filter_by_group(3);
        catalog.filter_by_id_or_name("");
        assert_eq!(catalog.visible_len(), 6);
    }

    #[test]
    fn test_show_all_after_filter() {
        let mut catalog = Catalog::from_raw(fixture());
        catalog.filter_by_group(1);
        catalog.show_all();
        assert_eq!(visible_ids(&catalog), [1, 6, 2, 5, 4, 3]);
    }

    #[test]
    fn test_unique_group_ids() {
        let catalog = Catalog::from_raw(fixture());
        assert_eq!(catalog.unique_group_ids(), BTreeSet::from([1, 2, 3]));
    }

    #[test]
    fn test_visible_is_ordered_subsequence() {
        let mut catalog = Catalog::from_raw(fixture());
        for filter in [
            Filter::Group(3),
            Filter::id_or_name("a"),
            Filter::id("1"),
        ] {
            catalog.apply(filter);
            let mut all = catalog.all_records().iter();
            for record in catalog.visible_records() {
                assert!(all.any(|candidate| candidate == record));
                assert!(catalog.active_filter().matches(record));
            }
        }
    }

    #[test]
    fn test_visible_record_lookup() {
        let mut catalog = Catalog::from_raw(fixture());
        catalog.filter_by_group(3);
        assert_eq!(catalog.visible_record(1).map(Record::name), Some("Banana 42"));
        assert!(catalog.visible_record(2).is_none());
    }
}
