use std::cmp::Ordering;

use crate::name_key::NameKey;
use crate::record::Record;

/// Orders records by group id, then by the case-insensitive alphabetic
/// prefix of the name, then by the first number in the name.
pub fn compare_records(a: &Record, b: &Record) -> Ordering {
    a.group_id().cmp(&b.group_id()).then_with(|| {
        let key_a = NameKey::extract(a.name());
        let key_b = NameKey::extract(b.name());
        compare_ignore_case(&key_a.alpha, &key_b.alpha).then(key_a.number.cmp(&key_b.number))
    })
}

/// Stable sort: records tied on every key keep their incoming order.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(compare_records);
}

fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
