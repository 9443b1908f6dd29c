use crate::record::{RawRecord, Record};

/// Drops records whose name is absent or blank and converts the rest.
/// Survivors keep their incoming order.
pub fn sanitize<I>(raw: I) -> Vec<Record>
where
    I: IntoIterator<Item = RawRecord>,
{
    raw.into_iter()
        .filter_map(|item| match item.name {
            Some(name) if !name.trim().is_empty() => {
                Some(Record::new(item.id, item.list_id, name))
            }
            _ => None,
        })
        .collect()
}
