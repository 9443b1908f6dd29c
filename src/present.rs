use crate::catalog::Catalog;
use crate::record::Record;

pub const ALL_GROUPS_LABEL: &str = "All List IDs";

/// One entry of the group selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOption {
    All,
    Group(i64),
}

impl GroupOption {
    pub fn label(&self) -> String {
        match self {
            GroupOption::All => ALL_GROUPS_LABEL.to_string(),
            GroupOption::Group(id) => id.to_string(),
        }
    }

    /// Narrow the catalog's view to this option.
    pub fn apply(&self, catalog: &mut Catalog) {
        match self {
            GroupOption::All => catalog.show_all(),
            GroupOption::Group(id) => catalog.filter_by_group(*id),
        }
    }
}

/// "All List IDs" followed by every group id in ascending order.
pub fn group_options(catalog: &Catalog) -> Vec<GroupOption> {
    std::iter::once(GroupOption::All)
        .chain(catalog.unique_group_ids().into_iter().map(GroupOption::Group))
        .collect()
}

pub fn list_id_label(record: &Record) -> String {
    format!("List ID: {}", record.group_id())
}

pub fn item_id_label(record: &Record) -> String {
    format!("Item ID: {}", record.id())
}

/// Tab separated row used by `fetchlist list`.
pub fn row_line(record: &Record) -> String {
    format!(
        "{}\t{}\t{}",
        record.name(),
        list_id_label(record),
        item_id_label(record)
    )
}
