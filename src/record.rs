use serde::Deserialize;

/// A record as it arrives on the wire, before sanitization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    pub id: i64,
    #[serde(rename = "listId")]
    pub list_id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

impl RawRecord {
    #[cfg(test)]
    pub fn new(id: i64, list_id: i64, name: Option<&str>) -> Self {
        Self {
            id,
            list_id,
            name: name.map(str::to_string),
        }
    }
}

/// A sanitized record. Fields are private so a record cannot change after
/// the sanitizer builds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: i64,
    group_id: i64,
    name: String,
}

impl Record {
    pub(crate) fn new(id: i64, group_id: i64, name: String) -> Self {
        Self { id, group_id, name }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn group_id(&self) -> i64 {
        self.group_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_wire_shape() {
        let json = r#"[
            {"id": 755, "listId": 2, "name": ""},
            {"id": 203, "listId": 2, "name": null},
            {"id": 684, "listId": 1, "name": "Item 684"},
            {"id": 906, "listId": 2}
        ]"#;
        let records: Vec<RawRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0], RawRecord::new(755, 2, Some("")));
        assert_eq!(records[1], RawRecord::new(203, 2, None));
        assert_eq!(records[2], RawRecord::new(684, 1, Some("Item 684")));
        assert_eq!(records[3].name, None);
    }

    #[test]
    fn test_raw_record_requires_ids() {
        let result: Result<Vec<RawRecord>, _> =
            serde_json::from_str(r#"[{"listId": 1, "name": "Item 1"}]"#);
        assert!(result.is_err());
    }
}
