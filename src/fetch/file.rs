use std::fs;
use std::path::{Path, PathBuf};

use super::{decode_records, FetchError, FetchGateway, FetchResult};

/// Reads the record array from a local JSON file with the same shape the
/// HTTP endpoint serves.
#[derive(Debug, Clone)]
pub struct FileGateway {
    path: PathBuf,
}

impl FileGateway {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: expand_tilde(path.as_ref()),
        }
    }
}

impl FetchGateway for FileGateway {
    fn fetch_records(&self) -> FetchResult {
        let bytes = fs::read(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })?;
        decode_records(&self.path.display().to_string(), &bytes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Expand ~ to home directory in paths
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = home::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        fs::write(
            &path,
            r#"[{"id": 2, "listId": 2, "name": "Apple"}, {"id": 8, "listId": 2, "name": ""}]"#,
        )
        .unwrap();

        let records = FileGateway::new(&path).fetch_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 2);
        assert_eq!(records[0].list_id, 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = FileGateway::new(dir.path().join("absent.json"))
            .fetch_records()
            .unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[test]
    fn test_tilde_expands_to_home() {
        let gateway = FileGateway::new("~/items.json");
        if let Some(home) = home::home_dir() {
            assert_eq!(gateway.path, home.join("items.json"));
        }
    }
}
