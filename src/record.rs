//! Reading a backup-run record.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use autorestic_monitor::BackupRunRecord;

/// Read a [`BackupRunRecord`] from a JSON file.
///
/// Missing fields default to empty strings and are reported as zero.
pub fn read_record(path: &Path) -> Result<BackupRunRecord> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Read error: {}", path.display()))?;
    let record = serde_json::from_str(&content)
        .with_context(|| format!("Parse error: {}", path.display()))?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_record_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "exit_code": "0",
                "snapshot_id": "5f3e9a1c",
                "files": {{"added": "1,024", "changed": "3", "unmodified": "10"}},
                "dirs": {{"added": "1", "changed": "0", "unmodified": "4"}},
                "added_size": "2.5 MiB",
                "processed": {{"files": "1,037", "size": "1.2 GiB", "duration": "1:30"}}
            }}"#
        )
        .unwrap();

        let record = read_record(file.path()).unwrap();
        assert_eq!(record.snapshot_id, "5f3e9a1c");
        assert_eq!(record.files.added, "1,024");
        assert_eq!(record.processed.duration, "1:30");
    }

    #[test]
    fn invalid_json_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = read_record(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Parse error"));
    }
}
