//! Backup-run record - the raw, human-formatted outcome of one backup.

/// Added/changed/unmodified counts for files or directories.
///
/// Values are kept exactly as the backup tool printed them, e.g. `"1,024"`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChangeCounts {
    pub added: String,
    pub changed: String,
    pub unmodified: String,
}

impl ChangeCounts {
    /// Create counts from their printed representations.
    pub fn new(
        added: impl Into<String>,
        changed: impl Into<String>,
        unmodified: impl Into<String>,
    ) -> Self {
        Self {
            added: added.into(),
            changed: changed.into(),
            unmodified: unmodified.into(),
        }
    }
}

/// Totals for everything the backup processed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProcessedStats {
    /// Processed file count, e.g. `"12,345"`.
    pub files: String,
    /// Processed size, e.g. `"3.2 GiB"`.
    pub size: String,
    /// Elapsed time, e.g. `"1:32"` or `"90s"`.
    pub duration: String,
}

/// Snapshot of one backup invocation's outcome.
///
/// Produced by the backup/log collaborator and consumed read-only by
/// reporters. Every field is optional in serialized form and defaults to an
/// empty string, which normalizes to zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BackupRunRecord {
    pub exit_code: String,
    pub snapshot_id: String,
    pub files: ChangeCounts,
    pub dirs: ChangeCounts,
    /// Size added to the repository, e.g. `"2.5 MiB"`.
    pub added_size: String,
    pub processed: ProcessedStats,
}

impl BackupRunRecord {
    /// Create a builder for constructing records.
    pub fn builder() -> BackupRunRecordBuilder {
        BackupRunRecordBuilder::default()
    }
}

/// Builder for [`BackupRunRecord`].
#[derive(Debug, Default)]
pub struct BackupRunRecordBuilder {
    record: BackupRunRecord,
}

impl BackupRunRecordBuilder {
    pub fn exit_code(mut self, code: impl Into<String>) -> Self {
        self.record.exit_code = code.into();
        self
    }

    pub fn snapshot_id(mut self, id: impl Into<String>) -> Self {
        self.record.snapshot_id = id.into();
        self
    }

    pub fn files(mut self, files: ChangeCounts) -> Self {
        self.record.files = files;
        self
    }

    pub fn dirs(mut self, dirs: ChangeCounts) -> Self {
        self.record.dirs = dirs;
        self
    }

    pub fn added_size(mut self, size: impl Into<String>) -> Self {
        self.record.added_size = size.into();
        self
    }

    pub fn processed(
        mut self,
        files: impl Into<String>,
        size: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        self.record.processed = ProcessedStats {
            files: files.into(),
            size: size.into(),
            duration: duration.into(),
        };
        self
    }

    pub fn build(self) -> BackupRunRecord {
        self.record
    }
}
