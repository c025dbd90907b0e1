use chrono::{Local, NaiveDateTime};

const ARCHIVE_PREFIX: &str = "chat_archive_";
const ARCHIVE_EXTENSION: &str = ".json";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timestamp-derived name of an archived history file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName {
    stamp: String,
}

impl ArchiveName {
    pub fn at(time: NaiveDateTime) -> Self {
        Self {
            stamp: time.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn now() -> Self {
        Self::at(Local::now().naive_local())
    }

    /// `chat_archive_<stamp>.json`
    pub fn file_name(&self) -> String {
        format!("{ARCHIVE_PREFIX}{}{ARCHIVE_EXTENSION}", self.stamp)
    }

    /// Name for the `attempt`-th try; attempts past the first get a `_<n>`
    /// suffix so two archives within the same second do not collide.
    pub fn candidate(&self, attempt: u32) -> String {
        if attempt <= 1 {
            self.file_name()
        } else {
            format!(
                "{ARCHIVE_PREFIX}{}_{attempt}{ARCHIVE_EXTENSION}",
                self.stamp
            )
        }
    }

    pub fn is_archive_file(name: &str) -> bool {
        name.starts_with(ARCHIVE_PREFIX) && name.ends_with(ARCHIVE_EXTENSION)
    }
}
