use std::{fmt, slice};

/// What kind of failure a [`LogEntry`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailureKind {
    /// A callback's check panicked or returned an error while a notification
    /// was being dispatched.
    CheckFailed,
    /// A call-count assertion did not match the observed count.
    CountMismatch,
    /// A callback's firing position was never reached.
    NotInvoked,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::CheckFailed => write!(f, "CheckFailed"),
            FailureKind::CountMismatch => write!(f, "CountMismatch"),
            FailureKind::NotInvoked => write!(f, "NotInvoked"),
        }
    }
}

/// A single recorded failure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    kind: FailureKind,
    description: String,
    detail: String,
}

impl LogEntry {
    pub(crate) fn new(
        kind: FailureKind,
        description: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// The callback description or observer label this entry refers to.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// What went wrong.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.description, self.detail)
    }
}

/// Ordered record of every failure an assertion façade has observed.
///
/// Entries are appended while notifications are dispatched (failed checks)
/// and while assertions are evaluated (count mismatches, callbacks never
/// invoked). Nothing is removed until [`clear`](Self::clear) is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorLog {
    entries: Vec<LogEntry>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries of the given kind.
    pub fn count_of(&self, kind: FailureKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All entries rendered one per line. Empty when nothing was recorded.
    pub fn joined_message(&self) -> String {
        self.entries
            .iter()
            .map(LogEntry::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Serialize the log to a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns any serialization error produced by `serde_json`.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}

impl fmt::Display for ErrorLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ErrorLog {
    type Item = &'a LogEntry;
    type IntoIter = slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
