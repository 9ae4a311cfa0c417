use crate::IterationRecord;

/// One row of a cumulative history: a record, or the boundary between two runs
#[derive(Clone, Debug, PartialEq)]
pub enum HistoryEntry {
    /// A state produced by an optimizer run
    Record(IterationRecord),
    /// Marks the start of a later run
    Separator,
}

// Records serialize as themselves; separators as `{"separator": true}`.
#[cfg(feature = "serde")]
impl serde::Serialize for HistoryEntry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap as _;
        match self {
            Self::Record(record) => serde::Serialize::serialize(record, serializer),
            Self::Separator => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("separator", &true)?;
                map.end()
            }
        }
    }
}

/// The records of several optimizer runs, in the order they ran.
///
/// Iteration numbers restart at zero in every run, so consumers computing
/// ROI deltas between consecutive records should not cross a separator.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct History(Vec<HistoryEntry>);

impl History {
    /// Append the records of one run, preceded by a separator unless this is
    /// the first run. An empty run is ignored.
    pub fn push_run(&mut self, records: impl IntoIterator<Item = IterationRecord>) {
        let mut records = records.into_iter().peekable();
        if records.peek().is_none() {
            return;
        }
        if !self.0.is_empty() {
            self.0.push(HistoryEntry::Separator);
        }
        self.0.extend(records.into_iter().map(HistoryEntry::Record));
    }

    /// Every record across every run, skipping separators
    pub fn records(&self) -> impl Iterator<Item = &IterationRecord> {
        self.0.iter().filter_map(|entry| match entry {
            HistoryEntry::Record(record) => Some(record),
            HistoryEntry::Separator => None,
        })
    }

    /// How many runs have been appended
    pub fn runs(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            1 + self
                .0
                .iter()
                .filter(|entry| matches!(entry, HistoryEntry::Separator))
                .count()
        }
    }

    /// All entries, separators included
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.0
    }
}
