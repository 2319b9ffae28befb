//! Difference record filters

use crate::{DiffField, DiffStatus, DifferenceRecord};

/// Criteria a record must satisfy to be kept. All set criteria must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub status: Option<DiffStatus>,
    pub table: Option<String>,
    /// Keep `different` records whose given field differs
    pub mismatch: Option<DiffField>,
    /// Keep records whose file-side size is not this value
    pub size_not: Option<String>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size differences only
    pub fn size_mismatches() -> Self {
        Self::new().with_mismatch(DiffField::Size)
    }

    pub fn with_status(mut self, status: DiffStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_mismatch(mut self, field: DiffField) -> Self {
        self.mismatch = Some(field);
        self
    }

    pub fn with_size_not(mut self, size: impl Into<String>) -> Self {
        self.size_not = Some(size.into());
        self
    }

    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.table.is_none()
            && self.mismatch.is_none()
            && self.size_not.is_none()
    }

    /// Falls back to size mismatches when no criterion is set
    pub fn or_size_mismatches(self) -> Self {
        if self.is_empty() {
            Self::size_mismatches()
        } else {
            self
        }
    }

    pub fn matches(&self, record: &DifferenceRecord) -> bool {
        if let Some(status) = self.status
            && record.status != status
        {
            return false;
        }
        if let Some(table) = &self.table
            && &record.table != table
        {
            return false;
        }
        if let Some(field) = self.mismatch
            && !record.differs_in(field)
        {
            return false;
        }
        if let Some(size) = &self.size_not
            && &record.file_info.size == size
        {
            return false;
        }
        true
    }

    /// Keeps matching records in input order
    pub fn apply<'a, I>(&self, records: I) -> Vec<DifferenceRecord>
    where
        I: IntoIterator<Item = &'a DifferenceRecord>,
    {
        records
            .into_iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}
