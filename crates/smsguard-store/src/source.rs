use smsguard_core::LabeledRecord;

use crate::StoreError;

/// Anything that can hand over a full labelled dataset in one read.
///
/// Callers invoke [`fetch_all`](Self::fetch_all) once at startup and build
/// their indices from the result; sources are never queried per request.
pub trait DatasetSource {
    /// Short human-readable description for logs.
    fn describe(&self) -> String;

    /// Read every labelled record.
    fn fetch_all(&self) -> Result<Vec<LabeledRecord>, StoreError>;
}
