//! Classification of driver errors into [`StoreError`].

use crate::chat::ports::StoreError;
use mongodb::error::{
    Error, ErrorKind, TRANSIENT_TRANSACTION_ERROR, UNKNOWN_TRANSACTION_COMMIT_RESULT, WriteFailure,
};
use std::sync::Arc;

const DUPLICATE_KEY: i32 = 11000;

/// Storage fault category derived from a driver error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FaultClass {
    CommitOutcomeUnknown,
    Transient,
    DuplicateKey,
    Backend,
}

/// Picks the category for an error carrying `labels`.
///
/// An unknown commit result outranks the transient label: the server may
/// attach both, and retrying a commit that might have applied is unsafe.
fn fault_class<'a>(labels: impl IntoIterator<Item = &'a str>, duplicate_key: bool) -> FaultClass {
    let mut transient = false;
    for label in labels {
        if label == UNKNOWN_TRANSACTION_COMMIT_RESULT {
            return FaultClass::CommitOutcomeUnknown;
        }
        transient |= label == TRANSIENT_TRANSACTION_ERROR;
    }
    if transient {
        FaultClass::Transient
    } else if duplicate_key {
        FaultClass::DuplicateKey
    } else {
        FaultClass::Backend
    }
}

/// Maps a driver error to the storage vocabulary.
pub(crate) fn classify(err: Error) -> StoreError {
    let class = fault_class(err.labels().iter().map(String::as_str), is_duplicate_key(&err));
    let source = Arc::new(err);
    match class {
        FaultClass::CommitOutcomeUnknown => StoreError::CommitOutcomeUnknown(source),
        FaultClass::Transient => StoreError::Transient(source),
        FaultClass::DuplicateKey => StoreError::DuplicateKey(source),
        FaultClass::Backend => StoreError::Backend(source),
    }
}

fn is_duplicate_key(err: &Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) => write.code == DUPLICATE_KEY,
        ErrorKind::InsertMany(insert) => insert
            .write_errors
            .as_ref()
            .is_some_and(|errors| errors.iter().any(|write| write.code == DUPLICATE_KEY)),
        _ => false,
    }
}
