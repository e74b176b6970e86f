//! Checked-access failures shared by the containers.

use thiserror::Error;

/// Failure of a bounds-checked accessor.
///
/// Carries no payload: the kind is the whole diagnostic.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum IndexError {
    #[error("index out of range")]
    OutOfRange,
}
