use std::fmt;

use thiserror::Error;

use crate::Pooled;

/// Error returned by [`Pool::get`](crate::Pool::get) and the lease
/// constructors.
#[derive(Debug, Error)]
pub enum GetError<E> {
    /// No idle object is available and every slot is checked out.
    #[error("fixed pool reached maximum capacity of {capacity}")]
    CapacityExhausted {
        /// Capacity of the pool that refused the request.
        capacity: usize,
    },

    /// The factory failed to create a new object.
    #[error(transparent)]
    Factory(E),
}

impl<E> GetError<E> {
    /// Returns `true` if the pool was exhausted.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, GetError::CapacityExhausted { .. })
    }

    /// Returns the factory error, if that is what caused the failure.
    pub fn into_factory_error(self) -> Option<E> {
        match self {
            GetError::Factory(err) => Some(err),
            GetError::CapacityExhausted { .. } => None,
        }
    }
}

/// Error returned by [`Pool::put`](crate::Pool::put) when the handle does
/// not belong to the pool's in-use set.
///
/// The rejected handle is handed back untouched: it has not been reset.
#[derive(Error)]
#[error("unrecognized pooled object returned")]
pub struct ReturnError<T>(pub(crate) Pooled<T>);

impl<T> ReturnError<T> {
    /// Gets back the rejected handle.
    pub fn into_inner(self) -> Pooled<T> {
        self.0
    }
}

// Manual impl so that `T` does not need to be `Debug`.
impl<T> fmt::Debug for ReturnError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReturnError").field(&self.0.id()).finish()
    }
}
