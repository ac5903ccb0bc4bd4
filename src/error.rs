use std::{error::Error as StdError, io, sync::Arc};

/// A shareable error cause.
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// Boxed error accepted from user-supplied functions.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure surfaced by a [`Sequence`] terminal or delivered through an [`Observer`].
///
/// Errors are cheap to clone so the same failure can reach more than one observer.
///
/// [`Sequence`]: crate::Sequence
/// [`Observer`]: crate::Observer
#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    /// The source of a sequence could not be opened or could not continue reading.
    #[error("sequence materialization failed: {0}")]
    Materialization(#[source] Cause),

    /// A single-use sequence was materialized a second time.
    #[error("resource already consumed")]
    ResourceClosed,

    /// A user-supplied mapping, predicate or combining function failed.
    #[error("operator failed: {0}")]
    Operator(#[source] Cause),

    /// A producer raised an error directly into its subscriber.
    #[error("stream error: {0}")]
    Stream(#[source] Cause),

    /// The stream had not terminated when a synchronous collector returned.
    #[error("stream did not terminate synchronously")]
    Unfinished,
}

impl Error {
    pub fn materialization<E>(cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Materialization(Arc::from(cause.into()))
    }

    pub fn operator<E>(cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Operator(Arc::from(cause.into()))
    }

    pub fn stream<E>(cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Stream(Arc::from(cause.into()))
    }

    /// The wrapped cause, if any.
    pub fn cause(&self) -> Option<&Cause> {
        match self {
            Error::Materialization(cause) | Error::Operator(cause) | Error::Stream(cause) => {
                Some(cause)
            },
            Error::ResourceClosed | Error::Unfinished => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::materialization(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_become_materialization_failures() {
        let error: Error = io::Error::new(io::ErrorKind::NotFound, "missing.txt").into();
        assert!(matches!(error, Error::Materialization(_)));
        assert_eq!(
            error.to_string(),
            "sequence materialization failed: missing.txt"
        );
    }

    #[test]
    fn cause_is_preserved() {
        let error = Error::operator("bad row");
        assert_eq!(error.cause().map(|c| c.to_string()).as_deref(), Some("bad row"));
        assert!(StdError::source(&error).is_some());
        assert!(Error::ResourceClosed.cause().is_none());
    }
}
