//! Error types used in the [`tensor_accessor`](crate) crate.

/// Error returned when an accessor can not be created over the given data.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[non_exhaustive]
pub enum Error {
    /// One of the sizes is negative.
    InvalidSizes,
    /// Some index within the sizes maps to an element outside of the data buffer.
    OutOfBounds,
    /// An element offset, or the number of elements, does not fit in `isize`.
    Overflow,
}
impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, fmt)
    }
}
#[cfg(any(error_in_core, feature = "std"))]
impl std::error::Error for Error {}

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }

    #[cfg(feature = "std")]
    #[test]
    fn error_display() {
        assert_eq!(Error::InvalidSizes.to_string(), "InvalidSizes");
        assert_eq!(Error::OutOfBounds.to_string(), "OutOfBounds");
        assert_eq!(Error::Overflow.to_string(), "Overflow");
    }

    #[cfg(feature = "std")]
    #[test]
    fn error_as_dyn_error() {
        let err: Box<dyn std::error::Error> = Box::new(Error::OutOfBounds);
        assert!(err.source().is_none());
    }
}
