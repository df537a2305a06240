//! The error-carrying value recognized by the executor.
//!
//! Steps never fail through a control-flow escape: a failing step returns a
//! set [`Fault`] through its ordinary output tuple, and the executor stops
//! running the remaining non-deferred steps when one lands in the pool.
//! A `Fault` that is not set is plain data like any other value, which is
//! what lets a deferred response writer read "the latest fault" and find a
//! clean zero value on the happy path.

use std::fmt;
use std::sync::Arc;

/// A clonable error slot that flows through the value pool.
///
/// `Fault::none()` (also the `Default`) means "no failure"; a set fault
/// carries an [`anyhow::Error`] payload. The payload is reference-counted so
/// the fault can be cloned into several steps' arguments like any other
/// pool value.
#[derive(Debug, Clone, Default)]
pub struct Fault(Option<Arc<anyhow::Error>>);

impl Fault {
    /// The empty fault: no failure.
    pub fn none() -> Self {
        Self(None)
    }

    /// Wrap an error into a set fault.
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Self(Some(Arc::new(error.into())))
    }

    /// Build a set fault from a display-able message.
    pub fn message(message: impl fmt::Display) -> Self {
        Self::new(anyhow::anyhow!("{message}"))
    }

    /// Whether this fault carries a failure.
    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Borrow the payload, if set.
    pub fn error(&self) -> Option<&anyhow::Error> {
        self.0.as_deref()
    }

    /// Split a `Result` into a value and a fault.
    ///
    /// `Ok(v)` becomes `(v, Fault::none())`; `Err(e)` becomes the value's
    /// zero value paired with a set fault. This is the usual way a step
    /// built from fallible code produces its output tuple.
    pub fn capture<T, E>(result: Result<T, E>) -> (T, Fault)
    where
        T: Default,
        E: Into<anyhow::Error>,
    {
        match result {
            Ok(value) => (value, Fault::none()),
            Err(error) => (T::default(), Fault::new(error)),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(error) => write!(f, "{error}"),
            None => f.write_str("no fault"),
        }
    }
}

impl From<anyhow::Error> for Fault {
    fn from(error: anyhow::Error) -> Self {
        Self::new(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unset() {
        let fault = Fault::default();
        assert!(!fault.is_set());
        assert!(fault.error().is_none());
        assert_eq!(fault.to_string(), "no fault");
    }

    #[test]
    fn test_set_fault_keeps_message() {
        let fault = Fault::message("bad payload");
        assert!(fault.is_set());
        assert_eq!(fault.to_string(), "bad payload");
    }

    #[test]
    fn test_from_std_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let fault = Fault::new(io);
        assert!(fault.is_set());
        assert!(fault.to_string().contains("gone"));
    }

    #[test]
    fn test_capture() {
        let (value, fault) = Fault::capture::<u32, std::io::Error>(Ok(7));
        assert_eq!(value, 7);
        assert!(!fault.is_set());

        let (value, fault) = Fault::capture::<u32, _>(Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "boom",
        )));
        assert_eq!(value, 0);
        assert!(fault.is_set());
    }

    #[test]
    fn test_clones_share_payload() {
        let fault = Fault::message("shared");
        let copy = fault.clone();
        assert!(copy.is_set());
        assert_eq!(copy.to_string(), fault.to_string());
    }
}
