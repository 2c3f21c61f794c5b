//! Redaction of personal data
//!
//! Student email addresses are personal data. Anything that formats or
//! serializes a `Sensitive<T>` sees a placeholder; only [`Sensitive::expose`]
//! reaches the value.

use serde::{Serialize, Serializer};
use std::fmt;

/// Text written wherever a sensitive value would appear
pub const REDACTED: &str = "***REDACTED***";

/// A value that never appears in logs, error text or serialized output
///
/// ```
/// use registrar_core_types::Sensitive;
///
/// let email = Sensitive::new("albert.einstein@zurich.edu");
/// assert_eq!(email.to_string(), "***REDACTED***");
/// assert_eq!(format!("{:?}", email), "Sensitive(***REDACTED***)");
/// assert_eq!(*email.expose(), "albert.einstein@zurich.edu");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the real value
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sensitive({})", REDACTED)
    }
}

impl<T> Serialize for Sensitive<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_hides_value() {
        let email = Sensitive::new("alan.turing@sherborne.edu");
        assert_eq!(email.to_string(), REDACTED);
        assert!(!format!("{:?}", email).contains("turing"));
    }

    #[test]
    fn test_serialization_hides_value() {
        #[derive(Serialize)]
        struct Contact {
            name: &'static str,
            email: Sensitive<&'static str>,
        }

        let json = serde_json::to_string(&Contact {
            name: "Albert Einstein",
            email: "albert.einstein@zurich.edu".into(),
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"name":"Albert Einstein","email":"***REDACTED***"}"#
        );
    }

    #[test]
    fn test_expose_and_into_inner() {
        let email = Sensitive::new(String::from("x@y.edu"));
        assert_eq!(email.expose(), "x@y.edu");
        assert_eq!(email.clone().into_inner(), "x@y.edu");
    }
}
