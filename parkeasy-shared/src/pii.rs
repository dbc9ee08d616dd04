use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A wrapper for sensitive data (passwords, full card numbers) that masks its
/// value in Debug output and can be customized for Serialization.
#[derive(Clone, Deserialize)]
pub struct Masked<T>(pub T);

impl<T: fmt::Display> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: fmt::Display> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // API responses need the real value; the wrapper exists to prevent
        // accidental leakage in log macros like tracing::info!("{:?}", req).
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_output_is_masked() {
        let secret = Masked("password123".to_string());
        assert_eq!(format!("{:?}", secret), "********");
        assert_eq!(secret.into_inner(), "password123");
    }
}
