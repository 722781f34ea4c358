use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Remote station callsign as reported by the modem, e.g. `DJ2LS-0`.
///
/// Stored verbatim; the modem is the authority on formatting, so no
/// normalization or validation happens here.
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Callsign(String);

impl Callsign {
    pub fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Callsign {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl AsRef<str> for Callsign {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_preserves_value() {
        let call = Callsign::from_raw("DJ2LS-0");
        assert_eq!(call.as_str(), "DJ2LS-0");
    }

    #[test]
    fn display_and_from_str_roundtrip() {
        let call = Callsign::from_raw("AA0AA");
        let parsed: Callsign = call.to_string().parse().unwrap();
        assert_eq!(call, parsed);
    }

    #[test]
    fn serde_is_transparent() {
        let call: Callsign = serde_json::from_str("\"N0CALL\"").unwrap();
        assert_eq!(call.as_str(), "N0CALL");
        assert_eq!(serde_json::to_string(&call).unwrap(), "\"N0CALL\"");
    }

    #[test]
    fn default_is_empty() {
        assert!(Callsign::default().is_empty());
    }
}
