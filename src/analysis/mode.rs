use serde::{Deserialize, Serialize};

/// Analysis persona / output-shape selector.
///
/// Travels with each request as an explicit field; there is no ambient
/// "current mode" anywhere in the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Lawyer,
    Corporate,
    Media,
    Public,
}

impl Mode {
    /// All supported modes, in registry order.
    pub const ALL: [Mode; 4] = [Mode::Lawyer, Mode::Corporate, Mode::Media, Mode::Public];

    /// Resolve a caller-supplied mode string.
    ///
    /// Absent or unrecognized values fall back to `Lawyer`, so every request
    /// resolves to a registry entry.
    pub fn resolve(raw: Option<&str>) -> Mode {
        match raw.map(str::trim) {
            Some("lawyer") => Mode::Lawyer,
            Some("corporate") => Mode::Corporate,
            Some("media") => Mode::Media,
            Some("public") => Mode::Public,
            _ => Mode::Lawyer,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Lawyer => "lawyer",
            Mode::Corporate => "corporate",
            Mode::Media => "media",
            Mode::Public => "public",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_modes() {
        assert_eq!(Mode::resolve(Some("lawyer")), Mode::Lawyer);
        assert_eq!(Mode::resolve(Some("corporate")), Mode::Corporate);
        assert_eq!(Mode::resolve(Some("media")), Mode::Media);
        assert_eq!(Mode::resolve(Some("public")), Mode::Public);
    }

    #[test]
    fn unknown_mode_falls_back_to_lawyer() {
        assert_eq!(Mode::resolve(Some("judge")), Mode::Lawyer);
        assert_eq!(Mode::resolve(Some("")), Mode::Lawyer);
        assert_eq!(Mode::resolve(None), Mode::Lawyer);
    }

    #[test]
    fn resolve_trims_whitespace() {
        assert_eq!(Mode::resolve(Some("  public  ")), Mode::Public);
    }

    #[test]
    fn serde_round_trip_is_lowercase() {
        let json = serde_json::to_string(&Mode::Corporate).unwrap();
        assert_eq!(json, "\"corporate\"");
        let back: Mode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Mode::Corporate);
    }
}
