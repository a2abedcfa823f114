// Substitute behaviour policy

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decides what the container does with dependencies that have not been
/// configured before `create_instance` is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubstituteBehaviour {
    /// Substitute every unconfigured dependency; classes get partial
    /// substitutes, interfaces full ones
    #[default]
    #[serde(alias = "loose-full")]
    Automatic,
    /// Prefer partial substitutes wherever the type supports them
    LooseParts,
    /// Unconfigured dependencies are supplied as null
    #[serde(alias = "strict")]
    ManualWithNulls,
    /// Unconfigured dependencies are substitutes whose every member raises
    ManualWithExceptions,
}

impl SubstituteBehaviour {
    pub const LOOSE_FULL: SubstituteBehaviour = SubstituteBehaviour::Automatic;
    pub const STRICT: SubstituteBehaviour = SubstituteBehaviour::ManualWithNulls;

    pub const ALL: [SubstituteBehaviour; 4] = [
        SubstituteBehaviour::Automatic,
        SubstituteBehaviour::LooseParts,
        SubstituteBehaviour::ManualWithNulls,
        SubstituteBehaviour::ManualWithExceptions,
    ];

    /// Policies that synthesize substitutes on demand
    pub fn is_automatic(&self) -> bool {
        matches!(self, SubstituteBehaviour::Automatic | SubstituteBehaviour::LooseParts)
    }

    pub fn is_manual(&self) -> bool {
        !self.is_automatic()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubstituteBehaviour::Automatic => "automatic",
            SubstituteBehaviour::LooseParts => "loose-parts",
            SubstituteBehaviour::ManualWithNulls => "manual-with-nulls",
            SubstituteBehaviour::ManualWithExceptions => "manual-with-exceptions",
        }
    }

    /// Name used in failure messages
    pub fn display_name(&self) -> &'static str {
        match self {
            SubstituteBehaviour::Automatic => "Automatic",
            SubstituteBehaviour::LooseParts => "Loose Parts",
            SubstituteBehaviour::ManualWithNulls => "Manual with Nulls",
            SubstituteBehaviour::ManualWithExceptions => "Manual with Exceptions",
        }
    }
}

impl fmt::Display for SubstituteBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SubstituteBehaviour {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "automatic" | "loose-full" => Ok(SubstituteBehaviour::Automatic),
            "loose-parts" => Ok(SubstituteBehaviour::LooseParts),
            "manual-with-nulls" | "strict" => Ok(SubstituteBehaviour::ManualWithNulls),
            "manual-with-exceptions" => Ok(SubstituteBehaviour::ManualWithExceptions),
            other => Err(Error::Config(format!(
                "Unknown substitute behaviour '{}'. Expected one of: automatic, loose-full, loose-parts, manual-with-nulls, strict, manual-with-exceptions",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(SubstituteBehaviour::LOOSE_FULL, SubstituteBehaviour::Automatic);
        assert_eq!(SubstituteBehaviour::STRICT, SubstituteBehaviour::ManualWithNulls);
        assert_eq!("strict".parse::<SubstituteBehaviour>().unwrap(), SubstituteBehaviour::STRICT);
        assert_eq!(
            "LOOSE_FULL".parse::<SubstituteBehaviour>().unwrap(),
            SubstituteBehaviour::Automatic
        );
    }

    #[test]
    fn test_parse_round_trips_as_str() {
        for behaviour in SubstituteBehaviour::ALL {
            assert_eq!(behaviour.as_str().parse::<SubstituteBehaviour>().unwrap(), behaviour);
        }
    }

    #[test]
    fn test_parse_unknown() {
        let error = "lenient".parse::<SubstituteBehaviour>().unwrap_err();
        assert!(matches!(error, Error::Config(message) if message.contains("'lenient'")));
    }

    #[test]
    fn test_categories() {
        assert!(SubstituteBehaviour::Automatic.is_automatic());
        assert!(SubstituteBehaviour::LooseParts.is_automatic());
        assert!(SubstituteBehaviour::ManualWithNulls.is_manual());
        assert!(SubstituteBehaviour::ManualWithExceptions.is_manual());
    }

    #[test]
    fn test_display() {
        assert_eq!(SubstituteBehaviour::ManualWithNulls.to_string(), "Manual with Nulls");
        assert_eq!(SubstituteBehaviour::default(), SubstituteBehaviour::Automatic);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&SubstituteBehaviour::ManualWithExceptions).unwrap();
        assert_eq!(json, "\"manual-with-exceptions\"");

        let parsed: SubstituteBehaviour = serde_json::from_str("\"loose-full\"").unwrap();
        assert_eq!(parsed, SubstituteBehaviour::Automatic);
    }
}
