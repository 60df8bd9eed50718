use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Professional domain that scopes which scenarios a session is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Ai,
    ServiceNow,
    Salesforce,
}

impl Track {
    pub const ALL: [Self; 3] = [Self::Ai, Self::ServiceNow, Self::Salesforce];

    /// Stable key used in assets and snapshots.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::ServiceNow => "servicenow",
            Self::Salesforce => "salesforce",
        }
    }

    /// Short label for headers, e.g. "ServiceNow Track".
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ai => "AI",
            Self::ServiceNow => "ServiceNow",
            Self::Salesforce => "Salesforce",
        }
    }

    /// Long-form track title shown on the selection screen.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Ai => "AI Engineering",
            Self::ServiceNow => "ServiceNow",
            Self::Salesforce => "Salesforce",
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown track '{0}' (expected ai, servicenow or salesforce)")]
pub struct UnknownTrack(pub String);

impl FromStr for Track {
    type Err = UnknownTrack;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ai" => Ok(Self::Ai),
            "servicenow" => Ok(Self::ServiceNow),
            "salesforce" => Ok(Self::Salesforce),
            other => Err(UnknownTrack(other.to_string())),
        }
    }
}
