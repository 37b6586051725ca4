//! BackendId - closed set of known analytics backends
//!
//! Each variant carries the key used by the remote settings document and the
//! linkage marker used by capability probing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ContractError;

/// Known downstream analytics backend.
///
/// Adding a backend means adding a variant here; nothing else enumerates
/// backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BackendId {
    Amplitude,
    Bugsnag,
    Countly,
    Crittercism,
    Flurry,
    #[serde(rename = "Google Analytics")]
    GoogleAnalytics,
    Localytics,
    Mixpanel,
    Quantcast,
    Tapstream,
}

impl BackendId {
    /// Every known backend, in activation order.
    pub const ALL: [BackendId; 10] = [
        BackendId::Amplitude,
        BackendId::Bugsnag,
        BackendId::Countly,
        BackendId::Crittercism,
        BackendId::Flurry,
        BackendId::GoogleAnalytics,
        BackendId::Localytics,
        BackendId::Mixpanel,
        BackendId::Quantcast,
        BackendId::Tapstream,
    ];

    /// Key under which the settings document lists this backend.
    pub fn settings_key(self) -> &'static str {
        match self {
            BackendId::Amplitude => "Amplitude",
            BackendId::Bugsnag => "Bugsnag",
            BackendId::Countly => "Countly",
            BackendId::Crittercism => "Crittercism",
            BackendId::Flurry => "Flurry",
            BackendId::GoogleAnalytics => "Google Analytics",
            BackendId::Localytics => "Localytics",
            BackendId::Mixpanel => "Mixpanel",
            BackendId::Quantcast => "Quantcast",
            BackendId::Tapstream => "Tapstream",
        }
    }

    /// Linkage marker resolved by capability probing.
    ///
    /// Matches the cargo feature that links the vendor adapter into the binary.
    pub fn marker(self) -> &'static str {
        match self {
            BackendId::Amplitude => "amplitude",
            BackendId::Bugsnag => "bugsnag",
            BackendId::Countly => "countly",
            BackendId::Crittercism => "crittercism",
            BackendId::Flurry => "flurry",
            BackendId::GoogleAnalytics => "google-analytics",
            BackendId::Localytics => "localytics",
            BackendId::Mixpanel => "mixpanel",
            BackendId::Quantcast => "quantcast",
            BackendId::Tapstream => "tapstream",
        }
    }

    /// Setting a backend cannot be constructed without.
    pub fn required_setting(self) -> &'static str {
        match self {
            BackendId::Amplitude => "apiKey",
            BackendId::Bugsnag => "apiKey",
            BackendId::Countly => "appKey",
            BackendId::Crittercism => "appId",
            BackendId::Flurry => "apiKey",
            BackendId::GoogleAnalytics => "mobileTrackingId",
            BackendId::Localytics => "appKey",
            BackendId::Mixpanel => "token",
            BackendId::Quantcast => "apiKey",
            BackendId::Tapstream => "accountName",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.settings_key())
    }
}

impl FromStr for BackendId {
    type Err = ContractError;

    /// Accepts either the settings key or the linkage marker.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendId::ALL
            .into_iter()
            .find(|id| id.settings_key().eq_ignore_ascii_case(s) || id.marker() == s)
            .ok_or_else(|| ContractError::Other(format!("unknown backend '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_exhaustive_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for id in BackendId::ALL {
            assert!(seen.insert(id.settings_key()));
        }
        assert_eq!(seen.len(), BackendId::ALL.len());
    }

    #[test]
    fn test_from_str_accepts_key_and_marker() {
        assert_eq!(
            "Google Analytics".parse::<BackendId>().unwrap(),
            BackendId::GoogleAnalytics
        );
        assert_eq!(
            "google-analytics".parse::<BackendId>().unwrap(),
            BackendId::GoogleAnalytics
        );
        assert!("Segment.io".parse::<BackendId>().is_err());
    }

    #[test]
    fn test_serde_uses_settings_key() {
        let json = serde_json::to_string(&BackendId::GoogleAnalytics).unwrap();
        assert_eq!(json, "\"Google Analytics\"");
    }
}
