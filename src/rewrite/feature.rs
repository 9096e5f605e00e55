use anyhow::{Result, bail};
use std::collections::BTreeSet;
use std::fmt;

/// API group of the shared client that a file calls into.
///
/// Declaration order is the order import names are listed in a synthesized
/// import line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    Auth,
    Games,
    Matches,
    Wallet,
}

/// Ordered set of features; iteration follows enumeration order.
pub type FeatureSet = BTreeSet<Feature>;

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::Auth,
        Feature::Games,
        Feature::Matches,
        Feature::Wallet,
    ];

    /// Name exported by the API-client module for this group.
    pub fn import_name(self) -> &'static str {
        match self {
            Feature::Auth => "authAPI",
            Feature::Games => "gamesAPI",
            Feature::Matches => "matchesAPI",
            Feature::Wallet => "walletAPI",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Auth => "auth",
            Feature::Games => "games",
            Feature::Matches => "matches",
            Feature::Wallet => "wallet",
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "auth" => Ok(Feature::Auth),
            "games" => Ok(Feature::Games),
            "matches" => Ok(Feature::Matches),
            "wallet" => Ok(Feature::Wallet),
            other => bail!("unsupported feature: {}", other),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Import names for `features`, in enumeration order.
pub fn import_names(features: &FeatureSet) -> Vec<&'static str> {
    features.iter().map(|f| f.import_name()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_names_follow_enumeration_order() {
        let mut set = FeatureSet::new();
        set.insert(Feature::Wallet);
        set.insert(Feature::Auth);
        set.insert(Feature::Matches);

        assert_eq!(import_names(&set), vec!["authAPI", "matchesAPI", "walletAPI"]);
    }

    #[test]
    fn import_names_empty_set() {
        assert!(import_names(&FeatureSet::new()).is_empty());
    }

    #[test]
    fn parse_accepts_known_names() {
        for f in Feature::ALL {
            assert_eq!(Feature::parse(f.as_str()).unwrap(), f);
        }
        assert_eq!(Feature::parse(" Games ").unwrap(), Feature::Games);
    }

    #[test]
    fn parse_rejects_unknown_name() {
        let err = Feature::parse("admin").unwrap_err();
        assert!(err.to_string().contains("unsupported feature: admin"));
    }
}
