//! Networks a transaction can be watched on, and the operating mode that
//! decides which of them are accepted.
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use utoipa::ToSchema;

/// Network identifiers understood by the notifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    ToSchema,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Network {
    Main,
    MaticMain,
    Goerli,
}

/// Operating mode of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AppMode {
    #[default]
    Mainnet,
    Testnet,
}

impl AppMode {
    /// Networks accepted while running in this mode.
    pub fn networks(&self) -> &'static [Network] {
        match self {
            AppMode::Mainnet => &[Network::Main, Network::MaticMain],
            AppMode::Testnet => &[Network::Goerli],
        }
    }

    /// Parses `value` and checks it belongs to this mode's network set.
    pub fn parse_network(&self, value: &str) -> Option<Network> {
        value
            .parse::<Network>()
            .ok()
            .filter(|network| self.networks().contains(network))
    }
}
