//! What the single minter screen shows for a given session and set of in-flight actions.

use std::collections::HashSet;

use shared::domain::Address;
use wallet_core::Action;

use crate::backend_bridge::commands::BackendCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenButton {
    ConnectWallet,
    MintNft,
    BurnNft,
}

impl ScreenButton {
    pub fn label(self) -> &'static str {
        match self {
            ScreenButton::ConnectWallet => "Connect Wallet",
            ScreenButton::MintNft => "Mint NFT",
            ScreenButton::BurnNft => "Burn NFT",
        }
    }

    pub fn command(self) -> BackendCommand {
        match self {
            ScreenButton::ConnectWallet => BackendCommand::ConnectWallet,
            ScreenButton::MintNft => BackendCommand::MintToken,
            ScreenButton::BurnNft => BackendCommand::BurnToken,
        }
    }

    fn action(self) -> Option<Action> {
        match self {
            ScreenButton::ConnectWallet => None,
            ScreenButton::MintNft => Some(Action::Mint),
            ScreenButton::BurnNft => Some(Action::Burn),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub button: ScreenButton,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenModel {
    pub title: String,
    pub account: Option<Address>,
    pub buttons: Vec<ButtonState>,
}

impl ScreenModel {
    /// Connect and mint are mutually exclusive on the account; burn is always offered.
    pub fn build(title: &str, account: Option<Address>, in_flight: &HashSet<Action>) -> Self {
        let primary = if account.is_some() {
            ScreenButton::MintNft
        } else {
            ScreenButton::ConnectWallet
        };
        let buttons = [primary, ScreenButton::BurnNft]
            .into_iter()
            .map(|button| ButtonState {
                button,
                enabled: button
                    .action()
                    .map_or(true, |action| !in_flight.contains(&action)),
            })
            .collect();

        Self {
            title: title.to_string(),
            account,
            buttons,
        }
    }

    pub fn shows(&self, button: ScreenButton) -> bool {
        self.buttons.iter().any(|state| state.button == button)
    }

    pub fn is_enabled(&self, button: ScreenButton) -> bool {
        self.buttons
            .iter()
            .any(|state| state.button == button && state.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Address {
        "0x00000000000000000000000000000000000000aa"
            .parse()
            .expect("address")
    }

    #[test]
    fn disconnected_screen_offers_connect_and_burn() {
        let model = ScreenModel::build("Scrappy Squirrels Tutorial", None, &HashSet::new());
        assert_eq!(model.title, "Scrappy Squirrels Tutorial");
        assert!(model.shows(ScreenButton::ConnectWallet));
        assert!(!model.shows(ScreenButton::MintNft));
        assert!(model.shows(ScreenButton::BurnNft));
    }

    #[test]
    fn connected_screen_offers_mint_and_burn() {
        let model = ScreenModel::build("Minter", Some(account()), &HashSet::new());
        assert!(!model.shows(ScreenButton::ConnectWallet));
        assert!(model.is_enabled(ScreenButton::MintNft));
        assert!(model.is_enabled(ScreenButton::BurnNft));
        assert_eq!(model.buttons[0].button, ScreenButton::MintNft);
    }

    #[test]
    fn in_flight_action_disables_only_its_button() {
        let in_flight = HashSet::from([Action::Mint]);
        let model = ScreenModel::build("Minter", Some(account()), &in_flight);
        assert!(model.shows(ScreenButton::MintNft));
        assert!(!model.is_enabled(ScreenButton::MintNft));
        assert!(model.is_enabled(ScreenButton::BurnNft));

        let in_flight = HashSet::from([Action::Burn]);
        let model = ScreenModel::build("Minter", None, &in_flight);
        assert!(model.is_enabled(ScreenButton::ConnectWallet));
        assert!(!model.is_enabled(ScreenButton::BurnNft));
    }

    #[test]
    fn buttons_map_to_backend_commands() {
        assert_eq!(
            ScreenButton::ConnectWallet.command(),
            BackendCommand::ConnectWallet
        );
        assert_eq!(ScreenButton::MintNft.command(), BackendCommand::MintToken);
        assert_eq!(ScreenButton::BurnNft.label(), "Burn NFT");
    }
}
