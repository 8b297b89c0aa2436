//! Backend commands queued from UI to backend worker.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendCommand {
    CheckWallet,
    ConnectWallet,
    MintToken,
    BurnToken,
}

impl BackendCommand {
    pub fn name(self) -> &'static str {
        match self {
            BackendCommand::CheckWallet => "check_wallet",
            BackendCommand::ConnectWallet => "connect_wallet",
            BackendCommand::MintToken => "mint_token",
            BackendCommand::BurnToken => "burn_token",
        }
    }
}
