use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{bail, Context};
use serde::Deserialize;
use shared::domain::{address, parse_ether, Address, U256};
use url::Url;

use crate::{
    abi::ContractArtifact, controller::ControllerConfig, transport::HttpWalletProvider,
    WalletProvider,
};

pub const SETTINGS_FILE_STEM: &str = "minter";
pub const ENV_PREFIX: &str = "APP";

pub const DEFAULT_CONTRACT_ADDRESS: Address =
    address!("0x37917bD177F41Ca4c5002688914Ea8Fd1a0800aD");

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Blank or absent means no wallet provider is available.
    pub provider_url: Option<String>,
    pub contract_address: Address,
    /// Falls back to the bundled NFTCollectible artifact.
    pub artifact_path: Option<PathBuf>,
    pub mint_quantity: u64,
    pub mint_price_eth: String,
    pub explorer_tx_url: String,
    pub receipt_poll_interval_ms: u64,
    pub confirmation_timeout_secs: Option<u64>,
    pub app_title: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider_url: Some("http://127.0.0.1:1248".into()),
            contract_address: DEFAULT_CONTRACT_ADDRESS,
            artifact_path: None,
            mint_quantity: 1,
            mint_price_eth: "0.01".into(),
            explorer_tx_url: "http://rinkeby.etherscan.io/tx/".into(),
            receipt_poll_interval_ms: 1000,
            confirmation_timeout_secs: None,
            app_title: "Scrappy Squirrels Tutorial".into(),
            log_filter: "info".into(),
        }
    }
}

/// Layers built-in defaults, the settings file, then `APP__*` environment
/// variables. Without an explicit path, `minter.toml` in the working
/// directory is used when present.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let file = match path {
        Some(path) => ::config::File::from(path).required(true),
        None => ::config::File::with_name(SETTINGS_FILE_STEM).required(false),
    };

    let settings: Settings = ::config::Config::builder()
        .add_source(file)
        .add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .context("failed to read settings")?
        .try_deserialize()
        .context("failed to parse settings")?;

    settings.validate()?;
    Ok(settings)
}

impl Settings {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.provider_endpoint()?;
        self.explorer_base()?;
        self.mint_price()?;
        if self.receipt_poll_interval_ms == 0 {
            bail!("receipt_poll_interval_ms must be greater than zero");
        }
        if self.mint_quantity == 0 {
            bail!("mint_quantity must be greater than zero");
        }
        Ok(())
    }

    pub fn provider_endpoint(&self) -> anyhow::Result<Option<Url>> {
        match self.provider_url.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Url::parse(raw)
                .map(Some)
                .with_context(|| format!("invalid provider_url '{raw}'")),
        }
    }

    pub fn explorer_base(&self) -> anyhow::Result<Url> {
        Url::parse(&self.explorer_tx_url)
            .with_context(|| format!("invalid explorer_tx_url '{}'", self.explorer_tx_url))
    }

    pub fn mint_price(&self) -> anyhow::Result<U256> {
        parse_ether(&self.mint_price_eth)
            .with_context(|| format!("invalid mint_price_eth '{}'", self.mint_price_eth))
    }

    pub fn load_artifact(&self) -> anyhow::Result<ContractArtifact> {
        match &self.artifact_path {
            Some(path) => ContractArtifact::load(path)
                .with_context(|| format!("failed to load artifact {}", path.display())),
            None => ContractArtifact::bundled().context("bundled artifact is malformed"),
        }
    }

    /// The wallet provider, if one is configured.
    pub fn detect_wallet(&self) -> anyhow::Result<Option<Arc<dyn WalletProvider>>> {
        Ok(self.provider_endpoint()?.map(|endpoint| {
            Arc::new(HttpWalletProvider::new(endpoint)) as Arc<dyn WalletProvider>
        }))
    }

    pub fn controller_config(&self) -> anyhow::Result<ControllerConfig> {
        Ok(ControllerConfig {
            contract_address: self.contract_address,
            artifact: Arc::new(self.load_artifact()?),
            mint_quantity: U256::from(self.mint_quantity),
            mint_price: self.mint_price()?,
            explorer_tx_url: self.explorer_base()?,
            receipt_poll_interval: Duration::from_millis(self.receipt_poll_interval_ms),
            confirmation_timeout: self.confirmation_timeout_secs.map(Duration::from_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_root(label: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let root = env::temp_dir().join(format!("nft_minter_{label}_{suffix}"));
        fs::create_dir_all(&root).expect("temp root");
        root
    }

    #[test]
    fn default_contract_address_matches_deployment() {
        let parsed: Address = "0x37917bD177F41Ca4c5002688914Ea8Fd1a0800aD"
            .parse()
            .expect("address");
        assert_eq!(DEFAULT_CONTRACT_ADDRESS, parsed);
    }

    #[test]
    fn defaults_are_valid_and_mint_one_for_a_hundredth_ether() {
        let settings = Settings::default();
        settings.validate().expect("valid defaults");

        let config = settings.controller_config().expect("controller config");
        assert_eq!(config.mint_quantity, U256::from(1u64));
        assert_eq!(config.mint_price, U256::from(10_000_000_000_000_000u64));
        assert!(config.confirmation_timeout.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let root = temp_root("settings");
        let path = root.join("minter.toml");
        fs::write(
            &path,
            r#"
provider_url = "http://127.0.0.1:8545"
mint_price_eth = "0.05"
confirmation_timeout_secs = 120
"#,
        )
        .expect("write settings");

        let settings = load_settings(Some(&path)).expect("load settings");
        assert_eq!(
            settings.provider_url.as_deref(),
            Some("http://127.0.0.1:8545")
        );
        assert_eq!(
            settings.mint_price().expect("price"),
            U256::from(50_000_000_000_000_000u64)
        );
        assert_eq!(settings.confirmation_timeout_secs, Some(120));
        assert_eq!(settings.contract_address, DEFAULT_CONTRACT_ADDRESS);
        assert_eq!(settings.app_title, "Scrappy Squirrels Tutorial");

        fs::remove_dir_all(root).expect("cleanup");
    }

    #[test]
    fn blank_provider_url_means_no_wallet() {
        let settings = Settings {
            provider_url: Some("  ".into()),
            ..Settings::default()
        };
        assert!(settings.detect_wallet().expect("detect").is_none());

        let settings = Settings {
            provider_url: None,
            ..Settings::default()
        };
        assert!(settings.detect_wallet().expect("detect").is_none());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_price = Settings {
            mint_price_eth: "one".into(),
            ..Settings::default()
        };
        assert!(bad_price.validate().is_err());

        let bad_explorer = Settings {
            explorer_tx_url: "not a url".into(),
            ..Settings::default()
        };
        assert!(bad_explorer.validate().is_err());

        let bad_poll = Settings {
            receipt_poll_interval_ms: 0,
            ..Settings::default()
        };
        assert!(bad_poll.validate().is_err());
    }

    #[test]
    fn missing_artifact_file_is_reported() {
        let settings = Settings {
            artifact_path: Some(PathBuf::from("/definitely/not/here/NFTCollectible.json")),
            ..Settings::default()
        };
        let err = settings.controller_config().expect_err("missing artifact");
        assert!(err.to_string().contains("failed to load artifact"));
    }
}
