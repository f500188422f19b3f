//! Verifier configuration
//!
//! Loaded once at startup from a TOML file, `SDM_`-prefixed environment
//! variables and command-line overrides, in increasing order of precedence.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use nexum_sdm::{DerivationMode, MasterKey};
use serde::Deserialize;

/// Config file read when `--config` is not given
pub(crate) const DEFAULT_CONFIG_FILE: &str = "sdm.toml";

#[derive(Debug, Deserialize)]
pub(crate) struct Config {
    /// Master key every tag key is diversified from
    pub(crate) master_key: MasterKey,
    /// Key diversification strategy of the deployment
    #[serde(default)]
    pub(crate) derive_mode: DerivationMode,
    /// Accept only LRP-authenticated messages
    #[serde(default)]
    pub(crate) require_lrp: bool,
    /// Query parameter names used by the tags
    #[serde(default)]
    pub(crate) params: ParamNames,
}

/// Names of the query parameters the tags mirror into
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct ParamNames {
    pub(crate) uid: String,
    pub(crate) ctr: String,
    pub(crate) cmac: String,
}

impl Default for ParamNames {
    fn default() -> Self {
        Self {
            uid: "uid".to_string(),
            ctr: "ctr".to_string(),
            cmac: "cmac".to_string(),
        }
    }
}

/// Values given on the command line, taking precedence over file and environment
#[derive(Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) master_key: Option<String>,
    pub(crate) derive_mode: Option<DerivationMode>,
    pub(crate) require_lrp: Option<bool>,
}

/// Load the configuration
///
/// The master key is kept out of the environment provider: figment would parse
/// an all-digit key as a number. It arrives through [`Overrides`] instead.
pub(crate) fn load_config(path: Option<&Path>, overrides: &Overrides) -> figment::Result<Config> {
    let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);

    let mut figment = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("SDM_").ignore(&["master_key"]));

    if let Some(master_key) = &overrides.master_key {
        figment = figment.merge(("master_key", master_key));
    }
    if let Some(derive_mode) = overrides.derive_mode {
        figment = figment.merge(("derive_mode", derive_mode));
    }
    if let Some(require_lrp) = overrides.require_lrp {
        figment = figment.merge(("require_lrp", require_lrp));
    }

    figment.extract()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    const CONFIG: &str = r#"
        master_key = "000102030405060708090a0b0c0d0e0f"
        derive_mode = "legacy"

        [params]
        cmac = "m"
    "#;

    #[test]
    fn test_load_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_FILE, CONFIG)?;

            let config = load_config(None, &Overrides::default())?;
            assert_eq!(config.derive_mode, DerivationMode::Legacy);
            assert!(!config.require_lrp);
            assert_eq!(config.params.uid, "uid");
            assert_eq!(config.params.ctr, "ctr");
            assert_eq!(config.params.cmac, "m");
            assert!(!config.master_key.is_factory_default());
            Ok(())
        });
    }

    #[test]
    fn test_sample_config_loads() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_FILE, include_str!("../sdm.dist.toml"))?;

            let config = load_config(None, &Overrides::default())?;
            assert_eq!(config.derive_mode, DerivationMode::Standard);
            assert_eq!(config.params, ParamNames::default());
            assert!(config.master_key.is_factory_default());
            Ok(())
        });
    }

    #[test]
    fn test_environment_and_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", CONFIG)?;
            jail.set_env("SDM_REQUIRE_LRP", "true");
            jail.set_env("SDM_MASTER_KEY", "not a key");

            let overrides = Overrides {
                master_key: Some("00000000000000000000000000000000".to_string()),
                derive_mode: Some(DerivationMode::Standard),
                require_lrp: None,
            };
            let config = load_config(Some(Path::new("custom.toml")), &overrides)?;
            assert!(config.require_lrp);
            assert_eq!(config.derive_mode, DerivationMode::Standard);
            assert!(config.master_key.is_factory_default());
            Ok(())
        });
    }

    #[test]
    fn test_override_lifts_required_lrp() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_FILE, CONFIG)?;
            jail.set_env("SDM_REQUIRE_LRP", "true");

            assert!(load_config(None, &Overrides::default())?.require_lrp);

            let overrides = Overrides {
                require_lrp: Some(false),
                ..Overrides::default()
            };
            assert!(!load_config(None, &overrides)?.require_lrp);
            Ok(())
        });
    }

    #[test]
    fn test_missing_master_key_fails() {
        Jail::expect_with(|_| {
            assert!(load_config(None, &Overrides::default()).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_invalid_derive_mode_fails() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                master_key = "000102030405060708090a0b0c0d0e0f"
                derive_mode = "fancy"
                "#,
            )?;
            assert!(load_config(None, &Overrides::default()).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_invalid_master_key_fails() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_FILE, r#"master_key = "0011""#)?;
            assert!(load_config(None, &Overrides::default()).is_err());
            Ok(())
        });
    }
}
