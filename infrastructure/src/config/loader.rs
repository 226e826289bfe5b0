//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

const APP_DIR: &str = "llm-council";
const PROJECT_FILES: [&str; 2] = ["council.toml", ".council.toml"];
const ENV_PREFIX: &str = "COUNCIL_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables: `COUNCIL_*` (e.g. `COUNCIL_BEHAVIOR__FAST`,
    ///    with `__` separating the section from the key)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./council.toml` or `./.council.toml`
    /// 4. User config: `~/.config/llm-council/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the user-level config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [     ] Env:     {ENV_PREFIX}*");

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./council.toml or ./.council.toml");
        }

        if let Some(path) = Self::global_config_path() {
            let marker = if path.exists() { "FOUND" } else { "     " };
            println!("  [{marker}] Global:  {}", path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.council.councilors.len(), 4);
        assert!(!config.behavior.fast);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("llm-council"));
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "council.toml",
                r#"
                    [council]
                    min_quorum = 3

                    [behavior]
                    fast = true
                "#,
            )?;

            let config = ConfigLoader::load(None).expect("load");
            assert_eq!(config.council.min_quorum, 3);
            assert!(config.behavior.fast);
            // Untouched sections keep their defaults
            assert_eq!(config.council.councilors.len(), 4);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "council.toml",
                r#"
                    [behavior]
                    max_retries = 5
                "#,
            )?;
            jail.set_env("COUNCIL_BEHAVIOR__MAX_RETRIES", "0");

            let config = ConfigLoader::load(None).expect("load");
            assert_eq!(config.behavior.max_retries, 0);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path_overrides_project_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "council.toml",
                r#"
                    [council]
                    min_quorum = 3
                "#,
            )?;
            jail.create_file(
                "override.toml",
                r#"
                    [council]
                    min_quorum = 4
                "#,
            )?;

            let path = PathBuf::from("override.toml");
            let config = ConfigLoader::load(Some(&path)).expect("load");
            assert_eq!(config.council.min_quorum, 4);
            Ok(())
        });
    }
}
