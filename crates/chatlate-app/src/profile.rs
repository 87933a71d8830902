use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chatlate_config::Config;
use serde::{Deserialize, Serialize};

/// Default config shipped in the repo
const REPO_DEFAULT_CONFIG: &str = "config.json";

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Profiles stored as `<root>/profiles/<name>.json`
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Platform config directory, e.g. `~/.config/chatlate`
    pub fn user() -> anyhow::Result<Self> {
        let base = dirs::config_dir().context("No config directory on this platform")?;
        Ok(Self::new(base.join("chatlate")))
    }

    fn profiles_dir(&self) -> PathBuf {
        self.root.join("profiles")
    }

    fn profile_path(&self, name: &str) -> PathBuf {
        self.profiles_dir().join(format!("{name}.json"))
    }

    /// Create the profiles folder and seed the main profile if missing
    pub fn init(&self) -> anyhow::Result<()> {
        fs::create_dir_all(self.profiles_dir())?;

        let main_profile = self.profile_path("main");
        if !main_profile.exists() {
            let profile = Profile {
                name: "main".into(),
                value: load_repo_default_config()?,
            };
            fs::write(&main_profile, serde_json::to_string_pretty(&profile)?)?;
            tracing::info!("Created main profile at {}", main_profile.display());
        }

        Ok(())
    }

    /// Load a profile by name, falling back to main, then the repo default
    pub fn load(&self, name: &str) -> anyhow::Result<Config> {
        let profile_file = self.profile_path(name);
        if profile_file.exists() {
            return read_profile(&profile_file);
        }

        tracing::warn!("Profile {name} not found, falling back to main profile or repo default");
        let main_file = self.profile_path("main");
        if main_file.exists() {
            read_profile(&main_file)
        } else {
            load_repo_default_config()
        }
    }
}

fn read_profile(path: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(path)?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("Invalid profile {}", path.display()))?;
    tracing::info!("Loaded profile {}", profile.name);
    Ok(profile.value)
}

/// Plain config file given on the command line
pub fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(config)
}

/// Repo default config, or built-in defaults when it is absent
fn load_repo_default_config() -> anyhow::Result<Config> {
    let path = Path::new(REPO_DEFAULT_CONFIG);
    if path.exists() {
        tracing::info!("Loading repo default config...");
        load_config_file(path)
    } else {
        tracing::debug!("No {REPO_DEFAULT_CONFIG}, using built-in defaults");
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use chatlate_config::pipeline::IterationMode;

    use super::*;

    #[test]
    fn test_load_named_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        fs::create_dir_all(store.profiles_dir()).unwrap();

        let mut config = Config::default();
        config.ocr.language = "rus".to_string();
        config.pipeline.mode = IterationMode::Once;
        let profile = Profile {
            name: "dota".into(),
            value: config,
        };
        fs::write(
            store.profile_path("dota"),
            serde_json::to_string(&profile).unwrap(),
        )
        .unwrap();

        let loaded = store.load("dota").unwrap();

        assert_eq!(loaded.ocr.language, "rus");
        assert_eq!(loaded.pipeline.mode, IterationMode::Once);
    }

    #[test]
    fn test_missing_profile_falls_back_to_main() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        fs::create_dir_all(store.profiles_dir()).unwrap();

        let mut config = Config::default();
        config.translator.to_lang = "de".to_string();
        let profile = Profile {
            name: "main".into(),
            value: config,
        };
        fs::write(
            store.profile_path("main"),
            serde_json::to_string(&profile).unwrap(),
        )
        .unwrap();

        let loaded = store.load("missing").unwrap();

        assert_eq!(loaded.translator.to_lang, "de");
    }

    #[test]
    fn test_config_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"pipeline": {"max_retries": 3}}"#).unwrap();

        let config = load_config_file(&path).unwrap();

        assert_eq!(config.pipeline.max_retries, 3);
        assert_eq!(config.ocr.language, "eng");
    }

    #[test]
    fn test_invalid_config_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(load_config_file(&path).is_err());
    }
}
