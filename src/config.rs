//=========================================================================
// Configuration
//=========================================================================
//
// Settings for the registry, persistence and lifecycle systems.
//
// Built fluently:
// ```text
//     Config::builder()
//         .with_data_dir(dir)
//         .with_debug_shortcuts(true)
//         .build()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::persistence::{NamedMountLocator, PartType, SnapshotStore};

//=== Constants ===========================================================

pub const DEFAULT_SNAPSHOT_FILE: &str = "CustomObjectsData.json";
pub const DEFAULT_TRUNK_NAME: &str = "Boot";
const DATA_DIR_NAME: &str = "custom_objects";

//=== Config ==============================================================

/// Runtime settings.
///
/// # Default Values
///
/// - **silence_duplicate_registration**: false
/// - **debug_shortcuts**: false
/// - **data_dir**: `<local data dir>/custom_objects`
/// - **snapshot_file_name**: `CustomObjectsData.json`
/// - **menu_load_delay**: 1 s
/// - **trunk_name**: `Boot`
/// - **mount_names**: `<Tag>Mount` for every part type
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Registering an existing key is a silent no-op instead of an error.
    pub silence_duplicate_registration: bool,

    /// Enables the Ctrl+Shift+S / Ctrl+Shift+L shortcuts.
    pub debug_shortcuts: bool,

    pub data_dir: PathBuf,
    pub snapshot_file_name: String,

    /// Wait between the menu loading and restoring parts there.
    pub menu_load_delay: Duration,

    /// Object whose slot-carrying descendants are storage slots.
    pub trunk_name: String,

    /// Engine mount object name per part type.
    pub mount_names: BTreeMap<PartType, String>,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Full path of the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(&self.snapshot_file_name)
    }

    pub fn snapshot_store(&self) -> SnapshotStore {
        SnapshotStore::in_dir(&self.data_dir, &self.snapshot_file_name)
    }

    pub fn mount_locator(&self) -> NamedMountLocator {
        NamedMountLocator::new(self.mount_names.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            silence_duplicate_registration: false,
            debug_shortcuts: false,
            data_dir: default_data_dir(),
            snapshot_file_name: DEFAULT_SNAPSHOT_FILE.to_owned(),
            menu_load_delay: Duration::from_secs(1),
            trunk_name: DEFAULT_TRUNK_NAME.to_owned(),
            mount_names: NamedMountLocator::default_names(),
        }
    }
}

/// Application-private data directory, or the working directory when the
/// platform has none.
pub fn default_data_dir() -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join(DATA_DIR_NAME),
        None => {
            warn!(target: "persistence", "No local data directory; using the working directory");
            PathBuf::from(".")
        }
    }
}

//=== ConfigBuilder =======================================================

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_silenced_duplicates(mut self, silence: bool) -> Self {
        self.config.silence_duplicate_registration = silence;
        self
    }

    pub fn with_debug_shortcuts(mut self, enabled: bool) -> Self {
        self.config.debug_shortcuts = enabled;
        self
    }

    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.data_dir = dir.as_ref().to_path_buf();
        self
    }

    /// # Panics
    ///
    /// Panics if `name` is empty or contains a path separator.
    pub fn with_snapshot_file_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "Snapshot file name must not be empty");
        assert!(
            !name.contains(['/', '\\']),
            "Snapshot file name must not contain path separators, got {}",
            name
        );
        self.config.snapshot_file_name = name;
        self
    }

    pub fn with_menu_load_delay(mut self, delay: Duration) -> Self {
        self.config.menu_load_delay = delay;
        self
    }

    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn with_trunk_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "Trunk name must not be empty");
        self.config.trunk_name = name;
        self
    }

    /// Overrides the mount object name for one part type.
    pub fn with_mount_name(mut self, part: PartType, name: impl Into<String>) -> Self {
        self.config.mount_names.insert(part, name.into());
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
