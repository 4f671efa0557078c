//! YAML-backed config store.
//!
//! The store is the sole owner of `cohctl.yaml`. Every mutation is written
//! through immediately; concurrent invocations are last-writer-wins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::config::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, binary_version};
use crate::domain::{AppError, CohctlConfig, ConnectionRecord, ProfileRecord};

#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: CohctlConfig,
}

impl ConfigStore {
    /// Load `<dir>/cohctl.yaml`, or `file` when given, creating defaults as needed.
    ///
    /// The directory is created with mode 0700 when absent. A document whose
    /// version differs from this binary is rewritten in place.
    pub fn load(dir: &Path, file: Option<&Path>) -> Result<Self, AppError> {
        ensure_config_dir(dir)?;
        let path = file.map(Path::to_path_buf).unwrap_or_else(|| dir.join(CONFIG_FILE_NAME));

        let config = match fs::read_to_string(&path) {
            Ok(content) => serde_yaml::from_str::<CohctlConfig>(&content).map_err(|e| {
                AppError::ConfigCorrupt { path: path.clone(), details: e.to_string() }
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let mut store = Self { path, config: CohctlConfig::default() };
                store.save()?;
                return Ok(store);
            }
            Err(source) => return Err(AppError::ConfigUnreadable { path, source }),
        };

        let mut store = Self { path, config };
        if store.config.version != binary_version() {
            tracing::info!(
                from = %store.config.version,
                to = binary_version(),
                "updating config document version"
            );
            store.config.version = binary_version().to_string();
            store.save()?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &CohctlConfig {
        &self.config
    }

    /// Apply `change` and persist the result.
    pub fn update<F>(&mut self, change: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut CohctlConfig),
    {
        change(&mut self.config);
        self.save()
    }

    pub fn add_cluster(&mut self, record: ConnectionRecord) -> Result<(), AppError> {
        if record.name.trim().is_empty() {
            return Err(AppError::invalid("connection name must not be empty"));
        }
        if self.config.find_cluster(&record.name).is_some() {
            return Err(AppError::DuplicateName { kind: "cluster connection", name: record.name });
        }
        self.update(|config| config.clusters.push(record))
    }

    /// Remove a connection, clearing the current context if it pointed at it.
    pub fn remove_cluster(&mut self, name: &str) -> Result<(), AppError> {
        if self.config.find_cluster(name).is_none() {
            return Err(AppError::not_found(format!("unable to find cluster connection '{name}'")));
        }
        self.update(|config| {
            config.clusters.retain(|c| c.name != name);
            if config.current_context == name {
                config.current_context.clear();
            }
        })
    }

    pub fn add_profile(&mut self, profile: ProfileRecord) -> Result<(), AppError> {
        if profile.name.trim().is_empty() {
            return Err(AppError::invalid("profile name must not be empty"));
        }
        if self.config.find_profile(&profile.name).is_some() {
            return Err(AppError::DuplicateName { kind: "profile", name: profile.name });
        }
        self.update(|config| config.profiles.push(profile))
    }

    pub fn remove_profile(&mut self, name: &str) -> Result<(), AppError> {
        if self.config.find_profile(name).is_none() {
            return Err(AppError::not_found(format!("unable to find profile '{name}'")));
        }
        self.update(|config| config.profiles.retain(|p| p.name != name))
    }

    /// Set the current context; the name must refer to an existing connection.
    pub fn set_current_context(&mut self, name: &str) -> Result<(), AppError> {
        if self.config.find_cluster(name).is_none() {
            return Err(AppError::not_found(format!("unable to find cluster connection '{name}'")));
        }
        let name = name.to_string();
        self.update(|config| config.current_context = name)
    }

    pub fn clear_current_context(&mut self) -> Result<(), AppError> {
        self.update(|config| config.current_context.clear())
    }

    /// An explicit `-c` wins over the current context; with neither set this fails.
    pub fn resolve_connection(
        &self,
        explicit: Option<&str>,
    ) -> Result<&ConnectionRecord, AppError> {
        let name = match explicit.filter(|n| !n.is_empty()) {
            Some(name) => name,
            None if !self.config.current_context.is_empty() => self.config.current_context.as_str(),
            None => return Err(AppError::NoConnection),
        };
        self.config
            .find_cluster(name)
            .ok_or_else(|| {
                AppError::not_found(format!("unable to find cluster connection '{name}'"))
            })
    }

    fn save(&mut self) -> Result<(), AppError> {
        let content = serde_yaml::to_string(&self.config)
            .map_err(|e| AppError::parse("config document", e))?;
        fs::write(&self.path, content)
            .map_err(|source| AppError::ConfigUnreadable { path: self.path.clone(), source })
    }
}

/// Default config directory: `$HOME/.cohctl`.
pub fn default_config_dir() -> Result<PathBuf, AppError> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME))
        .ok_or_else(|| AppError::invalid("could not detect the home directory, use --config-dir"))
}

fn ensure_config_dir(dir: &Path) -> Result<(), AppError> {
    if dir.is_dir() {
        return Ok(());
    }
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(dir)
        .map_err(|source| AppError::ConfigUnreadable { path: dir.to_path_buf(), source })
}
