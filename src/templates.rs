// src/templates.rs
//! Packaged script assets
//!
//! The reconcile path ships four scripts to every node: the in-place update
//! entry point, a shared shell function library, and the two cgroup driver
//! configuration hooks. They are compiled into the binary from
//! `assets/scripts/` and held in an immutable [`TemplateStore`] built once
//! by the process root. Construction fails if any asset cannot be loaded;
//! the actuator never serves requests from a partial store.

use crate::error::{Error, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Asset name of the in-place update entry script
pub const ASSET_INPLACE_UPDATE: &str = "inplace-update.sh";
/// Asset name of the shared shell function library
pub const ASSET_G_FUNCTIONS: &str = "g_functions.sh";
/// Asset name of the kubelet cgroup driver hook
pub const ASSET_KUBELET_CGROUP_DRIVER: &str = "kubelet_cgroup_driver.sh";
/// Asset name of the containerd cgroup driver hook
pub const ASSET_CONTAINERD_CGROUP_DRIVER: &str = "containerd_cgroup_driver.sh";

/// All asset names the store loads, in load order
pub const ASSET_NAMES: [&str; 4] = [
    ASSET_INPLACE_UPDATE,
    ASSET_G_FUNCTIONS,
    ASSET_KUBELET_CGROUP_DRIVER,
    ASSET_CONTAINERD_CGROUP_DRIVER,
];

/// Source of script assets, keyed by file name
pub trait AssetSource {
    fn load(&self, name: &str) -> Result<String>;
}

/// Loads assets from a directory on disk (development and testing)
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirAssets {
    fn load(&self, name: &str) -> Result<String> {
        fs::read_to_string(self.root.join(name)).map_err(|source| Error::AssetLoad {
            name: name.to_string(),
            source,
        })
    }
}

/// Immutable store of the four packaged scripts.
///
/// Safe to share across threads once constructed; it is never mutated.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    inplace_update: String,
    g_functions: String,
    kubelet_cgroup_driver: String,
    containerd_cgroup_driver: String,
}

impl TemplateStore {
    /// Build the store from the assets compiled into the binary.
    pub fn embedded() -> Self {
        Self {
            inplace_update: include_str!("../assets/scripts/inplace-update.sh").to_string(),
            g_functions: include_str!("../assets/scripts/g_functions.sh").to_string(),
            kubelet_cgroup_driver: include_str!("../assets/scripts/kubelet_cgroup_driver.sh")
                .to_string(),
            containerd_cgroup_driver: include_str!("../assets/scripts/containerd_cgroup_driver.sh")
                .to_string(),
        }
    }

    /// Build the store from an external asset source. Any load failure is
    /// fatal to construction.
    pub fn load(source: &dyn AssetSource) -> Result<Self> {
        let inplace_update = source.load(ASSET_INPLACE_UPDATE)?;
        let g_functions = source.load(ASSET_G_FUNCTIONS)?;
        let kubelet_cgroup_driver = source.load(ASSET_KUBELET_CGROUP_DRIVER)?;
        let containerd_cgroup_driver = source.load(ASSET_CONTAINERD_CGROUP_DRIVER)?;
        debug!("loaded {} script assets", ASSET_NAMES.len());

        Ok(Self {
            inplace_update,
            g_functions,
            kubelet_cgroup_driver,
            containerd_cgroup_driver,
        })
    }

    pub fn inplace_update(&self) -> &str {
        &self.inplace_update
    }

    pub fn g_functions(&self) -> &str {
        &self.g_functions
    }

    pub fn kubelet_cgroup_driver(&self) -> &str {
        &self.kubelet_cgroup_driver
    }

    pub fn containerd_cgroup_driver(&self) -> &str {
        &self.containerd_cgroup_driver
    }

    /// Asset content by name, for diagnostic listings
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            ASSET_INPLACE_UPDATE => Some(&self.inplace_update),
            ASSET_G_FUNCTIONS => Some(&self.g_functions),
            ASSET_KUBELET_CGROUP_DRIVER => Some(&self.kubelet_cgroup_driver),
            ASSET_CONTAINERD_CGROUP_DRIVER => Some(&self.containerd_cgroup_driver),
            _ => None,
        }
    }
}
