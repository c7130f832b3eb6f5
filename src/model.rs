// src/model.rs
//! Data model for OS configuration requests and generated artifacts
//!
//! The request mirrors the wire shape the orchestration layer reconciles
//! (camelCase JSON). The artifact types are what the actuator hands back:
//! files to place on disk, systemd units with drop-ins, and an optional
//! in-place update command description.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// What the caller wants the generated artifacts for.
///
/// `Provision` yields a one-shot bootstrap script for a fresh machine;
/// `Reconcile` yields persistent files and units for a running one.
/// Parsed from the request's wire string; unknown values are rejected by
/// the dispatcher, not silently defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Purpose {
    Provision,
    Reconcile,
}

/// Desired-state input, owned by the caller per reconciliation cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsConfig {
    /// Purpose discriminator, kept as the wire string so unknown values
    /// surface as `Error::UnknownPurpose` instead of a decode failure
    pub purpose: String,
    /// Namespace used to resolve referenced file content
    #[serde(default)]
    pub namespace: String,
    /// Identifier of the OS distribution variant
    #[serde(rename = "type")]
    pub os_type: String,
    /// Target OS version for in-place updates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    #[serde(default)]
    pub files: Vec<File>,
    #[serde(default)]
    pub units: Vec<Unit>,
    /// Raw variant-specific configuration (MemoryOne settings)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_config: Option<serde_json::Value>,
}

/// A file to be written to the node's filesystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Absolute path, unique within a result
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<u32>,
    pub content: FileContent,
}

/// File content, either inline or referenced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<FileContentInline>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<FileContentSecretRef>,
}

impl FileContent {
    /// Inline plain-text content
    pub fn inline(data: impl Into<String>) -> Self {
        Self {
            inline: Some(FileContentInline {
                encoding: String::new(),
                data: data.into(),
            }),
            secret_ref: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContentInline {
    /// Either empty (plain text) or "b64"
    #[serde(default)]
    pub encoding: String,
    pub data: String,
}

/// Reference to a key in a namespaced secret
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContentSecretRef {
    pub name: String,
    pub data_key: String,
}

/// A systemd unit the node should run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Systemd unit name, unique within a result
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    /// Full unit file content, when the unit is supplied by the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drop_ins: Vec<DropIn>,
    /// Paths of files the unit must not start without
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_paths: Vec<String>,
}

impl Unit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enable: None,
            content: None,
            drop_ins: Vec::new(),
            file_paths: Vec::new(),
        }
    }
}

/// A drop-in fragment overriding parts of a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropIn {
    pub name: String,
    pub content: String,
}

/// How the node agent performs an in-place OS update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InPlaceUpdateConfig {
    /// Must equal the path of a `File` emitted in the same result
    pub os_update_command: String,
    pub os_update_command_args: Vec<String>,
}

/// Artifact set produced for `Purpose::Reconcile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileResult {
    pub files: Vec<File>,
    pub units: Vec<Unit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_place_update: Option<InPlaceUpdateConfig>,
}

/// Dispatcher output: either provision user data or reconcile artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Opaque bootstrap payload, executed exactly once at first boot
    Provision(Vec<u8>),
    Reconcile(ReconcileResult),
}
