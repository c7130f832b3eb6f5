// src/lib.rs

//! osc-forge
//!
//! Turns a declarative node OS configuration into the artifacts a
//! Kubernetes node needs: a one-shot provisioning script for first boot, or
//! files, systemd drop-ins, and an in-place update command description for
//! a running node.
//!
//! # Architecture
//!
//! - Pure core: every operation is a synchronous transformation from an
//!   immutable request to an output value; identical input yields
//!   byte-identical output
//! - Purpose dispatch: a closed `{provision, reconcile}` discriminator with
//!   an explicit error arm for unknown values
//! - Template store: the packaged scripts are loaded once at startup into
//!   an immutable, injectable store; a partial store is a fatal error
//! - Collaborator seams: file-content rendering sits behind a trait so the
//!   orchestration layer can plug in its own resolver

pub mod actuator;
mod error;
pub mod memoryone;
pub mod model;
pub mod provision;
pub mod reconcile;
pub mod render;
pub mod templates;

pub use actuator::Actuator;
pub use error::{Error, Result};
pub use model::{
    DropIn, File, FileContent, FileContentInline, FileContentSecretRef, HandleOutcome,
    InPlaceUpdateConfig, OsConfig, Purpose, ReconcileResult, Unit,
};
pub use templates::{AssetSource, DirAssets, TemplateStore};
