// src/actuator.rs
//! Purpose dispatch
//!
//! The actuator is the entry point the reconciliation loop calls. It owns
//! no per-request state: the template store is read-only after
//! construction, so concurrent invocations are independent. All retry and
//! backoff policy belongs to the caller; errors from collaborators are
//! returned unchanged.

use crate::error::{Error, Result};
use crate::memoryone::{self, OS_TYPE_MEMORYONE};
use crate::model::{HandleOutcome, OsConfig, Purpose};
use crate::provision::compose_provision_script;
use crate::reconcile::build_reconcile_artifacts;
use crate::render::{units_to_disk_script, FileWriter, ShellFileWriter};
use crate::templates::TemplateStore;
use tracing::{debug, info};

/// Handles OS configuration requests
pub struct Actuator {
    store: TemplateStore,
    file_writer: Box<dyn FileWriter + Send + Sync>,
}

impl Actuator {
    /// Create an actuator over a fully loaded template store
    pub fn new(store: TemplateStore) -> Self {
        Self {
            store,
            file_writer: Box::new(ShellFileWriter),
        }
    }

    /// Replace the file-content renderer (e.g. one that can resolve
    /// secret references)
    pub fn with_file_writer(mut self, file_writer: Box<dyn FileWriter + Send + Sync>) -> Self {
        self.file_writer = file_writer;
        self
    }

    /// Handle a reconcile request: dispatch on the purpose discriminator.
    pub fn reconcile(&self, config: &OsConfig) -> Result<HandleOutcome> {
        match config.purpose.parse::<Purpose>() {
            Ok(Purpose::Provision) => {
                info!(os_type = %config.os_type, "generating provision user data");
                let user_data = self.provision_user_data(config)?;
                Ok(HandleOutcome::Provision(user_data.into_bytes()))
            }
            Ok(Purpose::Reconcile) => {
                info!(os_version = ?config.os_version, "generating reconcile artifacts");
                let artifacts =
                    build_reconcile_artifacts(&self.store, config.os_version.as_deref());
                Ok(HandleOutcome::Reconcile(artifacts))
            }
            Err(_) => Err(Error::UnknownPurpose {
                purpose: config.purpose.clone(),
            }),
        }
    }

    /// Restore re-derives the same artifacts from the same request.
    pub fn restore(&self, config: &OsConfig) -> Result<HandleOutcome> {
        self.reconcile(config)
    }

    /// Deletion has nothing to clean up; always succeeds.
    pub fn delete(&self, _config: &OsConfig) -> Result<()> {
        Ok(())
    }

    pub fn migrate(&self, config: &OsConfig) -> Result<()> {
        self.delete(config)
    }

    pub fn force_delete(&self, config: &OsConfig) -> Result<()> {
        self.delete(config)
    }

    fn provision_user_data(&self, config: &OsConfig) -> Result<String> {
        let files_fragment = self
            .file_writer
            .files_to_disk_script(&config.namespace, &config.files)?;
        let units_fragment = units_to_disk_script(&config.units);

        let script = compose_provision_script(&files_fragment, &units_fragment, &config.units);

        if config.os_type == OS_TYPE_MEMORYONE {
            debug!("wrapping provision script into MemoryOne envelope");
            let memory_config = memoryone::configuration(config)?;
            return Ok(memoryone::wrap_provision_script(
                &script,
                memory_config.as_ref(),
            ));
        }

        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actuator() -> Actuator {
        Actuator::new(TemplateStore::embedded())
    }

    fn provision_request(os_type: &str) -> OsConfig {
        OsConfig {
            purpose: "provision".to_string(),
            namespace: "shoot--test--cluster".to_string(),
            os_type: os_type.to_string(),
            os_version: None,
            files: Vec::new(),
            units: Vec::new(),
            provider_config: None,
        }
    }

    #[test]
    fn test_unknown_purpose_is_rejected() {
        let mut request = provision_request("gardenlinux");
        request.purpose = "garbage".to_string();

        let err = actuator().reconcile(&request).unwrap_err();
        match err {
            Error::UnknownPurpose { purpose } => assert_eq!(purpose, "garbage"),
            other => panic!("expected UnknownPurpose, got {other:?}"),
        }
    }

    #[test]
    fn test_provision_returns_plain_script_for_regular_os_type() {
        let outcome = actuator().reconcile(&provision_request("gardenlinux")).unwrap();
        match outcome {
            HandleOutcome::Provision(bytes) => {
                let script = String::from_utf8(bytes).unwrap();
                assert!(script.starts_with("#!/bin/bash"));
                assert!(!script.contains("==BOUNDARY=="));
            }
            other => panic!("expected provision outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_provision_wraps_memoryone_os_type() {
        let mut request = provision_request(OS_TYPE_MEMORYONE);
        request.provider_config = Some(serde_json::json!({"systemMemory": "4G"}));

        let outcome = actuator().reconcile(&request).unwrap();
        match outcome {
            HandleOutcome::Provision(bytes) => {
                let envelope = String::from_utf8(bytes).unwrap();
                assert!(envelope
                    .starts_with("Content-Type: multipart/mixed; boundary=\"==BOUNDARY==\""));
                assert!(envelope.contains("system_memory=4G"));
                assert!(!envelope.contains("mem_topology="));
            }
            other => panic!("expected provision outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_memoryone_config_produces_no_envelope() {
        let mut request = provision_request(OS_TYPE_MEMORYONE);
        request.provider_config = Some(serde_json::json!(42));

        let err = actuator().reconcile(&request).unwrap_err();
        assert!(matches!(err, Error::MemoryConfig(_)));
    }

    #[test]
    fn test_restore_matches_reconcile_byte_for_byte() {
        let mut request = provision_request("gardenlinux");
        request.purpose = "reconcile".to_string();
        request.os_version = Some("1312.0".to_string());

        let a = actuator();
        assert_eq!(a.reconcile(&request).unwrap(), a.restore(&request).unwrap());
    }

    #[test]
    fn test_delete_and_aliases_are_no_ops() {
        let request = provision_request("gardenlinux");
        let a = actuator();
        assert!(a.delete(&request).is_ok());
        assert!(a.migrate(&request).is_ok());
        assert!(a.force_delete(&request).is_ok());
    }
}
