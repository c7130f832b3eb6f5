// src/memoryone.rs
//! MemoryOne variant support
//!
//! Nodes running the memory-virtualization variant consume their user data
//! through a specialized cloud-init that expects a MIME multipart envelope:
//! a vendor key/value section first, the actual shell script second. This
//! module derives the vendor settings from the request's provider config
//! and wraps the provisioning script accordingly. Pure string assembly; the
//! vsmp section semantics belong to the hypervisor, not to us.

use crate::error::{Error, Result};
use crate::model::OsConfig;
use serde::{Deserialize, Serialize};

/// OS type identifying the memory-virtualization variant
pub const OS_TYPE_MEMORYONE: &str = "memoryone-gardenlinux";

/// Fixed multipart boundary marker expected by the consuming cloud-init
const BOUNDARY: &str = "==BOUNDARY==";

/// Vendor settings carried in the request's provider config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryOneConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_memory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_topology: Option<String>,
}

/// Derives the MemoryOne configuration from the request.
///
/// A request without provider config is valid (no vendor lines are
/// emitted); a provider config that does not decode is an error and no
/// envelope must be produced from it.
pub fn configuration(config: &OsConfig) -> Result<Option<MemoryOneConfig>> {
    match &config.provider_config {
        None => Ok(None),
        Some(raw) => serde_json::from_value(raw.clone())
            .map(Some)
            .map_err(|err| Error::MemoryConfig(err.to_string())),
    }
}

/// Wraps a provisioning script into the MemoryOne multipart envelope.
///
/// Vendor lines are emitted only for fields that are present; an absent
/// field produces no line at all, not an empty one.
pub fn wrap_provision_script(script: &str, config: Option<&MemoryOneConfig>) -> String {
    let mut out = format!(
        "Content-Type: multipart/mixed; boundary=\"{BOUNDARY}\"\n\
         MIME-Version: 1.0\n\
         --{BOUNDARY}\n\
         Content-Type: text/x-vsmp; section=vsmp"
    );

    if let Some(system_memory) = config.and_then(|c| c.system_memory.as_deref()) {
        out.push_str("\nsystem_memory=");
        out.push_str(system_memory);
    }
    if let Some(memory_topology) = config.and_then(|c| c.memory_topology.as_deref()) {
        out.push_str("\nmem_topology=");
        out.push_str(memory_topology);
    }

    out.push_str(&format!("\n--{BOUNDARY}\nContent-Type: text/x-shellscript\n"));
    out.push_str(script);
    out.push_str(&format!("\n--{BOUNDARY}"));

    out
}
