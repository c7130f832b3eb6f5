// src/reconcile.rs
//! Reconcile artifact construction
//!
//! For an already-running node the actuator emits the packaged scripts as
//! files under the script root, hooks the cgroup driver scripts into
//! kubelet and containerd via drop-ins, and describes the in-place update
//! command. Emission order is deterministic and covered by tests; paths
//! referenced from drop-ins and from the update config always name files
//! emitted in the same result.

use crate::model::{DropIn, File, FileContent, InPlaceUpdateConfig, ReconcileResult, Unit};
use crate::templates::{
    TemplateStore, ASSET_CONTAINERD_CGROUP_DRIVER, ASSET_G_FUNCTIONS, ASSET_INPLACE_UPDATE,
    ASSET_KUBELET_CGROUP_DRIVER,
};

/// Directory all emitted scripts are placed under
pub const SCRIPT_LOCATION: &str = "/opt/gardener/bin";

/// Permission bits applied uniformly to emitted scripts
pub const SCRIPT_PERMISSIONS: u32 = 0o755;

/// Unit name constants; never caller-supplied
pub const UNIT_NAME_KUBELET: &str = "kubelet.service";
pub const UNIT_NAME_CONTAINERD: &str = "containerd.service";

/// Drop-in file name used for both cgroup driver hooks
pub const DROP_IN_CGROUP_DRIVER: &str = "10-configure-cgroup-driver.conf";

fn script_file(store_content: &str, asset_name: &str) -> File {
    File {
        path: format!("{SCRIPT_LOCATION}/{asset_name}"),
        permissions: Some(SCRIPT_PERMISSIONS),
        content: FileContent::inline(store_content),
    }
}

fn cgroup_driver_unit(name: &str, script_path: &str, helper_path: &str) -> Unit {
    Unit {
        name: name.to_string(),
        enable: None,
        content: None,
        drop_ins: vec![DropIn {
            name: DROP_IN_CGROUP_DRIVER.to_string(),
            content: format!("[Service]\nExecStartPre={script_path}\n"),
        }],
        file_paths: vec![helper_path.to_string(), script_path.to_string()],
    }
}

/// Builds the full artifact set for the reconcile purpose.
///
/// Infallible once the template store is constructed, and a pure function
/// of its inputs: identical input yields byte-identical output.
pub fn build_reconcile_artifacts(
    store: &TemplateStore,
    os_version: Option<&str>,
) -> ReconcileResult {
    let mut files = Vec::new();
    let mut units = Vec::new();

    // In-place update script and the command description pointing at it.
    let update_script = script_file(store.inplace_update(), ASSET_INPLACE_UPDATE);
    let in_place_update = InPlaceUpdateConfig {
        os_update_command: update_script.path.clone(),
        os_update_command_args: vec![os_version.unwrap_or_default().to_string()],
    };
    files.push(update_script);

    // Shared helper library, sourced by both cgroup driver scripts.
    let helper = script_file(store.g_functions(), ASSET_G_FUNCTIONS);
    let helper_path = helper.path.clone();
    files.push(helper);

    // Kubelet cgroup driver hook.
    let kubelet_script = script_file(store.kubelet_cgroup_driver(), ASSET_KUBELET_CGROUP_DRIVER);
    units.push(cgroup_driver_unit(
        UNIT_NAME_KUBELET,
        &kubelet_script.path,
        &helper_path,
    ));
    files.push(kubelet_script);

    // Containerd cgroup driver hook.
    let containerd_script = script_file(
        store.containerd_cgroup_driver(),
        ASSET_CONTAINERD_CGROUP_DRIVER,
    );
    units.push(cgroup_driver_unit(
        UNIT_NAME_CONTAINERD,
        &containerd_script.path,
        &helper_path,
    ));
    files.push(containerd_script);

    ReconcileResult {
        files,
        units,
        in_place_update: Some(in_place_update),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(os_version: Option<&str>) -> ReconcileResult {
        build_reconcile_artifacts(&TemplateStore::embedded(), os_version)
    }

    #[test]
    fn test_emits_expected_files_and_units() {
        let result = build(Some("1312.0"));

        let file_paths: Vec<&str> = result.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            file_paths,
            [
                "/opt/gardener/bin/inplace-update.sh",
                "/opt/gardener/bin/g_functions.sh",
                "/opt/gardener/bin/kubelet_cgroup_driver.sh",
                "/opt/gardener/bin/containerd_cgroup_driver.sh",
            ]
        );

        let unit_names: Vec<&str> = result.units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(unit_names, [UNIT_NAME_KUBELET, UNIT_NAME_CONTAINERD]);
    }

    #[test]
    fn test_update_config_points_at_emitted_file() {
        let result = build(Some("1312.0"));
        let update = result.in_place_update.unwrap();

        assert_eq!(update.os_update_command, "/opt/gardener/bin/inplace-update.sh");
        assert_eq!(update.os_update_command_args, vec!["1312.0".to_string()]);
        assert!(result
            .files
            .iter()
            .any(|f| f.path == update.os_update_command));
    }

    #[test]
    fn test_unset_os_version_becomes_empty_arg() {
        let update = build(None).in_place_update.unwrap();
        assert_eq!(update.os_update_command_args, vec![String::new()]);
    }

    #[test]
    fn test_unit_file_paths_reference_emitted_files() {
        let result = build(None);
        for unit in &result.units {
            for path in &unit.file_paths {
                assert!(
                    result.files.iter().any(|f| &f.path == path),
                    "unit {} references unemitted file {path}",
                    unit.name
                );
            }
        }
    }

    #[test]
    fn test_drop_ins_run_the_scripts_as_pre_start_hooks() {
        let result = build(None);

        let kubelet = &result.units[0];
        assert_eq!(kubelet.drop_ins.len(), 1);
        assert_eq!(kubelet.drop_ins[0].name, DROP_IN_CGROUP_DRIVER);
        assert_eq!(
            kubelet.drop_ins[0].content,
            "[Service]\nExecStartPre=/opt/gardener/bin/kubelet_cgroup_driver.sh\n"
        );

        let containerd = &result.units[1];
        assert_eq!(
            containerd.drop_ins[0].content,
            "[Service]\nExecStartPre=/opt/gardener/bin/containerd_cgroup_driver.sh\n"
        );
    }

    #[test]
    fn test_scripts_carry_uniform_permissions() {
        let result = build(None);
        for file in &result.files {
            assert_eq!(file.permissions, Some(SCRIPT_PERMISSIONS));
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        assert_eq!(build(Some("1312.0")), build(Some("1312.0")));
    }
}
