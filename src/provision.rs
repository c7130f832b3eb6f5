// src/provision.rs
//! One-shot provisioning script assembly
//!
//! Produces the bootstrap script executed exactly once on a fresh machine.
//! Statement order is a compatibility contract with the consuming bootstrap
//! mechanism and with golden-output tests; do not reorder.

use crate::model::Unit;

/// Assembles the provisioning script from the two pre-rendered disk-write
/// fragments and the declared units.
///
/// Fixed order: containerd default-config seeding (only if the config is
/// absent or empty, so an operator-customized config is never clobbered),
/// the containerd exec drop-in, the file fragment, the unit fragment, nfsd
/// module enablement, a best-effort hostname resolution check, service
/// manager reload, and per-unit enable+restart lines in input order.
pub fn compose_provision_script(
    files_fragment: &str,
    units_fragment: &str,
    units: &[Unit],
) -> String {
    let mut script = format!(
        r#"#!/bin/bash
if [ ! -s /etc/containerd/config.toml ]; then
  mkdir -p /etc/containerd/
  containerd config default > /etc/containerd/config.toml
  chmod 0644 /etc/containerd/config.toml
fi

mkdir -p /etc/systemd/system/containerd.service.d
cat <<EOF > /etc/systemd/system/containerd.service.d/11-exec_config.conf
[Service]
ExecStart=
ExecStart=/usr/bin/containerd --config=/etc/containerd/config.toml
EOF
chmod 0644 /etc/systemd/system/containerd.service.d/11-exec_config.conf
{files_fragment}
{units_fragment}
grep -sq "^nfsd$" /etc/modules || echo "nfsd" >>/etc/modules
modprobe nfsd
nslookup $(hostname) || systemctl restart systemd-networkd

systemctl daemon-reload
systemctl enable containerd && systemctl restart containerd
systemctl enable docker && systemctl restart docker
"#
    );

    for unit in units {
        // Unit names come from the trusted internal descriptor set and are
        // interpolated unescaped; escaping would change golden output.
        script.push_str(&format!(
            "systemctl enable '{0}' && systemctl restart --no-block '{0}'\n",
            unit.name
        ));
    }

    script
}
