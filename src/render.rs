// src/render.rs
//! Shell fragment generation for caller-supplied files and units
//!
//! The script composer treats both fragments as opaque pre-rendered text;
//! this module is the seam behind it. [`FileWriter`] is the injectable
//! collaborator (content resolution can fail, e.g. a secret reference
//! without access to the referenced store), [`units_to_disk_script`] is
//! pure text generation and cannot fail.

use crate::error::{Error, Result};
use crate::model::{File, Unit};
use base64::prelude::*;

/// Default permission bits for files without explicit permissions
const DEFAULT_FILE_PERMISSIONS: u32 = 0o644;

/// Systemd unit directory files and drop-ins are written under
const SYSTEMD_UNIT_DIR: &str = "/etc/systemd/system";

/// Renders caller-supplied file descriptors into a shell fragment that
/// writes them to disk
pub trait FileWriter {
    fn files_to_disk_script(&self, namespace: &str, files: &[File]) -> Result<String>;
}

/// Renderer for inline file content.
///
/// Payloads go through base64 so arbitrary content survives the shell
/// heredoc unmangled. Secret references need access to the referenced
/// store and are rejected here.
#[derive(Debug, Default)]
pub struct ShellFileWriter;

impl FileWriter for ShellFileWriter {
    fn files_to_disk_script(&self, _namespace: &str, files: &[File]) -> Result<String> {
        let mut out = String::new();

        for file in files {
            let inline = file.content.inline.as_ref().ok_or_else(|| {
                Error::Render(format!(
                    "file {} has no inline content (secret references are not resolvable here)",
                    file.path
                ))
            })?;

            let data = match inline.encoding.as_str() {
                // Already base64 on the wire, pass through.
                "b64" => inline.data.clone(),
                "" => BASE64_STANDARD.encode(&inline.data),
                other => {
                    return Err(Error::Render(format!(
                        "file {} has unknown content encoding '{other}'",
                        file.path
                    )))
                }
            };

            let dir = parent_dir(&file.path);
            let permissions = file.permissions.unwrap_or(DEFAULT_FILE_PERMISSIONS);

            out.push_str(&format!("\nmkdir -p '{dir}'\n"));
            out.push_str(&format!(
                "cat << EOF | base64 -d > '{}'\n{data}\nEOF\n",
                file.path
            ));
            out.push_str(&format!("chmod '{permissions:04o}' '{}'\n", file.path));
        }

        Ok(out)
    }
}

/// Renders caller-supplied unit descriptors into a shell fragment that
/// writes unit files and drop-ins to disk, in input order.
pub fn units_to_disk_script(units: &[Unit]) -> String {
    let mut out = String::new();

    for unit in units {
        let unit_path = format!("{SYSTEMD_UNIT_DIR}/{}", unit.name);

        if let Some(content) = &unit.content {
            out.push_str(&format!("\ncat << EOF > '{unit_path}'\n{content}\nEOF\n"));
        }

        for drop_in in &unit.drop_ins {
            let dir = format!("{unit_path}.d");
            out.push_str(&format!("\nmkdir -p '{dir}'\n"));
            out.push_str(&format!(
                "cat << EOF > '{dir}/{}'\n{}\nEOF\n",
                drop_in.name, drop_in.content
            ));
        }
    }

    out
}

fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => ".",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DropIn, FileContent, FileContentInline, FileContentSecretRef};

    fn inline_file(path: &str, data: &str) -> File {
        File {
            path: path.to_string(),
            permissions: Some(0o600),
            content: FileContent::inline(data),
        }
    }

    #[test]
    fn test_files_script_encodes_content() {
        let files = vec![inline_file("/etc/foo/bar.conf", "hello")];
        let script = ShellFileWriter
            .files_to_disk_script("shoot--test", &files)
            .unwrap();

        assert!(script.contains("mkdir -p '/etc/foo'"));
        assert!(script.contains(&BASE64_STANDARD.encode("hello")));
        assert!(script.contains("base64 -d > '/etc/foo/bar.conf'"));
        assert!(script.contains("chmod '0600' '/etc/foo/bar.conf'"));
    }

    #[test]
    fn test_files_script_passes_through_b64() {
        let files = vec![File {
            path: "/etc/blob".to_string(),
            permissions: None,
            content: FileContent {
                inline: Some(FileContentInline {
                    encoding: "b64".to_string(),
                    data: "aGVsbG8=".to_string(),
                }),
                secret_ref: None,
            },
        }];
        let script = ShellFileWriter.files_to_disk_script("ns", &files).unwrap();

        assert!(script.contains("aGVsbG8="));
        assert!(script.contains("chmod '0644' '/etc/blob'"));
    }

    #[test]
    fn test_secret_ref_is_a_render_error() {
        let files = vec![File {
            path: "/etc/secret".to_string(),
            permissions: None,
            content: FileContent {
                inline: None,
                secret_ref: Some(FileContentSecretRef {
                    name: "my-secret".to_string(),
                    data_key: "key".to_string(),
                }),
            },
        }];
        let err = ShellFileWriter
            .files_to_disk_script("ns", &files)
            .unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn test_units_script_writes_content_and_drop_ins() {
        let mut unit = Unit::new("foo.service");
        unit.content = Some("[Unit]\nDescription=foo".to_string());
        unit.drop_ins = vec![DropIn {
            name: "10-override.conf".to_string(),
            content: "[Service]\nRestart=always".to_string(),
        }];

        let script = units_to_disk_script(&[unit]);
        assert!(script.contains("cat << EOF > '/etc/systemd/system/foo.service'"));
        assert!(script.contains("mkdir -p '/etc/systemd/system/foo.service.d'"));
        assert!(script.contains("'/etc/systemd/system/foo.service.d/10-override.conf'"));
    }

    #[test]
    fn test_empty_inputs_render_empty_fragments() {
        assert_eq!(
            ShellFileWriter.files_to_disk_script("ns", &[]).unwrap(),
            ""
        );
        assert_eq!(units_to_disk_script(&[]), "");
    }
}
