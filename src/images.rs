//! Temporary image staging – downloads or copies externally-sourced images
//! into a private per-instance directory so the renderer can embed them by
//! local name, and guarantees the directory's removal after the pass.
//!
//! Downloads are best-effort: a broken image reference in the output is
//! preferable to aborting the whole document, so fetch failures are logged
//! at `warn` and swallowed. Cleanup likewise never raises.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::Document;

/// Bound on the blocking image download so a hung remote cannot stall the
/// generation pass indefinitely.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-document-instance staging area for downloaded images.
///
/// The root directory is created lazily under
/// `<configured-root>/<instance-id>/` on the first staging request of a
/// generation pass and removed unconditionally by [`cleanup`](Self::cleanup)
/// at the end of the pass. Staged files are named `NNNNNNNNNN.<ext>` with a
/// 10-digit counter starting at 1; the counter never reuses a value within
/// one pass, whether or not a download succeeded.
#[derive(Debug)]
pub struct TempImageStore {
    instance_id: Uuid,
    configured_root: Option<PathBuf>,
    root: Option<PathBuf>,
    next_sequence: u64,
}

impl TempImageStore {
    pub fn new(instance_id: Uuid) -> Self {
        TempImageStore {
            instance_id,
            configured_root: None,
            root: None,
            next_sequence: 1,
        }
    }

    /// Record the configured temp root for the coming pass. Captured from
    /// the content hook once per pass, before any hook runs.
    pub(crate) fn set_configured_root(&mut self, root: Option<PathBuf>) {
        self.configured_root = root;
    }

    /// The active staging directory, if one was created this pass.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Stage the image behind `uri` and return its generated local name.
    ///
    /// The extension is taken from `extension_override` when given, else
    /// parsed from the URI path; an undeterminable extension is an
    /// [`Error::InvalidArgument`]. A missing configured root is an
    /// [`Error::Configuration`]. A failed download is *not* an error: the
    /// name is still returned and the caller ends up with a broken image
    /// reference instead of an aborted export.
    pub fn stage(
        &mut self,
        document: &mut Document,
        uri: &str,
        extension_override: Option<&str>,
    ) -> Result<String> {
        let root = self.ensure_root(document)?;

        let extension = match extension_override {
            Some(ext) => ext.trim_start_matches('.').to_string(),
            None => extension_from_uri(uri).unwrap_or_default(),
        };
        if extension.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "cannot determine an image extension for {uri:?}"
            )));
        }

        let name = format!("{:010}.{}", self.next_sequence, extension);
        self.next_sequence += 1;

        let destination = root.join(&name);
        if let Err(err) = fetch(uri, &destination) {
            log::warn!("image download failed for {uri}: {err}");
        }

        Ok(name)
    }

    /// Remove the staging directory and detach it from the document's image
    /// search path. Safe to call when nothing was staged; never raises.
    pub fn cleanup(&mut self, document: Option<&mut Document>) {
        if let Some(root) = self.root.take() {
            if let Err(err) = fs::remove_dir_all(&root) {
                log::warn!(
                    "failed to remove temp image directory {}: {err}",
                    root.display()
                );
            }
        }
        if let Some(document) = document {
            document.image_search_path = None;
        }
    }

    fn ensure_root(&mut self, document: &mut Document) -> Result<PathBuf> {
        if let Some(root) = &self.root {
            return Ok(root.clone());
        }

        let configured = self.configured_root.as_ref().ok_or_else(|| {
            Error::Configuration("temporary image directory not specified".to_string())
        })?;

        let root = configured.join(self.instance_id.to_string());
        fs::create_dir_all(&root)?;
        log::debug!("staging temp images under {}", root.display());

        document.image_search_path = Some(root.clone());
        self.root = Some(root.clone());
        self.next_sequence = 1;
        Ok(root)
    }
}

fn extension_from_uri(uri: &str) -> Option<String> {
    let path = match Url::parse(uri) {
        Ok(url) => PathBuf::from(url.path()),
        Err(_) => PathBuf::from(uri),
    };
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_string())
}

/// Fetch `uri` into `destination`. `file://` URIs are copied locally; other
/// schemes go over HTTP with a bounded global timeout.
fn fetch(uri: &str, destination: &Path) -> io::Result<()> {
    if let Ok(url) = Url::parse(uri) {
        if url.scheme() == "file" {
            let source = url.to_file_path().map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, "invalid file URI")
            })?;
            fs::copy(source, destination)?;
            return Ok(());
        }
    }

    let config = ureq::Agent::config_builder()
        .timeout_global(Some(FETCH_TIMEOUT))
        .build();
    let agent: ureq::Agent = config.into();

    let mut response = agent
        .get(uri)
        .call()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
    let bytes = response
        .body_mut()
        .read_to_vec()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
    fs::write(destination, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_root(root: &Path) -> TempImageStore {
        let mut store = TempImageStore::new(Uuid::new_v4());
        store.set_configured_root(Some(root.to_path_buf()));
        store
    }

    #[test]
    fn staging_without_configured_root_fails() {
        let mut store = TempImageStore::new(Uuid::new_v4());
        let mut document = Document::new("Test");
        let result = store.stage(&mut document, "https://example.invalid/logo.png", None);
        assert!(matches!(result, Err(Error::Configuration(_))));
        assert!(store.root().is_none());
    }

    #[test]
    fn names_are_sequential_even_when_downloads_fail() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with_root(dir.path());
        let mut document = Document::new("Test");

        let first = store
            .stage(&mut document, "file:///nonexistent/a.png", None)
            .unwrap();
        let second = store
            .stage(&mut document, "file:///nonexistent/b.jpg", None)
            .unwrap();
        let third = store
            .stage(&mut document, "file:///nonexistent/c", Some(".gif"))
            .unwrap();

        assert_eq!(first, "0000000001.png");
        assert_eq!(second, "0000000002.jpg");
        assert_eq!(third, "0000000003.gif");
    }

    #[test]
    fn root_is_namespaced_by_instance_id() {
        let dir = tempfile::tempdir().unwrap();
        let id = Uuid::new_v4();
        let mut store = TempImageStore::new(id);
        store.set_configured_root(Some(dir.path().to_path_buf()));
        let mut document = Document::new("Test");

        store
            .stage(&mut document, "file:///nonexistent/a.png", None)
            .unwrap();

        let root = store.root().unwrap().to_path_buf();
        assert_eq!(root, dir.path().join(id.to_string()));
        assert!(root.is_dir());
        assert_eq!(document.image_search_path.as_deref(), Some(root.as_path()));
    }

    #[test]
    fn file_uri_staging_copies_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("logo.png");
        fs::write(&source, b"not really a png").unwrap();
        let uri = Url::from_file_path(&source).unwrap().to_string();

        let staging = tempfile::tempdir().unwrap();
        let mut store = store_with_root(staging.path());
        let mut document = Document::new("Test");

        let name = store.stage(&mut document, &uri, None).unwrap();
        let staged = store.root().unwrap().join(&name);
        assert_eq!(fs::read(staged).unwrap(), b"not really a png");
    }

    #[test]
    fn missing_extension_is_rejected_without_consuming_a_sequence_number() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with_root(dir.path());
        let mut document = Document::new("Test");

        let result = store.stage(&mut document, "https://example.invalid/logo", None);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));

        let name = store
            .stage(&mut document, "https://example.invalid/logo.png", None)
            .unwrap();
        assert_eq!(name, "0000000001.png");
    }

    #[test]
    fn cleanup_removes_the_directory_and_detaches_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_with_root(dir.path());
        let mut document = Document::new("Test");

        store
            .stage(&mut document, "file:///nonexistent/a.png", None)
            .unwrap();
        let root = store.root().unwrap().to_path_buf();
        assert!(root.is_dir());

        store.cleanup(Some(&mut document));
        assert!(!root.exists());
        assert!(store.root().is_none());
        assert!(document.image_search_path.is_none());
    }

    #[test]
    fn cleanup_without_staging_is_a_noop() {
        let mut store = TempImageStore::new(Uuid::new_v4());
        store.cleanup(None);
        assert!(store.root().is_none());
    }

    #[test]
    fn extension_parsing_handles_urls_and_plain_paths() {
        assert_eq!(
            extension_from_uri("https://example.com/img/photo.jpeg?size=2"),
            Some("jpeg".to_string())
        );
        assert_eq!(
            extension_from_uri("/var/images/logo.png"),
            Some("png".to_string())
        );
        assert_eq!(extension_from_uri("https://example.com/img/photo"), None);
    }
}
