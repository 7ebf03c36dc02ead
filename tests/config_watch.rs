//! Hot reload of the configuration file.

use std::path::Path;
use std::time::Duration;

use tenant_edge::config::{ConfigWatcher, EdgeConfig};
use tokio::sync::mpsc::UnboundedReceiver;

/// Save the way most editors do: write a sibling file, then rename it over.
fn save_atomically(path: &Path, contents: &str) {
    let tmp = path.with_extension("toml.swp");
    std::fs::write(&tmp, contents).unwrap();
    std::fs::rename(&tmp, path).unwrap();
}

async fn wait_for_root_domain(updates: &mut UnboundedReceiver<EdgeConfig>, root_domain: &str) -> bool {
    tokio::time::timeout(Duration::from_secs(10), async {
        while let Some(config) = updates.recv().await {
            if config.tenancy.root_domain == root_domain {
                return true;
            }
        }
        false
    })
    .await
    .unwrap_or(false)
}

#[tokio::test]
async fn test_watcher_reloads_changed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edge.toml");
    std::fs::write(&path, "[tenancy]\nroot_domain = \"planvita.com.br\"\n").unwrap();

    let (watcher, mut updates) = ConfigWatcher::new(&path);
    let _handle = watcher.run().unwrap();

    std::fs::write(&path, "[tenancy]\nroot_domain = \"staging.planvita.dev\"\n").unwrap();

    // Editors and the OS may report intermediate states; wait for the final one.
    let reloaded = tokio::time::timeout(Duration::from_secs(10), async {
        while let Some(config) = updates.recv().await {
            if config.tenancy.root_domain == "staging.planvita.dev" {
                return Some(config);
            }
        }
        None
    })
    .await
    .unwrap();

    assert!(reloaded.is_some());
}

#[tokio::test]
async fn test_invalid_file_is_not_published() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edge.toml");
    std::fs::write(&path, "").unwrap();

    let (watcher, mut updates) = ConfigWatcher::new(&path);
    let _handle = watcher.run().unwrap();

    std::fs::write(&path, "[paths]\nprotected_prefix = \"/\"\n").unwrap();

    let received = tokio::time::timeout(Duration::from_secs(3), async {
        while let Some(config) = updates.recv().await {
            if config.paths.protected_prefix == "/" {
                return true;
            }
        }
        false
    })
    .await;

    assert!(!matches!(received, Ok(true)));
}

#[tokio::test]
async fn test_watcher_survives_rename_over_saves() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edge.toml");
    std::fs::write(&path, "[tenancy]\nroot_domain = \"planvita.com.br\"\n").unwrap();

    let (watcher, mut updates) = ConfigWatcher::new(&path);
    let _handle = watcher.run().unwrap();

    save_atomically(&path, "[tenancy]\nroot_domain = \"staging.planvita.dev\"\n");
    assert!(wait_for_root_domain(&mut updates, "staging.planvita.dev").await);

    // The original inode is gone now; the second save must still be seen.
    save_atomically(&path, "[tenancy]\nroot_domain = \"second.planvita.dev\"\n");
    assert!(wait_for_root_domain(&mut updates, "second.planvita.dev").await);
}

#[tokio::test]
async fn test_sibling_files_do_not_trigger_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edge.toml");
    std::fs::write(&path, "").unwrap();

    let (watcher, mut updates) = ConfigWatcher::new(&path);
    let _handle = watcher.run().unwrap();

    std::fs::write(dir.path().join("other.toml"), "[tenancy]\nroot_domain = \"other.dev\"\n").unwrap();

    let received = tokio::time::timeout(Duration::from_secs(1), updates.recv()).await;
    assert!(received.is_err());
}
