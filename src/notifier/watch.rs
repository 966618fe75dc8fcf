//! Watches the loose-object directory for newly written objects.
//!
//! Loose objects live at `objects/<2 hex>/<38 hex>`. `notify` callbacks run
//! on a background thread and are bridged into the runtime through an
//! unbounded channel of paths.

use std::fmt;
use std::path::{Path, PathBuf};

use git2::Oid;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::NotifierError;

/// Recursive watcher over an objects directory.
pub struct ObjectWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<PathBuf>,
}

impl fmt::Debug for ObjectWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectWatcher").finish_non_exhaustive()
    }
}

impl ObjectWatcher {
    /// Starts watching `objects_dir` recursively.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Watch`] if the directory cannot be watched.
    pub fn new(objects_dir: &Path) -> Result<Self, NotifierError> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) => {
                    for path in event.paths {
                        let _ = tx.send(path);
                    }
                }
                Ok(_) => {}
                Err(err) => tracing::warn!(error = %err, "object watcher error"),
            },
            notify::Config::default(),
        )?;
        watcher.watch(objects_dir, RecursiveMode::Recursive)?;
        tracing::info!(dir = %objects_dir.display(), "watching for new objects");

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Waits for the next created or modified path.
    pub async fn next_path(&mut self) -> Option<PathBuf> {
        self.rx.recv().await
    }
}

fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parses `<..>/objects/ab/<38 hex>` into an object id.
#[must_use]
pub fn object_id_from_path(path: &Path) -> Option<Oid> {
    let name = path.file_name()?.to_str()?;
    let fan_out = path.parent()?.file_name()?.to_str()?;
    if name.len() != 38 || fan_out.len() != 2 || !is_hex(name) || !is_hex(fan_out) {
        return None;
    }
    Oid::from_str(&format!("{fan_out}{name}")).ok()
}

/// Object ids behind a watcher path.
///
/// A new fan-out directory may already hold objects written before the
/// watch on it was installed, so its entries are listed too.
#[must_use]
pub fn object_ids_for_path(path: &Path) -> Vec<Oid> {
    let is_fan_out = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.len() == 2 && is_hex(n));

    if is_fan_out && path.is_dir() {
        let Ok(entries) = std::fs::read_dir(path) else {
            return Vec::new();
        };
        return entries
            .filter_map(Result::ok)
            .filter_map(|entry| object_id_from_path(&entry.path()))
            .collect();
    }
    object_id_from_path(path).into_iter().collect()
}
