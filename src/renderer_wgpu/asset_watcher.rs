use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Watches the water normal map on disk and reports rewrites.
pub struct NormalMapWatcher {
    rx: Receiver<PathBuf>,
    _watcher: RecommendedWatcher,
}

impl NormalMapWatcher {
    /// Returns `None` when the map's directory is missing or cannot be watched.
    pub fn start(normal_map: &Path) -> Option<Self> {
        let watch_dir = normal_map.parent()?;
        if !watch_dir.is_dir() {
            log::info!("normal map watcher: {watch_dir:?} not found, skipping");
            return None;
        }
        let file_name = normal_map.file_name()?.to_owned();

        let (tx, rx) = mpsc::channel();

        let mut watcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                let event = match res {
                    Ok(e) => e,
                    Err(e) => {
                        log::warn!("normal map watcher error: {e}");
                        return;
                    }
                };

                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    return;
                }

                for path in event.paths {
                    if path.file_name() == Some(file_name.as_os_str()) {
                        log::info!("normal map watcher: detected change in {}", path.display());
                        let _ = tx.send(path);
                    }
                }
            })
            .ok()?;

        if watcher
            .watch(watch_dir, RecursiveMode::NonRecursive)
            .is_err()
        {
            log::warn!("normal map watcher: failed to watch {watch_dir:?}");
            return None;
        }

        log::info!("normal map watcher started on {watch_dir:?}");
        Some(Self {
            rx,
            _watcher: watcher,
        })
    }

    /// Non-blocking. Collapses bursts of writes into the latest path.
    pub fn latest_change(&self) -> Option<PathBuf> {
        let mut latest = None;
        while let Ok(path) = self.rx.try_recv() {
            latest = Some(path);
        }
        latest
    }
}
