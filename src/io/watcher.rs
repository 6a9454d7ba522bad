use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the storage watcher to the TUI event loop.
#[derive(Debug, PartialEq, Eq)]
pub enum StorageEvent {
    /// The watched storage entry changed on disk.
    Changed,
}

/// Watches one storage file (e.g. `todos.json`) for writes by other processes.
pub struct StorageWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<StorageEvent>,
}

impl StorageWatcher {
    /// Start watching `file`. Its parent directory is watched so that
    /// atomic rename-over writes are seen.
    pub fn start(file: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let target = file.to_path_buf();
        let dir = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };
                if is_relevant(&event, &target) {
                    let _ = tx.send(StorageEvent::Changed);
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(StorageWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll. Returns true if anything changed since the last poll.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while let Ok(StorageEvent::Changed) = self.rx.try_recv() {
            changed = true;
        }
        changed
    }
}

fn is_relevant(event: &Event, target: &Path) -> bool {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
        _ => return false,
    }
    event.paths.iter().any(|p| p.file_name() == target.file_name())
}
