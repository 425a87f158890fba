use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Quiet period that ends a burst of events.
const SETTLE: Duration = Duration::from_millis(100);

/// Calls back once per burst of changes to any of the given schema files.
///
/// The parent directories are watched rather than the files themselves:
/// editors that save by writing a temporary file and renaming it over the
/// original replace the inode, and a per-file watch would go quiet after the
/// first save.
pub struct SchemaWatcher {
    _watcher: RecommendedWatcher,
}

impl SchemaWatcher {
    pub fn new<F>(paths: &[PathBuf], on_change: F) -> Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let mut targets = BTreeSet::new();
        let mut dirs = BTreeSet::new();
        for path in paths {
            match watch_target(path) {
                Some((file, dir)) => {
                    targets.insert(file);
                    dirs.insert(dir);
                }
                None => warn!("Cannot watch {}: directory not found", path.display()),
            }
        }

        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(tx, Config::default())?;
        for dir in &dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
            info!(dir = %dir.display(), files = targets.len(), "watching schema directory");
        }

        std::thread::spawn(move || dispatch(rx, &targets, on_change));
        Ok(Self { _watcher: watcher })
    }
}

/// Canonical `(file, parent directory)` pair; event paths are reported under
/// the watched directory, so both sides are built from the same prefix.
fn watch_target(path: &Path) -> Option<(PathBuf, PathBuf)> {
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = std::fs::canonicalize(parent).ok()?;
    Some((dir.join(name), dir))
}

fn dispatch<F: Fn()>(rx: Receiver<notify::Result<Event>>, targets: &BTreeSet<PathBuf>, on_change: F) {
    while let Ok(first) = rx.recv() {
        let mut changed = touches(&first, targets);
        while let Ok(next) = rx.recv_timeout(SETTLE) {
            changed |= touches(&next, targets);
        }
        if changed {
            info!("Schema change detected, reloading");
            on_change();
        }
    }
    debug!("schema watcher stopped");
}

fn touches(event: &notify::Result<Event>, targets: &BTreeSet<PathBuf>) -> bool {
    match event {
        Ok(event) => {
            !matches!(event.kind, EventKind::Access(_))
                && event.paths.iter().any(|path| targets.contains(path))
        }
        Err(e) => {
            warn!(error = %e, "watch error");
            false
        }
    }
}
