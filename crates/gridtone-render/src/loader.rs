//! Background LUT loading.
//!
//! LUT files are parsed on a worker thread so a new selection never stalls
//! the render loop. The owner side ([`LutLoader`]) and the worker
//! ([`LoaderHandler`]) talk over two mpsc channels:
//!
//! ```text
//! LutLoader --LoaderMsg::Load{generation, name}--> LoaderHandler
//! LutLoader <--LoaderEvent::{Loaded, Failed}------ LoaderHandler
//! ```
//!
//! Every request bumps a generation counter. An event whose generation is
//! not the latest belongs to a superseded selection and is dropped on
//! arrival, so the last request always wins. While a request is pending the
//! active LUT is `None` (identity); a resolved cube is swapped in whole as
//! an `Arc`. Parsed cubes are cached by name for the loader's lifetime.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use gridtone_lut::{Lut3D, LutCatalog, LutError};
use tracing::{debug, trace, warn};

use crate::RenderError;

/// Generation counter for invalidating stale results.
pub type Generation = u64;

/// Messages from the owner to the worker.
#[derive(Debug)]
pub enum LoaderMsg {
    /// Resolve and parse a LUT.
    Load {
        /// Request generation
        generation: Generation,
        /// Catalog name
        name: String,
    },
    /// Stop the worker.
    Close,
}

/// Events from the worker to the owner.
#[derive(Debug)]
pub enum LoaderEvent {
    /// LUT parsed.
    Loaded {
        /// Generation of the originating request
        generation: Generation,
        /// Catalog name
        name: String,
        /// Parsed cube
        lut: Arc<Lut3D>,
    },
    /// Lookup or parsing failed.
    Failed {
        /// Generation of the originating request
        generation: Generation,
        /// Catalog name
        name: String,
        /// Failure reason
        error: LutError,
    },
}

/// Worker side: resolves names against the catalog directory.
pub struct LoaderHandler {
    rx: Receiver<LoaderMsg>,
    tx: Sender<LoaderEvent>,
    lut_dir: PathBuf,
}

impl LoaderHandler {
    /// Creates a handler for `lut_dir`.
    pub fn new(rx: Receiver<LoaderMsg>, tx: Sender<LoaderEvent>, lut_dir: PathBuf) -> Self {
        Self { rx, tx, lut_dir }
    }

    /// Main loop; returns on [`LoaderMsg::Close`] or when the owner is gone.
    pub fn run(self) {
        while let Ok(msg) = self.rx.recv() {
            match msg {
                LoaderMsg::Close => break,
                LoaderMsg::Load { generation, name } => {
                    let event = match self.load(&name) {
                        Ok(lut) => LoaderEvent::Loaded {
                            generation,
                            name,
                            lut: Arc::new(lut),
                        },
                        Err(error) => LoaderEvent::Failed {
                            generation,
                            name,
                            error,
                        },
                    };
                    if self.tx.send(event).is_err() {
                        break;
                    }
                }
            }
        }
        trace!("LUT loader shutdown");
    }

    fn load(&self, name: &str) -> Result<Lut3D, LutError> {
        // Rescan per request so files added during a session are picked up.
        let catalog = match LutCatalog::scan(&self.lut_dir) {
            Ok(catalog) => catalog,
            Err(LutError::Io(e)) => {
                debug!(dir = %self.lut_dir.display(), error = %e, "LUT directory unavailable");
                return Err(LutError::NotFound(name.to_string()));
            }
            Err(e) => return Err(e),
        };
        catalog.load(name)
    }
}

/// Owner side of the background loader.
pub struct LutLoader {
    tx: Sender<LoaderMsg>,
    rx: Receiver<LoaderEvent>,
    worker: Option<JoinHandle<()>>,
    generation: Generation,
    selected: Option<String>,
    pending: Option<String>,
    active: Option<Arc<Lut3D>>,
    cache: HashMap<String, Arc<Lut3D>>,
    error: Option<RenderError>,
}

impl LutLoader {
    /// Spawns the worker thread for `lut_dir`.
    pub fn spawn(lut_dir: impl Into<PathBuf>) -> Self {
        let (tx_to_worker, rx_in_worker) = channel();
        let (tx_to_owner, rx_from_worker) = channel();
        let lut_dir = lut_dir.into();
        let worker = thread::spawn(move || {
            LoaderHandler::new(rx_in_worker, tx_to_owner, lut_dir).run();
        });
        Self {
            tx: tx_to_worker,
            rx: rx_from_worker,
            worker: Some(worker),
            generation: 0,
            selected: None,
            pending: None,
            active: None,
            cache: HashMap::new(),
            error: None,
        }
    }

    /// Selects a LUT by name, `None` for no LUT.
    ///
    /// Cached cubes become active immediately; others are loaded in the
    /// background and the stage is identity until they arrive. Re-selecting
    /// the current name is a no-op.
    pub fn request(&mut self, name: Option<&str>) {
        if self.selected.as_deref() == name {
            return;
        }
        self.generation += 1;
        self.selected = name.map(str::to_string);
        self.pending = None;
        self.error = None;

        let Some(name) = name else {
            self.active = None;
            return;
        };
        if let Some(lut) = self.cache.get(name) {
            trace!(name, "LUT served from cache");
            self.active = Some(Arc::clone(lut));
            return;
        }

        self.active = None;
        self.pending = Some(name.to_string());
        debug!(name, generation = self.generation, "requesting LUT load");
        let msg = LoaderMsg::Load {
            generation: self.generation,
            name: name.to_string(),
        };
        if self.tx.send(msg).is_err() {
            self.pending = None;
            self.error = Some(RenderError::Backend("LUT loader thread is gone".into()));
        }
    }

    /// Invalidates the in-flight request; its result will be discarded.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.generation += 1;
            self.selected = None;
        }
    }

    /// Drains worker events without blocking. Returns `true` if the active
    /// LUT changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.rx.try_recv() {
            changed |= self.handle(event);
        }
        changed
    }

    /// Blocks until the pending request resolves or `timeout` elapses.
    /// Returns `true` if nothing is pending afterwards.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.poll();
        while self.pending.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(event) => {
                    self.handle(event);
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(name = ?self.pending, "timed out waiting for LUT load");
                    return false;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    self.pending = None;
                    self.error = Some(RenderError::Backend("LUT loader thread is gone".into()));
                }
            }
        }
        true
    }

    fn handle(&mut self, event: LoaderEvent) -> bool {
        match event {
            LoaderEvent::Loaded {
                generation,
                name,
                lut,
            } => {
                self.cache.insert(name.clone(), Arc::clone(&lut));
                if generation != self.generation {
                    trace!(name, generation, current = self.generation, "discarding stale LUT");
                    return false;
                }
                debug!(name, size = lut.size, "LUT active");
                self.pending = None;
                self.active = Some(lut);
                true
            }
            LoaderEvent::Failed {
                generation,
                name,
                error,
            } => {
                if generation != self.generation {
                    trace!(name, generation, "discarding stale LUT failure");
                    return false;
                }
                warn!(name, %error, "LUT unavailable, rendering without it");
                self.pending = None;
                self.error = Some(RenderError::from_lut(&name, error));
                false
            }
        }
    }

    /// The resolved LUT for the current selection, `None` while loading.
    pub fn active(&self) -> Option<Arc<Lut3D>> {
        self.active.clone()
    }

    /// The currently selected name.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Whether a load is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a cube is cached under `name`.
    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    /// Takes the failure of the current selection, if any.
    pub fn take_error(&mut self) -> Option<RenderError> {
        self.error.take()
    }
}

impl Drop for LutLoader {
    fn drop(&mut self) {
        let _ = self.tx.send(LoaderMsg::Close);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridtone_lut::write_cube;
    use std::path::Path;

    fn write_tinted(dir: &Path, name: &str, red: f32) {
        let mut lut = Lut3D::identity(2);
        for e in &mut lut.data {
            e[0] = red;
        }
        write_cube(dir.join(format!("{name}.cube")), &lut).unwrap();
    }

    const WAIT: Duration = Duration::from_secs(10);

    #[test]
    fn identity_until_loaded() {
        let dir = tempfile::tempdir().unwrap();
        write_tinted(dir.path(), "warm", 0.75);
        let mut loader = LutLoader::spawn(dir.path());

        loader.request(Some("warm"));
        assert!(loader.is_pending());
        assert!(loader.active().is_none());

        assert!(loader.wait(WAIT));
        let lut = loader.active().unwrap();
        assert_eq!(lut.apply([0.1, 0.2, 0.3])[0], 0.75);
        assert!(loader.is_cached("warm"));
    }

    #[test]
    fn last_request_wins() {
        let dir = tempfile::tempdir().unwrap();
        write_tinted(dir.path(), "first", 0.25);
        write_tinted(dir.path(), "second", 0.5);
        let mut loader = LutLoader::spawn(dir.path());

        loader.request(Some("first"));
        loader.request(Some("second"));
        assert!(loader.wait(WAIT));

        // The worker answers in order, so "first" arrived and was dropped.
        assert!(loader.is_cached("first"));
        assert_eq!(loader.active().unwrap().apply([0.0; 3])[0], 0.5);
        assert_eq!(loader.selected(), Some("second"));
    }

    #[test]
    fn deselect_discards_in_flight_load() {
        let dir = tempfile::tempdir().unwrap();
        write_tinted(dir.path(), "first", 0.25);
        write_tinted(dir.path(), "second", 0.5);
        let mut loader = LutLoader::spawn(dir.path());

        loader.request(Some("first"));
        loader.request(None);
        // Queue a later request so its arrival proves "first" was handled.
        loader.request(Some("second"));
        loader.request(None);
        loader.request(Some("second"));
        assert!(loader.wait(WAIT));
        assert_eq!(loader.active().unwrap().apply([0.0; 3])[0], 0.5);

        loader.request(None);
        loader.poll();
        assert!(loader.active().is_none());
    }

    #[test]
    fn unknown_name_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = LutLoader::spawn(dir.path());
        loader.request(Some("vivid"));
        assert!(loader.wait(WAIT));
        assert!(loader.active().is_none());
        assert!(matches!(loader.take_error(), Some(RenderError::LutNotFound(n)) if n == "vivid"));
    }

    #[test]
    fn malformed_file_reports_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.cube"), "LUT_3D_SIZE 2\n0 0 0\n").unwrap();
        let mut loader = LutLoader::spawn(dir.path());
        loader.request(Some("broken"));
        assert!(loader.wait(WAIT));
        assert!(loader.active().is_none());
        assert!(matches!(loader.take_error(), Some(RenderError::MalformedLut { .. })));
    }

    #[test]
    fn oversized_cube_keeps_worker_alive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("huge.cube"), "LUT_3D_SIZE 4194304\n").unwrap();
        write_tinted(dir.path(), "warm", 0.75);
        let mut loader = LutLoader::spawn(dir.path());
        loader.request(Some("huge"));
        assert!(loader.wait(WAIT));
        assert!(loader.active().is_none());
        assert!(matches!(loader.take_error(), Some(RenderError::MalformedLut { .. })));

        loader.request(Some("warm"));
        assert!(loader.wait(WAIT));
        assert!(loader.take_error().is_none());
        assert_eq!(loader.active().map(|lut| lut.data[0][0]), Some(0.75));
    }

    #[test]
    fn cancel_drops_pending() {
        let dir = tempfile::tempdir().unwrap();
        write_tinted(dir.path(), "warm", 0.75);
        let mut loader = LutLoader::spawn(dir.path());
        loader.request(Some("warm"));
        loader.cancel();
        assert!(!loader.is_pending());
        assert!(loader.wait(WAIT));
        assert!(loader.active().is_none());
    }
}
