//! Arbitration of the package database lock.
//!
//! Launches from this process are serialised by a local mutex, and a launch
//! is refused while the package manager's own lock marker exists on disk.
//! The marker probe is best-effort: another process may create the marker
//! between the probe and the spawn, in which case the package manager itself
//! fails and reports it through the exit status.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use parking_lot::{Mutex, MutexGuard};

use crate::error::{Error, Result};

#[derive(Debug)]
pub struct LockArbitrator {
    launch: Mutex<()>,
    marker: PathBuf,
}

/// Permission to spawn. Dropping it lets the next launch proceed.
#[must_use = "the launch lock is released as soon as the clearance is dropped"]
pub struct Clearance<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl LockArbitrator {
    pub fn new(marker: impl Into<PathBuf>) -> Self {
        Self {
            launch: Mutex::new(()),
            marker: marker.into(),
        }
    }

    #[must_use]
    pub fn marker(&self) -> &Path {
        &self.marker
    }

    /// Takes the local launch lock and checks the external lock marker.
    ///
    /// Blocks while another launch from this process is in progress.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceLocked`] if the marker exists. The local lock
    /// is released before returning.
    pub fn acquire(&self) -> Result<Clearance<'_>> {
        let guard = self.launch.lock();

        if self.marker.exists() {
            warn!("Lock marker `{}` is present, refusing to launch", self.marker.display());
            return Err(Error::resource_locked(self.marker.display().to_string()));
        }

        debug!("Launch lock acquired");
        Ok(Clearance { _guard: guard })
    }
}
