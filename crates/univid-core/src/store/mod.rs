// ── In-memory mirror of NVR state ──

pub mod collection;
mod refresh;

pub use collection::{Entity, EntityCollection, EntityRef};

use crate::model::{Camera, Recording};

/// Every collection a session keeps.
///
/// `active_cameras` and `managed_cameras` are views over the same camera
/// listing, each holding a copy of the matching cameras.
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub(crate) cameras: EntityCollection<Camera>,
    pub(crate) active_cameras: EntityCollection<Camera>,
    pub(crate) managed_cameras: EntityCollection<Camera>,
    pub(crate) recordings: EntityCollection<Recording>,
}

impl Store {
    /// All cameras from the last listing.
    pub fn cameras(&self) -> &EntityCollection<Camera> {
        &self.cameras
    }

    /// Managed and connected.
    pub fn active_cameras(&self) -> &EntityCollection<Camera> {
        &self.active_cameras
    }

    /// Managed, regardless of connectivity.
    pub fn managed_cameras(&self) -> &EntityCollection<Camera> {
        &self.managed_cameras
    }

    pub fn recordings(&self) -> &EntityCollection<Recording> {
        &self.recordings
    }
}
