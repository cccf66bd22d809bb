// ── Refresh application logic ──
//
// Applies freshly fetched camera and recording documents to the store.
// Cameras are reconciled into three collections at once; recordings are
// only ever inserted.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use super::Store;
use super::collection::{Entity, EntityCollection};
use crate::error::CoreError;
use crate::model::{Camera, EntityId, Recording};

/// Upsert all incoming entities, then prune any existing ids not in the
/// incoming set. Returns the number of pruned entries.
fn upsert_and_prune<T: Entity>(
    collection: &mut EntityCollection<T>,
    items: impl IntoIterator<Item = T>,
) -> usize {
    let mut seen = HashSet::new();
    for entity in items {
        seen.insert(entity.id().clone());
        collection.add(entity);
    }
    collection.retain_ids(&seen)
}

/// Build entities, keeping the first construction error aside so one bad
/// document does not stop the rest of the batch.
fn build_all<T>(
    documents: Vec<Value>,
    build: impl Fn(Value) -> Result<T, CoreError>,
) -> (Vec<T>, Option<CoreError>) {
    let mut built = Vec::with_capacity(documents.len());
    let mut first_error = None;
    for doc in documents {
        match build(doc) {
            Ok(entity) => built.push(entity),
            Err(e) => {
                warn!(error = %e, "skipping entity");
                first_error.get_or_insert(e);
            }
        }
    }
    (built, first_error)
}

impl Store {
    /// Reconcile one camera listing into the all/active/managed collections.
    ///
    /// After this call each collection holds exactly the fetched cameras
    /// matching its predicate. Cameras that fail to build are left out of
    /// every collection and the first such error is returned once the
    /// valid ones have been applied.
    pub(crate) fn apply_camera_batch(&mut self, documents: Vec<Value>) -> Result<(), CoreError> {
        let (cameras, first_error) = build_all(documents, Camera::from_json);

        let pruned = upsert_and_prune(&mut self.cameras, cameras.iter().cloned())
            + upsert_and_prune(
                &mut self.active_cameras,
                cameras.iter().filter(|c| c.is_active()).cloned(),
            )
            + upsert_and_prune(
                &mut self.managed_cameras,
                cameras.iter().filter(|c| c.managed).cloned(),
            );

        debug!(
            cameras = self.cameras.len(),
            active = self.active_cameras.len(),
            managed = self.managed_cameras.len(),
            pruned,
            "camera refresh applied"
        );

        first_error.map_or(Ok(()), Err)
    }

    /// Insert or replace recordings, returning the applied ids in fetch
    /// order. Nothing is pruned.
    pub(crate) fn apply_recording_batch(
        &mut self,
        documents: Vec<Value>,
    ) -> Result<Vec<EntityId>, CoreError> {
        let (recordings, first_error) = build_all(documents, Recording::from_json);
        let ids: Vec<EntityId> = recordings.iter().map(|r| r.id.clone()).collect();
        for rec in recordings {
            self.recordings.add(rec);
        }

        debug!(
            fetched = ids.len(),
            recordings = self.recordings.len(),
            "recording refresh applied"
        );

        first_error.map_or(Ok(ids), Err)
    }

    pub(crate) fn replace_recording(&mut self, recording: Recording) {
        self.recordings.add(recording);
    }

    /// Put an updated camera into each collection whose predicate it now
    /// satisfies, and take it out of the others.
    pub(crate) fn replace_camera(&mut self, camera: Camera) {
        let id = camera.id.clone();
        place(&mut self.active_cameras, &camera, camera.is_active());
        place(&mut self.managed_cameras, &camera, camera.managed);
        self.cameras.add(camera);
        debug!(camera_id = %id, "camera replaced");
    }
}

fn place(collection: &mut EntityCollection<Camera>, camera: &Camera, belongs: bool) {
    if belongs {
        collection.add(camera.clone());
    } else {
        collection.remove(&camera.id);
    }
}
