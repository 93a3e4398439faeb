use tracing::{debug, trace};

use crate::context::BufferOptions;
use crate::errors::Result;
use crate::slots::{self, OwnerToken, StoreId};
use crate::snapshot::Snapshot;

/// Holds one message buffer per calling thread.
///
/// The handle owns no messages itself: each thread's slot lives in that
/// thread's local storage, keyed by this store's [`StoreId`]. A thread can
/// only ever reach its own slot, so no locking is involved and the store can
/// be shared freely across threads. Slots left on other threads when the
/// store is dropped are swept the next time those threads touch any store.
#[derive(Debug)]
pub struct ContextStore {
    id: StoreId,
    owner: OwnerToken,
    options: BufferOptions,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::with_options(BufferOptions::default())
    }

    pub fn with_options(options: BufferOptions) -> Self {
        Self { id: StoreId::next(), owner: OwnerToken::default(), options }
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    pub fn options(&self) -> &BufferOptions {
        &self.options
    }

    /// Append `message` to the calling thread's buffer, creating it if absent.
    pub fn append(&self, message: impl Into<String>) -> Result<()> {
        let message = message.into();
        trace!(store = %self.id, %message, "append");
        slots::with_slots(|slots| slots.get_or_create(self.id, &self.owner).push(message))
    }

    /// Copy of the calling thread's buffer. Creates an empty slot if absent.
    pub fn snapshot(&self) -> Result<Snapshot> {
        slots::with_slots(|slots| {
            Snapshot::from(slots.get_or_create(self.id, &self.owner).clone())
        })
    }

    /// Number of messages in the calling thread's buffer. Creates an empty slot if absent.
    pub fn len(&self) -> Result<usize> {
        slots::with_slots(|slots| slots.get_or_create(self.id, &self.owner).len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Whether the calling thread currently holds a slot. Never creates one.
    pub fn has_slot(&self) -> Result<bool> {
        slots::with_slots(|slots| slots.contains(&self.id))
    }

    /// Remove the calling thread's slot and return what it held.
    ///
    /// With `report_size_after_clear` set, the slot is read back right away,
    /// which recreates it empty, and its size is logged.
    pub fn clear(&self) -> Result<Snapshot> {
        let captured = slots::with_slots(|slots| slots.remove(&self.id).unwrap_or_default())?;
        debug!(store = %self.id, captured = captured.len(), "context slot cleared");

        if self.options.report_size_after_clear {
            let size = self.len()?;
            debug!(store = %self.id, size, "size after clear");
        }
        Ok(Snapshot::from(captured))
    }
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ContextStore {
    fn drop(&mut self) {
        // Other threads sweep theirs once `owner` is gone.
        let _ = slots::with_slots(|slots| slots.remove(&self.id));
    }
}
