use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use tracing::trace;

use crate::errors::Result;

/// Process-unique identity of one store; keys its slot in every thread's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(u64);

impl StoreId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store#{}", self.0)
    }
}

/// Liveness token held by a store; slots keep only a weak handle to it.
pub(crate) type OwnerToken = Arc<()>;

struct Slot {
    owner: Weak<()>,
    messages: Vec<String>,
}

/// One thread's slots, keyed by store.
#[derive(Default)]
pub(crate) struct SlotTable {
    slots: HashMap<StoreId, Slot>,
}

impl SlotTable {
    pub(crate) fn get_or_create(&mut self, id: StoreId, owner: &OwnerToken) -> &mut Vec<String> {
        &mut self
            .slots
            .entry(id)
            .or_insert_with(|| Slot { owner: Arc::downgrade(owner), messages: Vec::new() })
            .messages
    }

    pub(crate) fn remove(&mut self, id: &StoreId) -> Option<Vec<String>> {
        self.slots.remove(id).map(|slot| slot.messages)
    }

    pub(crate) fn contains(&self, id: &StoreId) -> bool {
        self.slots.contains_key(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Drop slots whose store no longer exists. Returns how many went.
    fn purge_orphans(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| slot.owner.strong_count() > 0);
        before - self.slots.len()
    }
}

thread_local! {
    // One table per thread; dropped with the thread.
    static SLOTS: RefCell<SlotTable> = RefCell::new(SlotTable::default());
}

/// Run `f` against the calling thread's slot table, after sweeping out
/// slots of stores dropped elsewhere.
///
/// `f` must not call back into this function.
pub(crate) fn with_slots<R>(f: impl FnOnce(&mut SlotTable) -> R) -> Result<R> {
    let out = SLOTS.try_with(|slots| {
        let mut table = slots.borrow_mut();
        let purged = table.purge_orphans();
        if purged > 0 {
            trace!(purged, remaining = table.len(), "dropped orphaned context slots");
        }
        f(&mut table)
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ids_are_distinct() {
        let a = StoreId::next();
        let b = StoreId::next();
        assert!(a != b);
        assert!(b.as_u64() > a.as_u64());
    }

    #[test]
    fn table_is_per_thread() {
        let id = StoreId::next();
        let owner = OwnerToken::default();
        with_slots(|t| t.get_or_create(id, &owner).push("main".into())).unwrap();

        let seen = std::thread::spawn(move || with_slots(|t| t.contains(&id)).unwrap())
            .join()
            .unwrap();
        assert!(!seen);

        let here = with_slots(|t| t.remove(&id)).unwrap();
        assert_eq!(here, Some(vec!["main".to_string()]));
    }

    #[test]
    fn orphaned_slots_are_swept_on_next_access() {
        let id = StoreId::next();
        let owner = OwnerToken::default();
        with_slots(|t| t.get_or_create(id, &owner).push("stale".into())).unwrap();
        assert!(with_slots(|t| t.contains(&id)).unwrap());

        drop(owner);
        assert!(!with_slots(|t| t.contains(&id)).unwrap());
    }

    #[test]
    fn display_names_the_store() {
        let id = StoreId(7);
        assert_eq!(id.to_string(), "store#7");
    }
}
