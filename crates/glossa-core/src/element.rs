use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Generational handle into an [`ElementTable`].
    ///
    /// A handle never resolves to an element other than the one it was
    /// issued for: once the element is removed the handle reports it as
    /// gone, even if the slot is reused later.
    pub struct ElementHandle;
}

/// Slot table owned by the UI layer.
///
/// The UI layer inserts elements when it creates them and removes them when
/// it destroys them; everyone else only holds [`ElementHandle`]s.
pub struct ElementTable<E> {
    slots: RwLock<SlotMap<ElementHandle, E>>,
}

impl<E> ElementTable<E> {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(SlotMap::with_key()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SlotMap<ElementHandle, E>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SlotMap<ElementHandle, E>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, value: E) -> ElementHandle {
        self.write().insert(value)
    }

    /// Destroy the element behind `handle`, returning it if it was still alive
    pub fn remove(&self, handle: ElementHandle) -> Option<E> {
        self.write().remove(handle)
    }

    pub fn contains(&self, handle: ElementHandle) -> bool {
        self.read().contains_key(handle)
    }

    /// Run `f` on the element, `None` once it is gone
    pub fn with<R>(&self, handle: ElementHandle, f: impl FnOnce(&E) -> R) -> Option<R> {
        self.read().get(handle).map(f)
    }

    pub fn with_mut<R>(&self, handle: ElementHandle, f: impl FnOnce(&mut E) -> R) -> Option<R> {
        self.write().get_mut(handle).map(f)
    }

    /// Handles of all live elements
    pub fn handles(&self) -> Vec<ElementHandle> {
        self.read().keys().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl<E> Default for ElementTable<E> {
    fn default() -> Self {
        Self::new()
    }
}
