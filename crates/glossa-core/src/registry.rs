use crate::element::ElementHandle;

/// Elements known to the translator plus the ones already translated in
/// the current enable pass.
///
/// Both sets accept inserts from any thread.
#[derive(Default)]
pub struct ElementRegistry {
    elements: scc::HashSet<ElementHandle>,
    processed: scc::HashSet<ElementHandle>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the element was already registered
    pub fn register(&self, handle: ElementHandle) -> bool {
        self.elements.insert_sync(handle).is_ok()
    }

    pub fn unregister(&self, handle: ElementHandle) {
        let _ = self.elements.remove_sync(&handle);
        let _ = self.processed.remove_sync(&handle);
    }

    pub fn contains(&self, handle: ElementHandle) -> bool {
        self.elements.contains_sync(&handle)
    }

    /// Registered handles in slot order
    pub fn snapshot(&self) -> Vec<ElementHandle> {
        let mut handles = Vec::with_capacity(self.elements.len());
        self.elements.iter_sync(|handle| {
            handles.push(*handle);
            true
        });
        handles.sort_unstable();
        handles
    }

    /// Returns false when the element was already processed in this pass
    pub fn mark_processed(&self, handle: ElementHandle) -> bool {
        self.processed.insert_sync(handle).is_ok()
    }

    pub fn is_processed(&self, handle: ElementHandle) -> bool {
        self.processed.contains_sync(&handle)
    }

    pub fn clear_processed(&self) {
        self.processed.clear_sync();
    }

    pub fn processed_len(&self) -> usize {
        self.processed.len()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
