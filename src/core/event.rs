//! State-change notification.
//!
//! Listeners run synchronously, in registration order, after the machine has
//! updated its previous/active ids but before `change_state` returns.

/// View of a completed state change handed to listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateChange<'a, Id> {
    /// Active id before the change, `None` on the first change.
    pub previous: Option<&'a Id>,
    /// Active id after the change.
    pub active: &'a Id,
}

/// Handle returned by `subscribe`, used to remove the listener again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Boxed state-change callback.
pub type Listener<Id> = Box<dyn FnMut(&StateChange<'_, Id>)>;

/// Ordered list of state-change listeners.
pub struct Listeners<Id> {
    next_id: u64,
    entries: Vec<(ListenerId, Listener<Id>)>,
}

impl<Id> Listeners<Id> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&StateChange<'_, Id>) + 'static,
    {
        self.subscribe_boxed(Box::new(listener))
    }

    pub fn subscribe_boxed(&mut self, listener: Listener<Id>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if the id is unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn notify(&mut self, previous: Option<&Id>, active: &Id) {
        let change = StateChange { previous, active };
        for (_, listener) in self.entries.iter_mut() {
            listener(&change);
        }
    }
}

impl<Id> Default for Listeners<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id> std::fmt::Debug for Listeners<Id> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}
