//! Explicit performer registry.
//!
//! The registry owns the current performer list and notifies subscribed
//! listeners after every mutation. It is injected into the aggregator call;
//! nothing reads shared global state. The core is single-threaded, so
//! listeners are plain synchronous callbacks invoked before the mutating
//! call returns.

use std::fmt;

use shared::domain::{Performer, PerformerId};

pub type ListenerId = u64;

type Listener = Box<dyn Fn(&[Performer]) + Send>;

#[derive(Default)]
pub struct PerformerRegistry {
    performers: Vec<Performer>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: ListenerId,
}

impl fmt::Debug for PerformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerformerRegistry")
            .field("performers", &self.performers)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PerformerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_performers(performers: Vec<Performer>) -> Self {
        Self {
            performers,
            ..Self::default()
        }
    }

    pub fn all(&self) -> &[Performer] {
        &self.performers
    }

    pub fn is_empty(&self) -> bool {
        self.performers.is_empty()
    }

    pub fn get(&self, id: &PerformerId) -> Option<&Performer> {
        self.performers.iter().find(|performer| &performer.id == id)
    }

    /// Inserts a performer, or replaces the existing one with the same id in
    /// place (order preserved).
    pub fn upsert(&mut self, performer: Performer) {
        match self
            .performers
            .iter_mut()
            .find(|existing| existing.id == performer.id)
        {
            Some(existing) => *existing = performer,
            None => self.performers.push(performer),
        }
        self.notify();
    }

    /// Removes a performer by id. Steps referencing it are left as-is; their
    /// dangling ids read as unassigned downstream.
    pub fn remove(&mut self, id: &PerformerId) -> bool {
        let before = self.performers.len();
        self.performers.retain(|performer| &performer.id != id);
        let removed = self.performers.len() != before;
        if removed {
            self.notify();
        }
        removed
    }

    /// Wholesale replacement on load/import.
    pub fn replace_all(&mut self, performers: Vec<Performer>) {
        self.performers = performers;
        self.notify();
    }

    pub fn subscribe(&mut self, listener: impl Fn(&[Performer]) + Send + 'static) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.performers);
        }
    }
}

#[cfg(test)]
#[path = "tests/performers_tests.rs"]
mod tests;
