//! In-memory capabilities for the theme controller
//!
//! Handles are cheap to clone and share state, so a test can keep one copy
//! while the controller owns another.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use super::{
    ColorScheme, ColorSchemeSignal, PreferenceStore, Presentation, Subscription, SubscriptionId,
};
use crate::Result;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Key/value storage held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A color-scheme signal driven by [`set`](MemorySignal::set)
#[derive(Debug, Clone)]
pub struct MemorySignal {
    sender: Arc<watch::Sender<ColorScheme>>,
    subscribers: Arc<Mutex<HashSet<SubscriptionId>>>,
    next_id: Arc<AtomicU64>,
}

impl MemorySignal {
    pub fn new(initial: ColorScheme) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
            subscribers: Arc::default(),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Simulate the OS switching schemes
    pub fn set(&self, scheme: ColorScheme) {
        self.sender.send_replace(scheme);
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }
}

impl ColorSchemeSignal for MemorySignal {
    fn current(&self) -> ColorScheme {
        *self.sender.borrow()
    }

    fn subscribe(&mut self) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.subscribers).insert(id);
        Subscription {
            id,
            changes: self.sender.subscribe(),
        }
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        lock(&self.subscribers).remove(&id);
    }
}

/// Records every scheme applied to the document
#[derive(Debug, Clone, Default)]
pub struct RecordingPresentation {
    applied: Arc<Mutex<Vec<ColorScheme>>>,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<ColorScheme> {
        lock(&self.applied).clone()
    }

    pub fn current(&self) -> Option<ColorScheme> {
        lock(&self.applied).last().copied()
    }
}

impl Presentation for RecordingPresentation {
    fn apply(&mut self, scheme: ColorScheme) {
        lock(&self.applied).push(scheme);
    }
}
