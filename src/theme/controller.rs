//! Tri-state theme toggle

use super::{
    ColorScheme, ColorSchemeSignal, PreferenceStore, Presentation, Subscription, ThemePreference,
};
use crate::{Error, Result};
use std::future::Future;

/// What the toggle control shows once the preference is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleView {
    pub current: ThemePreference,
    pub next: ThemePreference,
}

/// Keeps the persisted preference, the OS signal and the document in step
///
/// A new controller is un-initialized: it has not read storage yet, so
/// [`control`](Self::control) returns `None` and the toggle renders nothing.
pub struct ThemeController<S, O, P>
where
    S: PreferenceStore,
    O: ColorSchemeSignal,
    P: Presentation,
{
    store: S,
    signal: O,
    presentation: P,
    key: String,
    preference: Option<ThemePreference>,
    subscription: Option<Subscription>,
}

impl<S, O, P> ThemeController<S, O, P>
where
    S: PreferenceStore,
    O: ColorSchemeSignal,
    P: Presentation,
{
    pub fn new(store: S, signal: O, presentation: P, key: impl Into<String>) -> Self {
        Self {
            store,
            signal,
            presentation,
            key: key.into(),
            preference: None,
            subscription: None,
        }
    }

    /// `None` until [`load`](Self::load) has run
    pub fn preference(&self) -> Option<ThemePreference> {
        self.preference
    }

    pub fn is_loaded(&self) -> bool {
        self.preference.is_some()
    }

    pub fn control(&self) -> Option<ToggleView> {
        self.preference.map(|current| ToggleView {
            current,
            next: current.next(),
        })
    }

    /// The scheme currently rendered
    pub fn effective(&self) -> Option<ColorScheme> {
        self.preference
            .map(|pref| pref.resolve(self.signal.current()))
    }

    /// Read the stored preference, apply it and start following the OS signal
    pub fn load(&mut self) -> Result<ThemePreference> {
        let stored = self.store.load(&self.key)?;
        let preference = match stored.as_deref() {
            None => ThemePreference::System,
            Some(value) => ThemePreference::from_stored(value).unwrap_or_else(|| {
                tracing::warn!(
                    "Ignoring unknown theme preference {:?} under {}",
                    value,
                    self.key
                );
                ThemePreference::System
            }),
        };

        if self.subscription.is_none() {
            self.subscription = Some(self.signal.subscribe());
        }

        self.preference = Some(preference);
        self.apply();
        tracing::debug!("Theme preference loaded: {}", preference);
        Ok(preference)
    }

    /// Advance system -> dark -> light -> system, persisting the new state
    pub fn toggle(&mut self) -> Result<ThemePreference> {
        let current = self.preference.ok_or(Error::ThemeNotLoaded)?;
        let next = current.next();

        self.store.save(&self.key, next.as_str())?;
        self.preference = Some(next);
        self.apply();
        Ok(next)
    }

    /// Pick up OS color-scheme changes
    ///
    /// Returns the scheme re-applied, if any. Changes are only applied while
    /// the preference is `system`.
    pub fn sync_system(&mut self) -> Option<ColorScheme> {
        let subscription = self.subscription.as_mut()?;
        if !subscription.changes.has_changed().unwrap_or(false) {
            return None;
        }
        let scheme = *subscription.changes.borrow_and_update();

        if self.preference == Some(ThemePreference::System) {
            self.presentation.apply(scheme);
            Some(scheme)
        } else {
            None
        }
    }

    /// Apply OS color-scheme changes as they arrive, until `shutdown` resolves
    /// or the signal closes
    ///
    /// Returns how many changes were applied. Does nothing before
    /// [`load`](Self::load) or after [`dispose`](Self::dispose).
    pub async fn follow_system<F>(&mut self, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut applied = 0;

        loop {
            let Some(subscription) = self.subscription.as_mut() else {
                break;
            };
            let changed = tokio::select! {
                _ = &mut shutdown => break,
                changed = subscription.changes.changed() => changed,
            };
            if changed.is_err() {
                tracing::debug!("Color scheme signal closed");
                break;
            }

            let scheme = *subscription.changes.borrow_and_update();
            if self.preference == Some(ThemePreference::System) {
                self.presentation.apply(scheme);
                applied += 1;
            }
        }

        applied
    }

    /// Stop following the OS signal
    pub fn dispose(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.signal.unsubscribe(subscription.id);
        }
    }

    fn apply(&mut self) {
        if let Some(scheme) = self.effective() {
            self.presentation.apply(scheme);
        }
    }
}

impl<S, O, P> Drop for ThemeController<S, O, P>
where
    S: PreferenceStore,
    O: ColorSchemeSignal,
    P: Presentation,
{
    fn drop(&mut self) {
        self.dispose();
    }
}
