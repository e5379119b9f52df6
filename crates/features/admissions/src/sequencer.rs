use crate::error::AdmissionsError;
use crate::store::DraftStore;
use std::fmt;
use tracing::{debug, warn};

/// A 1-based wizard step that never leaves `[1, total]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepIndex(u8);

impl StepIndex {
    pub const FIRST: Self = Self(1);

    /// `None` when `value` is outside `[1, total]`.
    #[must_use]
    pub const fn new(value: u8, total: u8) -> Option<Self> {
        if value >= 1 && value <= total { Some(Self(value)) } else { None }
    }

    /// Brings any persisted value back into range.
    #[must_use]
    pub fn clamped(value: i64, total: u8) -> Self {
        let total = total.max(1);
        Self(u8::try_from(value.clamp(1, i64::from(total))).unwrap_or(1))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for StepIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Tracks the current step and writes every change through to the store.
#[derive(Debug)]
pub struct StepSequencer<S> {
    current: StepIndex,
    total: u8,
    key: &'static str,
    store: S,
}

impl<S: DraftStore> StepSequencer<S> {
    /// Resumes at the persisted step, or step 1 when nothing usable is stored.
    ///
    /// # Errors
    /// Returns [`AdmissionsError::Storage`] when the store cannot be read.
    pub async fn restore(store: S, key: &'static str, total: u8) -> Result<Self, AdmissionsError> {
        let current = match store.load(key).await? {
            None => StepIndex::FIRST,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(value) => StepIndex::clamped(value, total),
                Err(_) => {
                    warn!(key, raw = %raw, "Ignoring unreadable step index");
                    StepIndex::FIRST
                },
            },
        };
        debug!(key, step = current.get(), total, "Step restored");
        Ok(Self { current, total: total.max(1), key, store })
    }

    #[must_use]
    pub const fn current(&self) -> StepIndex {
        self.current
    }

    #[must_use]
    pub const fn total(&self) -> u8 {
        self.total
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.current.0 >= self.total
    }

    /// Moves one step forward. At the last step this is a no-op returning `false`.
    ///
    /// # Errors
    /// Returns [`AdmissionsError::Storage`] when the new step cannot be persisted; the
    /// in-memory step has already moved.
    pub async fn advance(&mut self) -> Result<bool, AdmissionsError> {
        if self.is_last() {
            return Ok(false);
        }
        self.current = StepIndex(self.current.0 + 1);
        self.persist().await?;
        Ok(true)
    }

    /// Moves one step back. At step 1 this is a no-op returning `false`.
    ///
    /// # Errors
    /// See [`StepSequencer::advance`].
    pub async fn retreat(&mut self) -> Result<bool, AdmissionsError> {
        if self.current == StepIndex::FIRST {
            return Ok(false);
        }
        self.current = StepIndex(self.current.0 - 1);
        self.persist().await?;
        Ok(true)
    }

    /// Back to step 1 with nothing persisted.
    ///
    /// # Errors
    /// Returns [`AdmissionsError::Storage`] when the step key cannot be removed.
    pub async fn reset(&mut self) -> Result<(), AdmissionsError> {
        self.current = StepIndex::FIRST;
        self.store.clear(self.key).await
    }

    async fn persist(&self) -> Result<(), AdmissionsError> {
        self.store.save(self.key, &self.current.to_string()).await?;
        debug!(key = self.key, step = self.current.get(), "Step saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const KEY: &str = "applicantRegistrationStep";

    #[test]
    fn clamping_keeps_steps_in_range() {
        assert_eq!(StepIndex::clamped(0, 4).get(), 1);
        assert_eq!(StepIndex::clamped(-7, 4).get(), 1);
        assert_eq!(StepIndex::clamped(3, 4).get(), 3);
        assert_eq!(StepIndex::clamped(99, 4).get(), 4);
        assert!(StepIndex::new(5, 4).is_none());
    }

    #[tokio::test]
    async fn boundaries_are_no_ops() {
        let store = MemoryStore::new();
        let mut steps = StepSequencer::restore(store.clone(), KEY, 4).await.unwrap();

        assert!(!steps.retreat().await.unwrap());
        assert_eq!(steps.current(), StepIndex::FIRST);
        assert!(!store.contains(KEY));

        for _ in 0..3 {
            assert!(steps.advance().await.unwrap());
        }
        assert!(steps.is_last());
        assert!(!steps.advance().await.unwrap());
        assert_eq!(steps.current().get(), 4);
        assert_eq!(store.get(KEY).as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn restore_resumes_the_persisted_step() {
        let store = MemoryStore::new();
        store.insert(KEY, "3");

        let steps = StepSequencer::restore(store, KEY, 4).await.unwrap();
        assert_eq!(steps.current().get(), 3);
    }

    #[tokio::test]
    async fn restore_tolerates_garbage_and_out_of_range() {
        let store = MemoryStore::new();
        store.insert(KEY, "three");
        let steps = StepSequencer::restore(store.clone(), KEY, 4).await.unwrap();
        assert_eq!(steps.current(), StepIndex::FIRST);

        store.insert(KEY, "12");
        let steps = StepSequencer::restore(store, KEY, 4).await.unwrap();
        assert_eq!(steps.current().get(), 4);
    }

    #[tokio::test]
    async fn reset_clears_the_key() {
        let store = MemoryStore::new();
        let mut steps = StepSequencer::restore(store.clone(), KEY, 5).await.unwrap();
        steps.advance().await.unwrap();
        assert!(store.contains(KEY));

        steps.reset().await.unwrap();
        assert_eq!(steps.current(), StepIndex::FIRST);
        assert!(!store.contains(KEY));
    }
}
