//! Shared, swappable parameter state.
//!
//! Edits publish a whole new [`NoiseParameters`] value; a render holds the
//! snapshot it started with and never sees a half-applied edit.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::NoiseParameters;

/// An immutable parameter set tagged with the generation that produced it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Number of publishes before this one; 0 for the initial value.
    pub generation: u64,
    /// The parameters, shared with the cell until the next publish.
    pub params: Arc<NoiseParameters>,
}

/// Holder for the current parameter set.
#[derive(Debug, Default)]
pub struct ParamsCell {
    current: RwLock<Snapshot>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            generation: 0,
            params: Arc::new(NoiseParameters::default()),
        }
    }
}

impl ParamsCell {
    /// Creates a cell holding `params` at generation 0.
    pub fn new(params: NoiseParameters) -> Self {
        Self {
            current: RwLock::new(Snapshot {
                generation: 0,
                params: Arc::new(params),
            }),
        }
    }

    /// The current snapshot.
    pub fn load(&self) -> Snapshot {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Generation of the current snapshot.
    pub fn generation(&self) -> u64 {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    /// Replaces the parameters and returns the new generation.
    pub fn store(&self, params: NoiseParameters) -> u64 {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current.generation += 1;
        current.params = Arc::new(params);
        debug!(generation = current.generation, "published parameters");
        current.generation
    }

    /// Derives new parameters from the current ones and publishes them.
    ///
    /// On error nothing is published.
    pub fn update<E>(
        &self,
        edit: impl FnOnce(&NoiseParameters) -> Result<NoiseParameters, E>,
    ) -> Result<u64, E> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = edit(&current.params)?;
        current.generation += 1;
        current.params = Arc::new(next);
        debug!(generation = current.generation, "published parameters");
        Ok(current.generation)
    }

    /// True when no edit has been published since `snapshot` was loaded.
    pub fn is_current(&self, snapshot: &Snapshot) -> bool {
        self.generation() == snapshot.generation
    }
}
