//! Explicit mutual-exclusion flag for entry points.

use crate::error::{EngineError, Result};

/// A non-reentrant lock held for the duration of any entry point that
/// performs an external call or mutates both reserve and ledger state.
///
/// The execution model is a single logical thread per engine instance, so
/// this is not a concurrency primitive — it exists to reject *reentrancy*:
/// an injected collaborator calling back into the engine before the
/// triggering call has finished.
///
/// The engine acquires through
/// [`CurveEngine::locked`](crate::engine::CurveEngine), which releases on
/// every exit path, success or failure.
#[derive(Debug, Default)]
pub(crate) struct ReentrancyLock {
    held: bool,
}

impl ReentrancyLock {
    /// Creates an unheld lock.
    pub(crate) const fn new() -> Self {
        Self { held: false }
    }

    /// Acquires the lock.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ReentrantCall`] if the lock is already held.
    pub(crate) fn try_enter(&mut self) -> Result<()> {
        if self.held {
            return Err(EngineError::ReentrantCall);
        }
        self.held = true;
        Ok(())
    }

    /// Releases the lock.
    pub(crate) fn exit(&mut self) {
        self.held = false;
    }

    /// Returns `true` while an entry point is executing.
    #[cfg(test)]
    pub(crate) const fn is_held(&self) -> bool {
        self.held
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn enter_exit_cycle() {
        let mut lock = ReentrancyLock::new();
        assert!(!lock.is_held());
        let Ok(()) = lock.try_enter() else {
            panic!("expected Ok");
        };
        assert!(lock.is_held());
        lock.exit();
        assert!(!lock.is_held());
    }

    #[test]
    fn second_enter_rejected_while_held() {
        let mut lock = ReentrancyLock::new();
        let Ok(()) = lock.try_enter() else {
            panic!("expected Ok");
        };
        assert_eq!(lock.try_enter(), Err(EngineError::ReentrantCall));
    }

    #[test]
    fn reacquire_after_release() {
        let mut lock = ReentrancyLock::new();
        let Ok(()) = lock.try_enter() else {
            panic!("expected Ok");
        };
        lock.exit();
        assert!(lock.try_enter().is_ok());
    }
}
