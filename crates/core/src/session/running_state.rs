use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The `camera active` flag shared by the controller and the capture loop.
///
/// Writes use release ordering and reads acquire ordering, so a stop issued
/// on the UI thread is seen by the capture thread on its next check.
#[derive(Clone, Debug, Default)]
pub struct RunningState {
    active: Arc<AtomicBool>,
}

impl RunningState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn activate(&self) {
        self.active.store(true, Ordering::Release);
    }

    pub fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_starts_inactive() {
        assert!(!RunningState::new().is_active());
    }

    #[test]
    fn test_clones_share_the_flag() {
        let state = RunningState::new();
        let seen_by_loop = state.clone();
        state.activate();
        assert!(seen_by_loop.is_active());
        state.deactivate();
        assert!(!seen_by_loop.is_active());
    }

    #[test]
    fn test_other_thread_observes_deactivation() {
        let state = RunningState::new();
        state.activate();
        let worker_state = state.clone();
        let worker = thread::spawn(move || {
            let mut spins = 0u64;
            while worker_state.is_active() {
                spins += 1;
                thread::yield_now();
            }
            spins
        });

        thread::sleep(Duration::from_millis(10));
        state.deactivate();
        assert!(worker.join().is_ok());
    }
}
