use std::sync::atomic::{AtomicBool, Ordering};

/// Single-flight guard: at most one holder of the permit at a time.
#[derive(Debug, Default)]
pub struct ActionGuard {
    busy: AtomicBool,
}

pub struct ActionPermit<'a> {
    guard: &'a ActionGuard,
}

impl ActionGuard {
    pub fn try_acquire(&self) -> Option<ActionPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ActionPermit { guard: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for ActionPermit<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_permit_dropped() {
        let guard = ActionGuard::default();

        let permit = guard.try_acquire().expect("first permit");
        assert!(guard.is_busy());
        assert!(guard.try_acquire().is_none());

        drop(permit);
        assert!(!guard.is_busy());
        assert!(guard.try_acquire().is_some());
    }
}
