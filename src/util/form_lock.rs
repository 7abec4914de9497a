//! Per-form submission lock.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{IdentityError, Result};

/// Stands in for a disabled submit button: at most one submission per form
/// is in flight.
///
/// # Example
/// ```
/// use underroof::util::form_lock::FormLock;
///
/// let lock = FormLock::new("login");
/// let guard = lock.try_acquire().unwrap();
/// assert!(lock.try_acquire().is_err());
/// drop(guard);
/// assert!(!lock.is_busy());
/// ```
#[derive(Debug)]
pub struct FormLock {
    name: &'static str,
    busy: AtomicBool,
}

impl FormLock {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            busy: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Disable the form until the returned guard is dropped.
    pub fn try_acquire(&self) -> Result<FormGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| IdentityError::Busy(self.name))?;
        Ok(FormGuard { lock: self })
    }
}

/// Re-enables the form on drop, whatever the outcome of the submission.
#[derive(Debug)]
pub struct FormGuard<'a> {
    lock: &'a FormLock,
}

impl Drop for FormGuard<'_> {
    fn drop(&mut self) {
        self.lock.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_submission_is_rejected_while_first_is_in_flight() {
        let lock = FormLock::new("profile");
        let _guard = lock.try_acquire().unwrap();
        assert!(lock.is_busy());
        match lock.try_acquire() {
            Err(IdentityError::Busy(name)) => assert_eq!(name, "profile"),
            other => panic!("expected Busy, got {other:?}"),
        };
    }

    #[test]
    fn guard_releases_on_early_return() {
        let lock = FormLock::new("login");
        let attempt = || -> Result<()> {
            let _guard = lock.try_acquire()?;
            Err(IdentityError::api(400, "bad"))
        };
        assert!(attempt().is_err());
        assert!(!lock.is_busy());
    }
}
