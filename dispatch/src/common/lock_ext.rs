// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

/// Lock the given [`Mutex`], recovering the guard if a previous holder panicked.
///
/// Every write behind the mutexes in this crate is a single assignment (or a single
/// push / pop) that happens *after* the user supplied code has returned. So a panic in a
/// reducer or an observer can never leave the protected data half written, and it is
/// safe to keep using it.
pub fn lock_ignoring_poison<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Like [`lock_ignoring_poison()`], but returns `None` instead of blocking when the
/// mutex is held, eg: by a caller further up this thread's stack.
pub fn try_lock_ignoring_poison<T: ?Sized>(mutex: &Mutex<T>) -> Option<MutexGuard<'_, T>> {
    match mutex.try_lock() {
        Ok(guard) => Some(guard),
        Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
        Err(TryLockError::WouldBlock) => None,
    }
}
