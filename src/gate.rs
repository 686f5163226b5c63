//! Readers-writer gate built from a count-guard mutex and an exclusion
//! semaphore.
//!
//! The first reader to arrive takes the exclusion on behalf of every reader
//! that follows; the last reader to leave hands it back. Writers take the
//! exclusion directly. Since the reader that releases is not necessarily the
//! reader that acquired, the exclusion is a binary semaphore
//! (`Mutex<bool>` + `Condvar`) rather than a mutex guard.
//!
//! There is no writer priority: a stream of overlapping readers keeps the
//! exclusion held and a waiting writer can starve.

use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::trace;

struct Exclusion {
    held: Mutex<bool>,
    released: Condvar,
}

impl Exclusion {
    const fn new() -> Self {
        Self {
            held: Mutex::new(false),
            released: Condvar::new(),
        }
    }

    fn acquire(&self) {
        let mut held = self.held.lock();
        while *held {
            self.released.wait(&mut held);
        }
        *held = true;
    }

    fn try_acquire_until(&self, deadline: Instant) -> bool {
        let mut held = self.held.lock();
        while *held {
            if self.released.wait_until(&mut held, deadline).timed_out() && *held {
                return false;
            }
        }
        *held = true;
        true
    }

    fn release(&self) {
        let mut held = self.held.lock();
        assert!(*held, "exclusion released while not held");
        *held = false;
        drop(held);
        self.released.notify_one();
    }

    fn is_held(&self) -> bool {
        *self.held.lock()
    }
}

/// A value that many readers or one writer may access at a time.
pub struct Gate<T> {
    readers: Mutex<usize>,
    exclusion: Exclusion,
    value: UnsafeCell<T>,
}

// SAFETY: the value is only reached through guards. Shared references are
// handed out while the exclusion is held on behalf of readers, the unique
// reference while a single writer holds it.
unsafe impl<T: Send> Send for Gate<T> {}
unsafe impl<T: Send + Sync> Sync for Gate<T> {}

impl<T> Gate<T> {
    /// Wrap `value` with no reader or writer inside.
    pub const fn new(value: T) -> Self {
        Self {
            readers: Mutex::new(0),
            exclusion: Exclusion::new(),
            value: UnsafeCell::new(value),
        }
    }

    /// Enter as a reader, blocking while a writer is inside.
    pub fn read(&self) -> ReadGuard<'_, T> {
        let mut readers = self.readers.lock();
        if *readers == 0 {
            self.exclusion.acquire();
            trace!("first reader took exclusion");
        }
        *readers += 1;
        ReadGuard { gate: self }
    }

    /// Like [`Gate::read`] but gives up after `timeout`.
    pub fn try_read_for(&self, timeout: Duration) -> Option<ReadGuard<'_, T>> {
        let deadline = Instant::now() + timeout;
        let mut readers = self.readers.try_lock_until(deadline)?;
        if *readers == 0 {
            if !self.exclusion.try_acquire_until(deadline) {
                return None;
            }
            trace!("first reader took exclusion");
        }
        *readers += 1;
        Some(ReadGuard { gate: self })
    }

    /// Enter as the only writer, blocking while any reader or writer is inside.
    pub fn write(&self) -> WriteGuard<'_, T> {
        self.exclusion.acquire();
        WriteGuard { gate: self }
    }

    /// Like [`Gate::write`] but gives up after `timeout`.
    pub fn try_write_for(&self, timeout: Duration) -> Option<WriteGuard<'_, T>> {
        if self.exclusion.try_acquire_until(Instant::now() + timeout) {
            Some(WriteGuard { gate: self })
        } else {
            None
        }
    }

    /// Readers currently inside.
    pub fn active_readers(&self) -> usize {
        *self.readers.lock()
    }

    /// Whether a writer, or the reader group, holds the exclusion.
    pub fn is_exclusion_held(&self) -> bool {
        self.exclusion.is_held()
    }

    fn exit_read(&self) {
        let mut readers = self.readers.lock();
        assert!(*readers > 0, "reader exit without matching enter");
        *readers -= 1;
        if *readers == 0 {
            self.exclusion.release();
            trace!("last reader released exclusion");
        }
    }
}

impl<T: Default> Default for Gate<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Shared access; dropping it runs reader exit.
pub struct ReadGuard<'a, T> {
    gate: &'a Gate<T>,
}

impl<T> Deref for ReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the reader group holds the exclusion, no writer is inside.
        unsafe { &*self.gate.value.get() }
    }
}

impl<T> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        self.gate.exit_read();
    }
}

/// Exclusive access; dropping it releases the exclusion.
pub struct WriteGuard<'a, T> {
    gate: &'a Gate<T>,
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: this writer holds the exclusion alone.
        unsafe { &*self.gate.value.get() }
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: this writer holds the exclusion alone, and `&mut self`
        // keeps the reference unique within this guard.
        unsafe { &mut *self.gate.value.get() }
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        self.gate.exclusion.release();
    }
}
