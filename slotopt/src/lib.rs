#![no_std]

//! `SlotOpt`: a single-value optional container storing its element in an
//! inline slot.
//!
//! The value lives directly inside the container in a fixed-size slot of
//! uninitialized bytes; a presence flag is the only record of whether the
//! slot holds a live value. Placing a value constructs it in the slot,
//! resetting or dropping the container drops it there. No heap allocation
//! is ever performed.
//!
//! ```
//! use slotopt::SlotOpt;
//!
//! let mut opt: SlotOpt<i32> = SlotOpt::new();
//! assert!(!opt.has_value());
//!
//! opt.insert(42);
//! assert_eq!(opt.value().copied().unwrap(), 42);
//!
//! opt.reset();
//! assert!(opt.value().is_err());
//! ```
//!
//! Checked access goes through [`SlotOpt::value`]; the unchecked fast path
//! is [`SlotOpt::value_unchecked`], an `unsafe fn` whose precondition is
//! that a value is present.

mod error;

pub use crate::error::SlotOptError;

use core::fmt;
use core::mem::MaybeUninit;

/// A container for at most one `T`, stored inline.
///
/// Invariant: the slot holds a live value iff `engaged` is set. Every
/// operation that clears the flag drops the value exactly once, and every
/// operation that sets it has just written one.
pub struct SlotOpt<T> {
    slot: MaybeUninit<T>,
    engaged: bool,
}

impl<T> SlotOpt<T> {
    /// Creates an empty container.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: MaybeUninit::uninit(),
            engaged: false,
        }
    }

    /// Creates a container already holding `value`.
    #[must_use]
    pub fn with_value(value: T) -> Self {
        Self {
            slot: MaybeUninit::new(value),
            engaged: true,
        }
    }

    /// Whether a value is present.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.engaged
    }

    /// Reference to the held value without a presence check.
    ///
    /// # Safety
    ///
    /// The container must hold a value.
    #[must_use]
    pub unsafe fn value_unchecked(&self) -> &T {
        debug_assert!(self.engaged, "value_unchecked on an empty SlotOpt");
        unsafe { self.slot.assume_init_ref() }
    }

    /// Mutable reference to the held value without a presence check.
    ///
    /// # Safety
    ///
    /// The container must hold a value.
    #[must_use]
    pub unsafe fn value_unchecked_mut(&mut self) -> &mut T {
        debug_assert!(self.engaged, "value_unchecked_mut on an empty SlotOpt");
        unsafe { self.slot.assume_init_mut() }
    }

    /// Reference to the held value.
    ///
    /// # Errors
    ///
    /// Returns `SlotOptError::NoValue` if the container is empty.
    pub fn value(&self) -> Result<&T, SlotOptError> {
        if self.engaged {
            Ok(unsafe { self.slot.assume_init_ref() })
        } else {
            Err(SlotOptError::NoValue)
        }
    }

    /// Mutable reference to the held value.
    ///
    /// # Errors
    ///
    /// Returns `SlotOptError::NoValue` if the container is empty.
    pub fn value_mut(&mut self) -> Result<&mut T, SlotOptError> {
        if self.engaged {
            Ok(unsafe { self.slot.assume_init_mut() })
        } else {
            Err(SlotOptError::NoValue)
        }
    }

    /// The held value as an `Option` reference.
    #[must_use]
    pub fn as_ref(&self) -> Option<&T> {
        if self.engaged {
            Some(unsafe { self.slot.assume_init_ref() })
        } else {
            None
        }
    }

    /// The held value as a mutable `Option` reference.
    #[must_use]
    pub fn as_mut(&mut self) -> Option<&mut T> {
        if self.engaged {
            Some(unsafe { self.slot.assume_init_mut() })
        } else {
            None
        }
    }

    /// Places `value` into the slot, dropping any previous value first, and
    /// returns a reference to it.
    pub fn insert(&mut self, value: T) -> &mut T {
        self.reset();
        self.slot.write(value);
        self.engaged = true;
        unsafe { self.slot.assume_init_mut() }
    }

    /// Like [`insert`](Self::insert), but the value is produced by `make`
    /// only after the old value has been dropped.
    ///
    /// If `make` panics, the container is left empty; the previous value is
    /// already gone and is not restored.
    pub fn insert_with(&mut self, make: impl FnOnce() -> T) -> &mut T {
        self.reset();
        self.slot.write(make());
        self.engaged = true;
        unsafe { self.slot.assume_init_mut() }
    }

    /// Assigns `value` to the container.
    ///
    /// A held value is assigned over in place, keeping its slot (and so its
    /// address); an empty container starts holding the value.
    pub fn set(&mut self, value: T) {
        if self.engaged {
            unsafe {
                *self.slot.assume_init_mut() = value;
            }
        } else {
            self.slot.write(value);
            self.engaged = true;
        }
    }

    /// Drops the held value. A no-op when the container is empty.
    pub fn reset(&mut self) {
        if self.engaged {
            // Clear the flag before dropping so a panicking drop cannot
            // lead to a second drop of the same value later.
            self.engaged = false;
            unsafe {
                self.slot.assume_init_drop();
            }
        }
    }

    /// Moves the held value out, leaving the container empty.
    pub fn take(&mut self) -> Option<T> {
        if self.engaged {
            self.engaged = false;
            Some(unsafe { self.slot.assume_init_read() })
        } else {
            None
        }
    }
}

impl<T> Default for SlotOpt<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<T> for SlotOpt<T> {
    fn from(value: T) -> Self {
        Self::with_value(value)
    }
}

impl<T> Drop for SlotOpt<T> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T: Clone> Clone for SlotOpt<T> {
    fn clone(&self) -> Self {
        match self.as_ref() {
            Some(value) => Self::with_value(value.clone()),
            None => Self::new(),
        }
    }

    /// Four-state assignment: empty onto empty is a no-op, full onto empty
    /// constructs, empty onto full resets, full onto full assigns the held
    /// value in place, preserving its identity.
    fn clone_from(&mut self, source: &Self) {
        match (self.engaged, source.as_ref()) {
            (true, Some(value)) => unsafe {
                self.slot.assume_init_mut().clone_from(value);
            },
            (true, None) => self.reset(),
            (false, Some(value)) => {
                self.slot.write(value.clone());
                self.engaged = true;
            }
            (false, None) => {}
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SlotOpt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_ref() {
            Some(value) => f.debug_tuple("SlotOpt").field(value).finish(),
            None => f.write_str("SlotOpt(empty)"),
        }
    }
}

impl<T: PartialEq> PartialEq for SlotOpt<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl<T: Eq> Eq for SlotOpt<T> {}
