use core::fmt;
use core::mem;
use core::ops::{Deref, DerefMut};
use core::ptr;
use core::slice;

use crate::error::DynVecError;
use crate::raw::RawBuf;

/// A growable sequence container over manually managed raw storage.
///
/// Slots `[0, len)` of the backing region hold live elements; slots
/// `[len, capacity)` are uninitialized bytes. Every operation maintains
/// that invariant across early returns and across panics raised by the
/// element type's own code.
///
/// Relocation during growth is a bitwise transfer (a Rust move cannot
/// fail), so reallocating operations either complete or leave the vector
/// untouched. The fallible element paths are `Clone` and `Default`; those
/// roll back partially built slots before letting the panic propagate.
pub struct DynVec<T> {
    pub(crate) buf: RawBuf<T>,
    pub(crate) len: usize,
}

impl<T> DynVec<T> {
    /// Creates an empty vector without allocating.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: RawBuf::new(),
            len: 0,
        }
    }

    /// Creates an empty vector with room for `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::OutOfMemory` or `DynVecError::CapacityOverflow`
    /// if the region cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self, DynVecError> {
        Ok(Self {
            buf: RawBuf::allocate(capacity)?,
            len: 0,
        })
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of element slots in the backing region.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The live elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // Slots [0, len) are live by the container invariant.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr(), self.len) }
    }

    /// Grows the backing region to exactly `new_capacity` slots.
    ///
    /// A no-op when `new_capacity` does not exceed the current capacity.
    /// Otherwise a new region is allocated, the live elements are relocated
    /// into it bitwise, and the regions are swapped. Allocation failure
    /// leaves the vector untouched; the relocation itself cannot fail.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::OutOfMemory` or `DynVecError::CapacityOverflow`
    /// if the new region cannot be allocated.
    pub fn reserve(&mut self, new_capacity: usize) -> Result<(), DynVecError> {
        if new_capacity <= self.buf.capacity() {
            return Ok(());
        }
        let mut new_buf = RawBuf::allocate(new_capacity)?;
        unsafe {
            ptr::copy_nonoverlapping(self.buf.as_ptr(), new_buf.as_ptr(), self.len);
        }
        self.buf.swap(&mut new_buf);
        // `new_buf` now owns the vacated region; dropping it releases the
        // bytes without touching the relocated elements.
        Ok(())
    }

    /// Doubles the capacity, or sets it to 1 from empty.
    fn grow_one(&mut self) -> Result<(), DynVecError> {
        let cap = self.buf.capacity();
        let new_capacity = if cap == 0 {
            1
        } else {
            cap.checked_mul(2)
                .ok_or(DynVecError::CapacityOverflow { elements: cap })?
        };
        self.reserve(new_capacity)
    }

    /// Appends `value`, growing the backing region first if it is full.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::OutOfMemory` or `DynVecError::CapacityOverflow`
    /// if growth is needed and fails; the vector is unchanged in that case.
    pub fn push(&mut self, value: T) -> Result<(), DynVecError> {
        if self.len == self.buf.capacity() {
            self.grow_one()?;
        }
        unsafe {
            ptr::write(self.buf.slot(self.len), value);
        }
        self.len += 1;
        Ok(())
    }

    /// Appends `value` and returns a reference to the new element.
    ///
    /// # Errors
    ///
    /// Same as [`push`](Self::push).
    pub fn push_get(&mut self, value: T) -> Result<&mut T, DynVecError> {
        self.push(value)?;
        // Just written, so the slot is live.
        Ok(unsafe { &mut *self.buf.slot(self.len - 1) })
    }

    /// Removes the last element and returns it, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(unsafe { ptr::read(self.buf.slot(self.len)) })
    }

    /// Inserts `value` at `index`, shifting the elements at and after it one
    /// slot to the right.
    ///
    /// When the region is full, the new element is written into its final
    /// slot in the replacement region first and the prefix and suffix are
    /// relocated around it, so a failed allocation leaves the vector
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::IndexOutOfBounds` if `index > len`, and the
    /// allocation errors of [`reserve`](Self::reserve) when growth fails.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), DynVecError> {
        if index > self.len {
            return Err(DynVecError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        if self.len == self.buf.capacity() {
            return self.insert_grow(index, value);
        }
        unsafe {
            let slot = self.buf.slot(index);
            ptr::copy(slot, slot.add(1), self.len - index);
            ptr::write(slot, value);
        }
        self.len += 1;
        Ok(())
    }

    /// Insertion path that reallocates. The element lands in its final slot
    /// before any existing element is relocated.
    fn insert_grow(&mut self, index: usize, value: T) -> Result<(), DynVecError> {
        let cap = self.buf.capacity();
        let new_capacity = if cap == 0 {
            1
        } else {
            cap.checked_mul(2)
                .ok_or(DynVecError::CapacityOverflow { elements: cap })?
        };
        let mut new_buf = RawBuf::allocate(new_capacity)?;
        unsafe {
            ptr::write(new_buf.slot(index), value);
            ptr::copy_nonoverlapping(self.buf.as_ptr(), new_buf.as_ptr(), index);
            ptr::copy_nonoverlapping(
                self.buf.slot(index),
                new_buf.slot(index + 1),
                self.len - index,
            );
        }
        self.buf.swap(&mut new_buf);
        self.len += 1;
        Ok(())
    }

    /// Removes the element at `index` and returns it, shifting the elements
    /// after it one slot to the left.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::IndexOutOfBounds` if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<T, DynVecError> {
        if index >= self.len {
            return Err(DynVecError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        unsafe {
            let slot = self.buf.slot(index);
            let value = ptr::read(slot);
            ptr::copy(slot.add(1), slot, self.len - index - 1);
            self.len -= 1;
            Ok(value)
        }
    }

    /// Drops the elements in `[new_len, len)`. A no-op when `new_len >= len`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail = self.len - new_len;
        // Shrink first so a panicking element drop cannot leave an already
        // dropped element inside the live range.
        self.len = new_len;
        unsafe {
            ptr::drop_in_place(slice::from_raw_parts_mut(self.buf.slot(new_len), tail));
        }
    }

    /// Drops all elements, keeping the backing region.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes the vector to `new_len` elements.
    ///
    /// Shrinking drops the tail. Growing reserves capacity, then fills the
    /// new slots with `T::default()`; if one of those calls panics, the
    /// partially built tail is dropped and the length is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns the allocation errors of [`reserve`](Self::reserve); the
    /// vector is unchanged in that case.
    pub fn resize(&mut self, new_len: usize) -> Result<(), DynVecError>
    where
        T: Default,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.reserve(new_len)?;
        let mut guard = PartialInit {
            first: self.buf.slot(self.len),
            built: 0,
        };
        for _ in self.len..new_len {
            unsafe {
                ptr::write(guard.first.add(guard.built), T::default());
            }
            guard.built += 1;
        }
        mem::forget(guard);
        self.len = new_len;
        Ok(())
    }
}

impl<T> Default for DynVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for DynVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynVec<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Drop for DynVec<T> {
    fn drop(&mut self) {
        // Elements first; the region itself is released by `RawBuf`.
        unsafe {
            ptr::drop_in_place(self.as_mut_slice() as *mut [T]);
        }
    }
}

impl<T: Clone> Clone for DynVec<T> {
    /// Deep copy. If cloning an element panics, the elements built so far
    /// are dropped and the new region is released; the source is untouched.
    fn clone(&self) -> Self {
        let buf: RawBuf<T> = match RawBuf::allocate(self.len) {
            Ok(buf) => buf,
            // Clone cannot surface a Result; allocation failure here is fatal.
            Err(err) => panic!("DynVec clone failed: {err}"),
        };
        let mut guard = PartialInit {
            first: buf.as_ptr(),
            built: 0,
        };
        for value in self.as_slice() {
            unsafe {
                ptr::write(guard.first.add(guard.built), value.clone());
            }
            guard.built += 1;
        }
        mem::forget(guard);
        Self { buf, len: self.len }
    }

    /// Clones `source` into `self`, reusing the backing region and the live
    /// slots when they suffice: the shared prefix is assigned element-wise,
    /// extra elements are built in place, excess elements are dropped.
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.buf.capacity() {
            *self = source.clone();
            return;
        }
        let shared = self.len.min(source.len);
        for (dst, src) in self.as_mut_slice()[..shared]
            .iter_mut()
            .zip(&source.as_slice()[..shared])
        {
            dst.clone_from(src);
        }
        if source.len > self.len {
            let mut guard = PartialInit {
                first: self.buf.slot(self.len),
                built: 0,
            };
            for value in &source.as_slice()[self.len..] {
                unsafe {
                    ptr::write(guard.first.add(guard.built), value.clone());
                }
                guard.built += 1;
            }
            mem::forget(guard);
            self.len = source.len;
        } else {
            self.truncate(source.len);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for DynVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq> PartialEq for DynVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for DynVec<T> {}

/// Rollback guard for batch construction into uninitialized slots.
///
/// Dropped on unwind, it drops the `built` elements starting at `first`,
/// restoring the live-range invariant. Forgotten on success.
struct PartialInit<T> {
    first: *mut T,
    built: usize,
}

impl<T> Drop for PartialInit<T> {
    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(slice::from_raw_parts_mut(self.first, self.built));
        }
    }
}
