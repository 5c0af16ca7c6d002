use core::marker::PhantomData;
use core::mem;
use core::ptr::NonNull;

use alloc::alloc::{alloc, dealloc, Layout};

use crate::error::DynVecError;

/// An owned region of uninitialized memory sized for `capacity` elements of `T`.
///
/// `RawBuf` manages only the region itself. It never constructs or drops
/// elements; callers are responsible for knowing which slots hold live
/// values. When `capacity` is zero (or `T` is zero-sized) the pointer is
/// dangling and nothing is allocated.
///
/// There is intentionally no `Clone` impl: a raw region has no defined
/// element count to copy. Ownership moves with the value.
pub struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

impl<T> RawBuf<T> {
    /// Creates an empty buffer without allocating.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            _marker: PhantomData,
        }
    }

    /// Acquires a region large enough for `capacity` elements, constructing none.
    ///
    /// # Errors
    ///
    /// Returns `DynVecError::CapacityOverflow` if the byte size of the region
    /// overflows the maximum allocation size, and `DynVecError::OutOfMemory`
    /// if the allocator refuses the request.
    pub fn allocate(capacity: usize) -> Result<Self, DynVecError> {
        if capacity == 0 || mem::size_of::<T>() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                cap: capacity,
                _marker: PhantomData,
            });
        }

        let layout = Layout::array::<T>(capacity)
            .map_err(|_| DynVecError::CapacityOverflow { elements: capacity })?;

        // The layout has non-zero size here, so `alloc` is sound.
        let ptr = unsafe { alloc(layout) };
        match NonNull::new(ptr.cast::<T>()) {
            Some(ptr) => Ok(Self {
                ptr,
                cap: capacity,
                _marker: PhantomData,
            }),
            None => Err(DynVecError::OutOfMemory {
                elements: capacity,
                bytes: layout.size(),
            }),
        }
    }

    /// Number of element slots in the region.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Base address of the region.
    #[must_use]
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Address of the slot `offset` elements into the region.
    ///
    /// This is a raw address, not an element accessor: the slot may be
    /// uninitialized. `offset == capacity` is allowed as a one-past-the-end
    /// address. Debug builds assert the bound; release builds do not check.
    #[must_use]
    pub fn slot(&self, offset: usize) -> *mut T {
        debug_assert!(
            offset <= self.cap,
            "slot offset {offset} is beyond capacity {}",
            self.cap
        );
        // In bounds or one past the end of the owned region.
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    /// Exchanges the regions of two buffers in constant time.
    ///
    /// The building block for exception-safe reallocation: a fully built
    /// replacement region is swapped in, and the vacated one is released
    /// when the other buffer is dropped.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.cap, &mut other.cap);
    }
}

impl<T> Default for RawBuf<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        if self.cap != 0 && mem::size_of::<T>() != 0 {
            // Same layout as at allocation time, already validated there.
            let layout = Layout::array::<T>(self.cap).expect("layout was valid at allocation");
            unsafe { dealloc(self.ptr.as_ptr().cast(), layout) };
        }
    }
}
