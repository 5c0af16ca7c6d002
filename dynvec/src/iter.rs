use core::iter::FusedIterator;
use core::mem::ManuallyDrop;
use core::ptr;
use core::slice;

use crate::core::DynVec;
use crate::raw::RawBuf;

/// Owning iterator over the elements of a `DynVec`.
///
/// Elements in `[start, end)` of the buffer are still live; anything not
/// yet yielded is dropped together with the iterator.
pub struct IntoIter<T> {
    buf: RawBuf<T>,
    start: usize,
    end: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let value = unsafe { ptr::read(self.buf.slot(self.start)) };
        self.start += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        Some(unsafe { ptr::read(self.buf.slot(self.end)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // Unconsumed elements are still live; the region itself is released
        // by `RawBuf`.
        unsafe {
            ptr::drop_in_place(slice::from_raw_parts_mut(
                self.buf.slot(self.start),
                self.end - self.start,
            ));
        }
    }
}

impl<T> IntoIterator for DynVec<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        // The buffer is moved out of the vector, whose own Drop must not run.
        let this = ManuallyDrop::new(self);
        let buf = unsafe { ptr::read(&this.buf) };
        IntoIter {
            buf,
            start: 0,
            end: this.len,
        }
    }
}

impl<'a, T> IntoIterator for &'a DynVec<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynVec<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}
