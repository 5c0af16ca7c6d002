#![no_std]

//! `DynVec`: a growable sequence container built on manually managed raw storage.
//!
//! The crate deliberately builds its container from the ground up instead of
//! wrapping an existing one: [`RawBuf`] owns a region of uninitialized memory
//! and knows nothing about element lifetimes, while [`DynVec`] tracks the
//! live range `[0, len)` and is solely responsible for constructing and
//! dropping values inside the region.
//!
//! Growth allocates a fresh region, relocates the live elements into it and
//! swaps the regions, so a failed allocation leaves the vector untouched.
//! Element code can still panic (`Clone`, `Default`); those paths roll back
//! partially built slots before the panic propagates, keeping size, capacity
//! and contents as they were.
//!
//! # Time Complexity
//! - `push()`, `pop()`: amortized O(1)
//! - `get()`, indexing: O(1)
//! - `insert()`, `remove()`: O(n) shift
//! - `reserve()`, growth: O(n) bitwise relocation
//!
//! ```
//! use dynvec::DynVec;
//!
//! let mut v = DynVec::new();
//! v.push(1).unwrap();
//! v.push(2).unwrap();
//! v.push(3).unwrap();
//! v.insert(1, 99).unwrap();
//! assert_eq!(v.as_slice(), &[1, 99, 2, 3]);
//!
//! let removed = v.remove(0).unwrap();
//! assert_eq!(removed, 1);
//! assert_eq!(v.as_slice(), &[99, 2, 3]);
//! ```
//!
//! Borrowed iteration goes through slices (`v.iter()`, `v.iter_mut()`,
//! indexing), so the borrow checker enforces that no reference outlives a
//! mutation that could reallocate or shift the storage. Consuming the vector
//! yields an owning, double-ended iterator.
//!
//! This crate is `no_std` compatible and only depends on `alloc` for the
//! raw regions. Enable the `std` feature to forward to `thiserror/std`.

extern crate alloc;

mod core;
mod error;
mod iter;
mod raw;

pub use crate::core::DynVec;
pub use crate::error::DynVecError;
pub use crate::iter::IntoIter;
pub use crate::raw::RawBuf;
