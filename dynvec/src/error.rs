use thiserror::Error;

/// Error types for `DynVec` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DynVecError {
    /// The global allocator could not provide the requested region
    #[error("out of memory: allocation of {bytes} bytes for {elements} elements failed")]
    OutOfMemory {
        /// Number of elements the region was sized for
        elements: usize,
        /// Size of the rejected allocation in bytes
        bytes: usize,
    },
    /// The requested capacity does not fit in a single allocation
    #[error("capacity overflow: {elements} elements exceed the maximum allocation size")]
    CapacityOverflow {
        /// Requested capacity in elements
        elements: usize,
    },
    /// Position is beyond the current vector bounds
    #[error("index out of bounds: index {index} is beyond vector length {len}")]
    IndexOutOfBounds {
        /// Position that was given
        index: usize,
        /// Current length of the vector
        len: usize,
    },
}
