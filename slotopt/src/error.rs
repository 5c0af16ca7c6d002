use thiserror::Error;

/// Error types for `SlotOpt` operations
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum SlotOptError {
    /// Checked access to an empty container
    #[error("bad slot access: no value present")]
    NoValue,
}
