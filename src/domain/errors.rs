use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("invalid selection: rows {top}..={bottom}, cols {left}..={right}")]
    InvalidSelection {
        top: usize,
        bottom: usize,
        left: usize,
        right: usize,
    },

    #[error("block shape {actual:?} does not match selection shape {expected:?}")]
    BlockShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

pub type DomainResult<T> = Result<T, DomainError>;
