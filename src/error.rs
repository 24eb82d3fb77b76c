use thiserror::Error;

/// 库边界上的输入校验错误。核心算法本身是全函数，不会返回该错误。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrimerError {
    #[error("empty sequence")]
    EmptySequence,

    #[error("invalid base '{base}' at position {position} (expected A/C/G/T)")]
    InvalidBase { position: usize, base: char },

    #[error("base pair ({i}, {j}) out of bounds for sequence of length {len}")]
    PairOutOfBounds { i: usize, j: usize, len: usize },

    #[error("base pair ({i}, {j}) must satisfy i < j")]
    InvalidPair { i: usize, j: usize },

    #[error("index {0} appears in more than one base pair")]
    DuplicateIndex(usize),

    #[error("base pairs cross (pseudoknots are not supported)")]
    CrossingPairs,

    #[error("unbalanced bracket at position {0}")]
    UnbalancedBracket(usize),

    #[error("structure length {structure} does not match sequence length {seq}")]
    LengthMismatch { seq: usize, structure: usize },
}
