use thiserror::Error;

use crate::lexer::BlockKind;
use crate::location::Location;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read source: {0}")]
    SourceIo(#[from] std::io::Error),
    #[error("{location}: block {open} not correctly closed (found `{found}` closer at {found_at})")]
    MismatchedBlock {
        open: BlockKind,
        location: Location,
        found: BlockKind,
        found_at: Location,
    },
    #[error("{location}: block {kind} not correctly closed (reached end of input)")]
    UnclosedBlock { kind: BlockKind, location: Location },
    #[error("parse error: {0}")]
    ParseError(String),
}
