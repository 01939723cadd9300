//! Core pipeline of the bootc bootstrap compiler.
//!
//! The pipeline is roughly:
//!
//!   source .boot
//!     -> cursor / lexer   (nested token blocks)
//!     -> external parser  (resolved operation tree)
//!     -> codegen_x86_64   (flat ELF64 assembly text)
//!
//! The parser and overload resolver are not part of this crate; they hand
//! the generator a `Vec<Operation>` whose calls already point at a single
//! native function descriptor.

// ---------------------------------------------------------------------
// Error handling, diagnostics and configuration
// ---------------------------------------------------------------------

pub mod location;
pub mod error;
pub mod config;

// ---------------------------------------------------------------------
// Front-end: character cursor and lexing
// ---------------------------------------------------------------------

pub mod cursor;
pub mod lexer;

// ---------------------------------------------------------------------
// Operation tree contract
// ---------------------------------------------------------------------

pub mod types;
pub mod ops;

// ---------------------------------------------------------------------
// Native functions and code generation
// ---------------------------------------------------------------------

pub mod builtins;
pub mod labels;
pub mod codegen_x86_64;
pub mod compiler;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use compiler::{CompilationArtifact, compile_file, compile_source, generate, lex_file, lex_source};
pub use config::CompilerConfig;
pub use error::CoreError;
pub use lexer::{BlockItem, BlockKind, Token, TokenBlock, TokenKind, render_token_tree, tokenize};
pub use location::Location;
pub use ops::{ImmediateValue, Operation};
