use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::codegen_x86_64::generate_asm;
use crate::config::CompilerConfig;
use crate::error::CoreError;
use crate::lexer::{TokenBlock, render_token_tree, tokenize};
use crate::ops::Operation;

#[derive(Debug)]
pub struct CompilationArtifact {
    pub tokens: TokenBlock,
    pub asm: String,
}

/// Lex an in-memory source, dumping the tree if the config asks for it.
pub fn lex_source(
    file: impl Into<Arc<str>>,
    source: &str,
    config: &CompilerConfig,
) -> Result<TokenBlock, CoreError> {
    let tree = tokenize(file, source)?;
    if config.debug_tokenizer {
        for line in render_token_tree(&tree).lines() {
            log::info!(target: "bootc::tokens", "{line}");
        }
    }
    Ok(tree)
}

/// Read `path` once, fully, and lex it.
pub fn lex_file(path: impl AsRef<Path>, config: &CompilerConfig) -> Result<TokenBlock, CoreError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    lex_source(path.display().to_string(), &source, config)
}

/// Generate assembly for one compilation unit.
pub fn generate(ops: &[Operation<'_>], config: &CompilerConfig) -> String {
    let asm = generate_asm(ops);
    if config.debug_asm {
        for line in asm.lines() {
            log::info!(target: "bootc::asm", "{line}");
        }
    }
    asm
}

/// Run the whole pipeline on an in-memory source.
///
/// `resolve` stands in for the parser: it turns the token tree into a
/// resolved operation tree. It is not called if lexing fails.
pub fn compile_source<'d, F>(
    file: impl Into<Arc<str>>,
    source: &str,
    config: &CompilerConfig,
    resolve: F,
) -> Result<CompilationArtifact, CoreError>
where
    F: FnOnce(&TokenBlock) -> Result<Vec<Operation<'d>>, CoreError>,
{
    let tokens = lex_source(file, source, config)?;
    let ops = resolve(&tokens)?;
    let asm = generate(&ops, config);
    Ok(CompilationArtifact { tokens, asm })
}

/// Run the whole pipeline on a file read from disk.
pub fn compile_file<'d, F>(
    path: impl AsRef<Path>,
    config: &CompilerConfig,
    resolve: F,
) -> Result<CompilationArtifact, CoreError>
where
    F: FnOnce(&TokenBlock) -> Result<Vec<Operation<'d>>, CoreError>,
{
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    compile_source(path.display().to_string(), &source, config, resolve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::{self, FunctionDescriptor};
    use crate::lexer::{BlockItem, TokenKind};

    /// Toy resolver: numbers become immediates, words become native calls.
    fn resolve_flat(tree: &TokenBlock) -> Result<Vec<Operation<'static>>, CoreError> {
        let mut ops = Vec::new();
        for item in &tree.children {
            let BlockItem::Token(token) = item else {
                return Err(CoreError::ParseError("blocks are not supported".to_string()));
            };
            let op = match token.kind {
                TokenKind::Number => {
                    let value = token
                        .text
                        .parse()
                        .map_err(|e| CoreError::ParseError(format!("{e}")))?;
                    Operation::int(value, token.location.clone())
                }
                TokenKind::String => Operation::string(token.text.clone(), token.location.clone()),
                _ => {
                    let native = builtins::find_native(&token.text).ok_or_else(|| {
                        CoreError::ParseError(format!("unknown function {}", token.text))
                    })?;
                    let descriptor: &'static FunctionDescriptor = &native.overloads[0];
                    Operation::call(descriptor, vec![], token.location.clone(), token.text.clone())
                }
            };
            ops.push(op);
        }
        Ok(ops)
    }

    #[test]
    fn compiles_source_through_a_resolver() {
        let config = CompilerConfig::default();
        let artifact = compile_source("main.boot", "5 3 ge\n\"ok\"", &config, resolve_flat)
            .expect("compile should succeed");
        assert_eq!(artifact.tokens.children.len(), 4);
        assert!(artifact.asm.contains("  ;; main.boot:1:5: ge\n  mov rcx, 0"));
        assert!(artifact.asm.contains("  push str_0"));
        assert!(artifact.asm.ends_with("str_0:\n  dq 2\n  db 111, 107"));
    }

    #[test]
    fn lexer_errors_halt_before_resolution() {
        let config = CompilerConfig::default();
        let mut called = false;
        let err = compile_source("main.boot", "(ge]", &config, |_| {
            called = true;
            Ok(Vec::new())
        })
        .unwrap_err();
        assert!(matches!(err, CoreError::MismatchedBlock { .. }));
        assert!(!called);
    }

    #[test]
    fn resolver_errors_are_surfaced() {
        let config = CompilerConfig::default();
        let err = compile_source("main.boot", "print", &config, resolve_flat).unwrap_err();
        assert!(matches!(err, CoreError::ParseError(msg) if msg.contains("print")));
    }

    #[test]
    fn dump_flags_do_not_change_results() {
        let quiet = CompilerConfig::default();
        let loud = CompilerConfig {
            debug_tokenizer: true,
            debug_asm: true,
        };
        let a = compile_source("main.boot", "1 2 ge", &quiet, resolve_flat).unwrap();
        let b = compile_source("main.boot", "1 2 ge", &loud, resolve_flat).unwrap();
        assert_eq!(a.tokens, b.tokens);
        assert_eq!(a.asm, b.asm);
    }

    #[test]
    fn lexes_and_compiles_files_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("main.boot");
        fs::write(&path, "// entry\nbreakpoint\n").expect("write source");

        let config = CompilerConfig::default();
        let tree = lex_file(&path, &config).expect("lex should succeed");
        let token = tree.tokens().next().unwrap();
        assert_eq!(token.text, "breakpoint");
        assert_eq!(token.location.file.as_ref(), path.display().to_string());

        let artifact = compile_file(&path, &config, resolve_flat).expect("compile");
        assert!(artifact.asm.contains("\n  int3\n"));
    }

    #[test]
    fn reports_missing_source_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = lex_file(dir.path().join("missing.boot"), &CompilerConfig::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::SourceIo(_)));
    }
}
