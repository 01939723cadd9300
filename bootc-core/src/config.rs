//! Debug flags controlling side output of the pipeline.
//!
//! None of these flags change what the lexer or the generator return;
//! they only decide whether the token tree and the final assembly are
//! echoed to the diagnostic log.

pub const DEBUG_TOKENIZER_VAR: &str = "BOOTC_DEBUG_TOKENIZER";
pub const DEBUG_ASM_VAR: &str = "BOOTC_DEBUG_ASM";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Dump the token tree after lexing.
    pub debug_tokenizer: bool,
    /// Dump the generated assembly text.
    pub debug_asm: bool,
}

impl CompilerConfig {
    /// Read the flags from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the flags through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        CompilerConfig {
            debug_tokenizer: lookup(DEBUG_TOKENIZER_VAR).is_some_and(|v| is_enabled(&v)),
            debug_asm: lookup(DEBUG_ASM_VAR).is_some_and(|v| is_enabled(&v)),
        }
    }
}

fn is_enabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
