//! Lexer for bootc source files.
//!
//! The lexer turns a source string into a tree of token blocks. Brackets do
//! not become tokens: `(`, `[` and `{` open a nested [`TokenBlock`] and the
//! matching closer ends it. The implicit [`BlockKind::File`] block is the
//! root and always the sole survivor of a successful run.
//!
//! Comments (`//` to end of line) are skipped and never reach the tree.

use std::fmt;
use std::sync::Arc;

use crate::cursor::Cursor;
use crate::error::CoreError;
use crate::location::Location;

const SPECIAL_CHARS: &[char] = &['-', '>', '!', '#', ',', '.'];

/// Kind of a leaf token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    /// Contents of a double-quoted literal, quotes excluded, escapes kept verbatim.
    String,
    Word,
    /// A maximal run of characters from `- > ! # , .`.
    Special,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Word => "word",
            TokenKind::Special => "special",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    File,
    Curly,
    Round,
    Square,
}

impl BlockKind {
    /// Block kind opened by `ch`, if it is an opening bracket.
    pub fn opened_by(ch: char) -> Option<BlockKind> {
        match ch {
            '{' => Some(BlockKind::Curly),
            '(' => Some(BlockKind::Round),
            '[' => Some(BlockKind::Square),
            _ => None,
        }
    }

    /// Block kind closed by `ch`, if it is a closing bracket.
    pub fn closed_by(ch: char) -> Option<BlockKind> {
        match ch {
            '}' => Some(BlockKind::Curly),
            ')' => Some(BlockKind::Round),
            ']' => Some(BlockKind::Square),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlockKind::File => "file",
            BlockKind::Curly => "{}",
            BlockKind::Round => "()",
            BlockKind::Square => "[]",
        };
        f.write_str(name)
    }
}

/// Child of a block: either a nested block or a leaf token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockItem {
    Block(TokenBlock),
    Token(Token),
}

/// A bracketed region of source, or the whole file.
///
/// Blocks own their children outright; there are no parent links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBlock {
    pub kind: BlockKind,
    pub children: Vec<BlockItem>,
    /// Position of the opening bracket (start of file for the root).
    pub location: Location,
}

impl TokenBlock {
    pub fn new(kind: BlockKind, location: Location) -> Self {
        TokenBlock {
            kind,
            children: Vec::new(),
            location,
        }
    }

    /// Direct token children, skipping nested blocks.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(|item| match item {
            BlockItem::Token(token) => Some(token),
            BlockItem::Block(_) => None,
        })
    }

    /// Direct block children.
    pub fn blocks(&self) -> impl Iterator<Item = &TokenBlock> {
        self.children.iter().filter_map(|item| match item {
            BlockItem::Block(block) => Some(block),
            BlockItem::Token(_) => None,
        })
    }

    fn push_token(&mut self, kind: TokenKind, text: String, location: Location) {
        self.children.push(BlockItem::Token(Token {
            kind,
            text,
            location,
        }));
    }
}

/// Lex `source`, reported as coming from `file`, into a block tree.
///
/// Fails on the first closing bracket that does not match the innermost
/// open block, or if any block is still open at end of input.
pub fn tokenize(file: impl Into<Arc<str>>, source: &str) -> Result<TokenBlock, CoreError> {
    let mut cursor = Cursor::new(file, source);
    let mut blocks = BlockStack::new(TokenBlock::new(BlockKind::File, cursor.location()));

    cursor.advance_until(is_not_whitespace);
    while let Some(ch) = cursor.current() {
        let start = cursor.location();
        let start_pos = cursor.position();

        if ch == '/' && cursor.peek_next() == Some('/') {
            cursor.advance_until(is_eol);
        } else if is_edge_of_string(cursor.text(), start_pos) {
            cursor.advance_one();
            cursor.advance_until(is_edge_of_string);
            let text = cursor.slice(start_pos + 1, cursor.position());
            blocks.current.push_token(TokenKind::String, text, start);
        } else if ch.is_ascii_digit() {
            cursor.advance_while(is_number);
            let text = cursor.slice(start_pos, cursor.position() + 1);
            blocks.current.push_token(TokenKind::Number, text, start);
        } else if let Some(kind) = BlockKind::opened_by(ch) {
            blocks.open(TokenBlock::new(kind, start));
        } else if let Some(kind) = BlockKind::closed_by(ch) {
            blocks.close(kind, start)?;
        } else if is_special_char(ch) {
            cursor.advance_while(is_special);
            let text = cursor.slice(start_pos, cursor.position() + 1);
            blocks.current.push_token(TokenKind::Special, text, start);
        } else {
            cursor.advance_while(is_word);
            let text = cursor.slice(start_pos, cursor.position() + 1);
            blocks.current.push_token(TokenKind::Word, text, start);
        }

        cursor.advance_one();
        cursor.advance_until(is_not_whitespace);
    }

    let root = blocks.finish()?;
    log::debug!(
        "lexed {}: {} top-level items",
        root.location.file,
        root.children.len()
    );
    Ok(root)
}

/// The innermost open block plus its enclosing blocks, outermost first.
struct BlockStack {
    current: TokenBlock,
    enclosing: Vec<TokenBlock>,
}

impl BlockStack {
    fn new(root: TokenBlock) -> Self {
        BlockStack {
            current: root,
            enclosing: Vec::new(),
        }
    }

    fn open(&mut self, block: TokenBlock) {
        let parent = std::mem::replace(&mut self.current, block);
        self.enclosing.push(parent);
    }

    fn close(&mut self, kind: BlockKind, at: Location) -> Result<(), CoreError> {
        if self.current.kind == kind
            && let Some(parent) = self.enclosing.pop()
        {
            let closed = std::mem::replace(&mut self.current, parent);
            self.current.children.push(BlockItem::Block(closed));
            return Ok(());
        }
        Err(CoreError::MismatchedBlock {
            open: self.current.kind,
            location: self.current.location.clone(),
            found: kind,
            found_at: at,
        })
    }

    /// The file block, or the outermost block left open.
    fn finish(self) -> Result<TokenBlock, CoreError> {
        let unclosed = match self.enclosing.get(1) {
            Some(block) => Some(block),
            None if !self.enclosing.is_empty() => Some(&self.current),
            None => None,
        };
        if let Some(block) = unclosed {
            return Err(CoreError::UnclosedBlock {
                kind: block.kind,
                location: block.location.clone(),
            });
        }
        Ok(self.current)
    }
}

/// Render the tree in the diagnostic dump format, one line per node.
///
/// Blocks print as `<location>: block <kind>`, leaves as
/// `- <location>: <kind> <text>`; nested blocks are indented two spaces.
pub fn render_token_tree(root: &TokenBlock) -> String {
    let mut out = String::new();
    render_block(root, "", &mut out);
    out
}

fn render_block(block: &TokenBlock, indent: &str, out: &mut String) {
    out.push_str(&format!("{indent}{}: block {}\n", block.location, block.kind));
    let nested = format!("{indent}  ");
    for item in &block.children {
        match item {
            BlockItem::Block(child) => render_block(child, &nested, out),
            BlockItem::Token(token) => out.push_str(&format!(
                "{indent}- {}: {} {}\n",
                token.location, token.kind, token.text
            )),
        }
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn is_special_char(ch: char) -> bool {
    SPECIAL_CHARS.contains(&ch)
}

fn is_bracket(ch: char) -> bool {
    BlockKind::opened_by(ch).is_some() || BlockKind::closed_by(ch).is_some()
}

fn is_not_whitespace(text: &[char], index: usize) -> bool {
    text.get(index).is_some_and(|&c| !is_whitespace(c))
}

fn is_eol(text: &[char], index: usize) -> bool {
    text.get(index) == Some(&'\n')
}

fn is_number(text: &[char], index: usize) -> bool {
    text.get(index).is_some_and(|c| c.is_ascii_digit())
}

fn is_special(text: &[char], index: usize) -> bool {
    text.get(index).is_some_and(|&c| is_special_char(c))
}

/// A double quote not preceded by a backslash.
fn is_edge_of_string(text: &[char], index: usize) -> bool {
    text.get(index) == Some(&'"') && (index == 0 || text[index - 1] != '\\')
}

fn is_word(text: &[char], index: usize) -> bool {
    text.get(index).is_some_and(|&c| {
        !is_whitespace(c) && !is_special_char(c) && !is_bracket(c)
    }) && !is_edge_of_string(text, index)
}
