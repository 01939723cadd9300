//! x86-64 backend: lowers a resolved operation tree to flat assembler text.
//!
//! The emitter is a plain stack machine. Every immediate pushes one value,
//! native calls pop their inputs and push their output, and `If` pops the
//! boolean left by its condition. Output is collected in three buffers
//! that are stitched into a fixed ELF64 skeleton by [`AsmModule::render`]:
//!
//! ```text
//! format ELF64 executable 3
//! segment readable executable
//! ;; -- Header --      one-time native function headers
//! ;; -- Main --
//! entry start
//! start:               generated code, then exit(0)
//! ;; -- Data --
//! segment readable writable
//!                      string literal table
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::labels::LabelAllocator;
use crate::location::Location;
use crate::ops::{ImmediateValue, Operation};

const INDENT: &str = "  ";

/// `exit(0)` through the raw Linux syscall.
const EXIT_SEQUENCE: [&str; 3] = ["mov rax, 60", "mov rdi, 0", "syscall"];

/// An append-only list of assembly lines, kept unindented.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AsmBuffer {
    lines: Vec<String>,
}

impl AsmBuffer {
    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Traceability comment pointing back at the source operation.
    pub fn comment(&mut self, location: &Location, name: &str) {
        self.line(format!(";; {location}: {name}"));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Labels stay flush left; everything else gets a fixed indent.
pub fn format_line(line: &str) -> String {
    if line.ends_with(':') {
        line.to_string()
    } else {
        format!("{INDENT}{line}")
    }
}

/// The three output buffers of one compilation unit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AsmModule {
    pub header: AsmBuffer,
    pub code: AsmBuffer,
    pub data: AsmBuffer,
}

impl AsmModule {
    /// Assemble the final program text.
    pub fn render(&self) -> String {
        let mut text: Vec<String> = vec![
            "format ELF64 executable 3".into(),
            "segment readable executable".into(),
            ";; -- Header --".into(),
        ];
        text.extend(self.header.lines().iter().map(|l| format_line(l)));
        text.push(";; -- Main --".into());
        text.push("entry start".into());
        text.push("start:".into());
        text.extend(self.code.lines().iter().map(|l| format_line(l)));
        text.push(";; -- Data --".into());
        text.push("segment readable writable".into());
        text.extend(self.data.lines().iter().map(|l| format_line(l)));
        text.join("\n")
    }
}

impl fmt::Display for AsmModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Code generator state for one compilation unit.
///
/// Headers already emitted are tracked by descriptor id, so a descriptor
/// contributes its header once no matter how many call sites it has.
#[derive(Debug, Default)]
pub struct AsmGenerator {
    labels: LabelAllocator,
    module: AsmModule,
    emitted_headers: HashSet<&'static str>,
}

impl AsmGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a sequence of operations in order, depth first.
    pub fn emit(&mut self, ops: &[Operation<'_>]) {
        for op in ops {
            self.emit_operation(op);
        }
    }

    fn emit_operation(&mut self, op: &Operation<'_>) {
        log::trace!("emitting {} at {}", op.name(), op.location());
        match op {
            Operation::If {
                condition,
                then_body,
                else_body,
                location,
                name,
            } => {
                let end_if = self.labels.next_label();
                let end_else = self.labels.next_label();
                self.module.code.comment(location, name);

                self.emit(condition);
                self.module.code.line("pop rax");
                self.module.code.line("test rax, rax");
                self.module.code.line(format!("jz {end_if}"));

                self.emit(then_body);
                if else_body.is_some() {
                    self.module.code.line(format!("jmp {end_else}"));
                }
                self.module.code.line(format!("{end_if}:"));
                if let Some(else_body) = else_body {
                    self.emit(else_body);
                }
                self.module.code.line(format!("{end_else}:"));
            }
            Operation::Call {
                descriptor,
                arguments,
                location,
                name,
            } => {
                self.emit(arguments);
                log::trace!(
                    "call {} ({}) -> {}, stack effect {}",
                    descriptor.id,
                    descriptor.inputs.len(),
                    descriptor.output,
                    descriptor.stack_effect()
                );
                let strategy = descriptor.code.asm_x86_64;
                if let Some(header) = strategy.header
                    && self.emitted_headers.insert(descriptor.id)
                {
                    self.module.header.comment(location, name);
                    header(&mut self.module.header, &mut self.labels);
                }
                self.module.code.comment(location, name);
                (strategy.call)(&mut self.module.code, &mut self.labels);
            }
            Operation::Immediate {
                value,
                location,
                name,
            } => {
                log::trace!("immediate {}", value.value_type());
                self.module.code.comment(location, name);
                match value {
                    ImmediateValue::Int64(value) => self.push_int(*value),
                    ImmediateValue::String(value) => self.push_string(value),
                }
            }
        }
    }

    fn push_int(&mut self, value: i64) {
        // `push imm` only encodes a sign-extended 32-bit immediate.
        if i32::try_from(value).is_ok() {
            self.module.code.line(format!("push {value}"));
        } else {
            self.module.code.line(format!("mov rax, {value}"));
            self.module.code.line("push rax");
        }
    }

    fn push_string(&mut self, value: &str) {
        let id = self.labels.next_string_id();
        self.module.code.line(format!("push str_{id}"));

        let bytes = value.as_bytes();
        self.module.data.line(format!("str_{id}:"));
        self.module.data.line(format!("dq {}", bytes.len()));
        if !bytes.is_empty() {
            let list: Vec<String> = bytes.iter().map(|b| b.to_string()).collect();
            self.module.data.line(format!("db {}", list.join(", ")));
        }
    }

    /// Close the unit with the exit sequence and hand back the buffers.
    pub fn finish(mut self) -> AsmModule {
        for line in EXIT_SEQUENCE {
            self.module.code.line(line);
        }
        log::debug!(
            "generated {} header, {} code and {} data lines ({} labels, {} strings)",
            self.module.header.len(),
            self.module.code.len(),
            self.module.data.len(),
            self.labels.labels_allocated(),
            self.labels.strings_allocated(),
        );
        self.module
    }
}

/// Generate the assembly text for a whole operation tree.
pub fn generate_asm(ops: &[Operation<'_>]) -> String {
    let mut generator = AsmGenerator::new();
    generator.emit(ops);
    generator.finish().to_string()
}
