//! Native functions compiled into bootc.
//!
//! Each native function owns one or more overloads. An overload is a
//! [`FunctionDescriptor`]: its stack signature plus the x86-64 emitters the
//! code generator invokes for it. Picking the overload that matches a call
//! site is the parser's job; the generator only ever sees the descriptor it
//! was handed.

use crate::codegen_x86_64::AsmBuffer;
use crate::labels::LabelAllocator;
use crate::types::ValueType;

/// Appends instructions to a buffer, allocating labels as needed.
pub type EmitFn = fn(&mut AsmBuffer, &mut LabelAllocator);

/// Code generation strategy for the x86-64 target.
#[derive(Debug, Clone, Copy)]
pub struct X86_64Code {
    /// Emitted into the header at most once per compilation unit.
    pub header: Option<EmitFn>,
    /// Emitted at every call site.
    pub call: EmitFn,
}

/// Per-architecture code of a descriptor. Only x86-64 exists today.
#[derive(Debug, Clone, Copy)]
pub struct NativeCode {
    pub asm_x86_64: X86_64Code,
}

#[derive(Debug)]
pub struct FunctionDescriptor {
    /// Key the generator tracks emitted headers by.
    ///
    /// Must be unique across every descriptor handed to one generator, not
    /// only within `NATIVE_FUNCTIONS`: two descriptors sharing an id share a
    /// single header emission.
    pub id: &'static str,
    /// Stack inputs in push order.
    pub inputs: &'static [ValueType],
    pub output: ValueType,
    pub code: NativeCode,
}

impl FunctionDescriptor {
    /// Net change in evaluation-stack depth caused by one call.
    pub fn stack_effect(&self) -> isize {
        let consumed: usize = self.inputs.iter().map(|ty| ty.stack_slots()).sum();
        self.output.stack_slots() as isize - consumed as isize
    }
}

/// A native function name together with all of its overloads.
#[derive(Debug)]
pub struct NativeFunction {
    pub name: &'static str,
    pub overloads: &'static [FunctionDescriptor],
}

/// `ge`: pops `b` then `a` and pushes `a >= b` as 0/1.
pub const GE_INT64: FunctionDescriptor = FunctionDescriptor {
    id: "ge(int64,int64)",
    inputs: &[ValueType::Int64, ValueType::Int64],
    output: ValueType::Bool,
    code: NativeCode {
        asm_x86_64: X86_64Code {
            header: None,
            call: emit_ge_int64,
        },
    },
};

/// `breakpoint`: a debugger trap with no stack effect.
pub const BREAKPOINT: FunctionDescriptor = FunctionDescriptor {
    id: "breakpoint()",
    inputs: &[],
    output: ValueType::Void,
    code: NativeCode {
        asm_x86_64: X86_64Code {
            header: None,
            call: emit_breakpoint,
        },
    },
};

/// The complete list of native functions known to the core.
pub const NATIVE_FUNCTIONS: &[NativeFunction] = &[
    NativeFunction {
        name: "ge",
        overloads: &[GE_INT64],
    },
    NativeFunction {
        name: "breakpoint",
        overloads: &[BREAKPOINT],
    },
];

/// Look up a native function by its source-level name.
///
/// The search is linear over `NATIVE_FUNCTIONS` because the table is small.
pub fn find_native(name: &str) -> Option<&'static NativeFunction> {
    NATIVE_FUNCTIONS.iter().find(|native| native.name == name)
}

fn emit_ge_int64(out: &mut AsmBuffer, _labels: &mut LabelAllocator) {
    out.line("mov rcx, 0");
    out.line("mov rdx, 1");
    out.line("pop rbx");
    out.line("pop rax");
    out.line("cmp rax, rbx");
    out.line("cmovge rcx, rdx");
    out.line("push rcx");
}

fn emit_breakpoint(out: &mut AsmBuffer, _labels: &mut LabelAllocator) {
    out.line("int3");
}
