//! Value types visible to native function signatures.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int64,
    Bool,
    String,
    /// No value; the result type of calls with no net stack effect.
    Void,
}

impl ValueType {
    /// Number of evaluation-stack slots a value of this type occupies.
    pub fn stack_slots(self) -> usize {
        match self {
            ValueType::Void => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Int64 => "int64",
            ValueType::Bool => "bool",
            ValueType::String => "string",
            ValueType::Void => "void",
        };
        f.write_str(name)
    }
}
