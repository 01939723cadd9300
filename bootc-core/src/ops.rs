//! Resolved operation tree consumed by the code generator.
//!
//! The tree is built by the external parser after name resolution and
//! overload selection, so every call already refers to exactly one
//! [`FunctionDescriptor`]. Each operation carries a human-readable `name`
//! that only shows up in the comments of the generated assembly.

use crate::builtins::FunctionDescriptor;
use crate::location::Location;
use crate::types::ValueType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImmediateValue {
    Int64(i64),
    String(String),
}

impl ImmediateValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            ImmediateValue::Int64(_) => ValueType::Int64,
            ImmediateValue::String(_) => ValueType::String,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Operation<'d> {
    If {
        /// Must leave exactly one boolean on the evaluation stack.
        condition: Vec<Operation<'d>>,
        then_body: Vec<Operation<'d>>,
        else_body: Option<Vec<Operation<'d>>>,
        location: Location,
        name: String,
    },
    Call {
        descriptor: &'d FunctionDescriptor,
        /// Emitted left to right before the call itself.
        arguments: Vec<Operation<'d>>,
        location: Location,
        name: String,
    },
    Immediate {
        value: ImmediateValue,
        location: Location,
        name: String,
    },
}

impl<'d> Operation<'d> {
    pub fn int(value: i64, location: Location) -> Self {
        Operation::Immediate {
            value: ImmediateValue::Int64(value),
            location,
            name: value.to_string(),
        }
    }

    pub fn string(value: impl Into<String>, location: Location) -> Self {
        let value = value.into();
        Operation::Immediate {
            name: format!("{value:?}"),
            value: ImmediateValue::String(value),
            location,
        }
    }

    pub fn call(
        descriptor: &'d FunctionDescriptor,
        arguments: Vec<Operation<'d>>,
        location: Location,
        name: impl Into<String>,
    ) -> Self {
        Operation::Call {
            descriptor,
            arguments,
            location,
            name: name.into(),
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            Operation::If { location, .. }
            | Operation::Call { location, .. }
            | Operation::Immediate { location, .. } => location,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Operation::If { name, .. }
            | Operation::Call { name, .. }
            | Operation::Immediate { name, .. } => name,
        }
    }
}
