//! Monotonic label and string-literal id allocation.
//!
//! One allocator serves one compilation unit. Both counters only move
//! forward, so an id is never handed out twice within a unit.

#[derive(Debug, Default)]
pub struct LabelAllocator {
    next_label: usize,
    next_string: usize,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh control-flow label (`addr_<n>`).
    pub fn next_label(&mut self) -> String {
        let label = format!("addr_{}", self.next_label);
        self.next_label += 1;
        label
    }

    /// Fresh id for a string literal data entry.
    pub fn next_string_id(&mut self) -> usize {
        let id = self.next_string;
        self.next_string += 1;
        id
    }

    pub fn labels_allocated(&self) -> usize {
        self.next_label
    }

    pub fn strings_allocated(&self) -> usize {
        self.next_string
    }
}
