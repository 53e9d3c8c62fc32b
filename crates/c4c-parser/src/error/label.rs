//! Labeled source ranges for diagnostic messages.

use c4c_core::position::PositionRange;

/// A message attached to a range of source text.
///
/// A diagnostic has one primary label marking where the problem is, and
/// optionally secondary labels adding context such as the include site of
/// a file.
#[derive(Debug, Clone)]
pub struct Label {
    range: PositionRange,
    message: String,
    is_primary: bool,
}

impl Label {
    pub fn primary(range: PositionRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn secondary(range: PositionRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn range(&self) -> &PositionRange {
        &self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}
