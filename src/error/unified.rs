//! Error classification.

use strum::{Display, EnumString};

/// Broad error category for routing handling logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    /// Input was not JSON, or not a JSON object.
    Syntax,
    /// A recognized field carried a value of the wrong shape.
    Schema,
    Projection,
    Transfer,
    Configuration,
}
