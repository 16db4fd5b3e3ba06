//! Base SQL dialect.

use super::Dialect;

/// The reference dialect: every operation uses the provided defaults.
///
/// Concrete backends start from the same defaults and override only the
/// operations where they diverge.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseDialect;

impl BaseDialect {
    /// Registry name of the base dialect.
    pub const NAME: &'static str = "base";

    /// Creates a new base dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for BaseDialect {
    fn name(&self) -> &'static str {
        Self::NAME
    }
}
