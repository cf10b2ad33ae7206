use crate::error::Result;

/// Every configuration section checks its own invariants.
pub trait ConfigSection {
    fn validate(&self) -> Result<()>;
}
