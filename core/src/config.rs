/// How 8XY6/8XYE and FX55/FX65 behave, the one place where common
/// interpreters disagree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compatibility {
    /// Shifts act on Vx in place; FX55/FX65 leave I untouched
    #[default]
    Modern,
    /// As on the COSMAC VIP: shifts read Vy, FX55/FX65 leave I past the last register
    CosmacVip,
}

/// Settings fixed for the lifetime of a machine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub compatibility: Compatibility,
    /// Seeds the CXNN generator; `None` draws a seed from the OS
    pub seed: Option<u64>,
}
