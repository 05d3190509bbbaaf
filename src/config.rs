//! Build-time configuration the core treats as opaque.

/// Hard cap on the number of hints `Dictionary::hints` will return.
pub const DICTIONARY_MAX_HINTS: usize = 20;

/// Default `cost_max` a freshly constructed `Dictionary` starts with.
pub const DEFAULT_COST_MAX: u32 = 6;
