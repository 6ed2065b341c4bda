//! Value taxonomy and curated conflict table.
//!
//! Both are immutable configuration handed in from outside. They are
//! structured data loaded from YAML or JSON and validated on load, so a
//! matcher or profiler never sees a half-formed configuration.

mod parser;

pub use parser::{
    ConflictPair, ConflictTable, PolarityIndicators, Taxonomy, TaxonomyError, ValueDefinition,
};
