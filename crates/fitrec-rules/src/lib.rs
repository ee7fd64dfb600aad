//! Rule engine: keyed plan templates, experience fallback and table-driven
//! age-band modifiers.

pub mod defaults;
pub mod engine;
pub mod selector;
pub mod tables;
pub mod types;

pub use defaults::default_rule_tables;
pub use engine::RuleEngine;
pub use selector::fallback_chain;
pub use tables::RuleTables;
pub use types::*;
