//! Recipe loading and validation
//!
//! A recipe is the declarative description of what to crawl: start URLs,
//! the CSS selectors that locate item links on a list page, the pagination
//! strategy, crawl limits, and output locations.

mod parser;
mod types;
mod validation;

pub use parser::{compute_recipe_hash, load_recipe, load_recipe_with_hash, parse_recipe};
pub use types::{Limits, OutputPaths, Pagination, Recipe};
pub use validation::validate;
