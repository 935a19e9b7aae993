pub mod emit;
pub mod error;
pub mod logging;
pub mod model;
pub mod parser;
pub mod query;
pub mod site;
pub mod util;
pub mod validate;

pub use error::{NavtreeError, Result};
pub use model::{Children, IndexChunk, Link, NavIndex, NavNode, NavTreeData, TreePath};
pub use query::{Navigator, ResolveResult, TreeStats};
pub use site::{DocSite, LoadOptions};
pub use validate::{ValidationReport, validate, validate_site};
