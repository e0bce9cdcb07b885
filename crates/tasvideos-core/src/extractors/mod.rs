pub mod pagination;
pub mod path;
pub mod query;

pub use pagination::Pagination;
pub use path::Path;
pub use query::ValidatedQuery;
