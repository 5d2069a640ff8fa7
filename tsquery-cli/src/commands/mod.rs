pub mod args;
pub mod check;
pub mod query;

pub use args::QueryArgs;
pub use check::run_check;
pub use query::{run_explain, run_query};
