mod first;
mod follow;
mod parsing_table;

pub use first::{FirstSet, FirstSets};
pub use follow::FollowSets;
pub use parsing_table::ParsingTable;
