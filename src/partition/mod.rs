//! Catalog partitioning into capacity-bounded recipe books.

pub mod books;

pub use books::*;
