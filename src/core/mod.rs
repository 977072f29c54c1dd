//! Core data structures: terms, triples and binding tables.

pub mod numeric;
pub mod table;
pub mod term;
pub mod triple;

pub use numeric::Numeric;
pub use table::{BindingTable, Row};
pub use term::Term;
pub use triple::{Triple, TripleMatch};
