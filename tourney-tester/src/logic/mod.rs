pub mod invariants;
pub mod reports;
pub mod tester;

pub use tester::*;
