pub mod filter;
pub mod terminal;
