pub mod badge;
pub mod header;
pub mod help;
