pub mod greet;
pub mod help;
pub mod pages;
pub mod ping;
