pub mod common;
pub mod pair;
pub mod settings;
pub mod swap;
pub mod wallet;
