pub mod browser;
pub mod memory;
