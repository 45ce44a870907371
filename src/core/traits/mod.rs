pub mod process;
pub mod runner;
