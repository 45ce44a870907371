//! Host implementations of the core traits. Child processes are spawned directly
//! on the machine running the engine, with no container or namespace isolation.
pub mod process;
