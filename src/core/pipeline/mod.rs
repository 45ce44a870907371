pub mod dispatching;
pub mod judging;
