pub mod comparison;
pub mod domain;
pub mod errors;
pub mod pipeline;
pub mod repair;
pub mod traits;
