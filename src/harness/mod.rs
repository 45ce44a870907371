//! Source generation wrapped around a submission, and decoding of what the
//! generated program prints back.

pub mod cpp;
pub mod java;
pub mod javascript;
pub mod literal;
pub mod protocol;
pub mod python;
