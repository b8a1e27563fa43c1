pub mod aead;
pub mod name;

pub use aead::*;
pub use name::*;
