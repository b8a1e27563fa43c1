pub mod decrypt;
pub mod encrypt;
pub mod summary;

pub use decrypt::*;
pub use encrypt::*;
pub use summary::*;
