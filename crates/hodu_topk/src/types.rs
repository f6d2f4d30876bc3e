pub mod dtype;
pub mod layout;
pub mod shape;

pub use dtype::*;
pub use layout::*;
pub use shape::*;
