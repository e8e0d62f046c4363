pub mod measurement;
pub mod quadrant;
pub mod types;

pub use measurement::*;
pub use quadrant::*;
pub use types::*;
