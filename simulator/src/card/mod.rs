mod id;
mod instance;
mod piles;

pub use id::*;
pub use instance::*;
pub use piles::*;
