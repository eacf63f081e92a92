mod instance;
mod intent;

pub use instance::*;
pub use intent::*;
