mod health;
mod state;
mod template;

pub use health::*;
pub use state::*;
pub use template::*;
