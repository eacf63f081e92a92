mod sim;

#[allow(unused)]
pub use sim::*;
