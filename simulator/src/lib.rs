pub mod ascension;
pub mod card;
pub mod combat_event;
pub mod combatant;
pub mod config;
pub mod damage;
pub mod encounter;
pub mod enemy;
pub mod phases;
pub mod player;
pub mod resolve;
pub mod result;
pub mod rng;
pub mod run;
pub mod session;
pub mod simulation;
pub mod statics;
pub mod status;
pub mod strategy;
pub mod summary;
pub mod template;

pub use ascension::*;
pub use card::*;
pub use combat_event::*;
pub use combatant::*;
pub use config::*;
pub use damage::*;
pub use encounter::*;
pub use enemy::*;
pub use player::*;
pub use resolve::*;
pub use result::*;
pub use rng::*;
pub use run::*;
pub use session::*;
pub use simulation::*;
pub use statics::*;
pub use status::*;
pub use strategy::*;
pub use summary::*;
pub use template::*;
