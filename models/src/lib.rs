pub mod ai;
pub mod ascension;
pub mod card;
pub mod damage;
pub mod effect;
pub mod enemy;
pub mod intent;
pub mod potion;
pub mod re;
pub mod relic;
pub mod special;
pub mod status;

pub use ai::*;
pub use ascension::*;
pub use card::*;
pub use damage::*;
pub use effect::*;
pub use enemy::*;
pub use intent::*;
pub use potion::*;
pub use re::*;
pub use relic::*;
pub use special::*;
pub use status::*;
