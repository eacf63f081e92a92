lazy_static::lazy_static! {
    pub static ref HAND_SIZE: usize = 5;
    pub static ref HAND_LIMIT: usize = 10;
    pub static ref MAX_ROUNDS: u32 = 50;
    pub static ref MAX_PLAYS_PER_TURN: usize = 100;
    pub static ref WEAK_FACTOR: f64 = 0.75;
    pub static ref VULNERABLE_FACTOR: f64 = 1.5;
    pub static ref FRAIL_FACTOR: f64 = 0.75;
    pub static ref POTION_SLOTS: usize = 3;
    pub static ref BLOCK_PRIORITY_THRESHOLD: u32 = 10;
    pub static ref BETWEEN_ACT_HEAL: f64 = 0.25;
    pub static ref SEED_MODULUS: f64 = 2147483647.0;
}
