use regex::Regex;

lazy_static::lazy_static! {
    pub static ref RANGE_DESCRIPTOR: Regex = Regex::new(r"^(\d+)(?:\s*-\s*(\d+))?$").unwrap();
    pub static ref TAG_WITH_AMOUNT: Regex = Regex::new(r"^([A-Za-z_]+?)(\d+)$").unwrap();
}
