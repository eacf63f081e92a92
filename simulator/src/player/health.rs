/// Current and maximum hit points. Current is clamped to `0..=max` by every operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Health(pub u32, pub u32);

impl Health {
    pub fn full(max: u32) -> Self {
        Self(max, max)
    }

    pub fn new(current: u32, max: u32) -> Self {
        Self(current.min(max), max)
    }

    pub fn max(&self) -> u32 {
        self.1
    }

    pub fn current(&self) -> u32 {
        self.0
    }

    pub fn fraction(&self) -> f32 {
        if self.1 == 0 {
            return 0.0;
        }
        (self.0 as f64 / self.1 as f64) as f32
    }

    pub fn is_dead(&self) -> bool {
        self.0 == 0
    }

    pub fn below_half(&self) -> bool {
        (self.0 as f64) < self.1 as f64 * 0.5
    }

    pub fn missing(&self) -> u32 {
        self.1 - self.0
    }

    /// Raises the maximum and heals by the same amount.
    pub fn raise_max(&mut self, amount: u32) {
        self.1 += amount;
        self.0 += amount;
    }

    /// Scales current and maximum by `multiplier`, rounding up.
    pub fn scaled(&self, multiplier: f64) -> Self {
        let scale = |v: u32| (v as f64 * multiplier).ceil() as u32;
        Self(scale(self.0), scale(self.1))
    }
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.current(), self.max())
    }
}

impl std::ops::Add<u32> for Health {
    type Output = Self;

    fn add(self, other: u32) -> Self::Output {
        Self(self.1.min(self.0.saturating_add(other)), self.1)
    }
}

impl std::ops::Sub<u32> for Health {
    type Output = Self;

    fn sub(self, other: u32) -> Self::Output {
        Self(self.0.saturating_sub(other), self.1)
    }
}

impl std::ops::AddAssign<u32> for Health {
    fn add_assign(&mut self, other: u32) {
        *self = *self + other;
    }
}

impl std::ops::SubAssign<u32> for Health {
    fn sub_assign(&mut self, other: u32) {
        *self = *self - other;
    }
}
