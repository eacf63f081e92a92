use std::collections::BTreeMap;

use models::StatusKind;

/// Status magnitudes of one combatant. Zero entries are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statuses(BTreeMap<StatusKind, i32>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// Artifact absorbed a debuff.
    Negated,
}

impl Statuses {
    pub fn get(&self, kind: StatusKind) -> i32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Positive magnitude of `kind`, or zero.
    pub fn stacks(&self, kind: StatusKind) -> u32 {
        self.get(kind).max(0) as u32
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.get(kind) > 0
    }

    pub fn add(&mut self, kind: StatusKind, amount: i32) {
        let value = self.get(kind) + amount;
        self.set(kind, value);
    }

    pub fn set(&mut self, kind: StatusKind, value: i32) {
        if value == 0 {
            self.0.remove(&kind);
        } else {
            self.0.insert(kind, value);
        }
    }

    pub fn remove(&mut self, kind: StatusKind) -> i32 {
        self.0.remove(&kind).unwrap_or(0)
    }

    /// Adds `amount` unless it is a debuff and an Artifact charge absorbs it.
    pub fn apply(&mut self, kind: StatusKind, amount: i32) -> Applied {
        if kind.is_debuff(amount) && self.has(StatusKind::Artifact) {
            self.add(StatusKind::Artifact, -1);
            return Applied::Negated;
        }
        self.add(kind, amount);
        Applied::Applied
    }

    /// End-of-turn tick: every decaying status loses one stack, floored at zero.
    pub fn decay(&mut self) {
        self.0.retain(|kind, value| {
            if kind.decays() && *value > 0 {
                *value -= 1;
            }
            *value != 0
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatusKind, i32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(StatusKind, i32)> for Statuses {
    fn from_iter<T: IntoIterator<Item = (StatusKind, i32)>>(iter: T) -> Self {
        let mut statuses = Statuses::default();
        for (kind, amount) in iter {
            statuses.add(kind, amount);
        }
        statuses
    }
}

impl std::fmt::Display for Statuses {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k} {v}")).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_only_touches_decaying_kinds() {
        let mut statuses: Statuses = [
            (StatusKind::Vulnerable, 2),
            (StatusKind::Weak, 1),
            (StatusKind::Strength, 3),
        ]
        .into_iter()
        .collect();
        statuses.decay();
        assert_eq!(statuses.get(StatusKind::Vulnerable), 1);
        assert!(!statuses.has(StatusKind::Weak));
        assert_eq!(statuses.get(StatusKind::Strength), 3);
    }

    #[test]
    fn artifact_negates_debuffs_only() {
        let mut statuses: Statuses = [(StatusKind::Artifact, 1)].into_iter().collect();
        assert_eq!(statuses.apply(StatusKind::Strength, 2), Applied::Applied);
        assert_eq!(statuses.apply(StatusKind::Weak, 2), Applied::Negated);
        assert!(!statuses.has(StatusKind::Weak));
        assert!(!statuses.has(StatusKind::Artifact));
        assert_eq!(statuses.apply(StatusKind::Strength, -1), Applied::Applied);
        assert_eq!(statuses.get(StatusKind::Strength), 1);
    }

    #[test]
    fn negative_strength_is_kept() {
        let mut statuses = Statuses::default();
        statuses.add(StatusKind::Strength, -2);
        assert_eq!(statuses.get(StatusKind::Strength), -2);
        assert_eq!(statuses.stacks(StatusKind::Strength), 0);
        statuses.add(StatusKind::Strength, 2);
        assert!(statuses.is_empty());
    }
}
