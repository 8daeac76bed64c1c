//! Transition values.

use serde::{Deserialize, Serialize};

/// An immutable `(from, to)` pair of state ids.
///
/// Transitions are plain values: two transitions with equal endpoints are
/// interchangeable, and executors reject registering the same pair twice.
///
/// # Example
///
/// ```rust
/// use statecore::core::Transition;
///
/// let a = Transition::new("idle", "run");
/// let b = Transition::new("idle", "run");
///
/// assert_eq!(a, b);
/// assert_eq!(a.from(), &"idle");
/// assert_eq!(a.to(), &"run");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition<Id> {
    from: Id,
    to: Id,
}

impl<Id> Transition<Id> {
    pub fn new(from: Id, to: Id) -> Self {
        Self { from, to }
    }

    /// Source state id.
    pub fn from(&self) -> &Id {
        &self.from
    }

    /// Target state id.
    pub fn to(&self) -> &Id {
        &self.to
    }

    /// The same transition with endpoints swapped.
    pub fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }

    pub fn into_parts(self) -> (Id, Id) {
        (self.from, self.to)
    }
}

impl<Id> From<(Id, Id)> for Transition<Id> {
    fn from((from, to): (Id, Id)) -> Self {
        Self::new(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    enum Pose {
        Stand,
        Crouch,
        Prone,
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(
            Transition::new(Pose::Stand, Pose::Crouch),
            Transition::new(Pose::Stand, Pose::Crouch)
        );
        assert_ne!(
            Transition::new(Pose::Stand, Pose::Crouch),
            Transition::new(Pose::Crouch, Pose::Stand)
        );
    }

    #[test]
    fn equal_transitions_hash_together() {
        let mut set = HashSet::new();
        set.insert(Transition::new(Pose::Stand, Pose::Prone));
        set.insert(Transition::new(Pose::Stand, Pose::Prone));
        set.insert(Transition::new(Pose::Prone, Pose::Stand));

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn reversed_swaps_endpoints() {
        let transition = Transition::new(Pose::Crouch, Pose::Prone).reversed();

        assert_eq!(transition.from(), &Pose::Prone);
        assert_eq!(transition.to(), &Pose::Crouch);
    }

    #[test]
    fn converts_from_tuple() {
        let transition: Transition<&str> = ("a", "b").into();
        assert_eq!(transition.into_parts(), ("a", "b"));
    }

    #[test]
    fn transition_serializes_correctly() {
        let transition = Transition::new(Pose::Stand, Pose::Crouch);
        let json = serde_json::to_string(&transition).unwrap();

        assert_eq!(json, r#"{"from":"Stand","to":"Crouch"}"#);
        let deserialized: Transition<Pose> = serde_json::from_str(&json).unwrap();
        assert_eq!(transition, deserialized);
    }
}
