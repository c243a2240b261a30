//! Newtype wrappers for the learning table's keys and actions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of moves available in every 2048 position.
pub const ACTION_COUNT: usize = 4;

/// A move direction.
///
/// Indices follow the gym 2048 convention: 0=Up, 1=Right, 2=Down, 3=Left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Up,
    Right,
    Down,
    Left,
}

impl Action {
    /// All actions in index order.
    pub const ALL: [Action; ACTION_COUNT] = [Action::Up, Action::Right, Action::Down, Action::Left];

    /// Create an action from its index.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAction`] if the index is >= 4.
    pub fn from_index(index: usize) -> Result<Self, crate::Error> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(crate::Error::InvalidAction { index })
    }

    /// Slot of this action in per-state arrays.
    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Right => 1,
            Action::Down => 2,
            Action::Left => 3,
        }
    }
}

impl From<Action> for usize {
    fn from(action: Action) -> Self {
        action.index()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "up",
            Action::Right => "right",
            Action::Down => "down",
            Action::Left => "left",
        };
        f.write_str(name)
    }
}

/// Hashable, order-sensitive key for one board configuration.
///
/// Built from the flattened board. There is no mutating API, so a
/// fingerprint never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(Box<[u32]>);

impl Fingerprint {
    /// Create a fingerprint from flattened board cells.
    pub fn from_cells(cells: &[u32]) -> Self {
        Fingerprint(cells.into())
    }

    /// Borrow the cell values.
    pub fn cells(&self) -> &[u32] {
        &self.0
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u32]> for Fingerprint {
    fn from(cells: &[u32]) -> Self {
        Self::from_cells(cells)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, cell) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{cell}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_action_index_roundtrip() {
        for action in Action::ALL {
            assert_eq!(Action::from_index(action.index()).unwrap(), action);
        }
    }

    #[test]
    fn test_action_from_invalid_index() {
        assert!(matches!(
            Action::from_index(4),
            Err(crate::Error::InvalidAction { index: 4 })
        ));
    }

    #[test]
    fn test_fingerprint_equality_is_positional() {
        let a = Fingerprint::from_cells(&[2, 0, 0, 4]);
        let b = Fingerprint::from_cells(&[2, 0, 0, 4]);
        let c = Fingerprint::from_cells(&[4, 0, 0, 2]);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Fingerprint> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_fingerprint_display() {
        let fp = Fingerprint::from_cells(&[2, 0, 8]);
        assert_eq!(fp.to_string(), "(2, 0, 8)");
    }
}
