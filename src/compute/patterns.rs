//! Pattern library - named seed shapes placed around the board center.

use super::Cell;

const GLIDER: &[(i32, i32)] = &[(-1, 0), (0, 1), (1, -1), (1, 0), (1, 1)];

const BEACON: &[(i32, i32)] = &[
    (-2, -2),
    (-1, -2),
    (-2, -1),
    (-1, -1),
    (0, 0),
    (1, 0),
    (0, 1),
    (1, 1),
];

const LWSS: &[(i32, i32)] = &[
    (-1, 0),
    (-1, 2),
    (0, -1),
    (1, -1),
    (2, -1),
    (2, 2),
    (3, -1),
    (3, 0),
    (3, 1),
];

const MWSS: &[(i32, i32)] = &[
    (-2, -1),
    (-2, 1),
    (-1, 2),
    (0, -2),
    (0, 2),
    (1, 2),
    (2, -1),
    (2, 2),
    (3, 0),
    (3, 1),
    (3, 2),
];

const HWSS: &[(i32, i32)] = &[
    (-2, -1),
    (-2, 1),
    (-1, 2),
    (0, -2),
    (0, 2),
    (1, -2),
    (1, 2),
    (2, 2),
    (3, -1),
    (3, 2),
    (4, 0),
    (4, 1),
    (4, 2),
];

/// Catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Diagonal spaceship (period 4).
    Glider,
    /// Oscillator (period 2).
    Beacon,
    /// Lightweight spaceship.
    LightWeightSpaceship,
    /// Middleweight spaceship.
    MiddleWeightSpaceship,
    /// Heavyweight spaceship.
    HeavyWeightSpaceship,
}

impl PatternKind {
    /// Get all catalog entries.
    pub const fn all() -> [PatternKind; 5] {
        [
            PatternKind::Glider,
            PatternKind::Beacon,
            PatternKind::LightWeightSpaceship,
            PatternKind::MiddleWeightSpaceship,
            PatternKind::HeavyWeightSpaceship,
        ]
    }

    /// Name used in `ADD_PATTERN` commands.
    pub const fn name(self) -> &'static str {
        match self {
            PatternKind::Glider => "glider",
            PatternKind::Beacon => "beacon",
            PatternKind::LightWeightSpaceship => "light-weight spaceship",
            PatternKind::MiddleWeightSpaceship => "middle-weight spaceship",
            PatternKind::HeavyWeightSpaceship => "heavy-weight spaceship",
        }
    }

    /// Exact-match lookup. Callers lower-case free text first.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|kind| kind.name() == name)
    }

    /// Offsets from the board center, in placement order.
    pub const fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            PatternKind::Glider => GLIDER,
            PatternKind::Beacon => BEACON,
            PatternKind::LightWeightSpaceship => LWSS,
            PatternKind::MiddleWeightSpaceship => MWSS,
            PatternKind::HeavyWeightSpaceship => HWSS,
        }
    }

    /// Absolute cells of this pattern anchored at `center`.
    pub fn cells_at(self, center: Cell) -> Vec<Cell> {
        self.offsets()
            .iter()
            .filter_map(|&(dx, dy)| center.offset(dx, dy))
            .collect()
    }
}
