/// Candy kinds. The discriminant is the value written to instance buffers
/// and the bridge's kind snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CandyKind {
    Cherry = 0,
    Lemon = 1,
    Mint = 2,
    Blueberry = 3,
    Grape = 4,
    Orange = 5,
}

impl CandyKind {
    pub const ALL: [CandyKind; 6] = [
        Self::Cherry,
        Self::Lemon,
        Self::Mint,
        Self::Blueberry,
        Self::Grape,
        Self::Orange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Cherry => "cherry",
            Self::Lemon => "lemon",
            Self::Mint => "mint",
            Self::Blueberry => "blueberry",
            Self::Grape => "grape",
            Self::Orange => "orange",
        }
    }

    /// Base RGB color for the host renderer. Not used by any game rule.
    pub fn color(self) -> [u8; 3] {
        match self {
            Self::Cherry => [235, 84, 97],
            Self::Lemon => [251, 211, 58],
            Self::Mint => [84, 214, 170],
            Self::Blueberry => [92, 129, 253],
            Self::Grape => [169, 119, 243],
            Self::Orange => [255, 155, 66],
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// Special variant of a candy. Carried as data only; no rule reads it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Special {
    #[default]
    None = 0,
    StripedHorizontal = 1,
    StripedVertical = 2,
}

/// Events the simulation emits for the host to animate or play sounds for.
/// Cleared at the start of every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GameEvent {
    SwapAccepted = 0,
    InvalidSwap = 1,
    MatchResolved = 2,
    LevelComplete = 3,
    GameOver = 4,
}

/// Per-level parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelConfig {
    pub target_score: u32,
    pub move_allowance: u32,
}

impl LevelConfig {
    pub const fn new(target_score: u32, move_allowance: u32) -> Self {
        LevelConfig {
            target_score,
            move_allowance,
        }
    }
}

/// Built-in level table. Advancing past the last entry wraps to the first.
pub const LEVELS: [LevelConfig; 2] = [LevelConfig::new(1200, 20), LevelConfig::new(2500, 22)];

/// Default board dimensions.
pub const DEFAULT_ROWS: usize = 8;
pub const DEFAULT_COLS: usize = 8;

/// Minimum run length that counts as a match.
pub const MIN_RUN: usize = 3;

pub const SCORE_PER_TILE: u32 = 50;

/// Defined for a future cascade multiplier; scoring does not apply it.
pub const CASCADE_BONUS: u32 = 100;

/// Length of the crush animation window (seconds) before a match resolves.
pub const CRUSH_ANIM_TIME: f32 = 0.22;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_six_distinct_kinds() {
        for (i, kind) in CandyKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, i);
            assert_eq!(CandyKind::from_index(i), *kind);
        }
        assert_eq!(CandyKind::from_index(6), CandyKind::Cherry);
        assert_eq!(CandyKind::Cherry.name(), "cherry");
    }

    #[test]
    fn level_table_is_positive() {
        for level in LEVELS {
            assert!(level.target_score > 0);
            assert!(level.move_allowance > 0);
        }
    }
}
