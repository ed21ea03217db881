use crate::algo::tabular::Canonical;

use super::{
    grid::{zombie_channel, Grid, PLAYER},
    ZOMBIE_COUNT,
};

/// Offsets `(zombie_row - player_row, zombie_col - player_col)` of the zombies still
/// alive, in zombie index order, padded with `None`
///
/// Dead zombies leave no trace in the key, so boards that differ only in where the dead
/// zombies fell, or where the player and the survivors stand in absolute terms, share
/// one entry in the Q-table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ThreatKey([Option<(i32, i32)>; ZOMBIE_COUNT]);

impl ThreatKey {
    pub fn offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.0.iter().map_while(|o| *o)
    }
}

impl Canonical for Grid {
    type Key = ThreatKey;

    /// **Panics** if the grid lacks the player or zombie channels, or has no player cell
    fn canonical_key(&self) -> ThreatKey {
        assert!(
            self.channels() > ZOMBIE_COUNT,
            "Observation has {} channels, expected at least {}.",
            self.channels(),
            ZOMBIE_COUNT + 1
        );
        let (pr, pc) = self.find(PLAYER).expect("Observation has no player cell");

        let mut key = ThreatKey::default();
        let alive = (0..ZOMBIE_COUNT).filter_map(|i| self.find(zombie_channel(i)));
        for (slot, (zr, zc)) in key.0.iter_mut().zip(alive) {
            *slot = Some((zr as i32 - pr as i32, zc as i32 - pc as i32));
        }
        key
    }
}
