use crate::error::{Error, Result};

use super::ENTITY_COUNT;

/// Reward constants for a [`ZombieField`](super::ZombieField)
#[derive(Debug, Clone, PartialEq)]
pub struct Rewards {
    /// Reward for every step that does not kill a zombie or fail the hunt
    pub step: f32,
    /// A kill is rewarded with `rank * kill_scale`
    pub kill_scale: f32,
    /// Terminal reward for attacking a zombie before all lower ranked zombies are dead
    pub wrong_order: f32,
    /// Added to the kill reward when the last zombie dies and the exit is revealed
    pub clear: f32,
    /// Added when the player steps onto the revealed exit
    pub escape: f32,
}

impl Default for Rewards {
    fn default() -> Self {
        Self {
            step: -0.1,
            kill_scale: 1.0,
            wrong_order: -50.0,
            clear: 0.0,
            escape: 1000.0,
        }
    }
}

/// Bonuses for moves that strictly reduce the Manhattan distance to the current objective
#[derive(Debug, Clone, PartialEq)]
pub struct Shaping {
    /// Moving closer to the lowest ranked zombie still alive
    pub toward_target: f32,
    /// Moving closer to the revealed exit
    pub toward_exit: f32,
}

impl Default for Shaping {
    fn default() -> Self {
        Self {
            toward_target: 5.0,
            toward_exit: 10.0,
        }
    }
}

/// Configuration for the [`ZombieField`](super::ZombieField)
#[derive(Debug, Clone, PartialEq)]
pub struct ZombieFieldConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// Episodes are cut off after this many steps
    pub step_cap: u32,
    pub rewards: Rewards,
    /// Distance based reward shaping, disabled if `None`
    pub shaping: Option<Shaping>,
    /// Include the exit channel in observations
    pub exit_channel: bool,
    /// Seed for the placement random source, drawn from entropy if `None`
    pub seed: Option<u64>,
}

impl Default for ZombieFieldConfig {
    fn default() -> Self {
        Self {
            grid_size: 8,
            step_cap: 200,
            rewards: Rewards::default(),
            shaping: None,
            exit_channel: true,
            seed: None,
        }
    }
}

impl ZombieFieldConfig {
    /// Shorter episodes with larger rewards and distance shaping
    pub fn shaped() -> Self {
        Self {
            step_cap: 100,
            rewards: Rewards {
                step: -0.5,
                kill_scale: 20.0,
                wrong_order: -200.0,
                clear: 500.0,
                escape: 5000.0,
            },
            shaping: Some(Shaping::default()),
            ..Default::default()
        }
    }

    /// Number of observation channels
    pub fn channels(&self) -> usize {
        if self.exit_channel {
            5
        } else {
            4
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size * self.grid_size < ENTITY_COUNT {
            return Err(Error::GridTooSmall {
                size: self.grid_size,
                entities: ENTITY_COUNT,
            });
        }
        if self.step_cap == 0 {
            return Err(Error::ZeroStepCap);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert!(ZombieFieldConfig::default().validate().is_ok());
        assert!(ZombieFieldConfig::shaped().validate().is_ok());
        assert_eq!(ZombieFieldConfig::shaped().grid_size, 8);
    }

    #[test]
    fn validation_errors() {
        let config = ZombieFieldConfig {
            grid_size: 2,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(Error::GridTooSmall {
                size: 2,
                entities: 5
            })
        );

        let config = ZombieFieldConfig {
            step_cap: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(Error::ZeroStepCap));
    }

    #[test]
    fn channel_count() {
        let config = ZombieFieldConfig {
            exit_channel: false,
            ..Default::default()
        };
        assert_eq!(config.channels(), 4);
        assert_eq!(ZombieFieldConfig::default().channels(), 5);
    }
}
