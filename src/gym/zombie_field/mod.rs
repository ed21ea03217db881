//! A zombie hunt on a square grid
//!
//! The player has to kill three zombies of rank 1, 10 and 100, strictly in that order,
//! which reveals an exit somewhere on the field. Reaching the exit wins the episode,
//! attacking a zombie out of order loses it.

use log::{debug, trace};
use rand::{rngs::StdRng, seq::IteratorRandom, SeedableRng};
use strum::{Display, EnumIter, FromRepr, VariantArray};

use crate::{
    env::{DiscreteActionSpace, Environment, Report, Transition},
    error::Result,
};

mod config;
mod grid;
mod key;

pub use config::{Rewards, Shaping, ZombieFieldConfig};
pub use grid::{zombie_channel, Grid, Pos, EXIT, PLAYER};
pub use key::ThreatKey;

/// Number of zombies on the field
pub const ZOMBIE_COUNT: usize = 3;

/// Zombie ranks by index, which is also the order they must be killed in
pub const RANKS: [u32; ZOMBIE_COUNT] = [1, 10, 100];

/// Player, zombies and exit each need a cell of their own at placement
pub(crate) const ENTITY_COUNT: usize = ZOMBIE_COUNT + 2;

#[derive(VariantArray, EnumIter, FromRepr, Display, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Action {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
    Attack = 4,
}

impl Action {
    /// **Panics** if `index` is not in `0..5`
    pub fn from_index(index: usize) -> Self {
        Self::from_repr(index).unwrap_or_else(|| panic!("Invalid action: {index}"))
    }

    /// Row and column deltas of a movement action
    fn offset(self) -> Option<(isize, isize)> {
        match self {
            Action::Up => Some((-1, 0)),
            Action::Right => Some((0, 1)),
            Action::Down => Some((1, 0)),
            Action::Left => Some((0, -1)),
            Action::Attack => None,
        }
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The player reached the revealed exit
    Escaped,
    /// The player attacked the zombie with this index while a lower ranked zombie was alive
    WrongOrder { zombie: usize },
    /// The step cap was reached
    OutOfTime,
}

/// Diagnostics for a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    pub action: Option<Action>,
    /// Index of the zombie killed by this step
    pub killed: Option<usize>,
    pub outcome: Option<Outcome>,
}

impl StepInfo {
    fn new(action: Option<Action>) -> Self {
        Self {
            action,
            killed: None,
            outcome: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Zombie {
    rank: u32,
    pos: Pos,
    alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Exit {
    pos: Pos,
    revealed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Active,
    Terminal,
}

/// The zombie hunt environment
///
/// Observations are [`Grid`] snapshots; the environment keeps its own copy and hands
/// out clones, so callers can hold on to old states freely.
pub struct ZombieField {
    config: ZombieFieldConfig,
    grid: Grid,
    player: Pos,
    zombies: [Zombie; ZOMBIE_COUNT],
    exit: Exit,
    steps: u32,
    phase: Phase,
    rng: StdRng,
    pub report: Report,
}

impl ZombieField {
    /// Build an idle field; call [`reset`](Environment::reset) to start an episode
    pub fn new(config: ZombieFieldConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            grid: Grid::new(config.grid_size, config.channels()),
            player: (0, 0),
            zombies: RANKS.map(|rank| Zombie {
                rank,
                pos: (0, 0),
                alive: false,
            }),
            exit: Exit {
                pos: (0, 0),
                revealed: false,
            },
            steps: 0,
            phase: Phase::Idle,
            rng,
            report: Report::new(vec!["reward", "steps", "kills"]),
            config,
        })
    }

    pub fn config(&self) -> &ZombieFieldConfig {
        &self.config
    }

    /// A copy of the current observation
    pub fn observation(&self) -> Grid {
        self.grid.clone()
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn zombie_positions(&self) -> [Pos; ZOMBIE_COUNT] {
        self.zombies.map(|z| z.pos)
    }

    pub fn alive(&self) -> [bool; ZOMBIE_COUNT] {
        self.zombies.map(|z| z.alive)
    }

    pub fn exit(&self) -> Pos {
        self.exit.pos
    }

    pub fn exit_revealed(&self) -> bool {
        self.exit.revealed
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Index of the zombie that must die next, if any is left
    pub fn target(&self) -> Option<usize> {
        self.zombies.iter().position(|z| z.alive)
    }

    fn vacant_cell(&mut self, occupied: &[Pos]) -> Pos {
        let size = self.config.grid_size;
        (0..size)
            .flat_map(|row| (0..size).map(move |col| (row, col)))
            .filter(|pos| !occupied.contains(pos))
            .choose(&mut self.rng)
            .expect("Grid size is validated to fit every entity")
    }

    /// Repaint every channel from the entity state
    fn draw(&mut self) {
        self.grid.clear();
        self.grid[(self.player.0, self.player.1, PLAYER)] = 1.0;
        for (i, zombie) in self.zombies.iter().enumerate() {
            if zombie.alive {
                self.grid[(zombie.pos.0, zombie.pos.1, zombie_channel(i))] = 1.0;
            }
        }
        if self.exit.revealed && self.config.exit_channel {
            self.grid[(self.exit.pos.0, self.exit.pos.1, EXIT)] = 1.0;
        }
    }

    fn is_zombie_at(&self, pos: Pos) -> bool {
        self.zombies.iter().any(|z| z.alive && z.pos == pos)
    }

    /// Apply a movement, returning the shaping bonus earned
    fn walk(&mut self, (dr, dc): (isize, isize)) -> f32 {
        let last = self.config.grid_size as isize - 1;
        let old = self.player;
        let new = (
            (old.0 as isize + dr).clamp(0, last) as usize,
            (old.1 as isize + dc).clamp(0, last) as usize,
        );

        if new == old || self.is_zombie_at(new) {
            return 0.0;
        }

        self.grid[(old.0, old.1, PLAYER)] = 0.0;
        self.grid[(new.0, new.1, PLAYER)] = 1.0;
        self.player = new;

        let Some(shaping) = &self.config.shaping else {
            return 0.0;
        };
        let closer = |goal: Pos| manhattan(new, goal) < manhattan(old, goal);
        match self.target() {
            Some(i) if closer(self.zombies[i].pos) => shaping.toward_target,
            None if self.exit.revealed && closer(self.exit.pos) => shaping.toward_exit,
            _ => 0.0,
        }
    }

    /// Resolve an attack against the lowest indexed live zombie next to the player
    fn attack(&mut self, info: &mut StepInfo) -> Option<f32> {
        let player = self.player;
        let i = self
            .zombies
            .iter()
            .position(|z| z.alive && manhattan(z.pos, player) == 1)?;

        if self.zombies[..i].iter().any(|z| z.alive) {
            debug!("attacked zombie {i} out of order");
            info.outcome = Some(Outcome::WrongOrder { zombie: i });
            return Some(self.config.rewards.wrong_order);
        }

        let zombie = &mut self.zombies[i];
        zombie.alive = false;
        let (pos, rank) = (zombie.pos, zombie.rank);
        self.grid[(pos.0, pos.1, zombie_channel(i))] = 0.0;
        self.report.add("kills", 1.0);
        info.killed = Some(i);
        debug!("killed zombie {i} (rank {rank}) at {pos:?}");

        let mut reward = rank as f32 * self.config.rewards.kill_scale;
        if self.target().is_none() && !self.exit.revealed {
            self.exit.revealed = true;
            if self.config.exit_channel {
                self.grid[(self.exit.pos.0, self.exit.pos.1, EXIT)] = 1.0;
            }
            debug!("exit revealed at {:?}", self.exit.pos);
            reward += self.config.rewards.clear;
        }
        Some(reward)
    }
}

fn manhattan(a: Pos, b: Pos) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

impl DiscreteActionSpace for ZombieField {
    fn actions(&self) -> Vec<Self::Action> {
        Action::VARIANTS.to_vec()
    }
}

impl Environment for ZombieField {
    type State = Grid;
    type Action = Action;
    type Info = StepInfo;

    fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    fn reset(&mut self, seed: Option<u64>) -> (Self::State, Self::Info) {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }

        let mut occupied = Vec::with_capacity(ENTITY_COUNT);
        self.player = self.vacant_cell(&occupied);
        occupied.push(self.player);
        for i in 0..ZOMBIE_COUNT {
            let pos = self.vacant_cell(&occupied);
            occupied.push(pos);
            self.zombies[i] = Zombie {
                rank: RANKS[i],
                pos,
                alive: true,
            };
        }
        self.exit = Exit {
            pos: self.vacant_cell(&occupied),
            revealed: false,
        };

        self.steps = 0;
        self.phase = Phase::Active;
        self.report.reset();
        self.draw();

        (self.observation(), StepInfo::new(None))
    }

    /// **Panics** if called before [`reset`](Environment::reset) or after the episode is done
    fn step(&mut self, action: Self::Action) -> Transition<Self::State, Self::Info> {
        assert!(
            self.phase == Phase::Active,
            "Cannot step a zombie field that is {:?}, call reset first.",
            self.phase
        );

        self.steps += 1;
        let mut info = StepInfo::new(Some(action));
        let mut reward = self.config.rewards.step;

        match action.offset() {
            Some(delta) => reward += self.walk(delta),
            None => {
                if let Some(r) = self.attack(&mut info) {
                    reward = r;
                }
            }
        }

        if self.exit.revealed && self.player == self.exit.pos {
            debug!("escaped after {} steps", self.steps);
            reward += self.config.rewards.escape;
            info.outcome = Some(Outcome::Escaped);
        }

        let mut truncated = false;
        if info.outcome.is_none() && self.steps >= self.config.step_cap {
            debug!("step cap of {} reached", self.config.step_cap);
            info.outcome = Some(Outcome::OutOfTime);
            truncated = true;
        }

        let done = info.outcome.is_some();
        if done {
            self.phase = Phase::Terminal;
        }

        trace!("step {} {action}: reward {reward}", self.steps);
        self.report.add("steps", 1.0);
        self.report.add("reward", reward as f64);

        Transition {
            next_state: self.observation(),
            reward,
            done,
            truncated,
            info,
        }
    }
}
