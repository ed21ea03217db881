use std::{collections::HashMap, marker::PhantomData};

use log::trace;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use strum::VariantArray;

use crate::{
    assert_interval,
    decay::{self, Decay},
    env::{Environment, Exp, Transition},
    exploration::{Choice, EpsilonGreedy},
    util,
};

use super::{Canonical, Hashable};

/// Action values for every canonical state seen so far
///
/// Rows are created on first access, filled with zeroes, and never removed.
#[derive(Debug, Clone)]
pub struct QTable<K: Hashable> {
    rows: HashMap<K, Vec<f32>>,
    num_actions: usize,
}

impl<K: Hashable> QTable<K> {
    pub fn new(num_actions: usize) -> Self {
        Self {
            rows: HashMap::new(),
            num_actions,
        }
    }

    /// The action values for `key`, inserting a row of zeroes if it is new
    pub fn row(&mut self, key: K) -> &mut [f32] {
        let num_actions = self.num_actions;
        self.rows.entry(key).or_insert_with(|| {
            trace!("q-table learned a new state");
            vec![0.0; num_actions]
        })
    }

    pub fn get(&self, key: &K) -> Option<&[f32]> {
        self.rows.get(key).map(Vec::as_slice)
    }

    /// Number of states in the table
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[f32])> {
        self.rows.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

/// Configuration for the [`QTableAgent`]
pub struct QTableAgentConfig<D: Decay> {
    pub exploration: EpsilonGreedy<D>,
    pub alpha: f32,
    pub gamma: f32,
    /// Seed for exploration, drawn from entropy if `None`
    pub seed: Option<u64>,
}

impl Default for QTableAgentConfig<decay::Multiplicative> {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::new(
                decay::Multiplicative::new(0.995, 1.0, 0.01).expect("Valid decay parameters"),
            ),
            alpha: 0.1,
            gamma: 0.95,
            seed: None,
        }
    }
}

/// A simple Q-learning agent that utilizes a Q-table to learn its environment
///
/// ### Generics
/// - `E` - The [`Environment`] in which the agent will learn
///     - States are reduced to a [`Canonical`] key, so a single table row can serve many raw observations
///     - Actions are the variants of a [`VariantArray`], whose order defines the columns of the table
/// - `D` - The [`Decay`] of the exploration rate, evaluated at the number of learning updates so far
pub struct QTableAgent<E, D>
where
    E: Environment,
    E::State: Canonical,
    E::Action: VariantArray + Copy + PartialEq,
    D: Decay,
{
    q_table: QTable<<E::State as Canonical>::Key>,
    exploration: EpsilonGreedy<D>,
    alpha: f32,   // learning rate
    gamma: f32,   // discount factor
    updates: u64, // learning updates so far
    episode: u32, // episodes completed by `go`
    rng: StdRng,
    env: PhantomData<E>,
}

impl<E, D> QTableAgent<E, D>
where
    E: Environment,
    E::State: Canonical,
    E::Action: VariantArray + Copy + PartialEq,
    D: Decay,
{
    /// Initialize a new `QTableAgent`
    ///
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(config: QTableAgentConfig<D>) -> Self {
        assert_interval!(config.alpha, 0.0, 1.0);
        assert_interval!(config.gamma, 0.0, 1.0);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            q_table: QTable::new(E::Action::VARIANTS.len()),
            exploration: config.exploration,
            alpha: config.alpha,
            gamma: config.gamma,
            updates: 0,
            episode: 0,
            rng,
            env: PhantomData,
        }
    }

    pub fn q_table(&self) -> &QTable<<E::State as Canonical>::Key> {
        &self.q_table
    }

    /// Learned action values for a state, if it has been visited
    pub fn q_values(&self, state: &E::State) -> Option<&[f32]> {
        self.q_table.get(&state.canonical_key())
    }

    /// The current exploration rate
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon(self.updates)
    }

    /// Number of calls to [`learn`](Self::learn) so far
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Number of episodes completed by [`go`](Self::go)
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Choose an action based on the current state and exploration policy
    ///
    /// Greedy choices break ties in favour of the earliest action.
    pub fn act(&mut self, state: &E::State) -> E::Action {
        match self.exploration.choose(self.updates, &mut self.rng) {
            Choice::Explore => *E::Action::VARIANTS
                .choose(&mut self.rng)
                .expect("There is always at least one action available"),
            Choice::Exploit => {
                let values = self.q_table.row(state.canonical_key());
                E::Action::VARIANTS[util::argmax(values)]
            }
        }
    }

    /// Apply one Q-learning update for the given experience and decay the exploration rate
    ///
    /// Q(s,a) ← Q(s,a) + α (r + γ max<sub>a'</sub> Q(s',a') (1 - done) - Q(s,a))
    pub fn learn(&mut self, experience: &Exp<E>) {
        let Exp {
            state,
            action,
            reward,
            next_state,
            done,
        } = experience;

        let a = E::Action::VARIANTS
            .iter()
            .position(|v| v == action)
            .expect("Action is one of the variants");

        let max_next_q = util::max(self.q_table.row(next_state.canonical_key()));
        let bootstrap = if *done { 0.0 } else { self.gamma * max_next_q };

        let q_value = &mut self.q_table.row(state.canonical_key())[a];
        *q_value += self.alpha * (reward + bootstrap - *q_value);

        self.updates += 1;
    }

    /// Run the agent in the given environment for one episode
    pub fn go(&mut self, env: &mut E) {
        let (mut state, _) = env.reset(None);
        loop {
            let action = self.act(&state);
            let Transition {
                next_state,
                reward,
                done,
                ..
            } = env.step(action);

            let experience = Exp {
                state,
                action,
                reward,
                next_state,
                done,
            };
            self.learn(&experience);

            if done {
                break;
            }
            state = experience.next_state;
        }

        self.episode += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        decay::Constant,
        env::Environment,
        gym::zombie_field::{
            zombie_channel, Action, Grid, ZombieField, ZombieFieldConfig, PLAYER,
        },
    };

    type Agent<D> = QTableAgent<ZombieField, D>;

    fn agent(epsilon: f32, alpha: f32, gamma: f32) -> Agent<Constant> {
        QTableAgent::new(QTableAgentConfig {
            exploration: EpsilonGreedy::new(Constant::new(epsilon)),
            alpha,
            gamma,
            seed: Some(1),
        })
    }

    fn grid(player: (usize, usize), zombie: Option<(usize, usize)>) -> Grid {
        let mut grid = Grid::new(8, 5);
        grid[(player.0, player.1, PLAYER)] = 1.0;
        if let Some((r, c)) = zombie {
            grid[(r, c, zombie_channel(0))] = 1.0;
        }
        grid
    }

    fn exp(state: Grid, action: Action, reward: f32, next_state: Grid, done: bool) -> Exp<ZombieField> {
        Exp {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }

    #[test]
    fn greedy_tie_break_is_first_action() {
        let mut agent = agent(0.0, 0.5, 0.9);
        let state = grid((0, 0), Some((0, 3)));
        assert!(agent.q_values(&state).is_none());
        assert_eq!(agent.act(&state), Action::Up);
        assert_eq!(agent.q_values(&state), Some(&[0.0; 5][..]), "Row created lazily");
        assert_eq!(agent.q_table().len(), 1);
    }

    #[test]
    fn greedy_follows_learned_values() {
        let mut agent = agent(0.0, 1.0, 0.0);
        let state = grid((0, 0), Some((0, 1)));
        let next = grid((0, 0), None);
        agent.learn(&exp(state.clone(), Action::Attack, 1.0, next, false));
        assert_eq!(agent.act(&state), Action::Attack);
    }

    #[test]
    fn q_learning_update() {
        let mut agent = agent(0.0, 0.5, 0.9);
        let s = grid((2, 2), Some((5, 5)));
        let s_next = grid((2, 3), Some((5, 5)));

        agent.learn(&exp(s_next.clone(), Action::Down, 10.0, s.clone(), false));
        assert_eq!(agent.q_values(&s_next).unwrap()[2], 5.0);

        agent.learn(&exp(s.clone(), Action::Right, -1.0, s_next.clone(), false));
        // 0 + 0.5 * (-1 + 0.9 * 5 - 0)
        assert_eq!(agent.q_values(&s).unwrap()[1], 1.75);

        agent.learn(&exp(s.clone(), Action::Right, -1.0, s_next, true));
        // 1.75 + 0.5 * (-1 - 1.75)
        assert_eq!(agent.q_values(&s).unwrap()[1], 0.375, "Terminal transitions do not bootstrap");
        assert_eq!(agent.updates(), 3);
    }

    #[test]
    fn zero_learning_rate_changes_nothing() {
        let mut agent = agent(0.0, 0.0, 0.9);
        let s = grid((2, 2), Some((5, 5)));
        let s_next = grid((2, 3), Some((5, 5)));
        for (action, reward, done) in [
            (Action::Right, 100.0, false),
            (Action::Attack, -50.0, true),
            (Action::Up, 1000.0, false),
        ] {
            agent.learn(&exp(s.clone(), action, reward, s_next.clone(), done));
        }
        assert!(agent.q_table().iter().all(|(_, row)| row.iter().all(|&v| v == 0.0)));
        assert_eq!(agent.q_table().len(), 2, "Both states are still initialized");
    }

    #[test]
    fn epsilon_decays_per_update() {
        let mut agent: Agent<decay::Multiplicative> = QTableAgent::new(QTableAgentConfig {
            exploration: EpsilonGreedy::new(decay::Multiplicative::new(0.5, 1.0, 0.2).unwrap()),
            alpha: 0.1,
            gamma: 0.9,
            seed: Some(3),
        });
        let s = grid((1, 1), None);
        assert_eq!(agent.epsilon(), 1.0);
        agent.learn(&exp(s.clone(), Action::Up, 0.0, s.clone(), false));
        assert_eq!(agent.epsilon(), 0.5);
        agent.learn(&exp(s.clone(), Action::Up, 0.0, s.clone(), true));
        assert_eq!(agent.epsilon(), 0.25);
        agent.learn(&exp(s.clone(), Action::Up, 0.0, s.clone(), false));
        assert_eq!(agent.epsilon(), 0.2, "Epsilon stops at its floor");
    }

    #[test]
    fn full_exploration_leaves_table_untouched() {
        let mut agent = agent(1.0, 0.5, 0.9);
        let state = grid((4, 4), Some((0, 0)));
        for _ in 0..50 {
            agent.act(&state);
        }
        assert!(agent.q_table().is_empty());
    }

    #[test]
    #[should_panic(expected = "Invalid value for `config.alpha`")]
    fn invalid_alpha_panics() {
        agent(0.1, 1.5, 0.9);
    }

    #[test]
    fn go_runs_episodes() {
        let mut env = ZombieField::new(ZombieFieldConfig {
            seed: Some(9),
            ..Default::default()
        })
        .unwrap();
        let mut agent: Agent<decay::Multiplicative> = QTableAgent::new(QTableAgentConfig {
            seed: Some(9),
            ..Default::default()
        });

        let mut steps = 0.0;
        for _ in 0..20 {
            agent.go(&mut env);
            assert!(!env.is_active(), "Episode ran to completion");
            steps += env.report["steps"];
        }

        assert_eq!(agent.episode(), 20);
        assert_eq!(agent.updates() as f64, steps, "One update per step");
        assert!(!agent.q_table().is_empty());
        assert!(agent.epsilon() < 1.0);
    }
}
