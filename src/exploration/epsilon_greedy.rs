use rand::Rng;

use crate::{assert_interval, decay::Decay};

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// Epsilon threshold at time `t`
    ///
    /// **Panics** if the decay strategy produces a value outside `[0,1]`
    pub fn epsilon(&self, t: u64) -> f32 {
        let epsilon = self.epsilon.evaluate(t as f32);
        assert_interval!(epsilon, 0.0, 1.0);
        epsilon
    }

    /// Invoke epsilon greedy policy at time `t`, exploring with probability epsilon
    pub fn choose<R: Rng>(&self, t: u64, rng: &mut R) -> Choice {
        if rng.gen::<f32>() < self.epsilon(t) {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::decay::{Constant, Multiplicative};

    #[test]
    fn extremes_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let never = EpsilonGreedy::new(Constant::new(0.0));
        let always = EpsilonGreedy::new(Constant::new(1.0));
        for t in 0..1000 {
            assert_eq!(never.choose(t, &mut rng), Choice::Exploit);
            assert_eq!(always.choose(t, &mut rng), Choice::Explore);
        }
    }

    #[test]
    fn epsilon_follows_decay() {
        let policy = EpsilonGreedy::new(Multiplicative::new(0.5, 1.0, 0.1).unwrap());
        assert_eq!(policy.epsilon(0), 1.0);
        assert_eq!(policy.epsilon(1), 0.5);
        assert_eq!(policy.epsilon(100), 0.1);
    }

    #[test]
    #[should_panic(expected = "Invalid value for `epsilon`")]
    fn epsilon_out_of_range_panics() {
        EpsilonGreedy::new(Constant::new(1.5)).epsilon(0);
    }
}
