use crate::error::{Error, Result};

/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f32) -> f32;
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f32,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f32) -> f32 {
        self.value
    }
}

/// v(t) = max(v<sub>i</sub> * r<sup>t</sup>, v<sub>f</sub>)
///
/// Evaluated at integer `t`, this is the value obtained by applying
/// `v <- max(v_f, v * r)` exactly `t` times starting from `v_i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Multiplicative {
    rate: f32,
    vi: f32,
    vf: f32,
}

impl Multiplicative {
    pub fn new(rate: f32, vi: f32, vf: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(Error::DecayRate(rate));
        }
        if vi < vf {
            return Err(Error::DecayBounds { vi, vf });
        }
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Multiplicative {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, vi, vf } = self;
        (vi * rate.powf(t)).max(vf)
    }
}
