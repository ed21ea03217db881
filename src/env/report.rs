use std::{collections::HashMap, ops::Index};

/// Named episode metrics kept by an environment for display and bookkeeping
///
/// Metrics are reported in the order their keys were given.
#[derive(Debug, Clone)]
pub struct Report {
    keys: Vec<&'static str>,
    values: HashMap<&'static str, f64>,
}

impl Report {
    pub fn new(keys: Vec<&'static str>) -> Self {
        let values = keys.iter().map(|&k| (k, 0.0)).collect();
        Self { keys, values }
    }

    pub fn keys(&self) -> &[&'static str] {
        &self.keys
    }

    /// Add `amount` to a metric
    ///
    /// **Panics** if `key` is not a metric of this report
    pub fn add(&mut self, key: &str, amount: f64) {
        *self
            .values
            .get_mut(key)
            .unwrap_or_else(|| panic!("Unknown report key: {key}")) += amount;
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Metric values in key order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.keys.iter().map(|k| self.values[*k])
    }

    /// Zero every metric
    pub fn reset(&mut self) {
        self.values.values_mut().for_each(|v| *v = 0.0);
    }

    /// Take the current metrics, leaving zeroes behind
    pub fn take(&mut self) -> HashMap<&'static str, f64> {
        let fresh = self.keys.iter().map(|&k| (k, 0.0)).collect();
        std::mem::replace(&mut self.values, fresh)
    }
}

impl Index<&str> for Report {
    type Output = f64;

    fn index(&self, key: &str) -> &Self::Output {
        &self.values[key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_functional() {
        let mut report = Report::new(vec!["reward", "steps"]);
        report.add("steps", 1.0);
        report.add("steps", 1.0);
        report.add("reward", -0.5);
        assert_eq!(report["steps"], 2.0);
        assert_eq!(report.values().collect::<Vec<_>>(), vec![-0.5, 2.0]);

        let taken = report.take();
        assert_eq!(taken["reward"], -0.5, "Taken values are preserved");
        assert_eq!(report["steps"], 0.0, "Report is zeroed after take");
        assert_eq!(report.keys(), &["reward", "steps"]);
    }

    #[test]
    fn report_reset() {
        let mut report = Report::new(vec!["kills"]);
        report.add("kills", 3.0);
        report.reset();
        assert_eq!(report.get("kills"), Some(0.0));
        assert_eq!(report.get("missing"), None);
    }

    #[test]
    #[should_panic(expected = "Unknown report key")]
    fn unknown_key_panics() {
        Report::new(vec!["steps"]).add("score", 1.0);
    }
}
