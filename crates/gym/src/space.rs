/// Continuous box of actions, one bounded value per element of `shape`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpace {
    pub low: f32,
    pub high: f32,
    pub shape: Vec<usize>,
}

impl BoxSpace {
    #[must_use]
    pub fn new(low: f32, high: f32, shape: Vec<usize>) -> Self {
        Self { low, high, shape }
    }

    /// Scheduling weights in `[0, 1]`, one per flow.
    #[must_use]
    pub fn unit(num_flows: usize) -> Self {
        Self::new(0.0, 1.0, vec![num_flows])
    }

    /// Total number of scalar elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Draws a uniform sample from the box.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> Vec<f32> {
        (0..self.len())
            .map(|_| self.low + rng.f32() * (self.high - self.low))
            .collect()
    }

    #[must_use]
    pub fn contains(&self, action: &[f32]) -> bool {
        action.len() == self.len()
            && action
                .iter()
                .all(|value| (self.low..=self.high).contains(value))
    }
}
