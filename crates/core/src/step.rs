/// A value that can be advanced explicitly by its time derivative.
///
/// Stepping computes `value + derivative * delta`. The explicit Euler scheme in
/// `keel-solvers` uses this to advance a [`VesselState`](crate::VesselState)
/// by one segment without going through a general-purpose ODE solver.
pub trait StepIntegrable<Delta> {
    /// Rate of change per unit of `Delta`.
    type Derivative;

    /// Advances by `derivative * delta`.
    #[must_use]
    fn step(&self, derivative: Self::Derivative, delta: Delta) -> Self;
}

/// The rate type a [`StepIntegrable`] value is stepped with.
pub type DerivativeOf<T, Delta> = <T as StepIntegrable<Delta>>::Derivative;

#[cfg(test)]
mod tests {
    use super::*;

    /// Actuator position stepped by a slew rate.
    #[derive(Debug, PartialEq)]
    struct RudderAngle(f64);
    struct RudderRate(f64);

    impl StepIntegrable<f64> for RudderAngle {
        type Derivative = RudderRate;

        fn step(&self, derivative: RudderRate, delta: f64) -> Self {
            RudderAngle(self.0 + derivative.0 * delta)
        }
    }

    fn advance<T: StepIntegrable<f64>>(value: &T, rate: DerivativeOf<T, f64>, dt: f64) -> T {
        value.step(rate, dt)
    }

    #[test]
    fn steps_through_the_alias() {
        let next = advance(&RudderAngle(0.0), RudderRate(0.25), 2.0);

        assert_eq!(next, RudderAngle(0.5));
    }

    #[test]
    fn negative_rates_step_backwards() {
        let next = RudderAngle(0.5).step(RudderRate(-0.5), 0.5);

        assert_eq!(next, RudderAngle(0.25));
    }
}
