//! The utilies module provides general capabilities, that may span the
//! models and simulator modules.  The utilities are centered around error
//! reporting and simulation time arithmetic.

pub mod errors;

/// Simulation times are compared exactly.  Imminence in DEVS is an exact
/// equality between the global clock and a model's next event time, and
/// every next event time is computed once and cached, so no tolerance is
/// applied.
pub fn equivalent_f64(a: f64, b: f64) -> bool {
    a - b == 0.0 || (a.is_infinite() && b.is_infinite() && a.signum() == b.signum())
}

/// The earliest of a set of event times, or infinity for an empty set.
pub fn earliest<I: IntoIterator<Item = f64>>(times: I) -> f64 {
    times.into_iter().fold(f64::INFINITY, f64::min)
}

/// A time advance is valid when it is a non-negative number, including
/// positive infinity (passive).
pub fn valid_time_advance(time_advance: f64) -> bool {
    !time_advance.is_nan() && time_advance >= 0.0
}
