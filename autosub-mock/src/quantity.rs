// Expected number of received calls

use std::fmt;

/// How many matching calls an assertion expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Exactly(usize),
    AtLeast(usize),
    /// Inclusive range
    Between(usize, usize),
}

impl Quantity {
    pub fn exactly(times: usize) -> Self {
        Quantity::Exactly(times)
    }

    pub fn none() -> Self {
        Quantity::Exactly(0)
    }

    pub fn once() -> Self {
        Quantity::Exactly(1)
    }

    pub fn at_least_once() -> Self {
        Quantity::AtLeast(1)
    }

    pub fn matches(&self, count: usize) -> bool {
        match *self {
            Quantity::Exactly(expected) => count == expected,
            Quantity::AtLeast(min) => count >= min,
            Quantity::Between(min, max) => (min..=max).contains(&count),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: usize| if n == 1 { "call" } else { "calls" };
        match *self {
            Quantity::Exactly(n) => write!(f, "exactly {} {}", n, plural(n)),
            Quantity::AtLeast(n) => write!(f, "at least {} {}", n, plural(n)),
            Quantity::Between(min, max) => write!(f, "between {} and {} calls", min, max),
        }
    }
}
