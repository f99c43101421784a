/// Source of randomness for seeding and refilling the board.
/// Injected so tests can drive the board with a fixed sequence.
pub trait RandomSource {
    /// A number in [0, upper_bound). `upper_bound` is never zero.
    fn next_int(&mut self, upper_bound: u32) -> u32;
}

/// Seedable pseudo-random number generator (xorshift64).
/// Deterministic, fast, no-std compatible.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        // Avoid zero state
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl RandomSource for Rng {
    fn next_int(&mut self, upper_bound: u32) -> u32 {
        (self.next_u64() % upper_bound as u64) as u32
    }
}

/// Replays a fixed sequence of values, wrapping at the end.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct ScriptedRng {
    values: Vec<u32>,
    pos: usize,
}

#[cfg(test)]
impl ScriptedRng {
    pub(crate) fn new(values: &[u32]) -> Self {
        assert!(!values.is_empty());
        ScriptedRng {
            values: values.to_vec(),
            pos: 0,
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRng {
    fn next_int(&mut self, upper_bound: u32) -> u32 {
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v % upper_bound
    }
}
