/// Xorshift generator usable in `const` context. Seeds the Zobrist tables at
/// compile time.
pub struct PRNG {
    s: (u64, u64, u64, u64),
}

impl PRNG {
    pub const fn new(seed: u64) -> Self {
        let s0 = seed;
        let s1 = seed.wrapping_mul(2);
        let s2 = seed.wrapping_div(5);
        let s3 = seed.wrapping_add(seed.wrapping_div(2));

        PRNG {
            s: (s0, s1, s2, s3),
        }
    }

    #[inline]
    pub const fn random_u64(&mut self) -> u64 {
        let t = self.s.1 << 17;
        self.s.2 ^= self.s.0;
        self.s.3 ^= self.s.1;
        self.s.1 ^= self.s.2;
        self.s.0 ^= self.s.3;
        self.s.2 ^= t;
        self.s.3 = self.s.3.rotate_left(45);

        self.s.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prng_sequence() {
        let mut prng = PRNG::new(12345);
        let first_sequence = (0..5).map(|_| prng.random_u64()).collect::<Vec<_>>();

        let mut prng = PRNG::new(12345);
        let second_sequence = (0..5).map(|_| prng.random_u64()).collect::<Vec<_>>();

        assert_eq!(first_sequence, second_sequence);
    }

    #[test]
    fn test_no_repeats_in_short_run() {
        let mut prng = PRNG::new(0xDEADBEEFCAFEBABE);
        let mut seen: Vec<u64> = (0..800).map(|_| prng.random_u64()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 800);
    }
}
