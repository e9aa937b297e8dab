// Seeded random sources for test case generation.
// All randomness in the generator flows through the RandomSource trait so
// that a fixed seed yields a fully reproducible set of test cases.

use rand::RngCore;
use rand_chacha::ChaCha8Rng;

/// Abstract seeded source of randomness for the generator.
///
/// Implementations must produce the same sequence for the same starting
/// state. The generator uses its source as a search heuristic, not a
/// statistical primitive, so no uniformity guarantees are required beyond
/// "well mixed".
pub trait RandomSource {
    /// The next pseudo-random value in the sequence.
    fn next_u32(&mut self) -> u32;

    /// A non-negative index below `bound`, derived by masking off the top
    /// bit and reducing modulo the bound. Slightly biased when the bound
    /// does not divide 2^31, which is fine for candidate search.
    fn next_below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        ((self.next_u32() >> 1) as usize) % bound
    }
}

const TABLE_SIZE: usize = 256;
const WARMUP_BATCHES: usize = 10;

/// Bob Jenkins' "flea" small fast pseudo-random generator
/// (http://burtleburtle.net/bob/rand/talksmall.html#flea).
///
/// Four rolling state words plus a 256-entry mixing table. Values are
/// produced in batches of 256 and handed out one at a time from the end of
/// the buffer. Everything is wrapping 32-bit integer arithmetic, so a given
/// seed produces an identical sequence on every platform and toolchain,
/// which keeps generated case sets stable wherever they are built.
#[derive(Clone)]
pub struct FleaRand {
    b: u32,
    c: u32,
    d: u32,
    z: u32,
    m: [u32; TABLE_SIZE],
    r: [u32; TABLE_SIZE],
    q: usize,
}

impl FleaRand {
    /// A generator seeded with `seed`, warmed up so the first values
    /// returned are already well mixed.
    pub fn new(seed: u32) -> FleaRand {
        let mut flea = FleaRand {
            b: seed,
            c: seed,
            d: seed,
            z: seed,
            m: [seed; TABLE_SIZE],
            r: [0; TABLE_SIZE],
            q: 0,
        };

        for _ in 0..WARMUP_BATCHES {
            flea.batch();
        }
        flea.q = 0;

        flea
    }

    fn batch(&mut self) {
        let mut b = self.b;
        self.z = self.z.wrapping_add(1);
        let mut c = self.c.wrapping_add(self.z);
        let mut d = self.d;

        for i in 0..TABLE_SIZE {
            let a = self.m[b as usize % TABLE_SIZE];
            self.m[b as usize % TABLE_SIZE] = d;
            d = (c << 19).wrapping_add(c >> 13).wrapping_add(b);
            c = b ^ self.m[i];
            b = a.wrapping_add(d);
            self.r[i] = c;
        }

        self.b = b;
        self.c = c;
        self.d = d;
    }
}

impl RandomSource for FleaRand {
    fn next_u32(&mut self) -> u32 {
        if self.q == 0 {
            self.batch();
            self.q = TABLE_SIZE - 1;
        } else {
            self.q -= 1;
        }

        self.r[self.q]
    }
}

impl std::fmt::Debug for FleaRand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FleaRand")
            .field("b", &self.b)
            .field("c", &self.c)
            .field("d", &self.d)
            .field("z", &self.z)
            .field("q", &self.q)
            .finish()
    }
}

/// Seeded backend for callers that want a conventional generator instead of
/// parity with the original recurrence. Determinism still holds for a fixed
/// seed; only the produced case sets differ.
impl RandomSource for ChaCha8Rng {
    fn next_u32(&mut self) -> u32 {
        RngCore::next_u32(self)
    }
}
