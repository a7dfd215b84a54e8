//! Improved Perlin gradient noise.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Number of distinct entries in a permutation table.
pub const PERMUTATION_SIZE: usize = 256;

/// A seed-keyed permutation of `0..256`, stored twice back to back so lattice
/// hashing never needs a modulo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationTable {
    seed: u64,
    values: [u8; PERMUTATION_SIZE * 2],
}

impl PermutationTable {
    /// Builds the table for `seed`. Pure function of the seed.
    pub fn new(seed: u64) -> Self {
        let mut base: Vec<u8> = (0..PERMUTATION_SIZE).map(|i| i as u8).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        base.shuffle(&mut rng);

        let mut values = [0u8; PERMUTATION_SIZE * 2];
        values[..PERMUTATION_SIZE].copy_from_slice(&base);
        values[PERMUTATION_SIZE..].copy_from_slice(&base);
        Self { seed, values }
    }

    /// Seed this table was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    fn at(&self, i: usize) -> usize {
        self.values[i] as usize
    }
}

/// Quintic fade curve `6t^5 - 15t^4 + 10t^3`.
#[inline]
pub fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

#[inline]
fn grad(hash: usize, x: f32, y: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        0.0
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

/// Samples 2D gradient noise at `(x, y)` using a resolved permutation table.
///
/// Returns a value in `[-1, 1]`.
pub fn perlin_with_table(table: &PermutationTable, x: f32, y: f32) -> f32 {
    let xf = x.floor();
    let yf = y.floor();
    let xi = (xf as i64 & 255) as usize;
    let yi = (yf as i64 & 255) as usize;
    let x = x - xf;
    let y = y - yf;

    let u = fade(x);
    let v = fade(y);

    let a = table.at(xi) + yi;
    let aa = table.at(a);
    let ab = table.at(a + 1);
    let b = table.at(xi + 1) + yi;
    let ba = table.at(b);
    let bb = table.at(b + 1);

    let value = lerp(
        v,
        lerp(u, grad(table.at(aa), x, y), grad(table.at(ba), x - 1.0, y)),
        lerp(u, grad(table.at(ab), x, y - 1.0), grad(table.at(bb), x - 1.0, y - 1.0)),
    );
    value.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_permutation() {
        let table = PermutationTable::new(7);
        let mut seen = [false; PERMUTATION_SIZE];
        for i in 0..PERMUTATION_SIZE {
            seen[table.at(i)] = true;
            assert_eq!(table.at(i), table.at(i + PERMUTATION_SIZE));
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_table_depends_on_seed() {
        assert_eq!(PermutationTable::new(42), PermutationTable::new(42));
        assert_ne!(PermutationTable::new(42), PermutationTable::new(43));
    }

    #[test]
    fn test_fade_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert!((fade(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_at_lattice_points() {
        let table = PermutationTable::new(3);
        for (x, y) in [(0.0, 0.0), (5.0, -3.0), (128.0, 77.0)] {
            assert_eq!(perlin_with_table(&table, x, y), 0.0);
        }
    }

    #[test]
    fn test_range_and_continuity() {
        let table = PermutationTable::new(11);
        let mut prev = perlin_with_table(&table, 0.0, 0.37);
        for i in 1..2000 {
            let x = i as f32 * 0.01;
            let value = perlin_with_table(&table, x, 0.37);
            assert!((-1.0..=1.0).contains(&value));
            assert!((value - prev).abs() < 0.05, "jump at x={x}");
            prev = value;
        }
    }

    #[test]
    fn test_negative_coordinates() {
        let table = PermutationTable::new(5);
        let value = perlin_with_table(&table, -1234.56, -0.25);
        assert!(value.is_finite());
    }
}
