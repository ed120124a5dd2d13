//! Seeded random source shared by the generator functions.

use crate::generators::{random_table, random_value};
use fixture_core::{GeneratedValue, Parameters, TableInfo, UnsupportedType};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Error type for generator operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorError {
    /// Value generation was asked for a type outside the supported set
    #[error("Unexpected type: {0}")]
    UnsupportedType(String),

    /// Identifier length bound must be at least 1
    #[error("Invalid maximum name length: {0} (must be at least 1)")]
    InvalidNameLength(usize),

    /// Column generation needs at least one type to draw from
    #[error("No column types configured")]
    NoTypes,
}

impl From<UnsupportedType> for GeneratorError {
    fn from(err: UnsupportedType) -> Self {
        GeneratorError::UnsupportedType(err.0)
    }
}

/// Multiplier used to spread unit indices across the seed space.
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Multiplier used to separate independent streams of units.
const STREAM_GAMMA: u64 = 0xBF58_476D_1CE4_E5B9;

/// Random source for schema and value generation.
///
/// A generator can be split into independent per-unit generators with
/// [`DataGenerator::for_unit`]. Each unit's output depends only on the base
/// seed, the stream and the index, so concurrent work produces the same data
/// regardless of scheduling order.
pub struct DataGenerator {
    /// Base seed, kept so per-unit generators can be derived
    seed: u64,
    /// Seeded random number generator for reproducibility
    rng: StdRng,
}

impl DataGenerator {
    /// Create a new data generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a generator with a seed drawn from the thread RNG.
    ///
    /// The drawn seed is available through [`DataGenerator::seed`] so a run
    /// can be reproduced.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Get the base seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive an independent generator for one work unit.
    ///
    /// `stream` separates families of units (e.g. table creation vs.
    /// population) and `index` identifies the unit within the family.
    pub fn for_unit(&self, stream: u64, index: u64) -> DataGenerator {
        DataGenerator::new(self.compute_unit_seed(stream, index))
    }

    fn compute_unit_seed(&self, stream: u64, index: u64) -> u64 {
        self.seed
            .wrapping_add(stream.wrapping_add(1).wrapping_mul(STREAM_GAMMA))
            .wrapping_add(index.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA))
    }

    /// Generate a random table definition from the parameters.
    pub fn next_table(&mut self, params: &Parameters) -> Result<TableInfo, GeneratorError> {
        random_table(&mut self.rng, params)
    }

    /// Generate a random value for a column of the given SQL type.
    pub fn next_value(&mut self, sql_type: &str) -> Result<GeneratedValue, GeneratorError> {
        random_value(&mut self.rng, sql_type)
    }

    /// Access the underlying random source.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
