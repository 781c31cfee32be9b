//! Recognized solver options and the variant selector.

use getset::{CopyGetters, Getters};

/// Which improvement method the driver should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Full Lin-Kernighan with backtracking, unfeasible-branch exploration
    /// and a double-bridge kick.
    Lk1,
    /// Helsgaun's simplified, feasible-only Lin-Kernighan.
    Lk2,
    /// Greedy nearest-neighbor construction, no local search.
    NearestNeighbor,
    /// Exhaustive permutation search. Only practical for tiny instances.
    BruteForce,
}

/// Per-level backtracking breadth for LK1: how many candidate `(t3, t4)`
/// pairs are explored at search depth 0, 1 and 2+ respectively, mirroring
/// the Python `backtracking=(5, 5)` tuple (depth 2+ reuses the second value).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backtracking {
    pub level0: usize,
    pub level1: usize,
}

impl Default for Backtracking {
    fn default() -> Self {
        Backtracking { level0: 5, level1: 5 }
    }
}

impl Backtracking {
    /// Breadth to use at a given recursion depth; depths beyond 1 keep
    /// using `level1`, matching the Python default's fallback of `1`.
    pub fn at(&self, level: usize) -> usize {
        match level {
            0 => self.level0,
            _ => self.level1,
        }
    }
}

/// Options recognized by the solver driver, with defaults matching the
/// documented behavior of the original LK implementation.
#[derive(Debug, Clone, CopyGetters, Getters)]
pub struct SolverConfig {
    #[getset(get_copy = "pub")]
    variant: Variant,

    #[getset(get_copy = "pub")]
    neighbor_list_size: usize,

    #[getset(get_copy = "pub")]
    backtracking: Backtracking,

    #[getset(get_copy = "pub")]
    reduction_level: usize,

    #[getset(get_copy = "pub")]
    reduction_cycle: usize,

    #[getset(get_copy = "pub")]
    gain_precision: f64,

    #[getset(get_copy = "pub")]
    shuffle_initial_tour: bool,

    #[getset(get_copy = "pub")]
    seed: Option<u64>,

    #[getset(get_copy = "pub")]
    max_double_bridge_tests: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            variant: Variant::Lk1,
            neighbor_list_size: 5,
            backtracking: Backtracking::default(),
            reduction_level: 4,
            reduction_cycle: 4,
            gain_precision: 0.01,
            shuffle_initial_tour: false,
            seed: None,
            max_double_bridge_tests: 100,
        }
    }
}

impl SolverConfig {
    pub fn builder() -> SolverConfigBuilder {
        SolverConfigBuilder::default()
    }
}

/// Builder for `SolverConfig`, in the teacher's accessor-derive idiom.
#[derive(Debug, Clone, Default)]
pub struct SolverConfigBuilder {
    cfg: Option<SolverConfig>,
}

impl SolverConfigBuilder {
    fn cfg(&mut self) -> &mut SolverConfig {
        self.cfg.get_or_insert_with(SolverConfig::default)
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.cfg().variant = variant;
        self
    }

    pub fn neighbor_list_size(mut self, size: usize) -> Self {
        self.cfg().neighbor_list_size = size;
        self
    }

    pub fn backtracking(mut self, backtracking: Backtracking) -> Self {
        self.cfg().backtracking = backtracking;
        self
    }

    pub fn reduction_level(mut self, level: usize) -> Self {
        self.cfg().reduction_level = level;
        self
    }

    pub fn reduction_cycle(mut self, cycle: usize) -> Self {
        self.cfg().reduction_cycle = cycle;
        self
    }

    pub fn gain_precision(mut self, precision: f64) -> Self {
        self.cfg().gain_precision = precision;
        self
    }

    pub fn shuffle_initial_tour(mut self, shuffle: bool) -> Self {
        self.cfg().shuffle_initial_tour = shuffle;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.cfg().seed = Some(seed);
        self
    }

    pub fn max_double_bridge_tests(mut self, max: usize) -> Self {
        self.cfg().max_double_bridge_tests = max;
        self
    }

    pub fn build(mut self) -> SolverConfig {
        self.cfg.take().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.variant(), Variant::Lk1);
        assert_eq!(cfg.neighbor_list_size(), 5);
        assert_eq!(cfg.reduction_level(), 4);
        assert_eq!(cfg.reduction_cycle(), 4);
    }

    #[test]
    fn builder_overrides_selected_fields() {
        let cfg = SolverConfig::builder()
            .variant(Variant::Lk2)
            .neighbor_list_size(8)
            .seed(42)
            .build();
        assert_eq!(cfg.variant(), Variant::Lk2);
        assert_eq!(cfg.neighbor_list_size(), 8);
        assert_eq!(cfg.seed(), Some(42));
        // untouched fields keep their defaults
        assert_eq!(cfg.reduction_cycle(), 4);
    }

    #[test]
    fn backtracking_falls_back_to_level1_past_depth_one() {
        let bt = Backtracking { level0: 5, level1: 3 };
        assert_eq!(bt.at(0), 5);
        assert_eq!(bt.at(1), 3);
        assert_eq!(bt.at(7), 3);
    }
}
