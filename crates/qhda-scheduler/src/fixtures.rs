//! Synthetic order batches
//!
//! Orders are spread over pools cyclically: order `i` uses pool
//! `i % pool_count`, reads the pool and, unless drawn as read-only, writes
//! the pool and its own account. Orders on the same pool therefore conflict
//! unless both are read-only.

use crate::order::Order;
use crate::resource_key::KeyConvention;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Pair labels used when none are configured
pub const DEFAULT_PAIRS: [&str; 4] = ["ETH/USDC", "BTC/USDT", "SOL/USDC", "ARB/ETH"];

/// Deterministic generator of synthetic order batches
#[derive(Clone, Debug)]
pub struct OrderGenerator {
    /// Number of distinct pools, at least 1
    pub pool_count: usize,
    /// Pair labels, assigned to pools round-robin
    pub pairs: Vec<String>,
    /// Probability in [0, 1] that an order only reads
    pub read_only_ratio: f64,
    /// RNG seed for the read-only draw
    pub seed: u64,
    /// Key naming
    pub keys: KeyConvention,
}

impl Default for OrderGenerator {
    fn default() -> Self {
        Self {
            pool_count: DEFAULT_PAIRS.len(),
            pairs: DEFAULT_PAIRS.iter().map(|p| p.to_string()).collect(),
            read_only_ratio: 0.0,
            seed: 42,
            keys: KeyConvention::default(),
        }
    }
}

impl OrderGenerator {
    /// Generator with default pairs and no read-only orders
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given number of pools
    pub fn with_pool_count(mut self, pool_count: usize) -> Self {
        self.pool_count = pool_count;
        self
    }

    /// Use the given read-only probability
    pub fn with_read_only_ratio(mut self, ratio: f64) -> Self {
        self.read_only_ratio = ratio;
        self
    }

    /// Use the given seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Pool name for pool number `index`, e.g. `ETH_USDC`
    pub fn pool_name(&self, index: usize) -> String {
        if self.pairs.is_empty() {
            return format!("P{index}");
        }
        let base = self.pairs[index % self.pairs.len()].replace('/', "_");
        // Pairs repeat once pools outnumber them; keep pool names distinct
        match index / self.pairs.len() {
            0 => base,
            round => format!("{base}_{round}"),
        }
    }

    /// Generate `count` orders with ids `order_1` .. `order_{count}`
    pub fn generate(&self, count: usize) -> Vec<Order> {
        let pools = self.pool_count.max(1);
        // NaN and infinities mean "no read-only orders"
        let ratio = if self.read_only_ratio.is_finite() {
            self.read_only_ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut rng = StdRng::seed_from_u64(self.seed);

        (0..count)
            .map(|i| {
                let pool_index = i % pools;
                let pool = self.keys.pool(&self.pool_name(pool_index));
                let read_only = rng.gen_bool(ratio);

                let mut order = Order::new(format!("order_{}", i + 1))
                    .with_account(format!("0x{:040x}", i + 1))
                    .reading(pool.clone());
                if let Some(pair) = self.pairs.get(pool_index % self.pairs.len().max(1)) {
                    order = order.with_pair(pair.clone());
                }
                if read_only {
                    order.with_kind("quote")
                } else {
                    order
                        .with_kind("swap")
                        .writing(pool)
                        .writing(self.keys.account(&(i + 1).to_string()))
                }
            })
            .collect()
    }
}
