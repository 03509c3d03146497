//! Tunable policies: array growth and hash table sizing.

use crate::error::{Error, Result};

/// How a [`DynamicArray`](crate::DynamicArray) sizes its buffer.
///
/// Before an insertion, the array grows when the element count after the
/// insertion would reach `fill_percent` of the current capacity. The new
/// capacity is `capacity * factor_num / factor_den`, and never less than
/// what the insertion needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    initial_capacity: usize,
    factor_num: usize,
    factor_den: usize,
    fill_percent: usize,
}

impl GrowthPolicy {
    pub const DEFAULT_INITIAL_CAPACITY: usize = 10;

    /// Build a policy growing by `factor_num / factor_den` once the array is
    /// `fill_percent` full. The factor must be greater than one.
    pub fn new(factor_num: usize, factor_den: usize, fill_percent: usize) -> Result<Self> {
        if factor_den == 0 {
            return Err(Error::InvalidPolicy("growth factor denominator is zero"));
        }
        if factor_num <= factor_den {
            return Err(Error::InvalidPolicy("growth factor must be greater than one"));
        }
        if fill_percent == 0 || fill_percent > 100 {
            return Err(Error::InvalidPolicy("fill percent must be within 1..=100"));
        }
        Ok(Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            factor_num,
            factor_den,
            fill_percent,
        })
    }

    /// Capacity allocated by `DynamicArray::with_policy`.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Whether inserting one element into `len` of `capacity` slots must grow first.
    #[inline]
    pub fn should_grow(&self, len: usize, capacity: usize) -> bool {
        (len + 1).saturating_mul(100) >= capacity.saturating_mul(self.fill_percent)
    }

    /// Capacity to grow to so that at least `needed` slots exist.
    #[inline]
    pub fn grown_capacity(&self, capacity: usize, needed: usize) -> usize {
        let scaled = capacity.saturating_mul(self.factor_num) / self.factor_den;
        scaled.max(needed)
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            factor_num: 3,
            factor_den: 2,
            fill_percent: 80,
        }
    }
}

/// Bucket layout of a [`HashTable`](crate::HashTable).
///
/// `max_load_factor` is off by default: the bucket count stays fixed for the
/// table's lifetime and chains grow instead. When set, an insertion that
/// pushes `len / buckets` above the limit at least doubles the bucket count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    buckets: usize,
    max_load_factor: Option<f64>,
}

impl TableConfig {
    pub const DEFAULT_BUCKETS: usize = 10;
    /// Smallest accepted `max_load_factor`; growth reserves up to
    /// `1 / MIN_LOAD_FACTOR` buckets per entry.
    pub const MIN_LOAD_FACTOR: f64 = 0.1;

    pub fn new(buckets: usize, max_load_factor: Option<f64>) -> Result<Self> {
        if buckets == 0 {
            return Err(Error::InvalidPolicy("bucket count must be at least one"));
        }
        if let Some(lf) = max_load_factor {
            if !lf.is_finite() || lf < Self::MIN_LOAD_FACTOR {
                return Err(Error::InvalidPolicy("max load factor must be finite and at least 0.1"));
            }
        }
        Ok(Self {
            buckets,
            max_load_factor,
        })
    }

    /// Fixed bucket count, no rehashing.
    pub fn fixed(buckets: usize) -> Result<Self> {
        Self::new(buckets, None)
    }

    pub fn buckets(&self) -> usize {
        self.buckets
    }

    pub fn max_load_factor(&self) -> Option<f64> {
        self.max_load_factor
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            buckets: Self::DEFAULT_BUCKETS,
            max_load_factor: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: the default policy grows at 80% fill by a factor of 1.5.
    #[test]
    fn default_policy_thresholds() {
        let p = GrowthPolicy::default();
        assert_eq!(p.initial_capacity(), 10);
        // 7 live + 1 incoming = 8 of 10 slots
        assert!(!p.should_grow(6, 10));
        assert!(p.should_grow(7, 10));
        assert_eq!(p.grown_capacity(10, 8), 15);
    }

    /// Invariant: growth always yields room for the pending insertion,
    /// even from an empty or single-slot buffer.
    #[test]
    fn grown_capacity_covers_need() {
        let p = GrowthPolicy::default();
        assert!(p.should_grow(0, 0));
        assert_eq!(p.grown_capacity(0, 1), 1);
        assert_eq!(p.grown_capacity(1, 2), 2);
    }

    #[test]
    fn policy_validation() {
        assert_eq!(
            GrowthPolicy::new(1, 1, 80),
            Err(Error::InvalidPolicy("growth factor must be greater than one"))
        );
        assert!(GrowthPolicy::new(2, 0, 80).is_err());
        assert!(GrowthPolicy::new(2, 1, 0).is_err());
        assert!(GrowthPolicy::new(2, 1, 101).is_err());
        let p = GrowthPolicy::new(2, 1, 100).unwrap().with_initial_capacity(4);
        assert_eq!(p.initial_capacity(), 4);
        assert!(!p.should_grow(2, 4));
        assert!(p.should_grow(3, 4));
        assert_eq!(p.grown_capacity(4, 5), 8);
    }

    #[test]
    fn table_config_validation() {
        assert!(TableConfig::new(0, None).is_err());
        assert!(TableConfig::new(4, Some(0.0)).is_err());
        assert!(TableConfig::new(4, Some(f64::NAN)).is_err());
        assert_eq!(
            TableConfig::new(4, Some(1e-9)),
            Err(Error::InvalidPolicy("max load factor must be finite and at least 0.1"))
        );
        assert!(TableConfig::new(4, Some(TableConfig::MIN_LOAD_FACTOR)).is_ok());
        let c = TableConfig::new(4, Some(0.75)).unwrap();
        assert_eq!(c.buckets(), 4);
        assert_eq!(c.max_load_factor(), Some(0.75));
        assert_eq!(TableConfig::default().buckets(), 10);
        assert_eq!(TableConfig::default().max_load_factor(), None);
    }
}
