//! Size-capped ranked collection of the K nearest entries.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use ordered_float::OrderedFloat;

use crate::error::KnnError;
use crate::sample::Candidate;

type Key = (OrderedFloat<f64>, String);

/// Retains the `k` smallest `(distance, label)` entries seen so far.
///
/// Entries are ordered by distance, then label. Identical pairs are kept
/// with multiplicity, so the structure is a bounded multiset: two training
/// rows at the same distance with the same label both survive if there is
/// room for them. Because ties at the eviction boundary are broken by the
/// full key, the retained multiset does not depend on insertion order.
///
/// Insertion is `O(log k)`.
///
/// # Example
///
/// ```
/// use partknn_knn::BoundedTopK;
///
/// let mut top = BoundedTopK::new(2).unwrap();
/// top.insert(4.0, "b")?;
/// top.insert(1.0, "a")?;
/// top.insert(9.0, "c")?;
///
/// let labels: Vec<_> = top.entries().into_iter().map(|c| c.label).collect();
/// assert_eq!(labels, ["a", "b"]);
/// # Ok::<(), partknn_knn::KnnError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BoundedTopK {
    k: usize,
    len: usize,
    /// Key -> multiplicity.
    entries: BTreeMap<Key, usize>,
}

impl BoundedTopK {
    /// Creates an empty set with capacity `k`.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::InvalidK`] if `k` is zero.
    pub fn new(k: usize) -> Result<Self, KnnError> {
        let k = NonZeroUsize::new(k).ok_or(KnnError::InvalidK { k })?;
        Ok(Self::with_k(k))
    }

    /// Creates an empty set with a capacity that is known to be non-zero.
    pub fn with_k(k: NonZeroUsize) -> Self {
        Self {
            k: k.get(),
            len: 0,
            entries: BTreeMap::new(),
        }
    }

    /// Returns the capacity.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the number of retained entries, counting duplicates.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing has been retained.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true once `k` entries are retained.
    pub fn is_full(&self) -> bool {
        self.len >= self.k
    }

    /// Largest retained distance, if any.
    pub fn max_distance(&self) -> Option<f64> {
        self.entries.last_key_value().map(|((d, _), _)| d.0)
    }

    /// Offers an entry. Returns `Ok(true)` if it is retained.
    ///
    /// When the set is full, an entry whose key is not smaller than the
    /// current largest key is rejected without allocating; otherwise it is
    /// inserted and the largest entry is evicted.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::NonFiniteInput`] if `distance` is NaN, infinite
    /// or negative. The set is left unchanged.
    pub fn insert(&mut self, distance: f64, label: &str) -> Result<bool, KnnError> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(KnnError::NonFiniteInput { input: "distance" });
        }
        let distance = OrderedFloat(distance);
        if self.is_full() {
            if let Some(((max_d, max_label), _)) = self.entries.last_key_value() {
                if (distance, label) >= (*max_d, max_label.as_str()) {
                    return Ok(false);
                }
            }
        }

        *self.entries.entry((distance, label.to_owned())).or_insert(0) += 1;
        self.len += 1;
        if self.len > self.k {
            self.evict_last();
        }
        Ok(true)
    }

    fn evict_last(&mut self) {
        if let Some(mut last) = self.entries.last_entry() {
            if *last.get() > 1 {
                *last.get_mut() -= 1;
            } else {
                last.remove();
            }
            self.len -= 1;
        }
    }

    /// Iterates retained entries in ascending order, repeating duplicates.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &str)> + '_ {
        self.entries.iter().flat_map(|((d, label), &count)| {
            std::iter::repeat_n((d.0, label.as_str()), count)
        })
    }

    /// Snapshot of the retained entries in ascending order.
    pub fn entries(&self) -> Vec<Candidate> {
        self.iter()
            .map(|(distance, label)| Candidate::new(distance, label))
            .collect()
    }

    /// Consumes the set, returning its entries in ascending order.
    pub fn into_candidates(self) -> Vec<Candidate> {
        let mut out = Vec::with_capacity(self.len);
        for ((d, label), count) in self.entries {
            for _ in 1..count {
                out.push(Candidate::new(d.0, label.clone()));
            }
            out.push(Candidate::new(d.0, label));
        }
        out
    }
}
