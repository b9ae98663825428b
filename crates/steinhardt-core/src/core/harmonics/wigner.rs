use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

static TABLE_CACHE: Lazy<RwLock<HashMap<u32, Arc<Wigner3jTable>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Wigner 3-j symbols `(l l l; m1 m2 m3)` with `m3 = -m1 - m2` for one degree `l`.
///
/// Stored densely over `(m1, m2) ∈ [-l, l]²`; entries whose `m3` falls outside
/// `[-l, l]` are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Wigner3jTable {
    l: u32,
    coefficients: Vec<f64>,
}

impl Wigner3jTable {
    /// Computes a fresh table without touching the shared cache.
    pub fn new(l: u32) -> Self {
        let li = l as i64;
        let width = 2 * l as usize + 1;
        let ln_fact = ln_factorials(3 * l as usize + 1);

        let mut coefficients = vec![0.0; width * width];
        for m1 in -li..=li {
            for m2 in -li..=li {
                let m3 = -m1 - m2;
                if m3.abs() > li {
                    continue;
                }
                coefficients[index(li, m1, m2)] =
                    wigner_3j_with(&ln_fact, [li, li, li], [m1, m2, m3]);
            }
        }
        Self { l, coefficients }
    }

    /// Shared table for degree `l`, built on first request and reused afterwards.
    pub fn for_degree(l: u32) -> Arc<Self> {
        if let Some(table) = TABLE_CACHE
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&l)
        {
            return Arc::clone(table);
        }

        let mut cache = TABLE_CACHE.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(l).or_insert_with(|| {
            debug!(l, "Building Wigner 3-j table.");
            Arc::new(Self::new(l))
        }))
    }

    pub fn degree(&self) -> u32 {
        self.l
    }

    /// `(l l l; m1 m2 -m1-m2)`, or zero outside the selection rules.
    pub fn coefficient(&self, m1: i64, m2: i64) -> f64 {
        let li = self.l as i64;
        if m1.abs() > li || m2.abs() > li || (m1 + m2).abs() > li {
            return 0.0;
        }
        self.coefficients[index(li, m1, m2)]
    }

    /// Iterates `(m1, m2, m3, coefficient)` over every admissible triple.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64, i64, f64)> + '_ {
        let li = self.l as i64;
        (-li..=li).flat_map(move |m1| {
            (-li..=li).filter_map(move |m2| {
                let m3 = -m1 - m2;
                let c = self.coefficients[index(li, m1, m2)];
                (m3.abs() <= li).then_some((m1, m2, m3, c))
            })
        })
    }
}

#[inline]
fn index(l: i64, m1: i64, m2: i64) -> usize {
    ((m1 + l) * (2 * l + 1) + (m2 + l)) as usize
}

/// General Wigner 3-j symbol for integer angular momenta (Racah formula).
pub fn wigner_3j(j: [i64; 3], m: [i64; 3]) -> f64 {
    let max_arg = (j[0] + j[1] + j[2] + 1).max(0) as usize;
    wigner_3j_with(&ln_factorials(max_arg), j, m)
}

fn wigner_3j_with(ln_fact: &[f64], j: [i64; 3], m: [i64; 3]) -> f64 {
    let [j1, j2, j3] = j;
    let [m1, m2, m3] = m;

    if j1 < 0 || j2 < 0 || j3 < 0 {
        return 0.0;
    }
    if m1 + m2 + m3 != 0 || m1.abs() > j1 || m2.abs() > j2 || m3.abs() > j3 {
        return 0.0;
    }
    if j3 < (j1 - j2).abs() || j3 > j1 + j2 {
        return 0.0;
    }

    let lf = |n: i64| ln_fact[n as usize];

    let k_min = 0.max(j2 - j3 - m1).max(j1 - j3 + m2);
    let k_max = (j1 + j2 - j3).min(j1 - m1).min(j2 + m2);
    if k_min > k_max {
        return 0.0;
    }

    let ln_triangle =
        lf(j1 + j2 - j3) + lf(j1 - j2 + j3) + lf(-j1 + j2 + j3) - lf(j1 + j2 + j3 + 1);
    let ln_orders =
        lf(j1 + m1) + lf(j1 - m1) + lf(j2 + m2) + lf(j2 - m2) + lf(j3 + m3) + lf(j3 - m3);
    let ln_prefactor = 0.5 * (ln_triangle + ln_orders);

    let sum: f64 = (k_min..=k_max)
        .map(|k| {
            let ln_denominator = lf(k)
                + lf(j3 - j2 + k + m1)
                + lf(j3 - j1 + k - m2)
                + lf(j1 + j2 - j3 - k)
                + lf(j1 - k - m1)
                + lf(j2 - k + m2);
            let magnitude = (ln_prefactor - ln_denominator).exp();
            if k % 2 == 0 {
                magnitude
            } else {
                -magnitude
            }
        })
        .sum();

    if (j1 - j2 - m3).rem_euclid(2) == 0 {
        sum
    } else {
        -sum
    }
}

/// `ln(n!)` for `n = 0..=max`.
fn ln_factorials(max: usize) -> Vec<f64> {
    let mut table = Vec::with_capacity(max + 1);
    let mut acc = 0.0;
    table.push(acc);
    for n in 1..=max {
        acc += (n as f64).ln();
        table.push(acc);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;
    const W3J_666_000: f64 = -0.0930595002112898;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn matches_tabulated_low_order_symbols() {
        let cases = [
            ([1, 1, 1], [1, -1, 0], 1.0 / 6f64.sqrt()),
            ([1, 1, 1], [1, 0, -1], -1.0 / 6f64.sqrt()),
            ([1, 1, 2], [1, -1, 0], 1.0 / 30f64.sqrt()),
            ([2, 2, 2], [0, 0, 0], -(2.0f64 / 35.0).sqrt()),
            ([4, 4, 4], [0, 0, 0], 3.0 * (2.0f64 / 1001.0).sqrt()),
        ];
        for (j, m, expected) in cases {
            assert!(f64_approx_equal(wigner_3j(j, m), expected), "{j:?} {m:?}");
        }
    }

    #[test]
    fn odd_degree_with_all_zero_orders_vanishes() {
        assert!(f64_approx_equal(wigner_3j([1, 1, 1], [0, 0, 0]), 0.0));
        assert!(f64_approx_equal(wigner_3j([3, 3, 3], [0, 0, 0]), 0.0));
    }

    #[test]
    fn violating_selection_rules_returns_zero() {
        assert_eq!(wigner_3j([1, 1, 1], [1, 1, 0]), 0.0);
        assert_eq!(wigner_3j([1, 1, 3], [0, 0, 0]), 0.0);
        assert_eq!(wigner_3j([2, 2, 2], [3, -3, 0]), 0.0);
    }

    #[test]
    fn table_for_degree_six_matches_reference_value() {
        let table = Wigner3jTable::new(6);
        assert!(f64_approx_equal(table.coefficient(0, 0), W3J_666_000));
    }

    #[test]
    fn table_is_zero_outside_admissible_orders() {
        let table = Wigner3jTable::new(4);
        assert_eq!(table.coefficient(4, 1), 0.0);
        assert_eq!(table.coefficient(-3, -2), 0.0);
        assert_eq!(table.coefficient(5, -5), 0.0);
    }

    #[test]
    fn table_is_symmetric_under_order_swap_and_sign_flip() {
        let l = 6i64;
        let table = Wigner3jTable::new(l as u32);
        for m1 in -l..=l {
            for m2 in -l..=l {
                let c = table.coefficient(m1, m2);
                // Swapping two columns and flipping all signs each multiply by (-1)^(3l).
                assert!(f64_approx_equal(c, table.coefficient(m2, m1)));
                assert!(f64_approx_equal(c, table.coefficient(-m1, -m2)));
            }
        }
    }

    #[test]
    fn iter_visits_every_admissible_triple_once() {
        let l = 3i64;
        let table = Wigner3jTable::new(l as u32);
        let triples: Vec<_> = table.iter().collect();
        let expected = (-l..=l)
            .flat_map(|m1| (-l..=l).map(move |m2| (m1, m2)))
            .filter(|(m1, m2)| (m1 + m2).abs() <= l)
            .count();
        assert_eq!(triples.len(), expected);
        assert!(triples.iter().all(|&(m1, m2, m3, _)| m1 + m2 + m3 == 0));
    }

    #[test]
    fn for_degree_returns_shared_instance() {
        let a = Wigner3jTable::for_degree(5);
        let b = Wigner3jTable::for_degree(5);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, Wigner3jTable::new(5));
    }

    #[test]
    fn orthogonality_sum_over_orders_is_normalized() {
        // Σ_{m1,m2} (l l l; m1 m2 m3)^2 = 1 / (2l + 1) for each fixed m3.
        let l = 6i64;
        let table = Wigner3jTable::new(l as u32);
        for m3 in -l..=l {
            let sum: f64 = table
                .iter()
                .filter(|&(_, _, t, _)| t == m3)
                .map(|(_, _, _, c)| c * c)
                .sum();
            assert!((sum - 1.0 / (2 * l + 1) as f64).abs() < 1e-12, "m3 = {m3}");
        }
    }
}
