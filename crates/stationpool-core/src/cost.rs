use crate::error::Error;
use std::collections::HashMap;

/// A dense (logically; sparse-backed) cost map keyed by `(from_id, to_id)`
/// station ids.
///
/// Self-costs (`from == to`) are treated as ordinary data — spec §9
/// "Self-loops in routing cost": an implementer must not zero them out —
/// so `get` never special-cases them.
#[derive(Debug, Clone, Default)]
pub struct CostMatrix {
    name: &'static str,
    values: HashMap<(i64, i64), f64>,
}

impl CostMatrix {
    pub fn new(name: &'static str, values: HashMap<(i64, i64), f64>) -> Self {
        Self { name, values }
    }

    pub fn get(&self, from: i64, to: i64) -> Result<f64, Error> {
        self.values
            .get(&(from, to))
            .copied()
            .ok_or(Error::MissingCost {
                matrix: self.name,
                from,
                to,
            })
    }

    pub fn contains(&self, from: i64, to: i64) -> bool {
        self.values.contains_key(&(from, to))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(i64, i64), &f64)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Checks the triangle inequality `R(a,c) <= R(a,b) + R(b,c)` over
    /// every triple of the given ids. Violations are logged and returned
    /// rather than treated as a hard error (spec §3 invariant iii).
    pub fn triangle_violations(&self, ids: &[i64]) -> Vec<(i64, i64, i64)> {
        let mut violations = Vec::new();
        for &a in ids {
            for &b in ids {
                for &c in ids {
                    if a == b || b == c || a == c {
                        continue;
                    }
                    let (Ok(ab), Ok(bc), Ok(ac)) = (self.get(a, b), self.get(b, c), self.get(a, c))
                    else {
                        continue;
                    };
                    if ab + bc < ac {
                        violations.push((a, b, c));
                    }
                }
            }
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_cost_is_not_zeroed() {
        let mut values = HashMap::new();
        values.insert((1, 1), 5.0);
        let m = CostMatrix::new("routing", values);
        assert_eq!(m.get(1, 1).unwrap(), 5.0);
    }

    #[test]
    fn missing_pair_is_an_error() {
        let m = CostMatrix::new("walking", HashMap::new());
        assert!(matches!(m.get(1, 2), Err(Error::MissingCost { .. })));
    }

    #[test]
    fn detects_triangle_violation() {
        let mut values = HashMap::new();
        values.insert((1, 2), 1.0);
        values.insert((2, 3), 1.0);
        values.insert((1, 3), 100.0);
        let m = CostMatrix::new("routing", values);
        let violations = m.triangle_violations(&[1, 2, 3]);
        assert!(violations.contains(&(1, 2, 3)));
    }
}
