//! Post-fetch sorting
//!
//! Multi-key, stable: items that compare equal on every key keep their fetch order.

use std::cmp::Ordering;

use serde_json::Value;

use super::params::SortSpec;

/// Exposes sortable properties of a result item by key
pub trait PropertyAccess {
    /// Returns the value of `key`, or `None` if the item has no such property
    fn property(&self, key: &str) -> Option<Value>;
}

impl PropertyAccess for Value {
    fn property(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

/// Sorts result items
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts items by property according to the sort specification
    pub fn sort<T: PropertyAccess>(items: &mut [T], sort_spec: &SortSpec) {
        Self::sort_by_key_fn(items, sort_spec, |item, key| item.property(key));
    }

    /// Sorts items using `extract` to read each key's value
    pub fn sort_by_key_fn<T, F>(items: &mut [T], sort_spec: &SortSpec, extract: F)
    where
        F: Fn(&T, &str) -> Option<Value>,
    {
        if sort_spec.is_empty() {
            return;
        }

        // Extract once per item instead of once per comparison
        let mut keyed: Vec<(Vec<Option<Value>>, usize)> = items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let values = sort_spec
                    .pairs()
                    .iter()
                    .map(|pair| extract(item, &pair.key))
                    .collect();
                (values, idx)
            })
            .collect();

        keyed.sort_by(|(a, _), (b, _)| {
            for (i, pair) in sort_spec.pairs().iter().enumerate() {
                let ordering = pair
                    .direction
                    .apply(Self::compare_values(a[i].as_ref(), b[i].as_ref()));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        let order: Vec<usize> = keyed.into_iter().map(|(_, idx)| idx).collect();
        apply_permutation(items, order);
    }

    /// Compares two values.
    ///
    /// - missing < null < bool < number < string < array < object
    /// - same types use natural ordering; arrays and objects compare equal
    pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => {
                let type_order = |v: &Value| -> u8 {
                    match v {
                        Value::Null => 0,
                        Value::Bool(_) => 1,
                        Value::Number(_) => 2,
                        Value::String(_) => 3,
                        Value::Array(_) => 4,
                        Value::Object(_) => 5,
                    }
                };

                let a_type = type_order(a_val);
                let b_type = type_order(b_val);
                if a_type != b_type {
                    return a_type.cmp(&b_type);
                }

                match (a_val, b_val) {
                    (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
                    (Value::Number(a_n), Value::Number(b_n)) => {
                        let a_f = a_n.as_f64().unwrap_or(0.0);
                        let b_f = b_n.as_f64().unwrap_or(0.0);
                        a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
                    }
                    (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
                    _ => Ordering::Equal,
                }
            }
        }
    }
}

/// Reorders `items` so that position `i` holds the item previously at `order[i]`
fn apply_permutation<T>(items: &mut [T], mut order: Vec<usize>) {
    for i in 0..order.len() {
        let mut current = i;
        while order[current] != i {
            let next = order[current];
            items.swap(current, next);
            order[current] = current;
            current = next;
        }
        order[current] = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(items: &[Value]) -> Vec<&str> {
        items.iter().map(|v| v["id"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_sort_ascending() {
        let mut items = vec![
            json!({"id": "c", "age": 30}),
            json!({"id": "a", "age": 20}),
            json!({"id": "b", "age": 25}),
        ];
        ResultSorter::sort(&mut items, &SortSpec::asc("age"));
        assert_eq!(ids(&items), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_descending() {
        let mut items = vec![
            json!({"id": "c", "age": 30}),
            json!({"id": "a", "age": 20}),
            json!({"id": "b", "age": 25}),
        ];
        ResultSorter::sort(&mut items, &SortSpec::desc("age"));
        assert_eq!(ids(&items), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_stable() {
        let mut items = vec![
            json!({"id": "a", "age": 25}),
            json!({"id": "b", "age": 25}),
            json!({"id": "c", "age": 25}),
        ];
        ResultSorter::sort(&mut items, &SortSpec::desc("age"));
        assert_eq!(ids(&items), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_secondary_key_breaks_ties() {
        let mut items = vec![
            json!({"id": "1", "folder": true, "name": "b"}),
            json!({"id": "2", "folder": false, "name": "a"}),
            json!({"id": "3", "folder": true, "name": "a"}),
            json!({"id": "4", "folder": false, "name": "c"}),
        ];
        let spec = SortSpec::desc("folder").then_asc("name");
        ResultSorter::sort(&mut items, &spec);
        assert_eq!(ids(&items), vec!["3", "1", "2", "4"]);
    }

    #[test]
    fn test_missing_property_sorts_first() {
        let mut items = vec![
            json!({"id": "x", "name": "zed"}),
            json!({"id": "y"}),
            json!({"id": "z", "name": null}),
        ];
        ResultSorter::sort(&mut items, &SortSpec::asc("name"));
        assert_eq!(ids(&items), vec!["y", "z", "x"]);
    }

    #[test]
    fn test_empty_spec_keeps_order() {
        let mut items = vec![json!({"id": "b"}), json!({"id": "a"})];
        ResultSorter::sort(&mut items, &SortSpec::new());
        assert_eq!(ids(&items), vec!["b", "a"]);
    }

    #[test]
    fn test_sort_by_key_fn() {
        let mut items = vec![3u32, 1, 2];
        ResultSorter::sort_by_key_fn(&mut items, &SortSpec::desc("n"), |n, _| Some(json!(n)));
        assert_eq!(items, vec![3, 2, 1]);
    }

    #[test]
    fn test_apply_permutation() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        apply_permutation(&mut items, vec![2, 0, 3, 1]);
        assert_eq!(items, vec!['c', 'a', 'd', 'b']);
    }
}
