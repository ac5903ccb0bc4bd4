use std::{collections::HashSet, hash::Hash, sync::Arc};

use super::{Iteration, Sequence};

impl<T: 'static> Sequence<T> {
    /// Keeps the first element seen for each key, in original order.
    ///
    /// Keys are compared, not elements; the set of seen keys lives only as long as one iteration.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::Sequence;
    ///
    /// let words = Sequence::of(["apple", "avocado", "banana", "blueberry", "cherry"]);
    ///
    /// assert_eq!(
    ///     words.distinct_by(|word| word.chars().next()).to_list().unwrap(),
    ///     ["apple", "banana", "cherry"]
    /// );
    /// ```
    pub fn distinct_by<K, F>(&self, key: F) -> Sequence<T>
    where
        K: Eq + Hash + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        let source = self.clone();
        let key = Arc::new(key);
        Sequence::from_factory(move || {
            let key = Arc::clone(&key);
            let mut seen = HashSet::new();
            let iteration: Iteration<T> = Box::new(source.iter()?.filter(move |item| match item {
                Ok(value) => seen.insert(key(value)),
                Err(_) => true,
            }));
            Ok(iteration)
        })
    }
}

impl<T: Eq + Hash + Clone + 'static> Sequence<T> {
    pub fn distinct(&self) -> Sequence<T> {
        self.distinct_by(T::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_occurrence_per_key_wins() {
        let sequence = Sequence::of([1, 4, 2, 5, 3, 6]).distinct_by(|x| x % 3);
        assert_eq!(sequence.to_list().unwrap(), [1, 2, 3]);
    }

    #[test]
    fn seen_keys_reset_between_iterations() {
        let sequence = Sequence::of(["b", "a", "b", "c", "a"]).distinct();
        assert_eq!(sequence.to_list().unwrap(), ["b", "a", "c"]);
        assert_eq!(sequence.to_list().unwrap(), ["b", "a", "c"]);
    }
}
