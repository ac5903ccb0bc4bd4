use std::sync::Arc;

use super::{Iteration, Sequence};

impl<T: 'static> Sequence<T> {
    pub fn take(&self, n: usize) -> Sequence<T> {
        let source = self.clone();
        Sequence::from_factory(move || {
            let iteration: Iteration<T> = Box::new(source.iter()?.take(n));
            Ok(iteration)
        })
    }

    /// Drops the first `n` elements. Failures inside the dropped prefix still surface.
    pub fn skip(&self, n: usize) -> Sequence<T> {
        let source = self.clone();
        Sequence::from_factory(move || {
            let mut remaining = n;
            let iteration: Iteration<T> = Box::new(source.iter()?.filter(move |item| {
                if item.is_err() || remaining == 0 {
                    return true;
                }
                remaining -= 1;
                false
            }));
            Ok(iteration)
        })
    }

    /// Elements up to, and excluding, the first one `predicate` rejects.
    pub fn take_while<P>(&self, predicate: P) -> Sequence<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Sequence::from_factory(move || {
            let predicate = Arc::clone(&predicate);
            let iteration: Iteration<T> =
                Box::new(source.iter()?.take_while(move |item| match item {
                    Ok(value) => predicate(value),
                    Err(_) => true,
                }));
            Ok(iteration)
        })
    }

    /// Elements from the first one `predicate` rejects onwards, that one included.
    pub fn skip_while<P>(&self, predicate: P) -> Sequence<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Sequence::from_factory(move || {
            let predicate = Arc::clone(&predicate);
            let mut skipping = true;
            let iteration: Iteration<T> = Box::new(source.iter()?.filter(move |item| {
                if let (true, Ok(value)) = (skipping, item) {
                    skipping = predicate(value);
                    return !skipping;
                }
                true
            }));
            Ok(iteration)
        })
    }

    /// This sequence followed by `other`. `other` is opened only once this one is exhausted.
    pub fn concat(&self, other: &Sequence<T>) -> Sequence<T> {
        Sequence::concat_all([self.clone(), other.clone()])
    }
}

impl<T: Clone + Send + Sync + 'static> Sequence<T> {
    pub fn prepend(&self, value: T) -> Sequence<T> {
        Sequence::once(value).concat(self)
    }

    pub fn append(&self, value: T) -> Sequence<T> {
        self.concat(&Sequence::once(value))
    }
}
