use std::{iter, sync::Arc};

use super::{opened, Iteration, Sequence};
use crate::{BoxError, Error, Result};

impl<T: 'static> Sequence<T> {
    pub fn map<U: 'static, F>(&self, f: F) -> Sequence<U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Sequence::from_factory(move || {
            let f = Arc::clone(&f);
            let iteration: Iteration<U> = Box::new(source.iter()?.map(move |item| item.map(&*f)));
            Ok(iteration)
        })
    }

    /// Maps with a fallible function; the first `Err` ends the consumption as
    /// [`Error::Operator`].
    pub fn try_map<U: 'static, E, F>(&self, f: F) -> Sequence<U>
    where
        E: Into<BoxError>,
        F: Fn(T) -> std::result::Result<U, E> + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Sequence::from_factory(move || {
            let f = Arc::clone(&f);
            let iteration: Iteration<U> = Box::new(
                source
                    .iter()?
                    .map(move |item| item.and_then(|value| f(value).map_err(Error::operator))),
            );
            Ok(iteration)
        })
    }

    pub fn filter<P>(&self, predicate: P) -> Sequence<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Sequence::from_factory(move || {
            let predicate = Arc::clone(&predicate);
            let iteration: Iteration<T> = Box::new(source.iter()?.filter(move |item| match item {
                Ok(value) => predicate(value),
                Err(_) => true,
            }));
            Ok(iteration)
        })
    }

    /// Keeps the elements `predicate` rejects.
    pub fn reject<P>(&self, predicate: P) -> Sequence<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter(move |value| !predicate(value))
    }

    /// Replaces every element with the nested sequence `f` returns and chains them in order.
    ///
    /// `f` may return anything convertible into a sequence, including `Option<Sequence<U>>`
    /// where `None` stands for an empty one. Each nested sequence is opened only once the
    /// previous one is exhausted.
    pub fn flat_map<U: 'static, R, F>(&self, f: F) -> Sequence<U>
    where
        R: Into<Sequence<U>>,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Sequence::from_factory(move || {
            let f = Arc::clone(&f);
            let iteration: Iteration<U> =
                Box::new(source.iter()?.flat_map(move |item| -> Iteration<U> {
                    match item {
                        Ok(value) => opened(f(value).into().iter()),
                        Err(error) => Box::new(iter::once(Err(error))),
                    }
                }));
            Ok(iteration)
        })
    }

    /// Pairs elements by position and combines them with `f`.
    ///
    /// Stops at the end of the shorter sequence; the rest of the longer one is discarded.
    ///
    /// `other` is opened before this sequence, so an `other` that fails to open leaves this one
    /// untouched. The indexed operators rely on this: they zip against [`Sequence::counting`],
    /// which always opens.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::Sequence;
    ///
    /// let names = Sequence::of(["ada", "alan", "grace"]);
    /// let years = Sequence::of([1815, 1912]);
    ///
    /// assert_eq!(
    ///     names.zip(&years, |name, year| format!("{name} {year}")).to_list().unwrap(),
    ///     ["ada 1815", "alan 1912"]
    /// );
    /// ```
    pub fn zip<U: 'static, V: 'static, F>(&self, other: &Sequence<U>, f: F) -> Sequence<V>
    where
        F: Fn(T, U) -> V + Send + Sync + 'static,
    {
        let left = self.clone();
        let right = other.clone();
        let f = Arc::new(f);
        Sequence::from_factory(move || {
            let f = Arc::clone(&f);
            let right = right.iter()?;
            let iteration: Iteration<V> = Box::new(
                left.iter()?
                    .zip(right)
                    .map(move |(left, right)| -> Result<V> { Ok(f(left?, right?)) }),
            );
            Ok(iteration)
        })
    }

    /// Like [`map`](Sequence::map), also passing the 0-based position in the current iteration.
    pub fn map_indexed<U: 'static, F>(&self, f: F) -> Sequence<U>
    where
        F: Fn(T, usize) -> U + Send + Sync + 'static,
    {
        self.zip(&Sequence::counting(), f)
    }

    pub fn filter_indexed<P>(&self, predicate: P) -> Sequence<T>
    where
        P: Fn(&T, usize) -> bool + Send + Sync + 'static,
    {
        self.zip(&Sequence::counting(), |value, index| (value, index))
            .filter(move |(value, index)| predicate(value, *index))
            .map(|(value, _)| value)
    }

    pub fn flat_map_indexed<U: 'static, R, F>(&self, f: F) -> Sequence<U>
    where
        R: Into<Sequence<U>>,
        F: Fn(T, usize) -> R + Send + Sync + 'static,
    {
        self.zip(&Sequence::counting(), |value, index| (value, index))
            .flat_map(move |(value, index)| f(value, index))
    }
}
