use std::{
    fmt, iter,
    sync::{Arc, Mutex},
};

use crate::{
    utils::{sync::lock, tracing::trace},
    BoxError, Error, Observable, Result,
};

mod distinct;
mod force;
mod slice;
mod transform;

/// One pass over a [`Sequence`].
///
/// Each item is `Ok(value)` or the failure that stopped the pass.
pub type Iteration<T> = Box<dyn Iterator<Item = Result<T>>>;

type Factory<T> = dyn Fn() -> Result<Iteration<T>> + Send + Sync;

/// A cold, restartable, pull-based lazy sequence.
///
/// A `Sequence` holds no elements. It holds the recipe for producing a fresh [`Iteration`] every
/// time it is consumed, so consuming it twice walks the source twice. Operators never touch the
/// receiver; they return a new `Sequence` wrapping it, and nothing runs until a terminal such as
/// [`to_list`](Sequence::to_list) is called.
///
/// # Examples
///
/// ```
/// use seqflow::Sequence;
///
/// let evens = Sequence::counting()
///     .filter(|n| n % 2 == 0)
///     .map(|n| n * 10)
///     .take(3);
///
/// assert_eq!(evens.to_list().unwrap(), [0, 20, 40]);
/// assert_eq!(evens.to_list().unwrap(), [0, 20, 40]);
/// ```
pub struct Sequence<T> {
    factory: Arc<Factory<T>>,
    materialized: Option<Arc<dyn Materialized>>,
}

/// A cache that can report its length, possibly by filling itself first.
trait Materialized: Send + Sync {
    fn len(&self) -> Result<usize>;
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Sequence {
            factory: Arc::clone(&self.factory),
            materialized: self.materialized.clone(),
        }
    }
}

impl<T> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("item", &std::any::type_name::<T>())
            .field("forced", &self.materialized.is_some())
            .finish()
    }
}

impl<T: 'static> Sequence<T> {
    /// Builds a sequence from a fallible factory of fallible iterations.
    ///
    /// The factory runs once per terminal consumption. An `Err` from the factory means the source
    /// could not be opened; an `Err` item means it could not continue.
    pub fn new<F, I>(factory: F) -> Self
    where
        F: Fn() -> Result<I> + Send + Sync + 'static,
        I: IntoIterator<Item = Result<T>>,
        I::IntoIter: 'static,
    {
        Sequence::from_factory(move || {
            let iteration: Iteration<T> = Box::new(factory()?.into_iter());
            Ok(iteration)
        })
    }

    /// Builds a sequence from a function returning a fresh iterator each time.
    pub fn from_fn<F, I>(f: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Sequence::from_factory(move || {
            let iteration: Iteration<T> = Box::new(f().into_iter().map(Ok));
            Ok(iteration)
        })
    }

    /// Wraps a cloneable iterable; every consumption iterates a fresh clone.
    pub fn of<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
        I::IntoIter: 'static,
    {
        Sequence::from_fn(move || iterable.clone())
    }

    pub fn empty() -> Self {
        Sequence::from_fn(iter::empty)
    }

    /// Wraps an iterator that can only be walked once, such as an open reader.
    ///
    /// The first consumption takes the iterator; later ones fail with [`Error::ResourceClosed`].
    pub fn single_use<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        let resource = Mutex::new(Some(iterable.into_iter()));
        Sequence::from_factory(move || match lock(&resource).take() {
            Some(iter) => {
                trace!("single-use sequence materialized");
                let iteration: Iteration<T> = Box::new(iter.map(Ok));
                Ok(iteration)
            },
            None => Err(Error::ResourceClosed),
        })
    }

    /// Walks `first`, then every value `step` derives from the previous one until it returns
    /// `None`.
    pub fn successors<F>(first: T, step: F) -> Self
    where
        T: Clone + Send + Sync,
        F: Fn(&T) -> Option<T> + Send + Sync + 'static,
    {
        let step = Arc::new(step);
        Sequence::from_fn(move || {
            let step = Arc::clone(&step);
            iter::successors(Some(first.clone()), move |prev| step(prev))
        })
    }

    /// Chains the given sequences in order.
    pub fn concat_all<I>(sequences: I) -> Self
    where
        I: IntoIterator<Item = Sequence<T>>,
    {
        Sequence::from_vec(sequences.into_iter().collect()).flat_map(|sequence| sequence)
    }

    /// A fresh iteration of this sequence.
    ///
    /// Fails if the underlying source cannot be opened; nothing is consumed in that case.
    pub fn iter(&self) -> Result<Iteration<T>> {
        (self.factory)()
    }

    pub fn to_list(&self) -> Result<Vec<T>> {
        self.iter()?.collect()
    }

    pub fn to_array(&self) -> Result<Box<[T]>> {
        self.to_list().map(Vec::into_boxed_slice)
    }

    pub fn fold<A, F>(&self, init: A, mut f: F) -> Result<A>
    where
        F: FnMut(A, T) -> A,
    {
        self.iter()?.try_fold(init, |acc, item| item.map(|value| f(acc, value)))
    }

    pub fn for_each<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(T),
    {
        self.iter()?.try_for_each(|item| item.map(&mut f))
    }

    /// Like [`for_each`](Sequence::for_each), stopping at the first failure of `f`.
    pub fn try_for_each<F, E>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(T) -> Result<(), E>,
        E: Into<BoxError>,
    {
        self.iter()?
            .try_for_each(|item| f(item?).map_err(Error::operator))
    }

    pub fn first(&self) -> Result<Option<T>> {
        self.iter()?.next().transpose()
    }

    /// Number of elements.
    ///
    /// Constant time once the sequence is forced; otherwise this walks one full iteration.
    pub fn len(&self) -> Result<usize> {
        match &self.materialized {
            Some(materialized) => materialized.len(),
            None => self.fold(0, |count, _| count + 1),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        match &self.materialized {
            Some(materialized) => materialized.len().map(|len| len == 0),
            None => self.first().map(|first| first.is_none()),
        }
    }

    /// Whether this sequence serves its elements from a cache.
    pub fn is_forced(&self) -> bool {
        self.materialized.is_some()
    }

    /// Bridges into an [`Observable`] that pushes one iteration per subscription.
    pub fn to_observable(&self) -> Observable<T> {
        Observable::from_sequence(self.clone())
    }

    fn from_factory<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Iteration<T>> + Send + Sync + 'static,
    {
        Sequence {
            factory: Arc::new(factory),
            materialized: None,
        }
    }
}

impl Sequence<usize> {
    /// The infinite sequence `0, 1, 2, ...`.
    pub fn counting() -> Self {
        Sequence::from_fn(|| 0..)
    }
}

impl<T: Clone + Send + Sync + 'static> Sequence<T> {
    /// A sequence over an owned collection; elements are cloned out on each consumption.
    pub fn from_vec(items: Vec<T>) -> Self {
        Sequence::from_cache(Arc::new(items))
    }

    pub fn once(value: T) -> Self {
        Sequence::from_vec(vec![value])
    }

    fn from_cache(items: Arc<Vec<T>>) -> Self {
        Sequence::from_factory(move || Ok(cached(Arc::clone(&items))))
    }
}

impl<T: Clone + Send + Sync + 'static> From<Vec<T>> for Sequence<T> {
    fn from(items: Vec<T>) -> Self {
        Sequence::from_vec(items)
    }
}

/// `None` becomes the empty sequence.
impl<T: 'static> From<Option<Sequence<T>>> for Sequence<T> {
    fn from(sequence: Option<Sequence<T>>) -> Self {
        sequence.unwrap_or_else(Sequence::empty)
    }
}

fn cached<T: Clone + 'static>(items: Arc<Vec<T>>) -> Iteration<T> {
    Box::new((0..items.len()).map(move |i| Ok(items[i].clone())))
}

/// Turns an open attempt into an iteration, surfacing a failed open as its only item.
fn opened<T: 'static>(iteration: Result<Iteration<T>>) -> Iteration<T> {
    iteration.unwrap_or_else(|error| Box::new(iter::once(Err(error))))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    use super::*;

    #[test]
    fn it_restarts_on_every_consumption() {
        let opened = Arc::new(AtomicUsize::new(0));
        let sequence = Sequence::from_fn({
            let opened = Arc::clone(&opened);
            move || {
                opened.fetch_add(1, AtomicOrdering::SeqCst);
                vec![1, 2, 3]
            }
        });

        assert_eq!(opened.load(AtomicOrdering::SeqCst), 0);
        assert_eq!(sequence.to_list().unwrap(), [1, 2, 3]);
        assert_eq!(sequence.to_list().unwrap(), [1, 2, 3]);
        assert_eq!(opened.load(AtomicOrdering::SeqCst), 2);
    }

    #[test]
    fn single_use_fails_the_second_time() {
        let sequence = Sequence::single_use(vec!["a", "b"]);
        assert_eq!(sequence.to_list().unwrap(), ["a", "b"]);
        assert!(matches!(sequence.to_list(), Err(Error::ResourceClosed)));
    }

    #[test]
    fn failed_open_surfaces_from_the_terminal() {
        let sequence: Sequence<i32> =
            Sequence::new(|| -> Result<Vec<Result<i32>>> { Err(Error::materialization("gone")) });
        let mapped = sequence.map(|x| x + 1);
        assert!(matches!(mapped.to_list(), Err(Error::Materialization(_))));
    }

    #[test]
    fn failure_mid_iteration_stops_the_terminal() {
        let sequence = Sequence::new(|| {
            Ok(vec![
                Ok(1),
                Err(Error::materialization("truncated")),
                Ok(3),
            ])
        });
        let mut seen = vec![];
        let result = sequence.for_each(|x| seen.push(x));
        assert!(matches!(result, Err(Error::Materialization(_))));
        assert_eq!(seen, [1]);
    }

    #[test]
    fn successors_generates_until_none() {
        let powers = Sequence::successors(1u32, |n| n.checked_mul(10).filter(|n| *n < 10_000));
        assert_eq!(powers.to_list().unwrap(), [1, 10, 100, 1_000]);
    }

    #[test]
    fn terminals_agree() {
        let sequence = Sequence::of(1..=4);
        assert_eq!(sequence.fold(0, |acc, x| acc + x).unwrap(), 10);
        assert_eq!(sequence.len().unwrap(), 4);
        assert_eq!(sequence.first().unwrap(), Some(1));
        assert_eq!(&*sequence.to_array().unwrap(), &[1, 2, 3, 4]);
        assert!(!sequence.is_empty().unwrap());
        assert!(Sequence::<u8>::empty().is_empty().unwrap());
    }

    #[test]
    fn try_for_each_reports_operator_failures() {
        let result = Sequence::of(1..10).try_for_each(|x| {
            if x == 3 {
                Err("three")
            } else {
                Ok(())
            }
        });
        assert!(matches!(result, Err(Error::Operator(_))));
    }

    #[test]
    fn absent_nested_sequence_is_empty() {
        let absent: Option<Sequence<i32>> = None;
        assert!(Sequence::from(absent).to_list().unwrap().is_empty());
    }
}
