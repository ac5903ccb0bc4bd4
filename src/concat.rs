use crate::Observable;

/// Concatenates the values of multiple event streams.
///
/// Starts one stream at a time: waits for the previous one to complete before subscribing to the
/// next.
///
/// # Examples
///
/// ```
/// use seqflow::{concat, Observable};
///
/// let source = concat![Observable::of(["10", "20", "30"]), Observable::of(["a", "b"])];
///
/// assert_eq!(source.to_list().unwrap(), ["10", "20", "30", "a", "b"]);
/// ```
#[macro_export]
macro_rules! concat {
    ($($s:expr),* $(,)?) => {
        $crate::Observable::concat(::std::vec![$($s),*])
    };
}

impl<T: 'static> Observable<T> {
    /// Concatenates the given streams in order.
    ///
    /// This is [`flatten`](Observable::flatten) over a finite stream emitting exactly those
    /// streams, so an error in any of them ends the whole stream and later ones never start.
    pub fn concat<I>(sources: I) -> Observable<T>
    where
        I: IntoIterator<Item = Observable<T>>,
    {
        let sources: Vec<Observable<T>> = sources.into_iter().collect();
        Observable::of(sources).flatten()
    }

    /// This stream followed by `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqflow::Observable;
    ///
    /// let header = Observable::of(["id,name"]);
    /// let rows = Observable::of(["1,ada", "2,alan"]);
    ///
    /// assert_eq!(
    ///     header.concat_with(&rows).to_list().unwrap(),
    ///     ["id,name", "1,ada", "2,alan"]
    /// );
    /// ```
    pub fn concat_with(&self, other: &Observable<T>) -> Observable<T> {
        Observable::concat([self.clone(), other.clone()])
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    pub fn prepend(&self, value: T) -> Observable<T> {
        Observable::concat([Observable::just(value), self.clone()])
    }

    pub fn append(&self, value: T) -> Observable<T> {
        Observable::concat([self.clone(), Observable::just(value)])
    }
}
