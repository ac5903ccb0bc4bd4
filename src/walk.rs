//! Recursive file-tree listing.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{utils::tracing::trace, Result, Sequence};

type PathPredicate = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Lists a directory tree, depth first, as a [`Sequence`] of paths.
///
/// Every path is followed by the listing of its children if it is a directory the walk descends
/// into. Children are visited in file name order. Symbolic links are listed but not followed.
///
/// # Examples
///
/// ```no_run
/// use seqflow::walk::Walk;
///
/// let sources = Walk::new("src")
///     .descend_into(|dir| !dir.ends_with("target"))
///     .filter(|path| path.extension().map_or(false, |ext| ext == "rs"))
///     .sequence();
///
/// for path in sources.to_list()? {
///     println!("{}", path.display());
/// }
/// # Ok::<(), seqflow::Error>(())
/// ```
#[derive(Clone)]
pub struct Walk {
    root: PathBuf,
    options: Arc<Options>,
    filter: Option<PathPredicate>,
}

#[derive(Clone)]
struct Options {
    descend_into: Option<PathPredicate>,
    max_depth: Option<usize>,
}

impl Walk {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Walk {
            root: root.into(),
            options: Arc::new(Options {
                descend_into: None,
                max_depth: None,
            }),
            filter: None,
        }
    }

    /// Only descends into directories accepted by `predicate`. The root is always listed.
    pub fn descend_into<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.options).descend_into = Some(Arc::new(predicate));
        self
    }

    /// Only yields paths accepted by `predicate`. Rejected directories are still descended into.
    pub fn filter<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(predicate));
        self
    }

    /// Limits how deep the walk goes; `0` lists the root alone.
    pub fn max_depth(mut self, depth: usize) -> Self {
        Arc::make_mut(&mut self.options).max_depth = Some(depth);
        self
    }

    /// The listing. Every consumption walks the file system afresh.
    pub fn sequence(&self) -> Sequence<PathBuf> {
        let tree = tree(self.root.clone(), 0, Arc::clone(&self.options));
        match &self.filter {
            Some(filter) => {
                let filter = Arc::clone(filter);
                tree.filter(move |path| filter(path))
            },
            None => tree,
        }
    }
}

impl fmt::Debug for Walk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Walk")
            .field("root", &self.root)
            .field("max_depth", &self.options.max_depth)
            .finish()
    }
}

fn tree(path: PathBuf, depth: usize, options: Arc<Options>) -> Sequence<PathBuf> {
    let children = Sequence::new({
        let path = path.clone();
        let options = Arc::clone(&options);
        move || list_dir(&path, depth, &options).map(|entries| entries.into_iter().map(Ok))
    })
    .flat_map(move |child| tree(child, depth + 1, Arc::clone(&options)));
    Sequence::once(path).concat(&children)
}

fn list_dir(path: &Path, depth: usize, options: &Options) -> Result<Vec<PathBuf>> {
    if options.max_depth.map_or(false, |max| depth >= max) {
        return Ok(Vec::new());
    }
    if !fs::symlink_metadata(path)?.is_dir() {
        return Ok(Vec::new());
    }
    if let Some(descend_into) = &options.descend_into {
        if depth > 0 && !descend_into(path) {
            return Ok(Vec::new());
        }
    }
    trace!(path = %path.display(), depth, "listing directory");
    let mut entries = fs::read_dir(path)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}
