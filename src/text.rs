//! Line-oriented text files as sequences.
//!
//! Files are opened lazily, once per terminal consumption, and closed when that consumption ends,
//! whether it ran to the end, stopped early or failed.

use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{utils::tracing::trace, Error, Result, Sequence};

/// The lines of the file at `path`, without line terminators.
///
/// Nothing is opened until the sequence is consumed. Failing to open or read the file surfaces
/// as [`Error::Materialization`] from the terminal.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Sequence<String> {
    let path = path.as_ref().to_path_buf();
    Sequence::new(move || {
        trace!(path = %path.display(), "opening for reading");
        let reader = BufReader::new(File::open(&path)?);
        Ok(reader.lines().map(|line| line.map_err(Error::from)))
    })
}

/// Writes every element of `lines` to `path`, one per line, replacing any existing content.
///
/// Returns the number of lines written. The file is flushed and closed before returning, also
/// when `lines` fails part way.
pub fn write_lines<P, T>(path: P, lines: &Sequence<T>) -> Result<usize>
where
    P: AsRef<Path>,
    T: Display + 'static,
{
    let path = path.as_ref();
    let iteration = lines.iter()?;
    trace!(path = %path.display(), "opening for writing");
    let mut writer = BufWriter::new(File::create(path)?);
    let mut written = 0;
    for line in iteration {
        writeln!(writer, "{}", line?)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_consumption_rereads_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.txt");
        std::fs::write(&path, "one\ntwo\n").unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.to_list().unwrap(), ["one", "two"]);

        std::fs::write(&path, "three\n").unwrap();
        assert_eq!(lines.to_list().unwrap(), ["three"]);
    }

    #[test]
    fn missing_file_fails_on_consumption_only() {
        let dir = tempfile::tempdir().unwrap();
        let lines = read_lines(dir.path().join("absent.txt")).map(|line| line.len());
        assert!(matches!(lines.to_list(), Err(Error::Materialization(_))));
    }

    #[test]
    fn written_lines_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let written = write_lines(&path, &Sequence::of(1..=3).map(|n| n * n)).unwrap();
        assert_eq!(written, 3);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1\n4\n9\n");
    }

    #[test]
    fn failing_source_does_not_create_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.txt");
        let source: Sequence<String> = read_lines(dir.path().join("absent.txt"));

        assert!(write_lines(&path, &source).is_err());
        assert!(!path.exists());
    }
}
