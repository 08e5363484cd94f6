use crate::areas::index::IndexFile;
use crate::artifacts::index::options::DecodeOptions;
use crate::artifacts::index::staging_index::Index;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Where the index lives and how to read it
///
/// Commands print through `writer`, so tests can capture their output.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index_file: IndexFile,
    options: DecodeOptions,
}

impl Repository {
    /// Open the repository at `path`
    ///
    /// The index defaults to `<path>/.git/index`; `index_path` overrides it
    /// and is taken relative to `path` when not absolute.
    pub fn new(
        path: &str,
        index_path: Option<PathBuf>,
        options: DecodeOptions,
        writer: Box<dyn std::io::Write>,
    ) -> anyhow::Result<Self> {
        let path = Path::new(path).canonicalize()?;
        let index_path = match index_path {
            Some(index_path) => path.join(index_path),
            None => path.join(".git").join("index"),
        };

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index_file: IndexFile::new(index_path.into_boxed_path()),
            options,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index_file(&self) -> &IndexFile {
        &self.index_file
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Load the index off the async runtime's worker threads
    pub async fn load_index(&self) -> anyhow::Result<Index> {
        let index_file = self.index_file.clone();
        let options = self.options.clone();

        tokio::task::spawn_blocking(move || index_file.load(&options)).await?
    }
}
