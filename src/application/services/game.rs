//! Game record service
//!
//! Loads and saves SGF files and validates whole directories of them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{parse_with, to_sgf, GameTree, ParseMode};
use crate::infrastructure::traits::FileSystem;
use crate::util::path::PathExt;

/// Shape of a parsed game tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameStats {
    /// Games in the collection
    pub games: usize,
    /// Total nodes over all games
    pub nodes: usize,
    /// Longest root-to-leaf path
    pub depth: usize,
    /// Number of leaves, i.e. complete variations
    pub variations: usize,
    /// Nodes on the first game's main line
    pub main_line: usize,
}

impl GameStats {
    pub fn of(tree: &GameTree) -> Self {
        Self {
            games: tree.roots().len(),
            nodes: tree.len(),
            depth: tree.depth(),
            variations: tree.leaf_count(),
            main_line: tree.main_line().len(),
        }
    }
}

/// Result of checking one file.
#[derive(Debug)]
pub struct CheckReport {
    pub path: PathBuf,
    pub result: ApplicationResult<GameStats>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Service for reading and writing SGF game records.
pub struct GameService {
    fs: Arc<dyn FileSystem>,
    mode: ParseMode,
}

impl GameService {
    /// Create a new game service.
    pub fn new(fs: Arc<dyn FileSystem>, mode: ParseMode) -> Self {
        Self { fs, mode }
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Read a UTF-8 SGF file and parse it with the configured mode.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<GameTree> {
        self.load_with(path, self.mode)
    }

    fn load_with(&self, path: &Path, mode: ParseMode) -> ApplicationResult<GameTree> {
        let text = self
            .fs
            .read_to_string(path)
            .with_path_context("read game record", path)?;
        debug!("load: {} bytes from {}", text.len(), path.display());
        parse_with(&text, mode).map_err(|source| ApplicationError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialize a game tree and write it as UTF-8.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn save(&self, tree: &GameTree, path: &Path) -> ApplicationResult<()> {
        let text = to_sgf(tree);
        self.fs
            .ensure_parent(path)
            .with_path_context("create directory for", path)?;
        self.fs
            .write(path, &text)
            .with_path_context("write game record", path)?;
        debug!("save: {} bytes to {}", text.len(), path.display());
        Ok(())
    }

    /// Load and re-serialize a file into canonical SGF text.
    pub fn normalize(&self, path: &Path) -> ApplicationResult<String> {
        Ok(to_sgf(&self.load(path)?))
    }

    /// Strictly parse a single file, or every `.sgf` file below a directory.
    ///
    /// Files are parsed in parallel; reports come back sorted by path.
    #[instrument(level = "debug", skip(self))]
    pub fn check(&self, path: &Path) -> ApplicationResult<Vec<CheckReport>> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::FileNotFound(path.to_path_buf()));
        }

        let files: Vec<PathBuf> = if self.fs.is_dir(path) {
            self.fs
                .list_files(path)
                .with_path_context("list directory", path)?
                .into_iter()
                .filter(|p| p.is_sgf_file())
                .collect()
        } else {
            vec![path.to_path_buf()]
        };
        debug!("check: {} file(s)", files.len());

        let mut reports: Vec<CheckReport> = files
            .into_par_iter()
            .map(|file| {
                let result = self
                    .load_with(&file, ParseMode::Strict)
                    .map(|tree| GameStats::of(&tree));
                CheckReport { path: file, result }
            })
            .collect();
        reports.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(reports)
    }
}
