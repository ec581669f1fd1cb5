// internal modules
use crate::error::Error;
use crate::utils::*;
use crate::xsdir::{Entry, Listing};

// standard library
use std::path::{Path, PathBuf};

/// Everything extracted from an xsdir file
///
/// The directory entries are kept in file order. Lines that could not be
/// parsed in a non-strict read are kept in `skipped` so that the caller can
/// report them, while the rest of the data remains usable.
#[derive(Debug, Default)]
pub struct Xsdir {
    /// Path the file was read from, if it came from disk
    pub source: Option<PathBuf>,
    /// Value of the optional `datapath=` line
    pub datapath: Option<PathBuf>,
    /// Atomic weight ratios as (ZA, AWR) in file order
    pub atomic_weight_ratios: Vec<(u32, f64)>,
    /// Directory entries in file order
    pub entries: Vec<Entry>,
    /// Malformed lines passed over in a non-strict read
    pub skipped: Vec<Error>,
}

impl Xsdir {
    /// Build the classified [Listing] from the entries
    ///
    /// The entries are cloned so that the document can still be inspected,
    /// see [Xsdir::into_listing] to avoid the copy.
    pub fn listing(&self) -> Listing {
        Listing::build(self.entries.clone())
    }

    /// Consume the document into a [Listing]
    pub fn into_listing(self) -> Listing {
        Listing::build(self.entries)
    }

    /// Atomic weight ratio for a ZA from the header table
    pub fn awr(&self, za: u32) -> Option<f64> {
        self.atomic_weight_ratios
            .iter()
            .find(|(z, _)| *z == za)
            .map(|(_, awr)| *awr)
    }

    /// Directory that data file names are relative to
    ///
    /// Uses the `datapath=` line when present, falling back to the directory
    /// containing the xsdir file, then the working directory. A relative
    /// `datapath=` is taken relative to the xsdir file.
    pub fn data_directory(&self) -> PathBuf {
        let parent = self
            .source
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        match &self.datapath {
            Some(datapath) if datapath.is_absolute() => datapath.clone(),
            Some(datapath) => parent.join(datapath),
            None => parent,
        }
    }

    /// True if any lines had to be skipped
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }
}

impl std::fmt::Display for Xsdir {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Xsdir {\n".to_string();
        if let Some(path) = &self.source {
            s += &f!("    source: {}\n", path.display());
        }
        if let Some(path) = &self.datapath {
            s += &f!("    datapath: {}\n", path.display());
        }
        s += &f!(
            "    atomic weight ratios: {}\n",
            self.atomic_weight_ratios.len()
        );
        s += &f!("    entries: {}\n", self.entries.len());
        s += &f!("    skipped lines: {}\n}}", self.skipped.len());
        write!(f, "{}", s)
    }
}
