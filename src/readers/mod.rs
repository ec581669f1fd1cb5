#![doc(hidden)]
//! Library of readers and common functions for xsdir and ACE files

// internal modules
use crate::ace::AceTable;
use crate::error::Result;
use crate::xsdir::Xsdir;

// standard library
use std::path::Path;

// files under the readers module
mod ace_file;
pub mod parsers;
mod xsdir_file;

// inline important the reader modules for a nice API
#[doc(inline)]
pub use crate::readers::ace_file::{AceReader, XssMode};

#[doc(inline)]
pub use crate::readers::xsdir_file::XsdirReader;

/// Read an xsdir file, skipping malformed lines
///
/// Returns a result containing the [Xsdir] extracted from the file at `path`.
/// Any lines that could not be parsed are logged and kept in
/// [Xsdir::skipped] rather than failing the whole read.
///
/// - `path` - Path to the xsdir file, can be [&str], [String], [Path], etc...
///
/// Example
/// ```ignore
/// // Read every entry that can be read
/// let xsdir: Xsdir = xslist::read_xsdir("path/to/xsdir")?;
/// ```
pub fn read_xsdir<P: AsRef<Path>>(path: P) -> Result<Xsdir> {
    let path: &Path = Path::new(path.as_ref());
    let mut reader = XsdirReader::new();
    reader.disable_progress();
    reader.parse(path)
}

/// Read an xsdir file, failing on the first malformed line
///
/// - `path` - Path to the xsdir file, can be [&str], [String], [Path], etc...
///
/// Example
/// ```ignore
/// // Nothing is returned unless every line is valid
/// let xsdir: Xsdir = xslist::read_xsdir_strict("path/to/xsdir")?;
/// ```
pub fn read_xsdir_strict<P: AsRef<Path>>(path: P) -> Result<Xsdir> {
    let path: &Path = Path::new(path.as_ref());
    let mut reader = XsdirReader::new();
    reader.disable_progress();
    reader.set_strict(true);
    reader.parse(path)
}

/// Read the header of the ACE table starting at `line`
///
/// - `path` - Path to the ACE file
/// - `line` - Line the table starts on, as given by the xsdir address
///
/// Example
/// ```ignore
/// // Header of the second table in a file
/// let table: AceTable = xslist::read_ace_header("path/to/endf70a", 17)?;
/// ```
pub fn read_ace_header<P: AsRef<Path>>(path: P, line: usize) -> anyhow::Result<AceTable> {
    let path: &Path = Path::new(path.as_ref());
    let mut reader = AceReader::new();
    reader.set_start_line(line);
    reader.parse(path)
}
