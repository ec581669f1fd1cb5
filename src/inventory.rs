//! Checks against the data files a listing refers to
//!
//! Everything here is read-only and runs in parallel over the entries. Results
//! always come back in the same order as [Listing::entries], one per entry, so
//! the order of completion never leaks into what the caller sees.
//!
//! ```rust
//! # use xslist::{inventory, read_xsdir};
//! let xsdir = read_xsdir("./data/xsdir").unwrap();
//! let datapath = xsdir.data_directory();
//! let listing = xsdir.into_listing();
//!
//! let checks = inventory::check_files(&listing, &datapath);
//! assert_eq!(checks.len(), listing.len());
//! ```

// internal modules
use crate::ace::NeutronMetadata;
use crate::readers::{AceReader, XssMode};
use crate::xsdir::{Category, Entry, FileType, Listing};

// standard library
use std::path::{Path, PathBuf};

// external crates
use anyhow::Result;
use log::{debug, warn};
use rayon::prelude::*;

/// Whether the data file of an entry could be found
#[derive(Debug, Clone, PartialEq)]
pub struct FileCheck {
    /// Where the data file was expected
    pub path: PathBuf,
    /// True if a file exists at `path`
    pub exists: bool,
}

/// Look for the data file of every entry
pub fn check_files(listing: &Listing, datapath: &Path) -> Vec<FileCheck> {
    debug!(
        "Checking {} data files under {}",
        listing.len(),
        datapath.display()
    );

    let checks: Vec<FileCheck> = listing
        .entries()
        .par_iter()
        .map(|entry| {
            let path = entry.data_file(datapath);
            FileCheck {
                exists: path.is_file(),
                path,
            }
        })
        .collect();

    let missing = checks.iter().filter(|c| !c.exists).count();
    if missing > 0 {
        warn!("{missing} of {} data files not found", checks.len());
    }

    checks
}

/// Entries whose data file does not exist, in file order
pub fn missing_files<'a>(listing: &'a Listing, datapath: &Path) -> Vec<(&'a Entry, PathBuf)> {
    listing
        .entries()
        .iter()
        .zip(check_files(listing, datapath))
        .filter(|(_, check)| !check.exists)
        .map(|(entry, check)| (entry, check.path))
        .collect()
}

/// Read the metadata of the selected continuous-energy neutron tables
///
/// The result has one element per entry, and `selected` is given the index of
/// each one. Entries that are not selected, of other categories, or stored in
/// binary files are `None` and their files are never opened.
///
/// ```rust
/// # use xslist::{inventory, read_xsdir};
/// let xsdir = read_xsdir("./data/xsdir").unwrap();
/// let datapath = xsdir.data_directory();
/// let listing = xsdir.into_listing();
///
/// // only the first table is read
/// let metadata = inventory::collect_metadata(&listing, &datapath, |i| i == 0);
/// assert!(metadata[0].is_some());
/// assert!(metadata[1].is_none());
/// ```
pub fn collect_metadata<F>(
    listing: &Listing,
    datapath: &Path,
    selected: F,
) -> Vec<Option<Result<NeutronMetadata>>>
where
    F: Fn(usize) -> bool + Sync,
{
    debug!("Collecting neutron metadata");

    (0..listing.len())
        .into_par_iter()
        .map(|index| {
            let entry = &listing.entries()[index];
            let wanted = selected(index)
                && listing.category_of(index) == Some(Category::ContinuousEnergyNeutron)
                && entry.file_type == FileType::Ascii;
            wanted.then(|| neutron_metadata(entry, datapath))
        })
        .collect()
}

/// Read the metadata for a single entry
pub fn neutron_metadata(entry: &Entry, datapath: &Path) -> Result<NeutronMetadata> {
    let mut reader = AceReader::new();
    reader.set_xss_mode(XssMode::Metadata);
    let table = reader.parse_entry(entry, datapath)?;
    NeutronMetadata::from_table(&table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::XsdirReader;

    fn data() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    fn listing() -> Listing {
        let mut reader = XsdirReader::new();
        reader.disable_progress();
        reader.parse(&data().join("xsdir")).unwrap().into_listing()
    }

    #[test]
    fn file_checks_follow_entry_order() {
        let listing = listing();
        let checks = check_files(&listing, &data());
        let found: Vec<bool> = checks.iter().map(|c| c.exists).collect();
        assert_eq!(found, [true, true, true, false, false, false, false, false]);
    }

    #[test]
    fn missing_are_reported_with_paths() {
        let listing = listing();
        let missing = missing_files(&listing, &data());
        assert_eq!(missing.len(), 5);
        assert_eq!(missing[0].0.zaid, "lwtr.20t");
        assert_eq!(missing[0].1, data().join("tmccs"));
    }

    #[test]
    fn metadata_only_for_neutron_tables() {
        let listing = listing();
        let metadata = collect_metadata(&listing, &data(), |_| true);
        assert_eq!(metadata.len(), listing.len());

        let h1 = metadata[0].as_ref().unwrap().as_ref().unwrap();
        assert_eq!(h1.energies, 3);
        assert_eq!(h1.emax, 20.0);

        let u235 = metadata[1].as_ref().unwrap().as_ref().unwrap();
        assert!(u235.charged_particles);

        // thermal and photon tables are not read
        assert!(metadata[3].is_none());
        assert!(metadata[4].is_none());

        // neutron table with no file on disk
        assert!(metadata[5].as_ref().unwrap().is_err());
    }

    #[test]
    fn metadata_only_for_selected_entries() {
        let listing = listing();
        let metadata = collect_metadata(&listing, &data(), |i| i == 0 || i == 3);
        assert_eq!(metadata.len(), listing.len());

        assert!(metadata[0].as_ref().unwrap().is_ok());

        // unselected neutron tables are left alone, even the missing ones
        assert!(metadata[1].is_none());
        assert!(metadata[5].is_none());
        assert!(metadata[6].is_none());

        // selection does not override the category
        assert!(metadata[3].is_none());
    }
}
