//! Representation of a single directory entry
//!
//! One entry corresponds to one logical line in the `directory` section of an
//! xsdir file, with any `+` continuations already joined.

// internal modules
use crate::utils::*;
use crate::xsdir::{classify, Category};

// standard library
use std::path::{Path, PathBuf};

// external crates
use serde::Serialize;

/// Storage format of the referenced data file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileType {
    /// Type 1, formatted ASCII where the address is a line number
    Ascii,
    /// Type 2, unformatted binary where the address is a record number
    Binary,
}

impl FileType {
    /// Interpret the xsdir integer code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(FileType::Ascii),
            2 => Some(FileType::Binary),
            _ => None,
        }
    }
}

/// A single data table listed in the directory
///
/// Fields follow the column order of an xsdir line:
///
/// ```text
/// zaid  awr  filename  access  type  address  length  [reclen  per_record  temperature  ptable]
/// ```
///
/// The `library_type` is derived from the ZAID while parsing so that it is
/// never out of sync with the identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// Full table identifier, e.g. `1001.80c`
    pub zaid: String,
    /// Trailing letters of the ZAID suffix, e.g. `c` or `nc`
    pub library_type: String,
    /// Atomic weight ratio
    pub awr: f64,
    /// Data file path as written in the directory
    pub filename: String,
    /// Access route, `None` for the usual `0`
    pub access: Option<String>,
    /// ASCII or binary data file
    pub file_type: FileType,
    /// Starting line (ASCII) or record (binary) of the table
    pub address: u64,
    /// Length of the table in words
    pub table_length: u64,
    /// Record length, 0 for ASCII files
    pub record_length: u64,
    /// Entries per record, 0 for ASCII files
    pub entries_per_record: u64,
    /// Temperature in MeV
    pub temperature: f64,
    /// Probability tables present
    pub ptable: bool,
    /// Line number of the entry in the directory file
    pub line: usize,
}

impl Entry {
    /// Identifier text before the `.`, e.g. `1001` or `lwtr`
    ///
    /// ```rust
    /// # use xslist::readers::XsdirReader;
    /// let entries = XsdirReader::new()
    ///     .parse_entries("lwtr.20t 0.999167 tmccs 0 1 1 100")
    ///     .unwrap()
    ///     .entries;
    /// assert_eq!(entries[0].za(), "lwtr");
    /// ```
    pub fn za(&self) -> &str {
        self.zaid.split('.').next().unwrap_or_default()
    }

    /// Numeric ZA, `None` for named tables such as S(a,b) data
    pub fn za_number(&self) -> Option<u32> {
        self.za().parse().ok()
    }

    /// Proton number Z, where the ZA is numeric
    pub fn z(&self) -> Option<u32> {
        self.za_number().map(|za| za / 1000)
    }

    /// Mass number A, where the ZA is numeric
    pub fn a(&self) -> Option<u32> {
        self.za_number().map(|za| za % 1000)
    }

    /// Full suffix after the `.`, e.g. `80c`
    pub fn suffix(&self) -> &str {
        self.zaid.split_once('.').map(|(_, s)| s).unwrap_or_default()
    }

    /// Evaluation/library number, e.g. `80` for `1001.80c`
    pub fn library_number(&self) -> &str {
        let suffix = self.suffix();
        suffix.trim_end_matches(|c: char| c.is_ascii_alphabetic())
    }

    /// Data category from the library type
    pub fn category(&self) -> Category {
        classify(&self.library_type)
    }

    /// Top level data library, taken as the first component of the filename
    ///
    /// e.g. `endf71x` for `endf71x/H/1001.710nc`
    pub fn library(&self) -> PathBuf {
        Path::new(&self.filename)
            .components()
            .find(|c| matches!(c, std::path::Component::Normal(_)))
            .map(|c| PathBuf::from(c.as_os_str()))
            .unwrap_or_else(|| PathBuf::from(&self.filename))
    }

    /// Temperature in Kelvin, rounded to 0.1 K
    pub fn temperature_kelvin(&self) -> f64 {
        mev_to_kelvin(self.temperature)
    }

    /// Location of the data file given the data path
    ///
    /// Absolute filenames are used as-is, otherwise the access route (if any)
    /// is placed between the data path and the filename.
    pub fn data_file(&self, datapath: &Path) -> PathBuf {
        let filename = Path::new(&self.filename);
        if filename.is_absolute() {
            return filename.to_path_buf();
        }
        match &self.access {
            Some(route) => datapath.join(route).join(filename),
            None => datapath.join(filename),
        }
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:<14}{:>12.6}{:>10.1}  {:<6}{:>9}  {}",
            self.zaid,
            self.awr,
            self.temperature_kelvin(),
            self.library_type,
            self.address,
            self.filename
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entry(zaid: &str, library_type: &str, filename: &str) -> Entry {
        Entry {
            zaid: zaid.to_string(),
            library_type: library_type.to_string(),
            awr: 0.999167,
            filename: filename.to_string(),
            access: None,
            file_type: FileType::Ascii,
            address: 1,
            table_length: 100,
            record_length: 0,
            entries_per_record: 0,
            temperature: 2.5301e-08,
            ptable: false,
            line: 1,
        }
    }

    #[rstest]
    #[case("1001.80c", "1001", "80c", "80")]
    #[case("92235.710nc", "92235", "710nc", "710")]
    #[case("lwtr.20t", "lwtr", "20t", "20")]
    fn identifier_parts(
        #[case] zaid: &str,
        #[case] za: &str,
        #[case] suffix: &str,
        #[case] number: &str,
    ) {
        let e = entry(zaid, "c", "f");
        assert_eq!(e.za(), za);
        assert_eq!(e.suffix(), suffix);
        assert_eq!(e.library_number(), number);
    }

    #[test]
    fn nuclide_numbers() {
        let e = entry("92235.80c", "c", "f");
        assert_eq!(e.z(), Some(92));
        assert_eq!(e.a(), Some(235));
        assert_eq!(entry("lwtr.20t", "t", "f").za_number(), None);
    }

    #[test]
    fn library_is_first_component() {
        let e = entry("1001.710nc", "nc", "endf71x/H/1001.710nc");
        assert_eq!(e.library(), PathBuf::from("endf71x"));
        assert_eq!(entry("1001.80c", "c", "endf70a").library(), PathBuf::from("endf70a"));
    }

    #[test]
    fn data_file_uses_access_route() {
        let mut e = entry("1001.80c", "c", "endf70a");
        assert_eq!(e.data_file(Path::new("/data")), PathBuf::from("/data/endf70a"));
        e.access = Some("extra".to_string());
        assert_eq!(
            e.data_file(Path::new("/data")),
            PathBuf::from("/data/extra/endf70a")
        );
        e.filename = "/abs/endf70a".to_string();
        assert_eq!(e.data_file(Path::new("/data")), PathBuf::from("/abs/endf70a"));
    }

    #[test]
    fn kelvin_conversion() {
        assert_eq!(entry("1001.80c", "c", "f").temperature_kelvin(), 293.6);
    }
}
