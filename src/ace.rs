//! Module for the headers of ACE data tables
//!
//! Every directory entry points at a table in an ACE file. Only the header
//! and the leading part of the XSS array are ever needed to describe what a
//! table contains, so that is all that is represented here.
//!
//! ## Reading a table
//!
//! Tables are read through the readers module, either directly from a path
//! and line number or from a directory [Entry](crate::xsdir::Entry).
//!
//! ```rust
//! # use xslist::readers::AceReader;
//! let table = AceReader::new().parse("./data/ace/sample.ace".as_ref()).unwrap();
//! assert_eq!(table.header.zaid, "1001.80c");
//! ```
//!
//! Continuous-energy neutron tables can be summarised further into
//! [NeutronMetadata], the same columns the data listings have always shown.

// internal modules
use crate::utils::*;

// external crates
use anyhow::{anyhow, Result};
use serde::Serialize;

/// Representation of the header of an ACE table
///
/// Both the legacy and the 2.0 header styles are supported. For the legacy
/// style the first two lines are
///
/// ```text
/// <zaid> <awr> <temperature> <date>
/// <comment (70 characters)><mat>
/// ```
///
/// and for the 2.0 style
///
/// ```text
/// <version> <zaid> <source>
/// <awr> <temperature> <date> <n comment lines>
/// <comment line 1>
/// ...
/// ```
///
/// Both are followed by four lines of IZ/AW pairs, two lines of NXS and four
/// lines of JXS integers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AceHeader {
    /// Format version of a 2.0 style header
    pub version: Option<String>,
    /// Table identifier
    pub zaid: String,
    /// Evaluation source of a 2.0 style header
    pub source: Option<String>,
    /// Atomic weight ratio
    pub awr: f64,
    /// Temperature in MeV
    pub temperature: f64,
    /// Processing date
    pub date: String,
    /// Comment text, lines joined by newlines
    pub comment: String,
    /// Material identifier of a legacy header
    pub mat: String,
    /// IZ/AW pairs, mostly zero
    pub izaw: Vec<(i64, f64)>,
    /// NXS array, 16 values
    pub nxs: Vec<i64>,
    /// JXS array, 32 values
    pub jxs: Vec<i64>,
}

impl AceHeader {
    /// NXS value using the 1-based index of the ACE documentation
    pub fn nxs(&self, index: usize) -> i64 {
        index
            .checked_sub(1)
            .and_then(|i| self.nxs.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// JXS value using the 1-based index of the ACE documentation
    pub fn jxs(&self, index: usize) -> i64 {
        index
            .checked_sub(1)
            .and_then(|i| self.jxs.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// True for the 2.0 header style
    pub fn is_new_style(&self) -> bool {
        self.version.is_some()
    }

    /// Length of the XSS array, NXS(1)
    pub fn xss_length(&self) -> usize {
        usize::try_from(self.nxs(1)).unwrap_or(0)
    }

    /// Temperature in Kelvin, rounded to 0.1 K
    pub fn temperature_kelvin(&self) -> f64 {
        mev_to_kelvin(self.temperature)
    }
}

impl std::fmt::Display for AceHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "AceHeader {\n".to_string();
        if let Some(version) = &self.version {
            s += &f!("    version: {version}\n");
        }
        s += &f!("    zaid: {}\n", self.zaid);
        if let Some(source) = &self.source {
            s += &f!("    source: {source}\n");
        }
        s += &f!("    awr: {}\n", self.awr);
        s += &f!(
            "    temperature: {} MeV ({} K)\n",
            self.temperature.sci(4, 2),
            self.temperature_kelvin()
        );
        s += &f!("    date: {}\n", self.date);
        if !self.mat.is_empty() {
            s += &f!("    mat: {}\n", self.mat);
        }
        s += &f!("    xss length: {}\n}}", self.xss_length());
        write!(f, "{}", s)
    }
}

/// A table header with all, some, or none of its XSS array
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AceTable {
    /// Header information
    pub header: AceHeader,
    /// Leading part of the XSS array, possibly empty
    pub xss: Vec<f64>,
}

impl AceTable {
    /// XSS value using the 1-based index of the ACE documentation
    pub fn xss(&self, index: usize) -> Option<f64> {
        index.checked_sub(1).and_then(|i| self.xss.get(i)).copied()
    }
}

/// How the fission nubar data is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Nubar {
    /// No nubar data
    None,
    /// Either prompt or total nubar
    Single,
    /// Both prompt and total nubar
    Both,
}

impl std::fmt::Display for Nubar {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Nubar::None => "no",
            Nubar::Single => "nubar",
            Nubar::Both => "both",
        };
        write!(f, "{s}")
    }
}

/// Summary of a continuous-energy neutron table
///
/// | Field                  | Source                        |
/// | ---------------------- | ----------------------------- |
/// | `length`               | NXS(1)                        |
/// | `energies`             | NXS(3)                        |
/// | `emax`                 | XSS(JXS(1) + NXS(3) - 1)      |
/// | `photon_production`    | JXS(12) or JXS(13) non-zero   |
/// | `nubar`                | JXS(2) and the sign of XSS(JXS(2)) |
/// | `charged_particles`    | NXS(7) > 0                    |
/// | `delayed_neutrons`     | JXS(24) > 0                   |
/// | `unresolved_resonance` | JXS(23) > 0                   |
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NeutronMetadata {
    /// Length of the XSS array
    pub length: usize,
    /// Number of points on the energy grid
    pub energies: usize,
    /// Highest energy on the grid in MeV
    pub emax: f64,
    /// Gamma production data present
    pub photon_production: bool,
    /// Form of the nubar data
    pub nubar: Nubar,
    /// Secondary charged particle data present
    pub charged_particles: bool,
    /// Delayed neutron data present
    pub delayed_neutrons: bool,
    /// Unresolved resonance probability tables present
    pub unresolved_resonance: bool,
}

impl NeutronMetadata {
    /// Number of XSS values needed to derive the metadata
    ///
    /// Fails when the header locators overflow, which only a corrupt table
    /// can produce.
    pub fn xss_required(header: &AceHeader) -> Result<usize> {
        let last_energy = Self::last_energy(header)?;
        let nubar = header.jxs(2);
        Ok(usize::try_from(last_energy.max(nubar).max(0)).unwrap_or(0))
    }

    /// XSS index of the highest energy, JXS(1) + NXS(3) - 1
    fn last_energy(header: &AceHeader) -> Result<i64> {
        header
            .jxs(1)
            .checked_add(header.nxs(3))
            .and_then(|i| i.checked_sub(1))
            .ok_or_else(|| {
                anyhow!(
                    "Energy grid of {} overflows (JXS(1) = {}, NXS(3) = {})",
                    header.zaid,
                    header.jxs(1),
                    header.nxs(3)
                )
            })
    }

    /// Derive the summary from a table read with enough of its XSS array
    pub fn from_table(table: &AceTable) -> Result<Self> {
        let header = &table.header;
        let energies = usize::try_from(header.nxs(3))
            .map_err(|_| anyhow!("Invalid number of energies {}", header.nxs(3)))?;

        let emax_index = usize::try_from(Self::last_energy(header)?).unwrap_or(0);
        let emax = table
            .xss(emax_index)
            .ok_or_else(|| anyhow!("XSS({emax_index}) not available for {}", header.zaid))?;

        let nubar = match usize::try_from(header.jxs(2)) {
            Ok(0) | Err(_) => Nubar::None,
            Ok(index) => {
                let knu = table
                    .xss(index)
                    .ok_or_else(|| anyhow!("XSS({index}) not available for {}", header.zaid))?;
                // a negative flag means both prompt and total are given
                if knu > 0.0 {
                    Nubar::Single
                } else {
                    Nubar::Both
                }
            }
        };

        Ok(Self {
            length: header.xss_length(),
            energies,
            emax,
            photon_production: header.jxs(12) != 0 || header.jxs(13) != 0,
            nubar,
            charged_particles: header.nxs(7) > 0,
            delayed_neutrons: header.jxs(24) > 0,
            unresolved_resonance: header.jxs(23) > 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(nxs: &[(usize, i64)], jxs: &[(usize, i64)]) -> AceHeader {
        let mut h = AceHeader {
            version: None,
            zaid: "92235.80c".to_string(),
            source: None,
            awr: 233.0248,
            temperature: 2.5301e-08,
            date: "12/17/12".to_string(),
            comment: String::new(),
            mat: "mat9228".to_string(),
            izaw: vec![(0, 0.0); 16],
            nxs: vec![0; 16],
            jxs: vec![0; 32],
        };
        nxs.iter().for_each(|&(i, v)| h.nxs[i - 1] = v);
        jxs.iter().for_each(|&(i, v)| h.jxs[i - 1] = v);
        h
    }

    #[test]
    fn one_based_indexing() {
        let h = header(&[(1, 100), (3, 4)], &[(1, 1)]);
        assert_eq!(h.nxs(1), 100);
        assert_eq!(h.nxs(3), 4);
        assert_eq!(h.nxs(0), 0);
        assert_eq!(h.nxs(17), 0);
        assert_eq!(h.jxs(1), 1);
        assert_eq!(h.xss_length(), 100);
    }

    #[test]
    fn required_xss_covers_nubar() {
        let h = header(&[(3, 4)], &[(1, 1), (2, 21)]);
        assert_eq!(NeutronMetadata::xss_required(&h).unwrap(), 21);
        let h = header(&[(3, 4)], &[(1, 1)]);
        assert_eq!(NeutronMetadata::xss_required(&h).unwrap(), 4);
    }

    #[test]
    fn overflowing_locators_are_an_error() {
        let h = header(&[(3, 2)], &[(1, i64::MAX)]);
        assert!(NeutronMetadata::xss_required(&h).is_err());

        let table = AceTable {
            header: h,
            xss: vec![1.0, 2.0],
        };
        assert!(NeutronMetadata::from_table(&table).is_err());

        let h = header(&[(3, i64::MIN)], &[(1, 0)]);
        assert!(NeutronMetadata::xss_required(&h).is_err());
    }

    #[test]
    fn fissile_metadata() {
        let h = header(
            &[(1, 30), (3, 2), (7, 1)],
            &[(1, 1), (2, 11), (12, 12), (23, 13), (24, 14)],
        );
        let mut xss = vec![0.0; 11];
        xss[0] = 1e-11;
        xss[1] = 20.0;
        xss[10] = -5.0;
        let meta = NeutronMetadata::from_table(&AceTable { header: h, xss }).unwrap();
        assert_eq!(meta.length, 30);
        assert_eq!(meta.energies, 2);
        assert_eq!(meta.emax, 20.0);
        assert_eq!(meta.nubar, Nubar::Both);
        assert!(meta.photon_production);
        assert!(meta.charged_particles);
        assert!(meta.delayed_neutrons);
        assert!(meta.unresolved_resonance);
    }

    #[test]
    fn short_xss_is_an_error() {
        let h = header(&[(3, 5)], &[(1, 1)]);
        let table = AceTable {
            header: h,
            xss: vec![1.0, 2.0],
        };
        assert!(NeutronMetadata::from_table(&table).is_err());
    }
}
