//! Classification of data tables by library type
//!
//! The library type is the trailing letters of a ZAID suffix, e.g. `c` for
//! `1001.80c` or `nc` for `1001.710nc`. Every type maps to exactly one
//! [Category] through a fixed table, falling back to [Category::Unknown] so
//! that new suffixes never break a listing.

// standard library
use std::fmt;

// external crates
use serde::Serialize;

/// Data category of a table
///
/// | Category                  | Library types    |
/// | ------------------------- | ---------------- |
/// | `ContinuousEnergyNeutron` | c, nc            |
/// | `DiscreteEnergyNeutron`   | d                |
/// | `ThermalScattering`       | t                |
/// | `CoupledNeutronPhoton`    | m                |
/// | `Photoatomic`             | p                |
/// | `Photonuclear`            | u                |
/// | `Dosimetry`               | y                |
/// | `Electron`                | e                |
/// | `Proton`                  | h                |
/// | `ChargedParticle`         | o, r, s, a       |
/// | `Unknown`                 | anything else    |
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, clap::ValueEnum,
)]
pub enum Category {
    /// Continuous-energy neutron
    #[value(alias = "c", alias = "nc")]
    ContinuousEnergyNeutron,
    /// Discrete-energy neutron
    #[value(alias = "d")]
    DiscreteEnergyNeutron,
    /// Thermal S(a,b) scattering
    #[value(alias = "t")]
    ThermalScattering,
    /// Coupled neutron-photon multigroup
    #[value(alias = "m")]
    CoupledNeutronPhoton,
    /// Continuous-energy photoatomic
    #[value(alias = "p")]
    Photoatomic,
    /// Photonuclear
    #[value(alias = "u")]
    Photonuclear,
    /// Neutron dosimetry
    #[value(alias = "y")]
    Dosimetry,
    /// Electron
    #[value(alias = "e")]
    Electron,
    /// Proton
    #[value(alias = "h")]
    Proton,
    /// Deuteron, triton, helium-3 and alpha
    ChargedParticle,
    /// Anything not in the table
    Unknown,
}

impl Category {
    /// The fixed library type table
    ///
    /// Two-letter types come first so they are always seen before any single
    /// letter that could also apply.
    pub const TABLE: [(&'static str, Category); 14] = [
        ("nc", Category::ContinuousEnergyNeutron),
        ("c", Category::ContinuousEnergyNeutron),
        ("d", Category::DiscreteEnergyNeutron),
        ("t", Category::ThermalScattering),
        ("m", Category::CoupledNeutronPhoton),
        ("p", Category::Photoatomic),
        ("u", Category::Photonuclear),
        ("y", Category::Dosimetry),
        ("e", Category::Electron),
        ("h", Category::Proton),
        ("o", Category::ChargedParticle),
        ("r", Category::ChargedParticle),
        ("s", Category::ChargedParticle),
        ("a", Category::ChargedParticle),
    ];

    /// Every category, in display order
    ///
    /// ```rust
    /// # use xslist::xsdir::Category;
    /// assert_eq!(Category::all().len(), 11);
    /// assert_eq!(Category::all().last(), Some(&Category::Unknown));
    /// ```
    pub fn all() -> [Category; 11] {
        [
            Category::ContinuousEnergyNeutron,
            Category::DiscreteEnergyNeutron,
            Category::ThermalScattering,
            Category::CoupledNeutronPhoton,
            Category::Photoatomic,
            Category::Photonuclear,
            Category::Dosimetry,
            Category::Electron,
            Category::Proton,
            Category::ChargedParticle,
            Category::Unknown,
        ]
    }

    /// Library types registered for the category
    ///
    /// Empty for [Category::Unknown], which is only ever a fallback.
    ///
    /// ```rust
    /// # use xslist::xsdir::Category;
    /// assert_eq!(Category::ContinuousEnergyNeutron.suffixes(), vec!["nc", "c"]);
    /// assert!(Category::Unknown.suffixes().is_empty());
    /// ```
    pub fn suffixes(&self) -> Vec<&'static str> {
        Self::TABLE
            .iter()
            .filter(|(_, c)| c == self)
            .map(|(s, _)| *s)
            .collect()
    }

    /// Look up a library type, `None` if it is not in the table
    pub fn from_suffix(library_type: &str) -> Option<Category> {
        let library_type = library_type.to_ascii_lowercase();
        Self::TABLE
            .iter()
            .find(|(s, _)| *s == library_type)
            .map(|(_, c)| *c)
    }

    /// Human readable name used for table headings
    pub fn name(&self) -> &'static str {
        match self {
            Category::ContinuousEnergyNeutron => "Continuous-Energy Neutron",
            Category::DiscreteEnergyNeutron => "Discrete-Energy Neutron",
            Category::ThermalScattering => "Thermal Scattering",
            Category::CoupledNeutronPhoton => "Coupled Neutron-Photon",
            Category::Photoatomic => "Photoatomic",
            Category::Photonuclear => "Photonuclear",
            Category::Dosimetry => "Dosimetry",
            Category::Electron => "Electron",
            Category::Proton => "Proton",
            Category::ChargedParticle => "Charged-Particle",
            Category::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Classify a library type
///
/// Total over any input. A two-letter type is matched as a whole first, and
/// a type that is not in [Category::TABLE] is [Category::Unknown].
///
/// ```rust
/// # use xslist::xsdir::{classify, Category};
/// assert_eq!(classify("nc"), Category::ContinuousEnergyNeutron);
/// assert_eq!(classify("t"), Category::ThermalScattering);
/// assert_eq!(classify("zz"), Category::Unknown);
/// ```
pub fn classify(library_type: &str) -> Category {
    Category::from_suffix(library_type).unwrap_or(Category::Unknown)
}
