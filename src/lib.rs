//! # The xslist crate
//!
//! A collection of tools for finding out which nuclear data tables are
//! available to MCNP on a given machine
//!
//! ## Installation
//!
//! Direct install from github:
//!
//! ```shell
//! cargo install --git https://github.com/repositony/xslist.git
//! ```
//!
//! ## Overview
//!
//! MCNP finds its data through the `xsdir` directory file. Every line of the
//! `directory` section names a table, the file it lives in, and where in the
//! file it starts. When a problem asks for `1001` or `1001.80`, MCNP scans the
//! file from the top and takes the first table that fits. This crate parses
//! the directory in exactly that order so that listings and lookups agree
//! with what the code will actually load.
//!
//! | Command line | Description                                               |
//! | ------------ | --------------------------------------------------------- |
//! | `xslist`     | List, filter, resolve and audit the tables in an xsdir    |
//! | `acehead`    | Print the header of a single ACE table                    |
//!
//! All tools are fully documented with detailed `--help` messages, including
//! examples for common use cases.
//!
//! ### Supported library types
//!
//! Tables are grouped by the letters at the end of the ZAID suffix.
//!
//! | Category                                                | Library types |
//! | ------------------------------------------------------- | ------------- |
//! | [ContinuousEnergyNeutron](crate::xsdir::Category)       | c, nc         |
//! | [DiscreteEnergyNeutron](crate::xsdir::Category)         | d             |
//! | [ThermalScattering](crate::xsdir::Category)             | t             |
//! | [CoupledNeutronPhoton](crate::xsdir::Category)          | m             |
//! | [Photoatomic](crate::xsdir::Category)                   | p             |
//! | [Photonuclear](crate::xsdir::Category)                  | u             |
//! | [Dosimetry](crate::xsdir::Category)                     | y             |
//! | [Electron](crate::xsdir::Category)                      | e             |
//! | [Proton](crate::xsdir::Category)                        | h             |
//! | [ChargedParticle](crate::xsdir::Category)               | o, r, s, a    |
//! | [Unknown](crate::xsdir::Category)                       | anything else |
//!
//! ## Advanced use
//!
//! The crate reads any xsdir into a [Listing](crate::xsdir::Listing) with a
//! couple of lines, and from there the entries can be queried however is
//! useful.
//!
//! ```rust
//! // import the crate
//! use xslist::{read_xsdir, Category};
//!
//! // read the directory, skipping malformed lines
//! let xsdir = read_xsdir("./data/xsdir").unwrap();
//! let listing = xsdir.into_listing();
//!
//! // first table MCNP would pick for hydrogen
//! assert_eq!(listing.resolve("1001").unwrap().zaid, "1001.80c");
//!
//! // all of the thermal scattering tables
//! let thermal = listing.list_by_category(Category::ThermalScattering);
//! assert_eq!(thermal[0].zaid, "lwtr.20t");
//! ```
//!
//! As an overview:
//! - The [xsdir] module contains the directory entries, their
//! classification, and the ordered [Listing](crate::xsdir::Listing).
//! - The [ace] module represents ACE table headers and the summary
//! metadata of continuous-energy neutron tables.
//! - The [inventory] module checks the data files behind a listing and
//! collects ACE metadata in parallel.
//!
//! In the background, the `nom` parser combinator library handles the line
//! parsing, `clap` is used for command line interface, and `rayon` spreads
//! the file checks over threads.

// Public facing modules
pub mod ace;
pub mod error;
pub mod inventory;
pub mod utils;
pub mod xsdir;

// note that docs are hidden to prevent confusing the current simple API
pub mod readers;

// Re-exports of useful data structures
#[doc(inline)]
pub use crate::error::{Error, Result};

#[doc(inline)]
pub use crate::readers::{read_ace_header, read_xsdir, read_xsdir_strict};

#[doc(inline)]
pub use crate::xsdir::{Category, Listing};
