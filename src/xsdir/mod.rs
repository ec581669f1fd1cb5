//! Core directory library
//!
//! # Overview
//!
//! Module for storing and querying the contents of an xsdir file. The reader
//! logic is re-exported to make reading a file a one-liner.
//!
//! ```rust, no_run
//! // Read an xsdir file, skipping over any malformed lines
//! let xsdir = xslist::read_xsdir("/path/to/xsdir").unwrap();
//!
//! // Classify and index the entries in file order
//! let listing = xsdir.into_listing();
//! ```
//!
//! Three pieces do the work:
//!
//! - [Entry] holds one directory line, identifier and file location
//! - [classify] maps a library type such as `nc` or `t` to a [Category]
//! - [Listing] keeps the file order, groups entries by [Category] and resolves
//! full or partial ZAIDs to the first matching entry
//!
//! # Quickstart
//!
//! ```rust
//! use xslist::readers::XsdirReader;
//! use xslist::xsdir::Category;
//!
//! let text = "\
//! atomic weight ratios
//!    1001  0.999167
//! directory
//!  1001.80c 0.999167 endf70a 0 1 1 17969 0 0 2.5301E-08
//!  1001.24t 0.999167 tmccs   0 1 5 4000  0 0 2.5301E-08
//!  8016.80p 15.85751 eprdata 0 1 9 2000  0 0 0.0
//! ";
//!
//! let listing = XsdirReader::new().parse_str(text).unwrap().into_listing();
//!
//! // One table per category, in file order
//! for category in Category::all() {
//!     for entry in listing.list_by_category(category) {
//!         println!("{category}: {entry}");
//!     }
//! }
//!
//! // MCNP would pick the first 1001 table in the file
//! assert_eq!(listing.resolve("1001").unwrap().zaid, "1001.80c");
//! ```

// Split into subfiles for development, but anything important is re-exported
mod category;
mod core;
mod entry;
mod listing;

// inline important the directory-related modules for a nice public API
#[doc(inline)]
pub use crate::xsdir::category::{classify, Category};

#[doc(inline)]
pub use crate::xsdir::core::Xsdir;

#[doc(inline)]
pub use crate::xsdir::entry::{Entry, FileType};

#[doc(inline)]
pub use crate::xsdir::listing::{Listing, Record};

#[doc(inline)]
pub use crate::readers::{read_xsdir, read_xsdir_strict};
