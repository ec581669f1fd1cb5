//! Ordered index of directory entries
//!
//! MCNP scans the xsdir from the top and takes the first entry matching a
//! requested ZAID, or partial ZAID. The order of entries is therefore part of
//! the meaning of the file and the [Listing] never reorders anything.

// internal modules
use crate::error::Error;
use crate::xsdir::{Category, Entry};

// standard library
use std::collections::HashMap;
use std::path::PathBuf;

// external crates
use itertools::Itertools;
use log::{debug, warn};
use serde::Serialize;

/// Immutable, ordered collection of classified entries
///
/// Built once from a parsed sequence and queried many times. To pick up
/// changes to a directory file, parse it again and build a new listing.
///
/// ```rust
/// # use xslist::readers::XsdirReader;
/// # use xslist::xsdir::{Category, Listing};
/// let entries = XsdirReader::new()
///     .parse_entries(
///         "1001.80c 0.999167 endf70a 0 1 1 100
///          lwtr.20t 0.999167 tmccs   0 1 5 100
///          1001.81c 0.999167 endf70a 0 1 9 100",
///     )
///     .unwrap()
///     .entries;
///
/// let listing = Listing::build(entries);
/// assert_eq!(listing.list_by_category(Category::ContinuousEnergyNeutron).len(), 2);
/// assert_eq!(listing.resolve("1001").unwrap().zaid, "1001.80c");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Listing {
    /// Entries in file order
    entries: Vec<Entry>,
    /// Category of each entry, same order as `entries`
    categories: Vec<Category>,
    /// Entry indices grouped by category, ascending
    groups: HashMap<Category, Vec<usize>>,
    /// Entry indices keyed by lowercase ZA, ascending
    by_za: HashMap<String, Vec<usize>>,
}

impl Listing {
    /// Classify and index an ordered sequence of entries
    pub fn build(entries: Vec<Entry>) -> Self {
        let mut categories = Vec::with_capacity(entries.len());
        let mut groups: HashMap<Category, Vec<usize>> = HashMap::new();
        let mut by_za: HashMap<String, Vec<usize>> = HashMap::new();

        for (index, entry) in entries.iter().enumerate() {
            let category = entry.category();
            if category == Category::Unknown {
                let unknown = Error::UnknownLibraryType {
                    zaid: entry.zaid.clone(),
                    library_type: entry.library_type.clone(),
                };
                warn!("{unknown}");
            }

            categories.push(category);
            groups.entry(category).or_default().push(index);
            by_za
                .entry(entry.za().to_ascii_lowercase())
                .or_default()
                .push(index);
        }

        debug!(
            "Indexed {} entries across {} categories",
            entries.len(),
            groups.len()
        );

        Self {
            entries,
            categories,
            groups,
            by_za,
        }
    }

    /// All entries in file order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Entries paired with their category, in file order
    pub fn iter(&self) -> impl Iterator<Item = (&Entry, Category)> {
        self.entries.iter().zip(self.categories.iter().copied())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was listed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category of the entry at `index`
    pub fn category_of(&self, index: usize) -> Option<Category> {
        self.categories.get(index).copied()
    }

    /// Entries of one category, in file order
    pub fn list_by_category(&self, category: Category) -> Vec<&Entry> {
        self.groups
            .get(&category)
            .map(|indices| indices.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    /// Number of entries per category, for every category present
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::all()
            .into_iter()
            .filter_map(|c| self.groups.get(&c).map(|g| (c, g.len())))
            .collect()
    }

    /// Entries whose library type is not in the classification table
    pub fn unknown(&self) -> Vec<&Entry> {
        self.list_by_category(Category::Unknown)
    }

    /// First entry in file order matching a full or partial ZAID
    ///
    /// Matching is case-insensitive and never crosses the `.`:
    ///
    /// | Query      | Matches                                      |
    /// | ---------- | -------------------------------------------- |
    /// | `1001`     | any table for ZA 1001                        |
    /// | `1001.80`  | ZA 1001, library number 80, any library type |
    /// | `1001.80c` | exactly `1001.80c`                           |
    ///
    /// Later entries that also match are masked. Use [Listing::matches] to see
    /// them.
    pub fn resolve(&self, query: &str) -> Option<&Entry> {
        self.matching_indices(query)
            .next()
            .map(|i| &self.entries[i])
    }

    /// First match restricted to a single category
    ///
    /// For example resolving `1001` against the photoatomic tables only, as
    /// MCNP would for a photon problem.
    pub fn resolve_in(&self, query: &str, category: Category) -> Option<&Entry> {
        self.matching_indices(query)
            .find(|&i| self.categories[i] == category)
            .map(|i| &self.entries[i])
    }

    /// Every entry matching the query, in file order
    ///
    /// The first element is always what [Listing::resolve] returns.
    pub fn matches(&self, query: &str) -> Vec<&Entry> {
        self.matching_indices(query)
            .map(|i| &self.entries[i])
            .collect()
    }

    /// All entries with exactly this identifier, in file order
    pub fn duplicates_of(&self, zaid: &str) -> Vec<&Entry> {
        let query = Query::new(zaid);
        self.candidates(&query)
            .iter()
            .map(|&i| &self.entries[i])
            .filter(|e| e.zaid.eq_ignore_ascii_case(zaid.trim()))
            .collect()
    }

    /// Groups of entries sharing an identical identifier
    ///
    /// Only the first of each group is ever reached by [Listing::resolve].
    /// Groups are ordered by their first occurrence in the file.
    pub fn duplicates(&self) -> Vec<Vec<&Entry>> {
        self.entries
            .iter()
            .enumerate()
            .into_group_map_by(|(_, e)| e.zaid.to_ascii_lowercase())
            .into_values()
            .filter(|group| group.len() > 1)
            .sorted_by_key(|group| group[0].0)
            .map(|group| group.into_iter().map(|(_, e)| e).collect())
            .collect()
    }

    /// One export record per entry, in file order
    pub fn records(&self) -> Vec<Record<'_>> {
        self.iter()
            .map(|(entry, category)| Record {
                entry,
                category,
                za: entry.za(),
                library: entry.library(),
                temperature_k: entry.temperature_kelvin(),
            })
            .collect()
    }

    /// Indices of candidate entries for a query, ascending
    fn candidates(&self, query: &Query) -> &[usize] {
        self.by_za
            .get(&query.za)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }

    /// Indices of all matching entries, ascending
    fn matching_indices<'a>(&'a self, query: &str) -> impl Iterator<Item = usize> + 'a {
        let query = Query::new(query);
        let candidates = self.candidates(&query);
        candidates
            .iter()
            .copied()
            .filter(move |&i| query.matches(&self.entries[i]))
    }
}

/// An entry with its derived fields, as written to JSON
#[derive(Debug, Serialize)]
pub struct Record<'a> {
    #[serde(flatten)]
    pub entry: &'a Entry,
    pub category: Category,
    pub za: &'a str,
    pub library: PathBuf,
    pub temperature_k: f64,
}

/// A full or partial ZAID split at the `.`
#[derive(Debug)]
struct Query {
    /// Lowercase ZA part
    za: String,
    /// Lowercase suffix, if any
    suffix: Option<String>,
}

impl Query {
    fn new(query: &str) -> Self {
        let query = query.trim().to_ascii_lowercase();
        match query.split_once('.') {
            Some((za, suffix)) if !suffix.is_empty() => Self {
                za: za.to_string(),
                suffix: Some(suffix.to_string()),
            },
            Some((za, _)) => Self {
                za: za.to_string(),
                suffix: None,
            },
            None => Self {
                za: query,
                suffix: None,
            },
        }
    }

    /// Assumes the ZA was already matched by the index lookup
    fn matches(&self, entry: &Entry) -> bool {
        match &self.suffix {
            None => true,
            Some(suffix) if suffix.chars().all(|c| c.is_ascii_digit()) => {
                entry.library_number() == suffix
            }
            Some(suffix) => entry.suffix().eq_ignore_ascii_case(suffix),
        }
    }
}
