//! Command line listing of the data tables in an xsdir file
//!
//! Reads an MCNP xsdir directory and lists every table it names, grouped by
//! category and kept in file order. File order matters because MCNP always
//! takes the first table that matches a ZAID, so the first row for any ZA in
//! the output is the one that will actually be used.
//!
//! # Usage
//!
//! ```text
//! Usage: xslist [xsdir] [options]
//! ```
//!
//! Help is printed with the `-h` flag, and `--help` will show examples, default
//! values, examples, and any important behaviour.
//!
//! The xsdir path defaults to `$DATAPATH/xsdir` when not given.
//!
//! ### Listing tables
//!
//! ```bash
//! # Every table, one table of results per category
//! xslist /path/to/xsdir
//!
//! # Only the neutron and thermal scattering tables
//! xslist /path/to/xsdir --type c t
//!
//! # Everything available for iron-56
//! xslist /path/to/xsdir --za 26056
//! ```
//!
//! Category names or any of their library types are accepted by `--type`, see
//! `xslist --categories` for the full list.
//!
//! ### Metadata for neutron tables
//!
//! The `--metadata` flag opens the ACE file behind every continuous-energy
//! neutron table and reads enough of it to report the number of energy
//! points, the maximum energy, and which optional data blocks are present.
//!
//! ```text
//!                          Continuous-Energy Neutron (2)
//! zaid            temp(K)   length  energy      emax  gpd  nubar   cp   dn  urr  file
//! ---------------------------------------------------------------------------------------
//! 1001.80c          293.6       15       3 2.0000e+01   no     no   no   no   no  ace/sample.ace
//! ```
//!
//! This is read in parallel, and `-N` limits the number of threads.
//!
//! ### Resolving identifiers
//!
//! ```bash
//! # What MCNP would load for 1001, 1001.80 and 8016.80c
//! xslist /path/to/xsdir --resolve 1001 1001.80 8016.80c
//!
//! # What a photon problem would load for 1000
//! xslist /path/to/xsdir --resolve 1000 --type p
//! ```
//!
//! Any later entries that would also have matched are listed as masked.
//!
//! ### Auditing
//!
//! ```bash
//! # Identifiers listed more than once
//! xslist /path/to/xsdir --duplicates
//!
//! # Tables whose data file does not exist
//! xslist /path/to/xsdir --check --datapath /path/to/data
//! ```
//!
//! ### JSON export
//!
//! The selected tables are written as a list of records with the derived
//! category, ZA, library and temperature in Kelvin included.
//!
//! ```bash
//! xslist /path/to/xsdir --type c --json neutron.json
//! ```

// standard library
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

// crate modules
use xslist::ace::NeutronMetadata;
use xslist::inventory;
use xslist::readers::XsdirReader;
use xslist::utils::*;
use xslist::xsdir::{Category, Entry, Listing, Record, Xsdir};

// external crates
use anyhow::{anyhow, Context, Result};
use clap::{arg, Parser, ValueEnum};
use log::*;

#[doc(hidden)]
fn main() -> Result<()> {
    // set up the command line interface and match arguments
    let cli: Cli = Cli::parse();

    // set up logging (+2 to make Info the default)
    let verbosity = cli.verbose as usize + 2;
    logging_init(verbosity, cli.quiet)?;

    // nothing to read for the category table
    if cli.categories {
        println!("{}", categories_table());
        return Ok(());
    }

    if let Some(threads) = cli.threads {
        debug!("Limiting to {threads} threads");
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    // read the directory
    let path = xsdir_path(&cli)?;
    info!("Reading {}", path.display());
    let xsdir = try_xsdir_read(&cli, &path)?;

    let datapath = match &cli.datapath {
        Some(datapath) => PathBuf::from(datapath),
        None => xsdir.data_directory(),
    };
    debug!("Data files relative to {}", datapath.display());

    let listing = xsdir.into_listing();
    info!("Found {} tables", listing.len());

    // one report per run, resolve > duplicates > check > listing
    if !cli.resolve.is_empty() {
        println!("\n{}", resolve_table(&listing, &cli));
    } else if cli.duplicates {
        println!("\n{}", duplicates_table(&listing));
    } else if cli.check {
        print_missing(&listing, &datapath);
    } else {
        print_listing(&listing, &cli, &datapath);
    }

    if let Some(output) = &cli.json {
        write_json(&listing, &cli, output)?;
    }

    Ok(())
}

/// List the nuclear data tables available to MCNP
///
/// Reads an xsdir directory file and lists every table in file order,
/// grouped by category. MCNP always takes the first table in the file
/// that matches a ZAID, so file order is lookup order.
///
/// Examples
/// --------
///
///  Typical use:
///     $ xslist /path/to/xsdir
///
///  Use $DATAPATH/xsdir:
///     $ xslist
///
///  Continuous-energy neutron and thermal tables only:
///     $ xslist xsdir --type c t
///
///  Include metadata from the ACE files:
///     $ xslist xsdir --type c --metadata
///
///  Everything listed for one ZA:
///     $ xslist xsdir --za 1001
///
///  What MCNP would load:
///     $ xslist xsdir --resolve 1001 1001.80 lwtr
///
///  Audit the directory:
///     $ xslist xsdir --duplicates
///     $ xslist xsdir --check
///
///  Export to JSON:
///     $ xslist xsdir --json tables.json
///
/// Notes
/// -----
///
/// Partial identifiers never match across the '.', so 100 will not
/// match 1001. A digits-only suffix such as 1001.80 matches every
/// library type of that evaluation.
///
/// Malformed lines are skipped with a warning unless --strict is set.
#[allow(rustdoc::invalid_rust_codeblocks)]
#[doc(hidden)]
#[derive(Parser, Debug)]
#[command(
    verbatim_doc_comment,
    before_help(banner()),
    after_help("Typical use: xslist /path/to/xsdir --type c\n\nNOTE: --help shows more detail and examples"),
    term_width(70),
    hide_possible_values(true),
    override_usage("xslist [xsdir] [options]")
)]
struct Cli {
    // * Positional
    /// Path to the xsdir file ($DATAPATH/xsdir default)
    #[arg(name = "xsdir")]
    xsdir: Option<String>,

    // * Reader options
    /// Fail on the first malformed line
    ///
    /// By default malformed lines are skipped with a warning and the
    /// rest of the file is still listed.
    #[arg(help_heading("Reader options"))]
    #[arg(long)]
    strict: bool,

    /// Directory containing the data files
    ///
    /// Overrides the datapath= line of the xsdir. Otherwise the data
    /// files are assumed relative to the xsdir file itself.
    #[arg(help_heading("Reader options"))]
    #[arg(long)]
    #[arg(value_name = "path")]
    datapath: Option<String>,

    /// Number of threads for --check and --metadata
    #[arg(help_heading("Reader options"))]
    #[arg(short = 'N', long)]
    #[arg(value_name = "num")]
    threads: Option<usize>,

    // * Listing options
    /// Only list some categories (e.g. c t p)
    ///
    /// Categories may be given by name or by library type:
    ///     > c, nc = continuous-energy-neutron
    ///     > d     = discrete-energy-neutron
    ///     > t     = thermal-scattering
    ///     > m     = coupled-neutron-photon
    ///     > p     = photoatomic
    ///     > u     = photonuclear
    ///     > y     = dosimetry
    ///     > e     = electron
    ///     > h     = proton
    ///     > charged-particle, unknown
    ///
    /// With --resolve, the first category given restricts the search.
    #[arg(help_heading("Listing options"))]
    #[arg(short, long, value_enum)]
    #[arg(num_args(1..))]
    #[arg(verbatim_doc_comment)]
    #[arg(id = "type")]
    #[arg(value_name = "category")]
    type_: Vec<Category>,

    /// Only list tables for one ZA (e.g. 1001, lwtr)
    #[arg(help_heading("Listing options"))]
    #[arg(short, long)]
    #[arg(value_name = "za")]
    za: Option<String>,

    /// Read metadata from the neutron ACE files
    ///
    /// Adds the XSS length, number of energies, maximum energy and the
    /// optional data flags for continuous-energy neutron tables.
    #[arg(help_heading("Listing options"))]
    #[arg(short, long)]
    metadata: bool,

    /// Print the table of categories and exit
    #[arg(help_heading("Listing options"))]
    #[arg(long)]
    categories: bool,

    // * Query options
    /// Show the table MCNP would load for each ZAID
    ///
    /// Full (1001.80c) or partial (1001, 1001.80) identifiers are
    /// accepted. Later entries that would also match are listed as
    /// masked.
    #[arg(help_heading("Query options"))]
    #[arg(short, long)]
    #[arg(num_args(1..))]
    #[arg(value_name = "zaid")]
    resolve: Vec<String>,

    /// List identifiers that appear more than once
    #[arg(help_heading("Query options"))]
    #[arg(short, long)]
    duplicates: bool,

    /// List tables whose data file does not exist
    #[arg(help_heading("Query options"))]
    #[arg(short, long)]
    check: bool,

    // * Output options
    /// Write the selected tables to a JSON file
    #[arg(help_heading("Output options"))]
    #[arg(short, long)]
    #[arg(value_name = "path")]
    json: Option<String>,

    // * Flags
    /// Verbose logging (-v, -vv)
    ///
    /// If specified, the default log level of INFO is increased to DEBUG (-v)
    /// or TRACE (-vv). Errors and Warnings are always logged unless in quiet
    /// (-q) mode.
    #[arg(short, long)]
    #[arg(action = clap::ArgAction::Count)]
    verbose: u8,

    /// Supress all log output (overrules --verbose)
    #[arg(short, long)]
    quiet: bool,
}

#[doc(hidden)]
fn xsdir_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.xsdir {
        Some(path) => Ok(PathBuf::from(path)),
        None => std::env::var_os("DATAPATH")
            .map(|datapath| PathBuf::from(datapath).join("xsdir"))
            .ok_or_else(|| anyhow!("No xsdir provided and $DATAPATH is not set")),
    }
}

#[doc(hidden)]
fn try_xsdir_read(cli: &Cli, path: &Path) -> Result<Xsdir> {
    let mut reader = XsdirReader::new();
    if cli.quiet || cli.verbose > 1 {
        reader.disable_progress();
    }
    reader.set_strict(cli.strict);

    let xsdir = reader
        .parse(path)
        .with_context(|| f!("Unable to read {}", path.display()))?;

    if xsdir.has_skipped() {
        warn!("Skipped {} malformed lines", xsdir.skipped.len());
    }
    Ok(xsdir)
}

/// Does an entry pass the --type and --za filters
#[doc(hidden)]
fn is_selected(cli: &Cli, entry: &Entry, category: Category) -> bool {
    let by_type = cli.type_.is_empty() || cli.type_.contains(&category);
    let by_za = cli
        .za
        .as_ref()
        .map_or(true, |za| entry.za().eq_ignore_ascii_case(za.trim()));
    by_type && by_za
}

/// Print a table for every category with selected entries
#[doc(hidden)]
fn print_listing(listing: &Listing, cli: &Cli, datapath: &Path) {
    let selection: Vec<(usize, &Entry, Category)> = listing
        .iter()
        .enumerate()
        .filter(|(_, (entry, category))| is_selected(cli, entry, *category))
        .map(|(i, (entry, category))| (i, entry, category))
        .collect();

    if selection.is_empty() {
        warn!("No tables match the selection");
        return;
    }

    let metadata = match cli.metadata {
        true => inventory::collect_metadata(listing, datapath, |index| {
            selection
                .binary_search_by_key(&index, |(i, _, _)| *i)
                .is_ok()
        }),
        false => Vec::new(),
    };

    for category in Category::all() {
        let rows: Vec<&(usize, &Entry, Category)> = selection
            .iter()
            .filter(|(_, _, c)| *c == category)
            .collect();

        if rows.is_empty() {
            continue;
        }

        let with_metadata = cli.metadata && category == Category::ContinuousEnergyNeutron;
        let width = if with_metadata { 88 } else { 78 };

        let mut s = f!("\n{:^width$}\n", f!("{category} ({})", rows.len()));
        match with_metadata {
            true => s += &metadata_columns(),
            false => s += &entry_columns(),
        }
        s += &f!("\n{}", "-".repeat(width));

        for (index, entry, _) in rows {
            match with_metadata {
                true => s += &f!("\n{}", metadata_row(entry, metadata[*index].as_ref())),
                false => s += &f!("\n{entry}"),
            }
        }
        println!("{s}");
    }

    println!("\n{}", summary(listing));
}

#[doc(hidden)]
fn entry_columns() -> String {
    f!(
        "{:<14}{:>12}{:>10}  {:<6}{:>9}  {}",
        "zaid",
        "awr",
        "temp(K)",
        "type",
        "address",
        "file"
    )
}

#[doc(hidden)]
fn metadata_columns() -> String {
    let mut s = f!("{:<14}{:>9}", "zaid", "temp(K)");
    s += &f!("{:>9}{:>8}{:>11}", "length", "energy", "emax");
    s += &f!("{:>5}{:>7}{:>5}{:>5}{:>5}", "gpd", "nubar", "cp", "dn", "urr");
    s += &f!("  {}", "file");
    s
}

#[doc(hidden)]
fn metadata_row(entry: &Entry, metadata: Option<&Result<NeutronMetadata>>) -> String {
    let mut s = f!("{:<14}{:>9.1}", entry.zaid, entry.temperature_kelvin());
    match metadata {
        Some(Ok(m)) => {
            s += &f!("{:>9}{:>8}{:>11}", m.length, m.energies, m.emax.sci(4, 2));
            s += &f!(
                "{:>5}{:>7}{:>5}{:>5}{:>5}",
                yes_no(m.photon_production),
                f!("{}", m.nubar),
                yes_no(m.charged_particles),
                yes_no(m.delayed_neutrons),
                yes_no(m.unresolved_resonance)
            );
        }
        Some(Err(e)) => {
            warn!("No metadata for {}: {e:#}", entry.zaid);
            s += &f!("{:^50}", "unavailable");
        }
        None => s += &f!("{:^50}", "not read"),
    }
    s += &f!("  {}", entry.filename);
    s
}

#[doc(hidden)]
fn yes_no(flag: bool) -> &'static str {
    match flag {
        true => "yes",
        false => "no",
    }
}

#[doc(hidden)]
fn summary(listing: &Listing) -> String {
    let mut s = f!("{:<30}{:>8}\n", "Category", "tables");
    s += &"-".repeat(38);
    for (category, count) in listing.category_counts() {
        s += &f!("\n{:<30}{:>8}", category.name(), count);
    }
    s += &f!("\n{:<30}{:>8}", "Total", listing.len());
    s
}

/// Table of what each query resolves to and what it masks
#[doc(hidden)]
fn resolve_table(listing: &Listing, cli: &Cli) -> String {
    let restrict = cli.type_.first().copied();

    let mut s = f!("{:<14}{:<14}{:>8}  {}\n", "query", "resolved", "line", "file");
    s += &"-".repeat(70);

    for query in &cli.resolve {
        let found = match restrict {
            Some(category) => listing.resolve_in(query, category),
            None => listing.resolve(query),
        };

        let Some(entry) = found else {
            s += &f!("\n{:<14}{:^56}", query, "Not found in xsdir");
            continue;
        };

        s += &f!(
            "\n{:<14}{:<14}{:>8}  {}",
            query,
            entry.zaid,
            entry.line,
            entry.filename
        );

        let masked: Vec<String> = listing
            .matches(query)
            .into_iter()
            .filter(|e| restrict.map_or(true, |c| e.category() == c))
            .skip(1)
            .map(|e| f!("{} (line {})", e.zaid, e.line))
            .collect();

        if !masked.is_empty() {
            let text = textwrap::fill(&f!("masks {}", masked.join(", ")), 60);
            s += &f!("\n{}", textwrap::indent(&text, &" ".repeat(10)));
            s = s.trim_end().to_string();
        }
    }
    s
}

/// Table of every identifier listed more than once
#[doc(hidden)]
fn duplicates_table(listing: &Listing) -> String {
    let groups = listing.duplicates();
    if groups.is_empty() {
        return "No duplicate identifiers".to_string();
    }

    let mut s = f!("{:<14}{:>8}  {:<8}  {}\n", "zaid", "line", "status", "file");
    s += &"-".repeat(70);
    for group in &groups {
        for (i, entry) in group.iter().enumerate() {
            let status = if i == 0 { "used" } else { "masked" };
            s += &f!(
                "\n{:<14}{:>8}  {:<8}  {}",
                entry.zaid,
                entry.line,
                status,
                entry.filename
            );
        }
    }
    s
}

#[doc(hidden)]
fn print_missing(listing: &Listing, datapath: &Path) {
    let missing = inventory::missing_files(listing, datapath);
    if missing.is_empty() {
        info!("All {} data files found", listing.len());
        return;
    }

    let mut s = f!("{:<14}{:>8}  {}\n", "zaid", "line", "expected at");
    s += &"-".repeat(70);
    for (entry, path) in missing {
        s += &f!("\n{:<14}{:>8}  {}", entry.zaid, entry.line, path.display());
    }
    println!("\n{s}");
}

#[doc(hidden)]
fn write_json(listing: &Listing, cli: &Cli, output: &str) -> Result<()> {
    let records: Vec<Record> = listing
        .records()
        .into_iter()
        .filter(|r| is_selected(cli, r.entry, r.category))
        .collect();

    info!("Writing {} records to {output}", records.len());
    let file = File::create(output).with_context(|| f!("Unable to create {output}"))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &records)?;
    Ok(())
}

#[doc(hidden)]
fn categories_table() -> String {
    let mut s = f!("{:<28}{:<28}{}\n", "Category", "--type value", "library types");
    s += &"-".repeat(72);
    for category in Category::all() {
        let value = category
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        let suffixes = match category {
            Category::Unknown => "anything else".to_string(),
            _ => category.suffixes().join(", "),
        };
        s += &f!("\n{:<28}{:<28}{}", category.name(), value, suffixes);
    }
    s
}

/// generates a banner for cli tool consistency
#[doc(hidden)]
fn banner() -> String {
    let mut s = f!("{:-<1$}\n", "", 70);
    s += &f!("{:^70}\n", "Xslist :: Data Table Listing");
    s += &f!("{:-<1$}", "", 70);
    s
}

#[doc(hidden)]
fn logging_init(verbosity: usize, quiet: bool) -> Result<()> {
    stderrlog::new()
        .modules(vec![
            module_path!(),
            "xslist::xsdir",
            "xslist::inventory",
            "xslist::readers",
        ])
        .quiet(quiet)
        .verbosity(verbosity)
        .show_level(false)
        .color(stderrlog::ColorChoice::Never)
        .timestamp(stderrlog::Timestamp::Off)
        .init()?;
    Ok(())
}
