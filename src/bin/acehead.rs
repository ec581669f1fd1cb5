//! Command line tool to inspect the header of an ACE table
//!
//! Quick look at what a table actually contains without opening a file that
//! may be hundreds of megabytes in an editor.
//!
//! # Usage
//!
//! ```text
//! Usage: acehead <file> [options]
//! ```
//!
//! Help is printed with the `-h` flag, and `--help` will show examples, default
//! values, examples, and any important behaviour.
//!
//! ## Options
//!
//! By default the table starting on the first line is summarised.
//!
//! ```bash
//! # Header of the first table in the file
//! acehead endf70a
//! ```
//!
//! ### Tables further into the file
//!
//! Libraries usually hold many tables in one file. The address column of the
//! xsdir gives the line each table starts on.
//!
//! ```bash
//! # Header of the table starting on line 35467
//! acehead endf70a --line 35467
//! ```
//!
//! ### XSS array
//!
//! The full XSS array can be printed after the header. For continuous-energy
//! neutron tables the derived metadata is printed as well.
//!
//! ```bash
//! acehead endf70a --line 35467 --xss
//! ```

// standard library
use std::path::Path;

// crate modules
use xslist::ace::{AceTable, NeutronMetadata};
use xslist::readers::{AceReader, XssMode};
use xslist::utils::*;

// external crates
use anyhow::{Context, Result};
use clap::{arg, Parser};
use log::*;

#[doc(hidden)]
fn main() -> Result<()> {
    // set up the command line interface and match arguments
    let cli: Cli = Cli::parse();

    // set up logging (+2 to make 'Info' the default)
    let verbosity = cli.verbose as usize + 2;
    logging_init(verbosity, cli.quiet)?;

    let mut reader = AceReader::new();
    reader.set_start_line(cli.line);
    if cli.xss {
        reader.set_xss_mode(XssMode::Full);
    }

    info!("Reading {} from line {}", &cli.file, cli.line);
    let table = reader
        .parse(Path::new(&cli.file))
        .with_context(|| f!("Unable to read a table from {}", cli.file))?;

    println!("{}", table.header);
    println!("\n{}", arrays(&table));

    if cli.xss {
        print_xss(&table);
    }

    Ok(())
}

/// Inspect the header of an ACE table
///
/// Prints the identifier, atomic weight ratio, temperature, and the
/// NXS/JXS arrays of a single ASCII ACE table. Both the legacy and
/// 2.0 header styles are supported.
///
/// Examples
/// --------
///
///  Header of the first table in a file:
///     $ acehead endf70a
///
///  Table at the address given in the xsdir:
///     $ acehead endf70a --line 35467
///
///  Include the XSS array:
///     $ acehead endf70a --line 35467 --xss
///
/// Notes
/// -----
///
/// Only formatted (type 1) tables can be read.
#[doc(hidden)]
#[derive(Parser)]
#[command(
    verbatim_doc_comment,
    arg_required_else_help(true),
    before_help(banner()),
    after_help("Typical use: acehead endf70a --line 35467\n\nNOTE: --help shows more detail and examples"),
    term_width(70),
    hide_possible_values(true),
    override_usage("acehead <file> [options]")
)]
struct Cli {
    // * Positional
    /// Path to an ASCII ACE file
    #[arg(name = "file")]
    file: String,

    /// Line the table starts on (1 default)
    ///
    /// This is the address column of the xsdir entry.
    #[arg(help_heading("Table options"))]
    #[arg(short, long)]
    #[arg(default_value_t = 1)]
    #[arg(hide_default_value(true))]
    #[arg(value_name = "num")]
    line: usize,

    /// Print the XSS array after the header
    #[arg(help_heading("Table options"))]
    #[arg(short, long)]
    xss: bool,

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

/// Non-zero IZ/AW pairs and the NXS/JXS arrays, eight to a line
#[doc(hidden)]
fn arrays(table: &AceTable) -> String {
    let header = &table.header;
    let mut s = String::new();

    let izaw: Vec<String> = header
        .izaw
        .iter()
        .filter(|(iz, _)| *iz != 0)
        .map(|(iz, aw)| f!("{iz} ({aw})"))
        .collect();
    if !izaw.is_empty() {
        s += &f!("IZ/AW\n{}\n\n", textwrap::fill(&izaw.join(", "), 70));
    }

    s += "NXS";
    for (i, value) in header.nxs.iter().enumerate() {
        if i % 8 == 0 {
            s += "\n";
        }
        s += &f!("{value:>9}");
    }

    s += "\n\nJXS";
    for (i, value) in header.jxs.iter().enumerate() {
        if i % 8 == 0 {
            s += "\n";
        }
        s += &f!("{value:>9}");
    }
    s
}

#[doc(hidden)]
fn print_xss(table: &AceTable) {
    let values = table
        .xss
        .iter()
        .map(|v| v.sci(11, 2))
        .collect::<Vec<String>>()
        .join(" ");
    println!("\nXSS ({} values)\n{}", table.xss.len(), textwrap::fill(&values, 72));

    let zaid = &table.header.zaid;
    if zaid.ends_with('c') {
        match NeutronMetadata::from_table(table) {
            Ok(m) => {
                let mut s = "\nNeutron metadata\n".to_string();
                s += &f!("energies             : {}\n", m.energies);
                s += &f!("emax                 : {} MeV\n", m.emax.sci(4, 2));
                s += &f!("photon production    : {}\n", m.photon_production);
                s += &f!("nubar                : {}\n", m.nubar);
                s += &f!("charged particles    : {}\n", m.charged_particles);
                s += &f!("delayed neutrons     : {}\n", m.delayed_neutrons);
                s += &f!("unresolved resonance : {}", m.unresolved_resonance);
                println!("{s}");
            }
            Err(e) => warn!("No metadata for {zaid}: {e}"),
        }
    }
}

/// Creates a banner fot the command line
#[doc(hidden)]
fn banner() -> String {
    let mut s = f!("{:-<1$}\n", "", 70);
    s += &f!("{:^70}\n", "Xslist :: ACE Header Inspector");
    s += &f!("{:-<1$}", "", 70);
    s
}

/// Sets up logging at runtime to allow for multiple verbosity levels
#[doc(hidden)]
fn logging_init(verbosity: usize, quiet: bool) -> Result<()> {
    stderrlog::new()
        .modules(vec![module_path!(), "xslist::readers"])
        .quiet(quiet)
        .verbosity(verbosity)
        .show_level(false)
        .color(stderrlog::ColorChoice::Never)
        .timestamp(stderrlog::Timestamp::Off)
        .init()?;
    Ok(())
}
