// internal modules
use crate::error::{Error, Result};
use crate::readers::parsers;
use crate::utils::*;
use crate::xsdir::{Entry, FileType, Xsdir};

// standard library
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

// external crates
use kdam::{Bar, BarBuilder, BarExt};
use log::{debug, trace, warn};

/// A reader for MCNP xsdir directory files
///
/// Reads the optional `datapath=` line and atomic weight ratio table, then
/// every entry after the `directory` marker in file order.
///
/// Notes:
///     - Header keywords are case-insensitive
///     - Lines ending in `+` are joined with the following line
///     - Entries may have 7 to 11 fields, missing optional values are 0
///     - Nothing referenced by the entries is opened
///
/// Malformed lines abort the read when strict, otherwise they are logged,
/// skipped, and recorded in [Xsdir::skipped].
///
/// Example:
/// ```ignore
///     let path = Path::new(path);
///     let mut reader = XsdirReader::new();
///     reader.set_strict(true);
///     let xsdir = reader.parse(path)?;
/// ```
#[derive(Debug, Default)]
pub struct XsdirReader {
    /// Abort on the first malformed line
    strict: bool,
    /// Disable progress bar?
    disable_progress: bool,
}

/// Which part of the file the reader is in
#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    /// Anything before the atomic weight ratios or directory
    Preamble,
    /// Pairs of ZA and AWR values
    AtomicWeights,
    /// One table per logical line
    Directory,
}

/// High level methods
impl XsdirReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Choose whether a malformed line aborts the read
    pub fn set_strict(&mut self, strict: bool) {
        debug!("Strict parsing {}", if strict { "on" } else { "off" });
        self.strict = strict;
    }

    /// Do not print the progress indicators
    pub fn disable_progress(&mut self) {
        debug!("Progress bar disabled");
        self.disable_progress = true;
    }

    /// Parses an xsdir file from disk
    pub fn parse(&mut self, path: &Path) -> Result<Xsdir> {
        let file = File::open(path).map_err(|source| Error::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path.display().to_string();
        let progress_bar = self.init_progress_bar();
        let mut xsdir = self.read(BufReader::new(file), progress_bar, &name)?;
        xsdir.source = Some(path.to_path_buf());
        Ok(xsdir)
    }

    /// Parses the full text of an xsdir file
    pub fn parse_str(&mut self, text: &str) -> Result<Xsdir> {
        self.read(text.as_bytes(), None, "text")
    }

    /// Parses a bare block of directory lines with no header
    ///
    /// Useful for fragments of a directory. There is no datapath or atomic
    /// weight table, but skipped lines are still recorded in
    /// [Xsdir::skipped] with their line number in `text`.
    pub fn parse_entries(&mut self, text: &str) -> Result<Xsdir> {
        let mut xsdir = Xsdir::default();
        let mut pending: Option<(usize, String)> = None;

        for (n, line) in text.lines().enumerate() {
            self.directory_line(n + 1, line, &mut pending, &mut xsdir)?;
        }
        self.flush_pending(&mut pending, &mut xsdir)?;

        Ok(xsdir)
    }
}

/// Primary run loop
impl XsdirReader {
    /// Walk through the sections line by line
    fn read<R: BufRead>(
        &self,
        reader: R,
        mut progress_bar: Option<Bar>,
        name: &str,
    ) -> Result<Xsdir> {
        let mut xsdir = Xsdir::default();
        let mut section = Section::Preamble;
        let mut pending: Option<(usize, String)> = None;

        debug!("Parsing {name}");
        if let Some(bar) = progress_bar.as_mut() {
            bar.refresh().ok();
        }

        for (n, line) in reader.lines().enumerate() {
            let number = n + 1;
            let line = line.map_err(|source| Error::Io {
                line: number,
                source,
            })?;

            if let Some(bar) = progress_bar.as_mut() {
                bar.update(1).ok();
            }

            match section {
                Section::Preamble => section = self.preamble_line(number, &line, &mut xsdir),
                Section::AtomicWeights => {
                    section = self.atomic_weight_line(number, &line, &mut xsdir)?
                }
                Section::Directory => {
                    self.directory_line(number, &line, &mut pending, &mut xsdir)?
                }
            }
        }
        self.flush_pending(&mut pending, &mut xsdir)?;

        // need an extra line for clean spacing if the progress bar is printed
        if progress_bar.is_some() {
            eprintln!()
        };

        if section != Section::Directory {
            return Err(Error::MissingDirectory(name.to_string()));
        }

        debug!(
            "Found {} entries and {} atomic weight ratios, skipped {} lines",
            xsdir.entries.len(),
            xsdir.atomic_weight_ratios.len(),
            xsdir.skipped.len()
        );

        Ok(xsdir)
    }

    /// Initialise the progress bar, if wanted
    fn init_progress_bar(&self) -> Option<Bar> {
        if self.disable_progress {
            return None;
        }
        BarBuilder::default()
            .delay(0.0)
            .unit(" lines")
            .unit_scale(true)
            .build()
            .ok()
    }

    /// Either fail or record the problem, depending on strictness
    fn recover(&self, error: Error, xsdir: &mut Xsdir) -> Result<()> {
        if self.strict {
            return Err(error);
        }
        warn!("Skipping {error}");
        xsdir.skipped.push(error);
        Ok(())
    }
}

/// Section handlers
impl XsdirReader {
    /// Look for the datapath and the section markers
    fn preamble_line(&self, number: usize, line: &str, xsdir: &mut Xsdir) -> Section {
        if parsers::is_directory_header(line) {
            trace!("[Directory] line {number}");
            return Section::Directory;
        }

        if parsers::is_awr_header(line) {
            trace!("[  AWR   ] line {number}");
            return Section::AtomicWeights;
        }

        if let Ok((_, path)) = parsers::datapath(line) {
            trace!("[Datapath] {path}");
            xsdir.datapath = Some(PathBuf::from(path));
        } else if !line.trim().is_empty() {
            trace!("[Ignored ] {line}");
        }

        Section::Preamble
    }

    /// Collect ZA/AWR pairs until a date line or the directory
    fn atomic_weight_line(
        &self,
        number: usize,
        line: &str,
        xsdir: &mut Xsdir,
    ) -> Result<Section> {
        if parsers::is_directory_header(line) {
            trace!("[Directory] line {number}");
            return Ok(Section::Directory);
        }

        if parsers::is_date_line(line) {
            trace!("[  Date  ] {}", line.trim());
            return Ok(Section::Preamble);
        }

        if line.trim().is_empty() {
            return Ok(Section::AtomicWeights);
        }

        match parsers::awr_pairs(line) {
            Ok((_, pairs)) => xsdir.atomic_weight_ratios.extend(pairs),
            Err(_) => {
                let error = Error::malformed(number, line, "expected ZA and AWR pairs");
                self.recover(error, xsdir)?;
            }
        }

        Ok(Section::AtomicWeights)
    }

    /// Join continuations and hand complete lines to the entry parser
    fn directory_line(
        &self,
        number: usize,
        line: &str,
        pending: &mut Option<(usize, String)>,
        xsdir: &mut Xsdir,
    ) -> Result<()> {
        // keep the line number of the first physical line
        let (start, mut text) = match pending.take() {
            Some((start, mut text)) => {
                text.push(' ');
                text.push_str(line);
                (start, text)
            }
            None => (number, line.to_string()),
        };

        if parsers::is_continued(&text) {
            if let Some(index) = text.rfind('+') {
                text.truncate(index);
            }
            *pending = Some((start, text));
            return Ok(());
        }

        self.complete_line(start, &text, xsdir)
    }

    /// A trailing `+` on the final line has nothing to join, use what is there
    fn flush_pending(
        &self,
        pending: &mut Option<(usize, String)>,
        xsdir: &mut Xsdir,
    ) -> Result<()> {
        match pending.take() {
            Some((start, text)) => self.complete_line(start, &text, xsdir),
            None => Ok(()),
        }
    }

    fn complete_line(&self, number: usize, text: &str, xsdir: &mut Xsdir) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        match read_entry(number, text) {
            Ok(entry) => {
                trace!("[ Entry  ] {entry}");
                xsdir.entries.push(entry);
                Ok(())
            }
            Err(error) => self.recover(error, xsdir),
        }
    }
}

/// Whitespace separated fields of one logical directory line
struct Fields<'a> {
    number: usize,
    text: &'a str,
    tokens: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn malformed(&self, reason: impl Into<String>) -> Error {
        Error::malformed(self.number, self.text, reason)
    }

    /// Integer at `index`, 0 if the optional field is absent
    fn integer(&self, index: usize, name: &str) -> Result<u64> {
        match self.tokens.get(index) {
            None => Ok(0),
            Some(token) => parsers::integer(token)
                .map(|(_, value)| value)
                .map_err(|_| self.malformed(f!("unreadable {name} '{token}'"))),
        }
    }

    /// Real at `index`, 0.0 if the optional field is absent
    fn real(&self, index: usize, name: &str) -> Result<f64> {
        match self.tokens.get(index) {
            None => Ok(0.0),
            Some(token) => parsers::real(token)
                .map(|(_, value)| value)
                .map_err(|_| self.malformed(f!("unreadable {name} '{token}'"))),
        }
    }
}

/// Turn one logical line into an [Entry]
fn read_entry(number: usize, text: &str) -> Result<Entry> {
    let fields = Fields {
        number,
        text,
        tokens: text.split_whitespace().collect(),
    };

    let n_fields = fields.tokens.len();
    if !(7..=11).contains(&n_fields) {
        return Err(fields.malformed(f!("expected 7 to 11 fields, found {n_fields}")));
    }

    let zaid = fields.tokens[0];
    let (_, (_, _, library_type)) =
        parsers::zaid(zaid).map_err(|_| fields.malformed(f!("invalid zaid '{zaid}'")))?;

    let code = fields.integer(4, "file type")?;
    let file_type = u8::try_from(code)
        .ok()
        .and_then(FileType::from_code)
        .ok_or_else(|| fields.malformed(f!("unknown file type {code}")))?;

    let ptable = match fields.tokens.get(10) {
        None => false,
        Some(token) if token.eq_ignore_ascii_case("ptable") => true,
        Some(token) => return Err(fields.malformed(f!("expected 'ptable', found '{token}'"))),
    };

    let access = match fields.tokens[3] {
        "0" => None,
        route => Some(route.to_string()),
    };

    Ok(Entry {
        zaid: zaid.to_string(),
        library_type: library_type.to_ascii_lowercase(),
        awr: fields.real(1, "atomic weight ratio")?,
        filename: fields.tokens[2].to_string(),
        access,
        file_type,
        address: fields.integer(5, "address")?,
        table_length: fields.integer(6, "table length")?,
        record_length: fields.integer(7, "record length")?,
        entries_per_record: fields.integer(8, "entries per record")?,
        temperature: fields.real(9, "temperature")?,
        ptable,
        line: number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xsdir::Category;
    use rstest::rstest;

    const FILE: &str = "\
datapath=/opt/mcnp/data
atomic weight ratios
   1001  0.999167   1002  1.996800
   8016 15.857510
  12/17/12
directory
 1001.80c   0.999167 endf70a 0 1 1     17969 0 0 2.5301E-08
 1001.24t   0.999167 tmccs   0 1 1234  4000  0 0 2.5301E-08
 8016.80p  15.857510 eprdata12 0 1 9 +
       2000  0 0 0.0
 92235.710nc 233.0248 endf71x/U/92235.710nc 0 1 1 1183016 0 0 2.5301E-08 ptable
";

    const TORSION: &str = " 1001.24t   0.999167 tmccs   0 1 1234  4000  0 0 2.5301E-08";

    fn reader(strict: bool) -> XsdirReader {
        let mut reader = XsdirReader::new();
        reader.set_strict(strict);
        reader
    }

    #[test]
    fn header_sections() {
        let xsdir = reader(true).parse_str(FILE).unwrap();
        assert_eq!(xsdir.datapath, Some(PathBuf::from("/opt/mcnp/data")));
        assert_eq!(xsdir.atomic_weight_ratios.len(), 3);
        assert_eq!(xsdir.awr(8016), Some(15.85751));
        assert!(xsdir.skipped.is_empty());
    }

    #[test]
    fn entries_in_file_order() {
        let xsdir = reader(true).parse_str(FILE).unwrap();
        let zaids: Vec<&str> = xsdir.entries.iter().map(|e| e.zaid.as_str()).collect();
        assert_eq!(zaids, vec!["1001.80c", "1001.24t", "8016.80p", "92235.710nc"]);
    }

    #[test]
    fn entry_fields() {
        let xsdir = reader(true).parse_str(FILE).unwrap();
        let u235 = &xsdir.entries[3];
        assert_eq!(u235.library_type, "nc");
        assert_eq!(u235.category(), Category::ContinuousEnergyNeutron);
        assert_eq!(u235.file_type, FileType::Ascii);
        assert_eq!(u235.table_length, 1183016);
        assert_eq!(u235.temperature, 2.5301e-08);
        assert!(u235.ptable);
        assert_eq!(u235.line, 11);
    }

    #[test]
    fn continuation_lines() {
        let xsdir = reader(true).parse_str(FILE).unwrap();
        let o16 = &xsdir.entries[2];
        assert_eq!(o16.zaid, "8016.80p");
        assert_eq!(o16.table_length, 2000);
        assert_eq!(o16.line, 9);
    }

    #[test]
    fn short_lines_default_to_zero() {
        let entries = reader(true)
            .parse_entries("1001.80c 0.999167 endf70a 0 1 1 17969")
            .unwrap()
            .entries;
        assert_eq!(entries[0].record_length, 0);
        assert_eq!(entries[0].temperature, 0.0);
        assert!(!entries[0].ptable);
        assert_eq!(entries[0].access, None);
    }

    #[test]
    fn access_route_kept() {
        let entries = reader(true)
            .parse_entries("1001.80c 0.999167 endf70a /other 2 1 17969 512 4")
            .unwrap()
            .entries;
        assert_eq!(entries[0].access.as_deref(), Some("/other"));
        assert_eq!(entries[0].file_type, FileType::Binary);
        assert_eq!(entries[0].entries_per_record, 4);
    }

    #[rstest]
    #[case("1001.80c 0.999167 endf70a 0 1 1", "expected 7 to 11 fields, found 6")]
    #[case("1001.80c 0.99x endf70a 0 1 1 10", "unreadable atomic weight ratio '0.99x'")]
    #[case("1001.80c 0.999167 endf70a 0 3 1 10", "unknown file type 3")]
    #[case("1001 0.999167 endf70a 0 1 1 10", "invalid zaid '1001'")]
    #[case("1001.80c 0.999167 endf70a 0 1 1 10 0 0 0.0 nope", "expected 'ptable', found 'nope'")]
    #[case("1001.80c nan endf70a 0 1 1 10", "unreadable atomic weight ratio 'nan'")]
    #[case("1001.80c 0.999167 endf70a 0 1 1 10 0 0 inf", "unreadable temperature 'inf'")]
    fn malformed_reasons(#[case] line: &str, #[case] expected: &str) {
        let error = reader(true).parse_entries(line).unwrap_err();
        match error {
            Error::MalformedLine { line: 1, reason, .. } => assert_eq!(reason, expected),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_strict_skips_and_records() {
        let text = FILE.replace(TORSION, " 1001.24t 0.999167 tmccs");
        let xsdir = reader(false).parse_str(&text).unwrap();
        assert_eq!(xsdir.entries.len(), 3);
        assert_eq!(xsdir.skipped.len(), 1);
        assert_eq!(xsdir.skipped[0].line(), Some(8));
    }

    #[test]
    fn bare_lines_keep_skipped() {
        let text = "\
1001.80c 0.999167 endf70a 0 1 1 17969
8016.80c 15.85751 endf70b 0 1 1
1001.24t 0.999167 tmccs 0 1 1234 +
    4000 0 0 2.5301E-08
92235.80c nan endf70j 0 1 1 17969";
        let xsdir = reader(false).parse_entries(text).unwrap();

        let kept: Vec<&str> = xsdir.entries.iter().map(|e| e.zaid.as_str()).collect();
        assert_eq!(kept, ["1001.80c", "1001.24t"]);

        let lines: Vec<Option<usize>> = xsdir.skipped.iter().map(|e| e.line()).collect();
        assert_eq!(lines, [Some(2), Some(5)]);
        assert!(xsdir.has_skipped());
    }

    #[test]
    fn strict_aborts() {
        let text = FILE.replace(TORSION, " 1001.24t 0.999167 tmccs");
        let error = reader(true).parse_str(&text).unwrap_err();
        assert_eq!(error.line(), Some(8));
    }

    #[test]
    fn bad_awr_line() {
        let text = FILE.replace("   8016 15.857510", "   8016");
        assert!(reader(true).parse_str(&text).is_err());
        let xsdir = reader(false).parse_str(&text).unwrap();
        assert_eq!(xsdir.atomic_weight_ratios.len(), 2);
        assert_eq!(xsdir.entries.len(), 4);
    }

    #[test]
    fn directory_without_awr_section() {
        let xsdir = reader(true)
            .parse_str("DIRECTORY\n1001.80c 0.999167 endf70a 0 1 1 17969\n\n")
            .unwrap();
        assert_eq!(xsdir.entries.len(), 1);
        assert!(xsdir.atomic_weight_ratios.is_empty());
    }

    #[test]
    fn missing_directory() {
        let error = reader(false)
            .parse_str("atomic weight ratios\n 1001 0.999167\n")
            .unwrap_err();
        assert!(matches!(error, Error::MissingDirectory(_)));
    }

    #[test]
    fn missing_file() {
        let error = reader(false)
            .parse(Path::new("/definitely/not/here/xsdir"))
            .unwrap_err();
        assert!(matches!(error, Error::FileNotFound { .. }));
    }
}
