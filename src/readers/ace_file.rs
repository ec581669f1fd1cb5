//! Reader for ASCII (type 1) ACE data tables
//!
//! Tables are located by the line number given as the address in the
//! directory. Only as much of the XSS array as requested is read, which for
//! listing purposes is usually nothing or a handful of values.

// internal modules
use crate::ace::{AceHeader, AceTable, NeutronMetadata};
use crate::utils::*;
use crate::xsdir::{Entry, FileType};

// standard library
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use std::str::FromStr;

// external crates
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, trace};

/// Most XSS values reserved up front, the rest grow as they are read
const XSS_RESERVE: usize = 1 << 16;

/// How much of the XSS array to read after the header
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum XssMode {
    /// Header only
    #[default]
    Skip,
    /// Only what is needed for [NeutronMetadata]
    Metadata,
    /// All NXS(1) values
    Full,
}

/// A simple reader for ASCII ACE tables
#[derive(Debug)]
pub struct AceReader {
    /// Line the table starts on, 1-based
    start_line: usize,
    /// Amount of XSS data wanted
    xss_mode: XssMode,
}

impl Default for AceReader {
    fn default() -> Self {
        Self {
            start_line: 1,
            xss_mode: XssMode::Skip,
        }
    }
}

impl AceReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Setter for the line the table starts on
    pub fn set_start_line(&mut self, line: usize) {
        self.start_line = line.max(1);
    }

    /// Setter for how much of the XSS array to read
    pub fn set_xss_mode(&mut self, mode: XssMode) {
        self.xss_mode = mode;
    }

    /// Parses the table starting at the current start line
    pub fn parse(&self, path: &Path) -> Result<AceTable> {
        let file = File::open(path).with_context(|| f!("Could not open {}", path.display()))?;
        let mut lines = BufReader::new(file).lines();

        // move to the start of the table
        for _ in 1..self.start_line {
            if lines.next().transpose()?.is_none() {
                bail!(
                    "{} ends before line {}",
                    path.display(),
                    self.start_line
                );
            }
        }

        let header = read_header(&mut lines)
            .with_context(|| f!("Bad ACE header at {}:{}", path.display(), self.start_line))?;
        trace!("{header}");

        let count = match self.xss_mode {
            XssMode::Skip => 0,
            XssMode::Metadata => NeutronMetadata::xss_required(&header)?.min(header.xss_length()),
            XssMode::Full => header.xss_length(),
        };

        let xss = read_xss(&mut lines, count)
            .with_context(|| f!("Bad XSS array for {} in {}", header.zaid, path.display()))?;

        Ok(AceTable { header, xss })
    }

    /// Parses the table a directory entry points at
    ///
    /// Only ASCII tables can be read, binary tables are an error.
    pub fn parse_entry(&mut self, entry: &Entry, datapath: &Path) -> Result<AceTable> {
        if entry.file_type != FileType::Ascii {
            bail!("{} is a binary table, only ASCII tables are supported", entry.zaid);
        }

        let path = entry.data_file(datapath);
        debug!("Reading {} from {}:{}", entry.zaid, path.display(), entry.address);

        self.set_start_line(usize::try_from(entry.address)?);
        let table = self.parse(&path)?;

        if !table.header.zaid.eq_ignore_ascii_case(&entry.zaid) {
            bail!(
                "Expected {} at {}:{}, found {}",
                entry.zaid,
                path.display(),
                entry.address,
                table.header.zaid
            );
        }

        Ok(table)
    }
}

/// Read the next line or explain what was missing
fn next_line<B: BufRead>(lines: &mut Lines<B>, what: &str) -> Result<String> {
    lines
        .next()
        .transpose()?
        .ok_or_else(|| anyhow!("Unexpected end of file reading {what}"))
}

/// Parse every whitespace separated token of some joined lines
fn tokens<T: FromStr>(text: &str, what: &str) -> Result<Vec<T>> {
    text.split_whitespace()
        .map(|token| {
            token
                .parse::<T>()
                .map_err(|_| anyhow!("Unreadable {what} value '{token}'"))
        })
        .collect()
}

/// Read `n` lines and join them for tokenising
fn joined_lines<B: BufRead>(lines: &mut Lines<B>, n: usize, what: &str) -> Result<String> {
    let mut text = String::new();
    for _ in 0..n {
        text += &next_line(lines, what)?;
        text.push(' ');
    }
    Ok(text)
}

fn read_header<B: BufRead>(lines: &mut Lines<B>) -> Result<AceHeader> {
    let first = next_line(lines, "the first header line")?;
    let words: Vec<&str> = first.split_whitespace().collect();

    // legacy headers have at least four words on the first line
    let mut header = match words.len() {
        0 => bail!("Empty first header line"),
        1..=3 => read_new_style(lines, &words)?,
        _ => read_legacy(lines, &words)?,
    };

    let izaw = joined_lines(lines, 4, "IZ/AW pairs")?;
    let izaw: Vec<&str> = izaw.split_whitespace().collect();
    header.izaw = izaw
        .chunks(2)
        .map(|pair| match pair {
            [iz, aw] => Ok((tokens::<i64>(iz, "IZ")?[0], tokens::<f64>(aw, "AW")?[0])),
            _ => Err(anyhow!("Odd number of IZ/AW values")),
        })
        .collect::<Result<_>>()?;

    header.nxs = tokens(&joined_lines(lines, 2, "NXS")?, "NXS")?;
    if header.nxs.len() != 16 {
        bail!("Expected 16 NXS values, found {}", header.nxs.len());
    }

    header.jxs = tokens(&joined_lines(lines, 4, "JXS")?, "JXS")?;
    if header.jxs.len() != 32 {
        bail!("Expected 32 JXS values, found {}", header.jxs.len());
    }

    Ok(header)
}

/// `<zaid> <awr> <temperature> <date>` then the comment and mat line
fn read_legacy<B: BufRead>(lines: &mut Lines<B>, words: &[&str]) -> Result<AceHeader> {
    let second = next_line(lines, "the comment line")?;
    let split = second
        .char_indices()
        .nth(70)
        .map(|(i, _)| i)
        .unwrap_or(second.len());
    let (comment, mat) = second.split_at(split);

    Ok(AceHeader {
        version: None,
        zaid: words[0].to_string(),
        source: None,
        awr: words[1]
            .parse()
            .map_err(|_| anyhow!("Unreadable AWR '{}'", words[1]))?,
        temperature: words[2]
            .parse()
            .map_err(|_| anyhow!("Unreadable temperature '{}'", words[2]))?,
        date: words[3].to_string(),
        comment: comment.trim().to_string(),
        mat: mat.trim().to_string(),
        izaw: Vec::new(),
        nxs: Vec::new(),
        jxs: Vec::new(),
    })
}

/// `<version> <zaid> <source>` then values and the comment lines
fn read_new_style<B: BufRead>(lines: &mut Lines<B>, words: &[&str]) -> Result<AceHeader> {
    if words.len() < 2 {
        bail!("Expected version and zaid on the first header line");
    }

    let second = next_line(lines, "the second header line")?;
    let values: Vec<&str> = second.split_whitespace().collect();
    let [awr, temperature, date, n_comments] = values[..] else {
        bail!("Expected 4 values on the second header line, found {}", values.len());
    };

    let n_comments: usize = n_comments
        .parse()
        .map_err(|_| anyhow!("Unreadable number of comment lines '{n_comments}'"))?;

    let comment = (0..n_comments)
        .map(|_| next_line(lines, "comment lines").map(|l| l.trim().to_string()))
        .collect::<Result<Vec<String>>>()?
        .join("\n");

    Ok(AceHeader {
        version: Some(words[0].to_string()),
        zaid: words[1].to_string(),
        source: words.get(2).map(|s| s.to_string()),
        awr: awr.parse().map_err(|_| anyhow!("Unreadable AWR '{awr}'"))?,
        temperature: temperature
            .parse()
            .map_err(|_| anyhow!("Unreadable temperature '{temperature}'"))?,
        date: date.to_string(),
        comment,
        mat: String::new(),
        izaw: Vec::new(),
        nxs: Vec::new(),
        jxs: Vec::new(),
    })
}

/// Read the first `count` values of the XSS array
fn read_xss<B: BufRead>(lines: &mut Lines<B>, count: usize) -> Result<Vec<f64>> {
    // NXS(1) comes from the file, so it is not trusted for the allocation
    let mut xss = Vec::with_capacity(count.min(XSS_RESERVE));
    while xss.len() < count {
        let line = next_line(lines, "the XSS array")?;
        for value in tokens::<f64>(&line, "XSS")? {
            if xss.len() == count {
                break;
            }
            xss.push(value);
        }
    }
    Ok(xss)
}
