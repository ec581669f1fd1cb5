//! Nom parsers and quick checks for xsdir and ACE lines
//!
//! Functions prefixed with `is_` are cheap checks used to decide what a line
//! is before bothering to parse it properly.

// external crates
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while1, take_while_m_n};
use nom::character::complete::{alpha1, char, digit0, space0, space1};
use nom::combinator::{all_consuming, rest, verify};
use nom::multi::many0;
use nom::number::complete::double;
use nom::sequence::{preceded, separated_pair, terminated, tuple};
use nom::IResult;

/// Marker line for the start of the atomic weight ratio table
pub fn is_awr_header(i: &str) -> bool {
    i.trim().eq_ignore_ascii_case("atomic weight ratios")
}

/// Marker line for the start of the directory listing
pub fn is_directory_header(i: &str) -> bool {
    i.trim().eq_ignore_ascii_case("directory")
}

/// A date line such as `12/17/12`, which ends the atomic weight ratios
pub fn is_date_line(i: &str) -> bool {
    date(i.trim()).is_ok()
}

/// Lines ending in `+` are continued on the next line
pub fn is_continued(i: &str) -> bool {
    i.trim_end().ends_with('+')
}

/// Matches `mm/dd/yy` or `mm/dd/yyyy` followed by nothing but whitespace
pub fn date(i: &str) -> IResult<&str, &str> {
    let (i, _) = tuple((
        two_digits,
        char('/'),
        two_digits,
        char('/'),
        take_while_m_n(2, 4, |c: char| c.is_ascii_digit()),
    ))(i)?;
    all_consuming(space0)(i)
}

fn two_digits(i: &str) -> IResult<&str, &str> {
    take_while_m_n(2, 2, |c: char| c.is_ascii_digit())(i)
}

/// Path from a `datapath=/some/path` line, case-insensitive and `=` optional
pub fn datapath(i: &str) -> IResult<&str, &str> {
    let (i, _) = tuple((
        space0,
        tag_no_case("datapath"),
        alt((preceded(space0, tag("=")), space1)),
        space0,
    ))(i)?;
    let (i, path) = rest(i)?;
    let path = path.trim();
    if path.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            i,
            nom::error::ErrorKind::Eof,
        )));
    }
    Ok((i, path))
}

/// Any number of whitespace separated `ZA AWR` pairs filling the line
pub fn awr_pairs(i: &str) -> IResult<&str, Vec<(u32, f64)>> {
    all_consuming(terminated(
        many0(preceded(
            space0,
            separated_pair(nom::character::complete::u32, space1, finite),
        )),
        space0,
    ))(i)
}

/// Split a ZAID into (ZA, library number, library type)
///
/// The library type is every trailing letter, so `1001.710nc` gives
/// `("1001", "710", "nc")` and S(a,b) names such as `lwtr.20t` are accepted.
pub fn zaid(i: &str) -> IResult<&str, (&str, &str, &str)> {
    all_consuming(tuple((
        terminated(take_while1(|c: char| c != '.' && !c.is_whitespace()), char('.')),
        digit0,
        alpha1,
    )))(i)
}

/// A whole token as a non-negative integer
pub fn integer(i: &str) -> IResult<&str, u64> {
    all_consuming(nom::character::complete::u64)(i)
}

/// A whole token as a floating point number
pub fn real(i: &str) -> IResult<&str, f64> {
    all_consuming(finite)(i)
}

/// `double` without the `nan` and `inf` spellings
fn finite(i: &str) -> IResult<&str, f64> {
    verify(double, |v: &f64| v.is_finite())(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("atomic weight ratios", true)]
    #[case("  ATOMIC WEIGHT RATIOS  ", true)]
    #[case("atomic weight", false)]
    fn awr_header(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_awr_header(line), expected);
    }

    #[rstest]
    #[case("directory", true)]
    #[case(" Directory ", true)]
    #[case("directory listing", false)]
    fn directory_header(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_directory_header(line), expected);
    }

    #[rstest]
    #[case("  12/17/12", true)]
    #[case("04/15/2013  ", true)]
    #[case("1/1/12", false)]
    #[case("12/17/12 extra", false)]
    #[case("1001 0.999167", false)]
    fn date_lines(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_date_line(line), expected);
    }

    #[rstest]
    #[case("datapath=/opt/data", "/opt/data")]
    #[case("DATAPATH = /opt/data ", "/opt/data")]
    #[case("datapath /opt/data", "/opt/data")]
    fn datapath_lines(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(datapath(line).unwrap().1, expected);
    }

    #[test]
    fn datapath_needs_a_path() {
        assert!(datapath("datapath=").is_err());
        assert!(datapath("directory").is_err());
    }

    #[test]
    fn awr_pair_lines() {
        let (_, pairs) = awr_pairs("   1001  0.999167   1002  1.996800").unwrap();
        assert_eq!(pairs, vec![(1001, 0.999167), (1002, 1.9968)]);
        assert!(awr_pairs("1001 0.999167 1002").is_err());
        assert!(awr_pairs("1001 abc").is_err());
        assert!(awr_pairs("1001 nan").is_err());
        assert!(awr_pairs("1001 0.999167 1002 inf").is_err());
    }

    #[rstest]
    #[case("1001.80c", ("1001", "80", "c"))]
    #[case("1001.710nc", ("1001", "710", "nc"))]
    #[case("lwtr.20t", ("lwtr", "20", "t"))]
    #[case("h-h2o.40t", ("h-h2o", "40", "t"))]
    #[case("9999.01zz", ("9999", "01", "zz"))]
    fn zaid_parts(#[case] token: &str, #[case] expected: (&str, &str, &str)) {
        assert_eq!(zaid(token).unwrap().1, expected);
    }

    #[rstest]
    #[case("1001")]
    #[case("1001.80")]
    #[case(".80c")]
    #[case("1001.80c1")]
    fn bad_zaids(#[case] token: &str) {
        assert!(zaid(token).is_err());
    }

    #[test]
    fn numbers() {
        assert_eq!(integer("17969").unwrap().1, 17969);
        assert!(integer("1.5").is_err());
        assert_eq!(real("2.5301E-08").unwrap().1, 2.5301e-08);
        assert!(real("0.99x").is_err());
    }

    #[rstest]
    #[case("nan")]
    #[case("NaN")]
    #[case("inf")]
    #[case("-infinity")]
    fn non_finite_reals(#[case] token: &str) {
        assert!(real(token).is_err());
    }
}
