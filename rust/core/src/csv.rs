// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CSV tokenizer and writer using nom
//!
//! Handles the dialect produced by schedule exports: comma separated, double
//! quoted fields that may span lines, `""` escapes, optional UTF-8 BOM, and
//! `\n` or `\r\n` record terminators.

use std::borrow::Cow;
use std::io::{self, Write};

use nom::{
    branch::alt,
    bytes::complete::take_till,
    character::complete::{char, line_ending},
    combinator::{cut, eof, map},
    error::ErrorKind,
    multi::separated_list1,
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::{Error, Result};

const BOM: char = '\u{feff}';

/// Parse quoted field content up to the closing quote.
/// A doubled quote is an escaped quote, not the end of the field.
fn quoted_content(input: &str) -> IResult<&str, &str> {
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'"' {
            if i + 1 < bytes.len() && bytes[i + 1] == b'"' {
                i += 2;
                continue;
            }
            return Ok((&input[i..], &input[..i]));
        }
        i += 1;
    }

    // Hitting the end of input inside quotes is not recoverable
    Err(nom::Err::Failure(nom::error::Error::new(input, ErrorKind::Char)))
}

/// Parse quoted field: "text", "say ""hi""", "multi\nline"
fn quoted_field(input: &str) -> IResult<&str, Cow<'_, str>> {
    map(
        preceded(char('"'), cut(terminated(quoted_content, char('"')))),
        |raw: &str| {
            if raw.contains("\"\"") {
                Cow::Owned(raw.replace("\"\"", "\""))
            } else {
                Cow::Borrowed(raw)
            }
        },
    )(input)
}

/// Parse unquoted field (possibly empty)
fn bare_field(input: &str) -> IResult<&str, Cow<'_, str>> {
    map(
        take_till(|c: char| c == ',' || c == '\n' || c == '\r'),
        Cow::Borrowed,
    )(input)
}

fn field(input: &str) -> IResult<&str, Cow<'_, str>> {
    alt((quoted_field, bare_field))(input)
}

/// Parse one record including its terminator
fn record(input: &str) -> IResult<&str, Vec<Cow<'_, str>>> {
    terminated(
        separated_list1(char(','), field),
        alt((line_ending, eof)),
    )(input)
}

fn blank_line(input: &str) -> IResult<&str, &str> {
    line_ending(input)
}

/// Streaming record reader over CSV text.
///
/// Blank lines between records are skipped. Line numbers are 1-based and
/// count physical lines, so quoted fields spanning lines advance them.
pub struct RecordReader<'a> {
    content: &'a str,
    position: usize,
    line: usize,
}

impl<'a> RecordReader<'a> {
    pub fn new(content: &'a str) -> Self {
        let content = content.strip_prefix(BOM).unwrap_or(content);
        Self {
            content,
            position: 0,
            line: 1,
        }
    }

    /// Line on which the next record starts.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Read the next record. Returns `None` at end of input.
    ///
    /// After an error the reader is exhausted.
    pub fn next_record(&mut self) -> Option<Result<Vec<Cow<'a, str>>>> {
        loop {
            let rest = &self.content[self.position..];
            if rest.is_empty() {
                return None;
            }
            match blank_line(rest) {
                Ok((after, _)) => {
                    self.position += rest.len() - after.len();
                    self.line += 1;
                }
                Err(_) => break,
            }
        }

        let rest = &self.content[self.position..];
        let start_line = self.line;

        match record(rest) {
            Ok((after, fields)) => {
                let consumed = &rest[..rest.len() - after.len()];
                self.line += consumed.matches('\n').count();
                self.position += consumed.len();
                Some(Ok(fields))
            }
            Err(err) => {
                self.position = self.content.len();
                let error = match err {
                    nom::Err::Failure(_) => {
                        Error::malformed(start_line, "unterminated quoted field")
                    }
                    nom::Err::Error(e) => {
                        let offset = rest.len() - e.input.len();
                        let line = start_line + rest[..offset].matches('\n').count();
                        Error::malformed(line, "unexpected character after quoted field")
                    }
                    nom::Err::Incomplete(_) => Error::malformed(start_line, "incomplete record"),
                };
                Some(Err(error))
            }
        }
    }
}

impl<'a> Iterator for RecordReader<'a> {
    type Item = Result<Vec<Cow<'a, str>>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}

/// A parsed CSV table: raw header cells and data rows.
///
/// Every row has exactly `headers.len()` cells; short rows are padded with
/// empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Parse CSV text with a header row.
pub fn parse_csv(content: &str) -> Result<CsvTable> {
    let mut reader = RecordReader::new(content);

    let headers: Vec<String> = match reader.next_record() {
        Some(header) => header?.into_iter().map(Cow::into_owned).collect(),
        None => return Err(Error::malformed(1, "no header row")),
    };

    let mut rows = Vec::new();
    loop {
        let line = reader.line();
        let fields = match reader.next_record() {
            Some(fields) => fields?,
            None => break,
        };

        if fields.len() > headers.len() {
            return Err(Error::malformed(
                line,
                format!(
                    "row has {} fields but the header has {}",
                    fields.len(),
                    headers.len()
                ),
            ));
        }

        let mut row: Vec<String> = fields.into_iter().map(Cow::into_owned).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(CsvTable { headers, rows })
}

/// Whether a field has to be quoted on output.
#[inline]
fn needs_quotes(field: &str) -> bool {
    field.contains(|c: char| c == ',' || c == '"' || c == '\n' || c == '\r')
}

/// Write one CSV record terminated by `\n`, quoting only where needed.
pub fn write_record<W, I, S>(out: &mut W, fields: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        let field = field.as_ref();
        if needs_quotes(field) {
            out.write_all(b"\"")?;
            out.write_all(field.replace('"', "\"\"").as_bytes())?;
            out.write_all(b"\"")?;
        } else {
            out.write_all(field.as_bytes())?;
        }
    }
    out.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_field() {
        assert_eq!(quoted_field("\"hello\""), Ok(("", Cow::Borrowed("hello"))));
        assert_eq!(
            quoted_field("\"say \"\"hi\"\"\",x"),
            Ok((",x", Cow::Owned("say \"hi\"".to_string())))
        );
        assert_eq!(quoted_field("\"a,b\""), Ok(("", Cow::Borrowed("a,b"))));
        assert!(matches!(quoted_field("\"open"), Err(nom::Err::Failure(_))));
    }

    #[test]
    fn test_bare_field() {
        assert_eq!(bare_field("abc,def"), Ok((",def", Cow::Borrowed("abc"))));
        assert_eq!(bare_field(",def"), Ok((",def", Cow::Borrowed(""))));
        assert_eq!(bare_field("12\" pipe\n"), Ok(("\n", Cow::Borrowed("12\" pipe"))));
    }

    #[test]
    fn test_record() {
        let (rest, fields) = record("a,,\"c\"\r\nnext").unwrap();
        assert_eq!(rest, "next");
        assert_eq!(fields, vec!["a", "", "c"]);

        let (rest, fields) = record("only").unwrap();
        assert_eq!(rest, "");
        assert_eq!(fields, vec!["only"]);
    }

    #[test]
    fn test_parse_csv_multiline_header() {
        let content = "\u{feff}\"Element\nArea\",Document Title\n12.5,Roof A\n\n7,\"Roof, B\"\n";
        let table = parse_csv(content).unwrap();
        assert_eq!(table.headers, vec!["Element\nArea", "Document Title"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["7", "Roof, B"]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = parse_csv("a,b,c\n1\n1,2,3\n").unwrap();
        assert_eq!(table.rows[0], vec!["1", "", ""]);
        assert_eq!(table.rows[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_long_row_is_malformed() {
        let err = parse_csv("a,b\n1,2\n1,2,3\n").unwrap_err();
        match err {
            Error::MalformedInput { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("3 fields"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_quote_is_malformed() {
        let err = parse_csv("a,b\n1,\"open\n2,3\n").unwrap_err();
        assert!(matches!(err, Error::MalformedInput { line: 2, .. }));
    }

    #[test]
    fn test_junk_after_quote_is_malformed() {
        let err = parse_csv("a\n\"x\ny\"z\n").unwrap_err();
        assert!(matches!(err, Error::MalformedInput { line: 3, .. }));
    }

    #[test]
    fn test_empty_input_has_no_header() {
        assert!(matches!(
            parse_csv(""),
            Err(Error::MalformedInput { line: 1, .. })
        ));
    }

    #[test]
    fn test_line_numbers_follow_multiline_fields() {
        let mut reader = RecordReader::new("h\n\"a\nb\"\n\nc\n");
        assert_eq!(reader.line(), 1);
        reader.next_record().unwrap().unwrap();
        assert_eq!(reader.line(), 2);
        reader.next_record().unwrap().unwrap();
        assert_eq!(reader.line(), 4);
        let last = reader.next_record().unwrap().unwrap();
        assert_eq!(last, vec!["c"]);
        assert!(reader.next_record().is_none());
    }

    #[test]
    fn test_write_record_quotes_when_needed() {
        let mut out = Vec::new();
        write_record(&mut out, ["plain", "a,b", "say \"hi\"", "two\nlines", ""]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "plain,\"a,b\",\"say \"\"hi\"\"\",\"two\nlines\",\n"
        );
    }

    #[test]
    fn test_written_records_parse_back() {
        let rows = [["Roof, A", "15"], ["say \"x\"", ""]];
        let mut out = Vec::new();
        write_record(&mut out, ["Document Title", "Element Slope"]).unwrap();
        for row in &rows {
            write_record(&mut out, row).unwrap();
        }

        let table = parse_csv(std::str::from_utf8(&out).unwrap()).unwrap();
        assert_eq!(table.rows[0], vec!["Roof, A", "15"]);
        assert_eq!(table.rows[1], vec!["say \"x\"", ""]);
    }
}
