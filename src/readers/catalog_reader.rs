use crate::error::{PtfError, Result};
use crate::models::{CatalogHeader, ParsedCatalog};
use crate::utils::constants::{
    DIRECTIVE_MARKER, HEADER_DELIMITER, HEADER_LINE_COUNT, MIN_DATA_TOKENS,
};
use std::fs;
use std::path::Path;

/// A pair of adjacent whitespace tokens that form one field.
///
/// The position names the first token of the pair; the second token is
/// appended to it with a single space and then dropped from the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMerge {
    FromStart(usize),
    FromEnd(usize),
}

impl TokenMerge {
    fn resolve(&self, len: usize) -> Option<usize> {
        match *self {
            TokenMerge::FromStart(index) => Some(index),
            TokenMerge::FromEnd(offset) => len.checked_sub(offset),
        }
    }
}

/// Column layout of the PTF level-1 search response:
/// `obsdate` is split at index 4/5 and the final field spans the last two tokens.
pub const PTF_TOKEN_MERGES: [TokenMerge; 2] = [TokenMerge::FromStart(4), TokenMerge::FromEnd(2)];

pub struct CatalogReader {
    merges: Vec<TokenMerge>,
    min_data_tokens: usize,
}

impl CatalogReader {
    pub fn new() -> Self {
        Self {
            merges: PTF_TOKEN_MERGES.to_vec(),
            min_data_tokens: MIN_DATA_TOKENS,
        }
    }

    pub fn with_merges(merges: Vec<TokenMerge>, min_data_tokens: usize) -> Self {
        Self {
            merges,
            min_data_tokens,
        }
    }

    /// Parse a catalog response saved to disk
    pub fn read_catalog(&self, path: &Path) -> Result<ParsedCatalog> {
        let text = fs::read_to_string(path)?;
        self.parse(&text)
    }

    /// Split a search response into header fields and merged data rows.
    ///
    /// Lines containing `|` are header lines; the first three are taken as
    /// names, types and units and any further ones are ignored. Non-blank
    /// lines without a backslash are data. Everything else is skipped.
    pub fn parse(&self, text: &str) -> Result<ParsedCatalog> {
        let mut header_lines = Vec::with_capacity(HEADER_LINE_COUNT);
        let mut rows = Vec::new();

        for (line_index, line) in text.lines().enumerate() {
            if line.contains(HEADER_DELIMITER) {
                if header_lines.len() < HEADER_LINE_COUNT {
                    header_lines.push(Self::process_header_line(line));
                }
                continue;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.contains(DIRECTIVE_MARKER) {
                continue;
            }

            let row = self.process_data_line(line).map_err(|e| match e {
                PtfError::Parse(msg) => PtfError::Parse(format!("line {}: {}", line_index + 1, msg)),
                other => other,
            })?;
            rows.push(row);
        }

        if header_lines.len() < HEADER_LINE_COUNT {
            return Err(PtfError::Parse(format!(
                "Expected {} header lines (names, types, units), found {}",
                HEADER_LINE_COUNT,
                header_lines.len()
            )));
        }

        let mut header_lines = header_lines.into_iter();
        let header = CatalogHeader {
            names: header_lines.next().unwrap_or_default(),
            types: header_lines.next().unwrap_or_default(),
            units: header_lines.next().unwrap_or_default(),
        };

        Ok(ParsedCatalog { header, rows })
    }

    /// Split on `|` and drop the empty artifacts before the first and after the last delimiter
    pub fn process_header_line(line: &str) -> Vec<String> {
        let tokens: Vec<&str> = line.split(HEADER_DELIMITER).map(|s| s.trim()).collect();

        if tokens.len() < 2 {
            return Vec::new();
        }

        tokens[1..tokens.len() - 1]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Tokenize on whitespace and apply the merge table.
    ///
    /// An N-token line yields N - merges fields. Positions are resolved
    /// against the original token count, so merges whose pairs overlap (a
    /// 7-token PTF line) lose the later field.
    pub fn process_data_line(&self, line: &str) -> Result<Vec<String>> {
        let mut tokens: Vec<String> = line.split_whitespace().map(|s| s.to_string()).collect();
        let len = tokens.len();

        if len < self.min_data_tokens {
            return Err(PtfError::Parse(format!(
                "Data line has {} tokens, at least {} are required",
                len, self.min_data_tokens
            )));
        }

        let mut dropped = Vec::with_capacity(self.merges.len());
        for merge in &self.merges {
            let first = match merge.resolve(len) {
                Some(first) if first + 1 < len => first,
                _ => {
                    return Err(PtfError::Parse(format!(
                        "Merge {:?} is out of range for a {}-token line",
                        merge, len
                    )))
                }
            };
            tokens[first] = format!("{} {}", tokens[first], tokens[first + 1]);
            dropped.push(first + 1);
        }

        dropped.sort_unstable_by(|a, b| b.cmp(a));
        dropped.dedup();
        for index in dropped {
            tokens.remove(index);
        }

        Ok(tokens)
    }
}

impl Default for CatalogReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const RESPONSE: &str = "\\fixlen = T
\\RowsRetrieved =                 2
|  expid| ccdid| fid| ra       | obsdate                 | obsmjd     | pfilename           | afilename1          | process_status |
|  long |  int | int| double   | char                    | double     | char                | char                | char           |
|       |      |    | deg      |                         | d          |                     |                     |                |
|  null | null |null| null     | null                    | null       | null                | null                | null           |
   12345    5     2   150.10000  2009-03-01 08:41:19.235   54891.36203  p/2009/03/c05.fits   p/2009/03/c05.ctlg   OK VALID
   12346    6     1   150.20000  2009-03-02 09:00:00.000   54892.37500  p/2009/03/c06.fits   p/2009/03/c06.ctlg   OK VALID

";

    fn tokens(line: &str) -> Vec<String> {
        line.split(' ').map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_process_header_line() {
        let fields = CatalogReader::process_header_line("|  expid| ccdid | pfilename |");
        assert_eq!(fields, vec!["expid", "ccdid", "pfilename"]);

        assert_eq!(CatalogReader::process_header_line("||"), vec![""]);
        assert!(CatalogReader::process_header_line("|").is_empty());
    }

    #[test]
    fn test_process_data_line_merges_date_and_status() {
        let reader = CatalogReader::new();
        let line = "1 2 3 4 2020-01-01 12:00:00 x.fits y.ctlg OK VALID";
        let row = reader.process_data_line(line).unwrap();

        assert_eq!(row.len(), tokens(line).len() - 2);
        assert_eq!(row[4], "2020-01-01 12:00:00");
        assert_eq!(row[row.len() - 1], "OK VALID");
        assert_eq!(row[5], "x.fits");
    }

    #[test]
    fn test_process_data_line_with_seven_tokens() {
        let reader = CatalogReader::new();
        let row = reader
            .process_data_line("a b c d 2020-01-01 12:00:00 OK")
            .unwrap();

        // Overlapping merges: the trailing field is lost, width is still N - 2
        assert_eq!(row, vec!["a", "b", "c", "d", "2020-01-01 12:00:00"]);
    }

    #[test]
    fn test_process_data_line_too_short() {
        let reader = CatalogReader::new();
        let err = reader.process_data_line("a b c d e f").unwrap_err();
        assert!(matches!(err, PtfError::Parse(_)));
    }

    #[test]
    fn test_custom_merge_table() {
        let reader = CatalogReader::with_merges(vec![TokenMerge::FromStart(0)], 2);
        let row = reader.process_data_line("first second third").unwrap();
        assert_eq!(row, vec!["first second", "third"]);
    }

    #[test]
    fn test_parse_response() {
        let reader = CatalogReader::new();
        let parsed = reader.parse(RESPONSE).unwrap();

        assert_eq!(
            parsed.header.names,
            vec![
                "expid",
                "ccdid",
                "fid",
                "ra",
                "obsdate",
                "obsmjd",
                "pfilename",
                "afilename1",
                "process_status"
            ]
        );
        assert_eq!(parsed.header.types[3], "double");
        assert_eq!(parsed.header.units[3], "deg");
        assert_eq!(parsed.rows.len(), 2);

        for row in &parsed.rows {
            assert_eq!(row.len(), parsed.header.names.len());
        }
        assert_eq!(parsed.rows[0][4], "2009-03-01 08:41:19.235");
        assert_eq!(parsed.rows[1][8], "OK VALID");
    }

    #[test]
    fn test_parse_missing_header_lines() {
        let reader = CatalogReader::new();
        let text = "|a|b|\n|int|int|\n1 2 3 4 5 6 7 8\n";

        let err = reader.parse(text).unwrap_err();
        assert!(matches!(err, PtfError::Parse(ref msg) if msg.contains("found 2")));

        assert!(reader.parse("").is_err());
    }

    #[test]
    fn test_parse_reports_short_line_number() {
        let reader = CatalogReader::new();
        let text = "|a|\n|b|\n|c|\n\n1 2 3\n";

        let err = reader.parse(text).unwrap_err();
        assert!(matches!(err, PtfError::Parse(ref msg) if msg.starts_with("line 5")));
    }

    #[test]
    fn test_read_catalog_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        write!(temp_file, "{}", RESPONSE)?;

        let reader = CatalogReader::new();
        let parsed = reader.read_catalog(temp_file.path())?;

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0][0], "12345");

        Ok(())
    }
}
