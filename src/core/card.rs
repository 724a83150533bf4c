use std::fmt::{self, Write};

use tracing::debug;

use crate::core::encoding::{
    COLS, ColumnMask, EncodeError, ExtendedBcd, FIRST_DIGIT_ROW, PunchEncoding, ROW_LABELS, ROWS,
    adjust_row,
};
use crate::core::error::CardError;

/// Character marking a punched cell in the text card format.
pub const PUNCH: char = 'X';

/// A 12x80 punch card, stored column by column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    columns: [ColumnMask; COLS],
}

/// Table coordinates resolved for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnReading {
    zone: usize,
    digit: usize,
    punches: usize,
}

impl Default for Card {
    fn default() -> Self {
        Self::new()
    }
}

impl Card {
    /// A card with no punches.
    pub fn new() -> Self {
        Self {
            columns: [ColumnMask::EMPTY; COLS],
        }
    }

    /// Encode up to 80 characters of `text`, one character per column.
    pub fn from_text<E: PunchEncoding + ?Sized>(enc: &E, text: &str) -> Result<Self, EncodeError> {
        let len = text.chars().count();
        if len > COLS {
            return Err(EncodeError::TooLong { len, max: COLS });
        }
        let mut card = Self::new();
        for (idx, ch) in text.chars().enumerate() {
            card.columns[idx] = enc.encode_char(ch)?;
        }
        Ok(card)
    }

    pub fn columns(&self) -> &[ColumnMask; COLS] {
        &self.columns
    }

    pub fn column(&self, col: usize) -> Option<ColumnMask> {
        self.columns.get(col).copied()
    }

    pub fn is_punched(&self, row: usize, col: usize) -> bool {
        self.column(col).is_some_and(|mask| mask.is_punched(row))
    }

    pub fn punch(&mut self, row: usize, col: usize, punched: bool) -> Result<(), CardError> {
        if row >= ROWS || col >= COLS {
            return Err(CardError::OutOfBounds { row, column: col });
        }
        self.columns[col].set(row, punched);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.columns = [ColumnMask::EMPTY; COLS];
    }

    /// Punch every row of column 0, turning this card into the end-of-deck marker.
    pub fn mark_last(&mut self) {
        self.columns[0] = ColumnMask::FULL;
    }

    /// Replace physical row `row` with the contents of one text line.
    ///
    /// `X` punches a cell; everything else, and any column past the end of a
    /// short line, is blank. Strict mode rejects other characters and lines
    /// wider than the card instead.
    pub fn fill_row(&mut self, row: usize, line: &str, strict: bool) -> Result<(), CardError> {
        if !strict {
            return self.fill_row_bytes(row, line.as_bytes());
        }
        let Some(&label) = ROW_LABELS.get(row) else {
            return Err(CardError::OutOfBounds { row, column: 0 });
        };
        let len = line.chars().count();
        if len > COLS {
            return Err(CardError::LineTooLong { row: label, len });
        }
        for mask in &mut self.columns {
            mask.set(row, false);
        }
        for (col, ch) in line.chars().enumerate() {
            match ch {
                PUNCH => self.columns[col].set(row, true),
                ' ' => {}
                other => {
                    return Err(CardError::UnexpectedChar {
                        row: label,
                        column: col + 1,
                        ch: other,
                    });
                }
            }
        }
        Ok(())
    }

    /// Permissive fill from raw input bytes, one byte per column.
    ///
    /// Only `b'X'` punches. Bytes that are not valid text read as blank like
    /// any other noise.
    pub fn fill_row_bytes(&mut self, row: usize, line: &[u8]) -> Result<(), CardError> {
        let Some(&label) = ROW_LABELS.get(row) else {
            return Err(CardError::OutOfBounds { row, column: 0 });
        };
        if line.len() > COLS {
            debug!(row = label, len = line.len(), "ignoring columns past 80");
        }
        for mask in &mut self.columns {
            mask.set(row, false);
        }
        for (col, &byte) in line.iter().take(COLS).enumerate() {
            match byte {
                b'X' => self.columns[col].set(row, true),
                b' ' => {}
                other => debug!(row = label, column = col + 1, byte = other, "treating as blank"),
            }
        }
        Ok(())
    }

    /// A card whose first column is punched in all twelve rows ends the deck.
    pub fn is_last_card(&self) -> bool {
        self.columns[0] == ColumnMask::FULL
    }

    /// Decoded text followed by a newline.
    pub fn decode(&self) -> String {
        let mut line = self.decode_with(&ExtendedBcd);
        line.push('\n');
        line
    }

    /// Decoded 80 characters without the line terminator.
    ///
    /// Columns with more than two punches keep the first two; columns that
    /// resolve outside the table come out blank.
    pub fn decode_with<E: PunchEncoding + ?Sized>(&self, enc: &E) -> String {
        let mut out = String::with_capacity(COLS + 1);
        let start = self.first_data_column(&mut out);
        for col in start..COLS {
            let reading = read_column(self.columns[col]);
            if reading.punches > 2 {
                debug!(column = col + 1, punches = reading.punches, "extra punches ignored");
            }
            match enc.lookup(reading.zone, reading.digit) {
                Some(ch) => out.push(ch),
                None => {
                    debug!(
                        column = col + 1,
                        zone = reading.zone,
                        digit = reading.digit,
                        "no table entry, column left blank"
                    );
                    out.push(' ');
                }
            }
        }
        out
    }

    /// Like [`Card::decode`], but fails on columns the permissive decoder would
    /// silently lose information on.
    pub fn decode_strict(&self) -> Result<String, CardError> {
        let enc = ExtendedBcd;
        let mut out = String::with_capacity(COLS + 1);
        let start = self.first_data_column(&mut out);
        for col in start..COLS {
            let reading = read_column(self.columns[col]);
            if reading.punches > 2 {
                return Err(CardError::TooManyPunches {
                    column: col + 1,
                    count: reading.punches,
                });
            }
            let ch = enc
                .lookup(reading.zone, reading.digit)
                .ok_or(CardError::UnmappedColumn {
                    column: col + 1,
                    zone: reading.zone,
                    digit: reading.digit,
                })?;
            out.push(ch);
        }
        out.push('\n');
        Ok(out)
    }

    /// Rows in the text card format, trailing blanks trimmed.
    pub fn to_rows(&self) -> Vec<String> {
        (0..ROWS)
            .map(|row| {
                let line: String = self
                    .columns
                    .iter()
                    .map(|mask| if mask.is_punched(row) { PUNCH } else { ' ' })
                    .collect();
                line.trim_end().to_string()
            })
            .collect()
    }

    pub fn render(&self, style: RenderStyle) -> String {
        match style {
            RenderStyle::AsciiX => self.render_ascii('X', ' '),
            RenderStyle::Ascii01 => self.render_ascii('1', '0'),
        }
    }

    fn render_ascii(&self, mark: char, blank: char) -> String {
        let mut out = String::with_capacity(16 * COLS);
        let marker = if self.is_last_card() { " [last card]" } else { "" };
        writeln!(&mut out, "80-column card [extended BCD]{}", marker).ok();
        writeln!(&mut out, "     {}", ruler_line()).ok();
        writeln!(&mut out, "     {}", self.decode_with(&ExtendedBcd)).ok();
        let separator = "-".repeat(COLS);
        writeln!(&mut out, "     {}", separator).ok();
        for (row, label) in ROW_LABELS.iter().enumerate() {
            write!(&mut out, "{:>3} |", label).ok();
            for mask in &self.columns {
                out.push(if mask.is_punched(row) { mark } else { blank });
            }
            writeln!(&mut out, "|").ok();
        }
        writeln!(&mut out, "     {}", separator).ok();
        out
    }

    /// The end-of-deck marker column is never decoded; it reads as a space.
    fn first_data_column(&self, out: &mut String) -> usize {
        if self.is_last_card() {
            out.push(' ');
            1
        } else {
            0
        }
    }
}

/// Resolve a column to table coordinates, looking at its first two punches only.
fn read_column(mask: ColumnMask) -> ColumnReading {
    let mut coords = [0usize; 2];
    let mut found = 0;
    let mut last_row = 0;
    for row in mask.rows() {
        if found == coords.len() {
            break;
        }
        coords[found] = adjust_row(row);
        last_row = row;
        found += 1;
    }
    // a lone digit punch reads from the zone-0 row of the table
    if found == 1 && last_row >= FIRST_DIGIT_ROW {
        coords = [0, coords[0]];
    }
    ColumnReading {
        zone: coords[0],
        digit: coords[1],
        punches: mask.count(),
    }
}

fn ruler_line() -> String {
    let mut ruler = String::with_capacity(COLS);
    for col in 1..=COLS {
        if col % 10 == 0 {
            let digit = ((col / 10) % 10) as u8;
            ruler.push(char::from(b'0' + digit));
        } else {
            ruler.push('.');
        }
    }
    ruler
}

/// ASCII rendering styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStyle {
    /// `X` for punched, blank otherwise
    AsciiX,
    /// `1` for punched, `0` otherwise
    Ascii01,
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStyle::AsciiX => write!(f, "ascii-x"),
            RenderStyle::Ascii01 => write!(f, "ascii-01"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn padded(text: &str) -> String {
        format!("{:<80}\n", text)
    }

    fn card_with(punches: &[(usize, usize)]) -> Card {
        let mut card = Card::new();
        for &(row, col) in punches {
            card.punch(row, col, true).unwrap();
        }
        card
    }

    #[test]
    fn blank_card_decodes_to_spaces() {
        let card = Card::new();
        assert!(!card.is_last_card());
        assert_eq!(card.decode(), padded(""));
    }

    #[test]
    fn full_first_column_marks_last_card() {
        let mut card = Card::new();
        card.mark_last();
        assert!(card.is_last_card());
        assert_eq!(card.decode(), padded(""));
    }

    #[test]
    fn eleven_punches_in_first_column_is_not_last() {
        let punches: Vec<_> = (0..11).map(|row| (row, 0)).collect();
        let card = card_with(&punches);
        assert!(!card.is_last_card());
    }

    #[test]
    fn single_punches_decode_by_row() {
        assert_eq!(card_with(&[(3, 0)]).decode(), padded("1"));
        assert_eq!(card_with(&[(11, 0)]).decode(), padded("9"));
        assert_eq!(card_with(&[(0, 0)]).decode(), padded("&"));
        assert_eq!(card_with(&[(1, 0)]).decode(), padded("-"));
        assert_eq!(card_with(&[(2, 0)]).decode(), padded("0"));
    }

    #[test]
    fn zone_and_digit_punches_decode_to_letters() {
        assert_eq!(card_with(&[(0, 0), (3, 0)]).decode(), padded("A"));
        assert_eq!(card_with(&[(1, 0), (11, 0)]).decode(), padded("R"));
        assert_eq!(card_with(&[(2, 0), (3, 0)]).decode(), padded("/"));
        assert_eq!(card_with(&[(2, 0), (11, 0)]).decode(), padded("Z"));
    }

    #[test]
    fn digit_rows_one_and_two_read_as_zone_one_digit_two() {
        // rows "1" and "2" adjust to (1, 2)
        let card = card_with(&[(3, 0), (4, 0)]);
        assert_eq!(card.decode(), padded("B"));
        assert_eq!(card.decode_strict().unwrap(), padded("B"));
    }

    #[test]
    fn third_punch_in_a_column_is_ignored() {
        let card = card_with(&[(0, 4), (3, 4), (7, 4)]);
        assert_eq!(card.decode(), padded("    A"));
        assert!(matches!(
            card.decode_strict(),
            Err(CardError::TooManyPunches { column: 5, count: 3 })
        ));
    }

    #[test]
    fn digit_pairs_outside_the_table_read_blank() {
        // digit rows 4 and 5 resolve to (4, 5)
        let card = card_with(&[(6, 0), (7, 0), (3, 1)]);
        assert_eq!(card.decode(), padded(" 1"));
        assert!(matches!(
            card.decode_strict(),
            Err(CardError::UnmappedColumn { column: 1, zone: 4, digit: 5 })
        ));
    }

    #[test]
    fn last_card_skips_first_column() {
        let mut card = card_with(&[(0, 1), (3, 1)]);
        card.mark_last();
        assert_eq!(card.decode(), padded(" A"));
        assert_eq!(card.decode_strict().unwrap(), padded(" A"));
    }

    #[test]
    fn decoding_twice_is_identical() {
        let card = Card::from_text(&ExtendedBcd, " HELLO 42").unwrap();
        assert_eq!(card.decode(), card.decode());
        assert_eq!(card.decode(), padded(" HELLO 42"));
    }

    #[test]
    fn fill_row_pads_short_lines_and_ignores_noise() {
        let mut card = Card::new();
        card.fill_row(0, "X  X", false).unwrap();
        card.fill_row(3, " .X", false).unwrap();
        assert!(card.is_punched(0, 0));
        assert!(card.is_punched(0, 3));
        assert!(!card.is_punched(3, 1));
        assert!(card.is_punched(3, 2));
        assert!(!card.is_punched(0, 79));
    }

    #[test]
    fn fill_row_bytes_reads_invalid_text_as_blank() {
        let mut card = Card::new();
        card.fill_row_bytes(0, b"X\xE9X\xFF\xFEX").unwrap();
        assert!(card.is_punched(0, 0));
        assert!(!card.is_punched(0, 1));
        assert!(card.is_punched(0, 2));
        assert!(!card.is_punched(0, 3));
        assert!(!card.is_punched(0, 4));
        assert!(card.is_punched(0, 5));
        assert!(matches!(
            card.fill_row_bytes(12, b"X"),
            Err(CardError::OutOfBounds { row: 12, .. })
        ));
    }

    #[test]
    fn fill_row_overwrites_previous_contents() {
        let mut card = Card::new();
        card.fill_row(5, &"X".repeat(80), false).unwrap();
        card.fill_row(5, "", false).unwrap();
        assert_eq!(card, Card::new());
    }

    #[test]
    fn strict_fill_rejects_noise_and_long_lines() {
        let mut card = Card::new();
        assert!(matches!(
            card.fill_row(2, "X x", true),
            Err(CardError::UnexpectedChar { row: "0", column: 3, ch: 'x' })
        ));
        assert!(matches!(
            card.fill_row(4, &" ".repeat(81), true),
            Err(CardError::LineTooLong { row: "2", len: 81 })
        ));
        card.fill_row(4, &" ".repeat(81), false).unwrap();
    }

    #[test]
    fn punch_checks_bounds() {
        let mut card = Card::new();
        assert!(matches!(
            card.punch(12, 0, true),
            Err(CardError::OutOfBounds { row: 12, column: 0 })
        ));
        assert!(card.punch(0, 80, true).is_err());
        assert!(!card.is_punched(0, 80));
    }

    #[test]
    fn text_round_trips_through_rows() {
        let card = Card::from_text(&ExtendedBcd, "JOSH").unwrap();
        let mut copy = Card::new();
        for (row, line) in card.to_rows().iter().enumerate() {
            copy.fill_row(row, line, true).unwrap();
        }
        assert_eq!(copy, card);
    }

    #[test]
    fn from_text_rejects_overlong_text() {
        let text = "A".repeat(81);
        assert_eq!(
            Card::from_text(&ExtendedBcd, &text),
            Err(EncodeError::TooLong { len: 81, max: 80 })
        );
    }

    #[test]
    fn render_labels_rows_and_shows_text() {
        let card = Card::from_text(&ExtendedBcd, "A").unwrap();
        let rendered = card.render(RenderStyle::Ascii01);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "80-column card [extended BCD]");
        assert_eq!(lines[2].trim_end(), "     A");
        assert!(lines[4].starts_with(" 12 |1000"));
        assert!(lines[7].starts_with("  1 |1000"));
        assert!(lines[8].starts_with("  2 |0000"));
    }
}
