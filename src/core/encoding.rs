use thiserror::Error;

/// Number of physical rows on a card: 12, 11, 0 and the digit rows 1..9.
pub const ROWS: usize = 12;
/// Number of columns on a card.
pub const COLS: usize = 80;

/// First physical row index that belongs to the digit rows ("1".."9").
pub const FIRST_DIGIT_ROW: usize = 3;

/// Printed labels of the physical rows, top to bottom.
pub const ROW_LABELS: [&str; ROWS] = [
    "12", "11", "0", "1", "2", "3", "4", "5", "6", "7", "8", "9",
];

/// Extended BCD lookup table indexed by `(zone, digit)`.
pub const EXTENDED_BCD: [[char; 10]; 4] = [
    [' ', '1', '2', '3', '4', '5', '6', '7', '8', '9'],
    ['&', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I'],
    ['-', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R'],
    ['0', '/', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z'],
];

/// Punched holes of a single column as a bitmask.
/// Bit `r` is set when physical row `r` is punched (bit0 = row 12, bit1 = row 11,
/// bit2 = row 0, bit3..bit11 = rows 1..9).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ColumnMask(pub u16);

impl ColumnMask {
    pub const EMPTY: ColumnMask = ColumnMask(0);
    pub const FULL: ColumnMask = ColumnMask((1 << ROWS) - 1);

    /// Mask with only `row` punched; empty for rows off the card.
    pub fn row(row: usize) -> Self {
        if row < ROWS {
            ColumnMask(1u16 << row)
        } else {
            ColumnMask::EMPTY
        }
    }

    pub fn is_punched(self, row: usize) -> bool {
        row < ROWS && (self.0 >> row) & 1 == 1
    }

    /// Rows off the card are ignored.
    pub fn set(&mut self, row: usize, punched: bool) {
        if row >= ROWS {
            return;
        }
        if punched {
            self.0 |= 1 << row;
        } else {
            self.0 &= !(1 << row);
        }
    }

    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Punched rows, top to bottom.
    pub fn rows(self) -> impl Iterator<Item = usize> {
        (0..ROWS).filter(move |&row| self.is_punched(row))
    }
}

impl std::ops::BitOr for ColumnMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        ColumnMask(self.0 | rhs.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("unsupported character: '{0}' (U+{1:04X})")]
    Unsupported(char, u32),
    #[error("card text must not exceed {max} columns (got {len})")]
    TooLong { len: usize, max: usize },
}

/// A punch code that maps characters to column masks and back.
pub trait PunchEncoding {
    fn name(&self) -> &'static str;
    fn encode_char(&self, ch: char) -> Result<ColumnMask, EncodeError>;
    /// Character at the given `(zone, digit)` coordinates, if the table has one.
    fn lookup(&self, zone: usize, digit: usize) -> Option<char>;
    fn is_supported(&self, ch: char) -> bool {
        self.encode_char(ch).is_ok()
    }
}

/// The 4x10 extended BCD scheme.
///
/// Zone 1 is punched in row 12, zone 2 in row 11 and zone 3 in row 0.
/// Digits 1..9 are punched in their own rows; digit 0 adds no punch.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtendedBcd;

impl ExtendedBcd {
    pub fn new() -> Self {
        Self
    }

    /// Table coordinates of `ch`, searching zone by zone.
    pub fn coordinates(ch: char) -> Option<(usize, usize)> {
        EXTENDED_BCD.iter().enumerate().find_map(|(zone, digits)| {
            digits
                .iter()
                .position(|&candidate| candidate == ch)
                .map(|digit| (zone, digit))
        })
    }
}

impl PunchEncoding for ExtendedBcd {
    fn name(&self) -> &'static str {
        "extended-bcd"
    }

    fn encode_char(&self, ch: char) -> Result<ColumnMask, EncodeError> {
        let up = ch.to_ascii_uppercase();
        let (zone, digit) =
            Self::coordinates(up).ok_or(EncodeError::Unsupported(ch, ch as u32))?;
        let mut mask = ColumnMask::EMPTY;
        if zone > 0 {
            // zones 1..3 live in rows 12, 11, 0
            mask = mask | ColumnMask::row(zone - 1);
        }
        if digit > 0 {
            mask = mask | ColumnMask::row(digit + 2);
        }
        Ok(mask)
    }

    fn lookup(&self, zone: usize, digit: usize) -> Option<char> {
        EXTENDED_BCD.get(zone)?.get(digit).copied()
    }
}

/// Maps a physical row index onto its table coordinate.
///
/// Digit rows 1..9 map to 1..9; rows 12, 11 and 0 map to 1, 2 and 3.
pub fn adjust_row(row: usize) -> usize {
    if (FIRST_DIGIT_ROW..ROWS).contains(&row) {
        row - 2
    } else {
        row + 1
    }
}
