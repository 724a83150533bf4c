use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::PathBuf;

use cardreader::{
    Card, CardReader, ExtendedBcd, ReaderOptions, Termination, decode_deck, decode_stream,
    encode_deck,
};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> BufReader<File> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    BufReader::new(File::open(path).unwrap())
}

fn digits_and_letters() -> String {
    format!("{:<80}\n", " 0123456789 ABCDEFGHI")
}

fn author() -> String {
    format!("{:<80}\n", " JOSH")
}

#[test]
fn blank_card_is_not_last_and_decodes_blank() {
    let card = Card::new();
    assert!(!card.is_last_card());
    assert_eq!(card.decode(), format!("{}\n", " ".repeat(80)));
}

#[test]
fn single_card_fixture_is_last_card() {
    let mut reader = CardReader::new(fixture("tst1.txt"));
    let mut card = Card::new();
    let fill = reader.read_card(&mut card).unwrap();
    assert!(fill.is_complete());
    assert!(!fill.separator);
    assert!(card.is_last_card());
    assert_eq!(card.decode(), digits_and_letters());
}

#[test]
fn two_card_fixture_reads_in_order() {
    let mut reader = CardReader::new(fixture("tst2.txt"));
    let mut card = Card::new();

    reader.read_card(&mut card).unwrap();
    assert!(!card.is_last_card());
    assert_eq!(card.decode(), author());

    reader.read_card(&mut card).unwrap();
    assert!(card.is_last_card());
    assert_eq!(card.decode(), digits_and_letters());
}

#[test]
fn decode_stream_writes_one_line_per_card() {
    let mut out = Vec::new();
    let written = decode_stream(fixture("tst2.txt"), &mut out, ReaderOptions::default()).unwrap();
    assert_eq!(written, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("{}{}", author(), digits_and_letters())
    );
}

#[test]
fn fixtures_pass_strict_mode() {
    let report = decode_deck(fixture("tst2.txt"), ReaderOptions { strict: true }).unwrap();
    assert_eq!(report.terminated_by, Termination::Sentinel);
    assert_eq!(report.text(), format!("{}{}", author(), digits_and_letters()));
    assert_eq!(report.cards[0].rows_read, 12);
}

#[test]
fn nothing_after_the_last_card_is_read() {
    let mut deck = String::new();
    std::io::Read::read_to_string(&mut fixture("tst1.txt"), &mut deck).unwrap();
    deck.push_str("\nthis line is never read\n");
    let cards: Vec<_> = CardReader::new(Cursor::new(deck))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(cards.len(), 1);
    assert!(cards[0].sentinel);
}

#[test]
fn encoder_reproduces_the_fixture() {
    let mut expected = String::new();
    std::io::Read::read_to_string(&mut fixture("tst2.txt"), &mut expected).unwrap();
    let deck = encode_deck(&ExtendedBcd, " JOSH\n 0123456789 ABCDEFGHI", true).unwrap();
    let trimmed: Vec<String> = expected.lines().map(|l| l.trim_end().to_string()).collect();
    let produced: Vec<&str> = deck.lines().collect();
    assert_eq!(produced, trimmed);
}

#[test]
fn decode_stream_reads_latin1_noise_as_blank() {
    let mut input = b"X\xE9X\n".to_vec();
    input.extend(b"\n".repeat(11));
    let mut out = Vec::new();
    let written = decode_stream(Cursor::new(input), &mut out, ReaderOptions::default()).unwrap();
    assert_eq!(written, 1);
    assert_eq!(String::from_utf8(out).unwrap(), format!("{:<80}\n", "& &"));
}
