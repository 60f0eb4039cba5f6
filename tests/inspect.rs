use boxword::cli::{LayoutArg, Options};
use boxword::{InspectError, Session};
use boxword_runtime::{RangeError, ValueType};
use clap::Parser;

#[test]
fn wide_symbol_report() {
    let mut session = Session::new(LayoutArg::Wide, false);
    let report = session.inspect(":70000").unwrap();

    assert_eq!(report.word, (70000 << 32) | 0b10);
    assert_eq!(report.tt, ValueType::Symbol);
    assert!(report.immediate && report.truthy);
}

#[test]
fn narrow_specials() {
    let mut session = Session::new(LayoutArg::Narrow, false);

    let nil = session.inspect("nil").unwrap();
    assert_eq!((nil.word, nil.tt, nil.truthy), (0, ValueType::False, false));

    let undef = session.inspect("undef").unwrap();
    assert_eq!((undef.word, undef.tt, undef.truthy), (0b10100, ValueType::Undef, true));

    let minus_one = session.inspect("-1").unwrap();
    assert_eq!(minus_one.word, u32::MAX as u64);
    assert_eq!(minus_one.tt, ValueType::Fixnum);
}

#[test]
fn wide32_fixnums() {
    let mut session = Session::new(LayoutArg::Wide32, false);

    let minus_one = session.inspect("-1").unwrap();
    assert_eq!((minus_one.word, minus_one.width), (u64::MAX, 64));

    let max = session.inspect("1073741823").unwrap();
    assert_eq!(max.word, 0x7FFF_FFFF);
    assert_eq!(max.tt, ValueType::Fixnum);

    let err = session.inspect("1073741824").unwrap_err();
    assert_eq!(
        err,
        InspectError::Range(RangeError::Fixnum {
            value: 1 << 30,
            layout: "wide32",
            min: -(1 << 30),
            max: (1 << 30) - 1,
        })
    );
    assert!(session.inspect(":4294967295").is_ok());
}

#[test]
fn native_pointer_box() {
    let mut session = Session::new(LayoutArg::Native, false);
    let report = session.inspect("cptr:0x1000").unwrap();

    assert_eq!(report.tt, ValueType::CPtr);
    assert!(!report.immediate);
    assert!(report.truthy);
    assert_eq!(report.word & 0b111, 0);
}

#[cfg(feature = "float")]
#[test]
fn floats_are_pooled_within_a_session() {
    for layout in [LayoutArg::Narrow, LayoutArg::Wide, LayoutArg::Native] {
        let mut session = Session::new(layout, false);
        let first = session.inspect("2.5").unwrap();
        let second = session.inspect("2.5").unwrap();

        assert_eq!(first.tt, ValueType::Float);
        assert_eq!(first.word, second.word);
    }
}

#[test]
fn range_errors() {
    let mut session = Session::new(LayoutArg::Narrow, false);
    let err = session.inspect(":1073741824").unwrap_err();

    assert_eq!(
        err,
        InspectError::Range(RangeError::Symbol {
            value: 1 << 30,
            layout: "narrow",
            max: (1 << 30) - 1,
        })
    );
    assert!(Session::new(LayoutArg::Wide, false).inspect(":4294967295").is_ok());
}

#[test]
fn options() {
    let options = Options::parse_from(["boxword", "--layout", "narrow", "-d", "nil", ":3"]);

    assert_eq!(options.layout, LayoutArg::Narrow);
    assert!(options.debug);
    assert!(!options.repl);
    assert_eq!(options.values, vec!["nil".to_string(), ":3".to_string()]);

    let wide32 = Options::parse_from(["boxword", "-l", "wide32"]);
    assert_eq!(wide32.layout, LayoutArg::Wide32);

    let defaults = Options::parse_from(["boxword"]);
    assert_eq!(defaults.layout, LayoutArg::Native);
}
