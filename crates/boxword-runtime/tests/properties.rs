use std::collections::HashSet;

use boxword_runtime::{Arena, HeapPtr, Layout, Narrow, Value, ValueType, Wide, Wide32};

fn int<L: Layout>(n: i64) -> L::Int {
    match L::Int::try_from(n) {
        Ok(n) => n,
        Err(_) => panic!("{n} is not a {} integer", L::NAME),
    }
}

/// Fixnums spread over the whole range of the layout, both signs.
fn sample_fixnums<L: Layout>() -> Vec<i64> {
    let max: i64 = L::FIXNUM_MAX.into();
    let min: i64 = L::FIXNUM_MIN.into();
    let mut samples = vec![0, 1, -1, 2, -2, 255, -256, max, min, max - 1, min + 1];
    let mut n = 3i64;
    while n < max / 3 {
        samples.push(n);
        samples.push(-n);
        n *= 3;
    }
    samples
}

fn sample_symbols<L: Layout>() -> Vec<u32> {
    let mut samples = vec![0, 1, 2, 3, 70000, L::SYMBOL_MAX, L::SYMBOL_MAX - 1];
    let mut id = 5u32;
    while id < L::SYMBOL_MAX / 5 {
        samples.push(id);
        id *= 5;
    }
    samples
}

fn fixnums_round_trip<L: Layout>() {
    for n in sample_fixnums::<L>() {
        let value = Value::<L>::fixnum(int::<L>(n));
        assert!(value.is_fixnum(), "{n}");
        assert!(!value.is_symbol() && !value.is_nil() && !value.is_false());
        assert!(!value.is_true() && !value.is_undef() && !value.is_object());
        assert_eq!(Into::<i64>::into(value.as_fixnum()), n);
    }
}

#[test]
fn fixnums_round_trip_narrow() {
    fixnums_round_trip::<Narrow>();
}

#[test]
fn fixnums_round_trip_wide() {
    fixnums_round_trip::<Wide>();
}

#[test]
fn fixnums_round_trip_wide32() {
    fixnums_round_trip::<Wide32>();
}

fn symbols_round_trip<L: Layout>() {
    for id in sample_symbols::<L>() {
        let value = Value::<L>::symbol(id);
        assert!(value.is_symbol(), "{id}");
        assert!(!value.is_fixnum() && !value.is_nil() && !value.is_object());
        assert_eq!(value.as_symbol(), id);
    }
}

#[test]
fn symbols_round_trip_narrow() {
    symbols_round_trip::<Narrow>();
}

#[test]
fn symbols_round_trip_wide() {
    symbols_round_trip::<Wide>();
}

#[test]
fn symbols_round_trip_wide32() {
    symbols_round_trip::<Wide32>();
}

#[test]
fn wide_symbols_keep_every_bit() {
    for id in [70000, u32::MAX, 1 << 31, (1 << 30) + 1] {
        assert_eq!(Value::<Wide>::symbol(id).as_symbol(), id);
    }
}

#[test]
fn narrow_symbol_limit() {
    assert_eq!(Value::<Narrow>::symbol(1_073_741_823).as_symbol(), 1_073_741_823);
    assert!(Value::<Narrow>::checked_symbol(1_073_741_824).is_err());
}

#[test]
fn minus_one() {
    assert_eq!(Value::<Narrow>::fixnum(-1).as_fixnum(), -1);
    assert_eq!(Value::<Wide>::fixnum(-1).as_fixnum(), -1);
    assert_eq!(Value::<Wide32>::fixnum(-1).as_fixnum(), -1);
    assert_eq!(Value::<Wide32>::fixnum(-1).bits(), u64::MAX);
}

#[test]
fn wide_word_with_32_bit_integers() {
    let max = Value::<Wide32>::fixnum(i32::MAX >> 1);
    assert_eq!(max.as_fixnum(), i32::MAX >> 1);
    assert_eq!(max.bits(), 0x7FFF_FFFF);

    let min = Value::<Wide32>::fixnum(i32::MIN >> 1);
    assert_eq!(min.as_fixnum(), i32::MIN >> 1);

    assert!(Value::<Wide32>::checked_fixnum(i32::MAX).is_err());
    assert!(Value::<Wide32>::checked_fixnum(i32::MIN).is_err());

    // Symbols still get the whole upper half-word.
    assert_eq!(Value::<Wide32>::symbol(u32::MAX).bits(), Value::<Wide>::symbol(u32::MAX).bits());
}

fn no_collisions<L: Layout>() {
    let mut seen = HashSet::new();
    let specials = [Value::<L>::nil(), Value::r#false(), Value::r#true(), Value::undef()];

    for value in specials {
        assert!(seen.insert(value.bits()), "{value:?}");
    }

    for n in sample_fixnums::<L>() {
        let value = Value::<L>::fixnum(int::<L>(n));
        assert!(seen.insert(value.bits()), "{value:?}");
    }

    for id in sample_symbols::<L>() {
        let value = Value::<L>::symbol(id);
        assert!(seen.insert(value.bits()), "{value:?}");
    }

    // No immediate ever looks like an aligned heap address.
    for bits in &seen {
        assert!(*bits == 0 || bits & 0b111 != 0, "{bits:#x}");
    }
}

#[test]
fn no_collisions_narrow() {
    no_collisions::<Narrow>();
}

#[test]
fn no_collisions_wide() {
    no_collisions::<Wide>();
}

#[test]
fn no_collisions_wide32() {
    no_collisions::<Wide32>();
}

fn truthiness<L: Layout>() {
    let mut arena = Arena::<L>::new();
    assert!(!Value::<L>::nil().truthy());
    assert!(!Value::<L>::r#false().truthy());

    let mut truthy = vec![
        Value::<L>::r#true(),
        Value::undef(),
        Value::fixnum(int::<L>(0)),
        Value::symbol(0),
        Value::object(arena.alloc_object(ValueType::Object).unwrap()),
        Value::boxed_cptr(&mut arena, std::ptr::null_mut()).unwrap(),
    ];
    for n in sample_fixnums::<L>() {
        truthy.push(Value::fixnum(int::<L>(n)));
    }

    for value in truthy {
        assert!(value.truthy(), "{value:?}");
    }
}

#[test]
fn truthiness_narrow() {
    truthiness::<Narrow>();
}

#[test]
fn truthiness_wide() {
    truthiness::<Wide>();
}

#[test]
fn truthiness_wide32() {
    truthiness::<Wide32>();
}

fn heap_references<L: Layout>() {
    for bits in [8u64, 16, 0x1000, 0xFFFF_FFF8] {
        let ptr = HeapPtr::<L>::new(L::from_bits(bits).unwrap());
        let value = Value::object(ptr);
        assert!(value.is_object());
        assert!(!value.is_immediate());
        assert_eq!(value.as_ptr(), ptr);
        assert_eq!(value.immediate_type(), None);
    }
}

#[test]
fn heap_references_narrow() {
    heap_references::<Narrow>();
}

#[test]
fn heap_references_wide() {
    heap_references::<Wide>();
}

#[test]
fn heap_references_wide32() {
    heap_references::<Wide32>();
}

fn classify<L: Layout>() {
    let mut arena = Arena::<L>::new();
    assert_eq!(Value::<L>::fixnum(int::<L>(5)).classify(&arena), ValueType::Fixnum);

    let cptr = Value::<L>::boxed_cptr(&mut arena, 0x10 as *mut _).unwrap();
    assert_eq!(cptr.classify(&arena), ValueType::CPtr);

    #[cfg(feature = "float")]
    {
        let float = Value::<L>::boxed_float(&mut arena, 0.5).unwrap();
        assert_eq!(float.classify(&arena), ValueType::Float);
        assert_eq!(float.as_float(&arena), 0.5);

        let pooled = Value::<L>::boxed_float_pooled(&mut arena, 0.5).unwrap();
        assert_eq!(pooled.classify(&arena), ValueType::Float);
        assert_eq!(pooled.as_float(&arena), 0.5);
    }

    for tt in ValueType::ALL.into_iter().filter(|tt| !tt.is_immediate_type()) {
        let value = Value::<L>::object(arena.alloc_object(tt).unwrap());
        assert_eq!(value.classify(&arena), tt);
    }
}

#[test]
fn classify_narrow() {
    classify::<Narrow>();
}

#[test]
fn classify_wide() {
    classify::<Wide>();
}

#[test]
fn classify_wide32() {
    classify::<Wide32>();
}

#[test]
fn values_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Value<Narrow>>();
    assert_send_sync::<Value<Wide>>();
    assert_send_sync::<Value<Wide32>>();

    let values: Vec<Value<Wide>> = (0..64).map(Value::fixnum).collect();
    let handles: Vec<_> = values
        .chunks(16)
        .map(|chunk| {
            let chunk = chunk.to_vec();
            std::thread::spawn(move || chunk.iter().map(|v| v.as_fixnum()).sum::<i64>())
        })
        .collect();

    let total: i64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(total, (0..64).sum::<i64>());
}
