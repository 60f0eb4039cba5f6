//! Word layouts. A [Layout] fixes how wide the machine word is, how wide the
//! fixnum payload is and how a symbol identifier is packed into the word.
//!
//! ```text
//!   nil   : ...0000 0000 (all bits are zero)
//!   false : ...0000 0100
//!   true  : ...0000 1100
//!   undef : ...0001 0100
//!   fixnum: ...IIII III1
//!   symbol: ...SSSS SS10 (wide: upper half-word is the symbol, lower half-word is 2)
//!   object: ...PPPP P000
//! ```
//!
//! Everything is defined with shifts and masks on the word, so the encoding
//! does not depend on the byte order of the target.
use std::fmt::{Binary, Debug, Display, LowerHex};
use std::hash::Hash;

/// Symbol identifier, as handed out by the symbol table.
pub type Sym = u32;

pub const SPECIAL_NIL: u8 = 0;
pub const SPECIAL_FALSE: u8 = 4;
pub const SPECIAL_TRUE: u8 = 12;
pub const SPECIAL_UNDEF: u8 = 20;

pub const FIXNUM_SHIFT: u32 = 1;
pub const SYMBOL_SHIFT: u32 = 2;
pub const FIXNUM_FLAG: u8 = 1 << (FIXNUM_SHIFT - 1);
pub const SYMBOL_FLAG: u8 = 1 << (SYMBOL_SHIFT - 1);
pub const FIXNUM_MASK: u8 = (1 << FIXNUM_SHIFT) - 1;
pub const SYMBOL_MASK: u8 = (1 << SYMBOL_SHIFT) - 1;

/// Every heap address has these bits clear.
pub const IMMEDIATE_MASK: u8 = 0b111;

/// Compile-time description of a word encoding: the word width and the
/// integer width together. Implemented by [Narrow], [Wide] and [Wide32]; the
/// values of different layouts can't be mixed.
pub trait Layout:
    Clone + Copy + PartialEq + Eq + Hash + Debug + Default + Send + Sync + 'static
{
    type Word: Copy + Eq + Hash + Debug + Binary + LowerHex + Send + Sync + 'static;
    type Int: Copy + Ord + Debug + Display + TryFrom<i64> + Into<i64> + Send + Sync + 'static;

    const NAME: &'static str;
    const WORD_BITS: u32;
    const INT_BITS: u32;

    const NIL: Self::Word;
    const FALSE: Self::Word;
    const TRUE: Self::Word;
    const UNDEF: Self::Word;

    const FIXNUM_MIN: Self::Int;
    const FIXNUM_MAX: Self::Int;
    const SYMBOL_MAX: Sym;

    /// The lowest eight bits of the word, where every tag lives.
    fn low_bits(word: Self::Word) -> u8;

    /// `word & !mask`
    fn clear(word: Self::Word, mask: u8) -> Self::Word;

    fn encode_fixnum(n: Self::Int) -> Self::Word;
    fn decode_fixnum(word: Self::Word) -> Self::Int;

    fn encode_symbol(id: Sym) -> Self::Word;
    fn decode_symbol(word: Self::Word) -> Sym;
    fn is_symbol(word: Self::Word) -> bool;

    fn to_bits(word: Self::Word) -> u64;

    /// Narrows a raw address or bit pattern to a word, if it fits.
    fn from_bits(bits: u64) -> Option<Self::Word>;

    fn fixnum_fits(n: Self::Int) -> bool {
        Self::FIXNUM_MIN <= n && n <= Self::FIXNUM_MAX
    }

    fn symbol_fits(id: Sym) -> bool {
        id <= Self::SYMBOL_MAX
    }
}

/// 32-bit words with 31-bit fixnums and 30-bit symbols.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Narrow;

/// 64-bit words with 63-bit fixnums and full 32-bit symbols.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Wide;

/// 64-bit words paired with a 32-bit integer type: fixnums stay 31 bits wide
/// while symbols get the whole upper half-word, as in [Wide].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Wide32;

impl Layout for Narrow {
    type Word = u32;
    type Int = i32;

    const NAME: &'static str = "narrow";
    const WORD_BITS: u32 = u32::BITS;
    const INT_BITS: u32 = i32::BITS;

    const NIL: u32 = SPECIAL_NIL as u32;
    const FALSE: u32 = SPECIAL_FALSE as u32;
    const TRUE: u32 = SPECIAL_TRUE as u32;
    const UNDEF: u32 = SPECIAL_UNDEF as u32;

    const FIXNUM_MIN: i32 = i32::MIN >> FIXNUM_SHIFT;
    const FIXNUM_MAX: i32 = i32::MAX >> FIXNUM_SHIFT;
    const SYMBOL_MAX: Sym = Sym::MAX >> SYMBOL_SHIFT;

    #[inline(always)]
    fn low_bits(word: u32) -> u8 {
        word as u8
    }

    #[inline(always)]
    fn clear(word: u32, mask: u8) -> u32 {
        word & !(mask as u32)
    }

    #[inline(always)]
    fn encode_fixnum(n: i32) -> u32 {
        ((n as u32) << FIXNUM_SHIFT) | FIXNUM_FLAG as u32
    }

    #[inline(always)]
    fn decode_fixnum(word: u32) -> i32 {
        (word as i32) >> FIXNUM_SHIFT
    }

    #[inline(always)]
    fn encode_symbol(id: Sym) -> u32 {
        (id << SYMBOL_SHIFT) | SYMBOL_FLAG as u32
    }

    #[inline(always)]
    fn decode_symbol(word: u32) -> Sym {
        word >> SYMBOL_SHIFT
    }

    #[inline(always)]
    fn is_symbol(word: u32) -> bool {
        (word as u8 & SYMBOL_MASK) == SYMBOL_FLAG
    }

    #[inline(always)]
    fn to_bits(word: u32) -> u64 {
        word as u64
    }

    fn from_bits(bits: u64) -> Option<u32> {
        u32::try_from(bits).ok()
    }
}

impl Layout for Wide {
    type Word = u64;
    type Int = i64;

    const NAME: &'static str = "wide";
    const WORD_BITS: u32 = u64::BITS;
    const INT_BITS: u32 = i64::BITS;

    const NIL: u64 = SPECIAL_NIL as u64;
    const FALSE: u64 = SPECIAL_FALSE as u64;
    const TRUE: u64 = SPECIAL_TRUE as u64;
    const UNDEF: u64 = SPECIAL_UNDEF as u64;

    const FIXNUM_MIN: i64 = i64::MIN >> FIXNUM_SHIFT;
    const FIXNUM_MAX: i64 = i64::MAX >> FIXNUM_SHIFT;
    const SYMBOL_MAX: Sym = Sym::MAX;

    #[inline(always)]
    fn low_bits(word: u64) -> u8 {
        word as u8
    }

    #[inline(always)]
    fn clear(word: u64, mask: u8) -> u64 {
        word & !(mask as u64)
    }

    #[inline(always)]
    fn encode_fixnum(n: i64) -> u64 {
        ((n as u64) << FIXNUM_SHIFT) | FIXNUM_FLAG as u64
    }

    #[inline(always)]
    fn decode_fixnum(word: u64) -> i64 {
        (word as i64) >> FIXNUM_SHIFT
    }

    // The symbol owns the upper half-word; the lower half-word holds only the
    // flag, so `is_symbol` is a single 32-bit compare.
    #[inline(always)]
    fn encode_symbol(id: Sym) -> u64 {
        ((id as u64) << Sym::BITS) | SYMBOL_FLAG as u64
    }

    #[inline(always)]
    fn decode_symbol(word: u64) -> Sym {
        (word >> Sym::BITS) as Sym
    }

    #[inline(always)]
    fn is_symbol(word: u64) -> bool {
        word as u32 == SYMBOL_FLAG as u32
    }

    #[inline(always)]
    fn to_bits(word: u64) -> u64 {
        word
    }

    fn from_bits(bits: u64) -> Option<u64> {
        Some(bits)
    }
}

impl Layout for Wide32 {
    type Word = u64;
    type Int = i32;

    const NAME: &'static str = "wide32";
    const WORD_BITS: u32 = u64::BITS;
    const INT_BITS: u32 = i32::BITS;

    const NIL: u64 = Wide::NIL;
    const FALSE: u64 = Wide::FALSE;
    const TRUE: u64 = Wide::TRUE;
    const UNDEF: u64 = Wide::UNDEF;

    const FIXNUM_MIN: i32 = i32::MIN >> FIXNUM_SHIFT;
    const FIXNUM_MAX: i32 = i32::MAX >> FIXNUM_SHIFT;
    const SYMBOL_MAX: Sym = Wide::SYMBOL_MAX;

    #[inline(always)]
    fn low_bits(word: u64) -> u8 {
        Wide::low_bits(word)
    }

    #[inline(always)]
    fn clear(word: u64, mask: u8) -> u64 {
        Wide::clear(word, mask)
    }

    // Sign-extended into the word, so -1 is still all ones.
    #[inline(always)]
    fn encode_fixnum(n: i32) -> u64 {
        Wide::encode_fixnum(n as i64)
    }

    /// Only the low half-word carries the integer; it is narrowed before the
    /// shift.
    #[inline(always)]
    fn decode_fixnum(word: u64) -> i32 {
        (word as i32) >> FIXNUM_SHIFT
    }

    #[inline(always)]
    fn encode_symbol(id: Sym) -> u64 {
        Wide::encode_symbol(id)
    }

    #[inline(always)]
    fn decode_symbol(word: u64) -> Sym {
        Wide::decode_symbol(word)
    }

    #[inline(always)]
    fn is_symbol(word: u64) -> bool {
        Wide::is_symbol(word)
    }

    #[inline(always)]
    fn to_bits(word: u64) -> u64 {
        word
    }

    fn from_bits(bits: u64) -> Option<u64> {
        Some(bits)
    }
}

/// Why a word width, integer width and symbol range can't be combined, or
/// `None` if they can.
pub const fn rejection(word_bits: u32, int_bits: u32, symbol_max: Sym) -> Option<&'static str> {
    if int_bits < 32 {
        Some("fixnums narrower than 32 bits are too small for word boxing")
    } else if int_bits > word_bits {
        Some("the fixnum type is wider than the word")
    } else if word_bits < Sym::BITS + Sym::BITS && symbol_max > Sym::MAX >> SYMBOL_SHIFT {
        Some("narrow words can't hold a full-width symbol")
    } else {
        None
    }
}

const fn validate(word_bits: u32, int_bits: u32, symbol_max: Sym) {
    if let Some(reason) = rejection(word_bits, int_bits, symbol_max) {
        panic!("{}", reason);
    }
}

const _: () = validate(Narrow::WORD_BITS, Narrow::INT_BITS, Narrow::SYMBOL_MAX);
const _: () = validate(Wide::WORD_BITS, Wide::INT_BITS, Wide::SYMBOL_MAX);
const _: () = validate(Wide32::WORD_BITS, Wide32::INT_BITS, Wide32::SYMBOL_MAX);

/// The layout whose word is as wide as a pointer on this target.
#[cfg(target_pointer_width = "64")]
pub type Native = Wide;

/// The layout whose word is as wide as a pointer on this target.
#[cfg(target_pointer_width = "32")]
pub type Native = Narrow;

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("word boxing needs a 32-bit or 64-bit target");
