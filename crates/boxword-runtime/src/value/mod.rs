//! This module describes the values that the runtime manipulates. A [Value]
//! is a single machine word: small scalars live inside the word, everything
//! else is the address of a heap object. Heap addresses are 8-byte aligned,
//! so the three low bits of the word are free to use as a tag.
//!
//! Constructors and accessors trust the caller on the hot path: payload
//! ranges and variants are checked only in debug builds. Release builds
//! encode whatever bits they are given.

use std::marker::PhantomData;

use libc::c_void;
use thiserror::Error;

use crate::allocator::{Allocator, Heap};
use crate::layout::{Layout, Native, Sym, FIXNUM_FLAG, FIXNUM_MASK, IMMEDIATE_MASK, SPECIAL_FALSE};
use crate::tag::ValueType;

#[cfg(feature = "float")]
use crate::Float;

pub use self::pointer::HeapPtr;

pub mod display;
pub mod pointer;

/// A tagged machine word of layout `L`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Value<L: Layout = Native>(L::Word, PhantomData<L>);

/// A payload that does not fit the immediate encoding of a layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("fixnum {value} does not fit the {layout} layout ({min}..={max})")]
    Fixnum {
        value: i64,
        layout: &'static str,
        min: i64,
        max: i64,
    },

    #[error("symbol id {value} does not fit the {layout} layout (max {max})")]
    Symbol {
        value: u64,
        layout: &'static str,
        max: Sym,
    },
}

impl RangeError {
    pub fn fixnum<L: Layout>(value: i64) -> Self {
        RangeError::Fixnum {
            value,
            layout: L::NAME,
            min: L::FIXNUM_MIN.into(),
            max: L::FIXNUM_MAX.into(),
        }
    }

    pub fn symbol<L: Layout>(value: u64) -> Self {
        RangeError::Symbol {
            value,
            layout: L::NAME,
            max: L::SYMBOL_MAX,
        }
    }
}

impl<L: Layout> Value<L> {
    pub const NIL: Self = Value(L::NIL, PhantomData);
    pub const FALSE: Self = Value(L::FALSE, PhantomData);
    pub const TRUE: Self = Value(L::TRUE, PhantomData);
    pub const UNDEF: Self = Value(L::UNDEF, PhantomData);

    /// Reinterprets a raw word. Used by the collector and the object system,
    /// which store words outside of [Value].
    #[inline(always)]
    pub fn from_word(word: L::Word) -> Self {
        Value(word, PhantomData)
    }

    #[inline(always)]
    pub fn word(self) -> L::Word {
        self.0
    }

    #[inline(always)]
    pub fn bits(self) -> u64 {
        L::to_bits(self.0)
    }

    // --- Constructors ---

    #[inline(always)]
    pub fn nil() -> Self {
        Self::NIL
    }

    #[inline(always)]
    pub fn r#false() -> Self {
        Self::FALSE
    }

    #[inline(always)]
    pub fn r#true() -> Self {
        Self::TRUE
    }

    #[inline(always)]
    pub fn undef() -> Self {
        Self::UNDEF
    }

    #[inline(always)]
    pub fn bool(b: bool) -> Self {
        if b {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }

    /// Packs `n` into the word. `n` must lie within
    /// `L::FIXNUM_MIN..=L::FIXNUM_MAX`; in release builds a larger value loses
    /// its top bit.
    #[inline(always)]
    pub fn fixnum(n: L::Int) -> Self {
        #[cfg(debug_assertions)]
        if !L::fixnum_fits(n) {
            panic!("fixnum {n} out of range for the {} layout", L::NAME);
        }

        Value(L::encode_fixnum(n), PhantomData)
    }

    pub fn checked_fixnum(n: L::Int) -> Result<Self, RangeError> {
        if L::fixnum_fits(n) {
            Ok(Value(L::encode_fixnum(n), PhantomData))
        } else {
            Err(RangeError::fixnum::<L>(n.into()))
        }
    }

    /// Packs a symbol id. `id` must not exceed `L::SYMBOL_MAX`; in release
    /// builds the narrow layout drops the top two bits of a larger id.
    #[inline(always)]
    pub fn symbol(id: Sym) -> Self {
        #[cfg(debug_assertions)]
        if !L::symbol_fits(id) {
            panic!("symbol id {id} out of range for the {} layout", L::NAME);
        }

        Value(L::encode_symbol(id), PhantomData)
    }

    pub fn checked_symbol(id: Sym) -> Result<Self, RangeError> {
        if L::symbol_fits(id) {
            Ok(Value(L::encode_symbol(id), PhantomData))
        } else {
            Err(RangeError::symbol::<L>(id.into()))
        }
    }

    /// Wraps a heap address as-is.
    #[inline(always)]
    pub fn object(ptr: HeapPtr<L>) -> Self {
        Value(ptr.addr(), PhantomData)
    }

    /// Allocates a new float box. Allocator failures are returned untouched.
    #[cfg(feature = "float")]
    pub fn boxed_float<A: Allocator<L>>(alloc: &mut A, f: Float) -> Result<Self, A::Error> {
        alloc.alloc_float(f).map(Self::object)
    }

    /// Same as [Value::boxed_float], but lets the allocator hand back a shared
    /// box. Whether it does is not observable through the value.
    #[cfg(feature = "float")]
    pub fn boxed_float_pooled<A: Allocator<L>>(
        alloc: &mut A,
        f: Float,
    ) -> Result<Self, A::Error> {
        alloc.alloc_float_pooled(f).map(Self::object)
    }

    pub fn boxed_cptr<A: Allocator<L>>(alloc: &mut A, p: *mut c_void) -> Result<Self, A::Error> {
        alloc.alloc_cptr(p).map(Self::object)
    }

    // --- Type checkers ---

    /// Nil and every word with a low tag bit set.
    #[inline(always)]
    pub fn is_immediate(self) -> bool {
        L::low_bits(self.0) & IMMEDIATE_MASK != 0 || self.0 == L::NIL
    }

    /// A heap reference: three low bits clear and not nil.
    #[inline(always)]
    pub fn is_object(self) -> bool {
        !self.is_immediate()
    }

    #[inline(always)]
    pub fn is_fixnum(self) -> bool {
        L::low_bits(self.0) & FIXNUM_MASK == FIXNUM_FLAG
    }

    #[inline(always)]
    pub fn is_symbol(self) -> bool {
        L::is_symbol(self.0)
    }

    #[inline(always)]
    pub fn is_nil(self) -> bool {
        self.0 == L::NIL
    }

    #[inline(always)]
    pub fn is_false(self) -> bool {
        self.0 == L::FALSE
    }

    #[inline(always)]
    pub fn is_true(self) -> bool {
        self.0 == L::TRUE
    }

    #[inline(always)]
    pub fn is_undef(self) -> bool {
        self.0 == L::UNDEF
    }

    /// Only nil and false are falsy. Both vanish once the false bit is
    /// cleared.
    #[inline(always)]
    pub fn truthy(self) -> bool {
        L::clear(self.0, SPECIAL_FALSE) != L::NIL
    }

    /// The type of an immediate, or `None` for a heap reference. Nil reports
    /// [ValueType::False], the same as false.
    #[inline]
    pub fn immediate_type(self) -> Option<ValueType> {
        if !self.truthy() {
            Some(ValueType::False)
        } else if self.is_true() {
            Some(ValueType::True)
        } else if self.is_fixnum() {
            Some(ValueType::Fixnum)
        } else if self.is_symbol() {
            Some(ValueType::Symbol)
        } else if self.is_undef() {
            Some(ValueType::Undef)
        } else {
            None
        }
    }

    /// Cheapest checks first; only heap references reach the header.
    #[inline]
    pub fn classify<H: Heap<L> + ?Sized>(self, heap: &H) -> ValueType {
        match self.immediate_type() {
            Some(tt) => tt,
            None => heap.type_of(HeapPtr::new(self.0)),
        }
    }

    // --- Accessors ---

    #[inline(always)]
    pub fn as_fixnum(self) -> L::Int {
        #[cfg(debug_assertions)]
        if !self.is_fixnum() {
            panic!("expected fixnum, got {self:?}");
        }

        L::decode_fixnum(self.0)
    }

    #[inline(always)]
    pub fn as_symbol(self) -> Sym {
        #[cfg(debug_assertions)]
        if !self.is_symbol() {
            panic!("expected symbol, got {self:?}");
        }

        L::decode_symbol(self.0)
    }

    #[inline(always)]
    pub fn as_ptr(self) -> HeapPtr<L> {
        #[cfg(debug_assertions)]
        if !self.is_object() {
            panic!("expected heap reference, got {self:?}");
        }

        HeapPtr::new(self.0)
    }

    #[cfg(feature = "float")]
    #[inline]
    pub fn as_float<H: Heap<L> + ?Sized>(self, heap: &H) -> Float {
        let ptr = self.as_ptr();

        #[cfg(debug_assertions)]
        if heap.type_of(ptr) != ValueType::Float {
            panic!("expected float box, got {}", heap.type_of(ptr));
        }

        heap.float_of(ptr)
    }

    #[inline]
    pub fn as_cptr<H: Heap<L> + ?Sized>(self, heap: &H) -> *mut c_void {
        let ptr = self.as_ptr();

        #[cfg(debug_assertions)]
        if heap.type_of(ptr) != ValueType::CPtr {
            panic!("expected pointer box, got {}", heap.type_of(ptr));
        }

        heap.cptr_of(ptr)
    }
}

impl<L: Layout> Default for Value<L> {
    fn default() -> Self {
        Self::NIL
    }
}

impl<L: Layout> From<bool> for Value<L> {
    fn from(b: bool) -> Self {
        Value::bool(b)
    }
}

impl<L: Layout> From<HeapPtr<L>> for Value<L> {
    fn from(ptr: HeapPtr<L>) -> Self {
        Value::object(ptr)
    }
}
