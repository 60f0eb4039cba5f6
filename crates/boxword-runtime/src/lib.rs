//! Word boxing: every runtime value is one machine word. Small scalars (nil,
//! booleans, fixnums, symbols, the undef sentinel) are encoded in the word
//! itself; floats, raw pointers and every other object live on the heap and
//! the word is their address.
//!
//! The encoding is chosen at compile time through a [Layout] type parameter,
//! so the narrow (32-bit), wide (64-bit) and wide32 (64-bit word, 32-bit
//! integer) encodings coexist in one build and never mix.

pub mod allocator;
pub mod arena;
pub mod boxes;
pub mod layout;
pub mod tag;
pub mod value;

/// The floating point scalar stored in float boxes.
#[cfg(feature = "float")]
pub type Float = f64;

pub use allocator::{AllocError, Allocator, Heap};
pub use arena::Arena;
pub use boxes::{BoxHeap, ObjectHeader};
pub use layout::{Layout, Narrow, Native, Sym, Wide, Wide32};
pub use tag::{UnknownType, ValueType};
pub use value::{HeapPtr, RangeError, Value};
