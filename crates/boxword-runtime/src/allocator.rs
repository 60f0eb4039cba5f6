// The two collaborators the word needs from the object system: something that
// materializes boxes for floats and raw pointers, and something that can read
// the type tag out of a heap object header. The runtime only talks to them
// through these traits.

use libc::c_void;
use thiserror::Error;

use crate::layout::Layout;
use crate::tag::ValueType;
use crate::value::HeapPtr;

#[cfg(feature = "float")]
use crate::Float;

/// Read access to heap objects. None of these write to the header.
pub trait Heap<L: Layout> {
    /// The subtype tag stored in the header of `ptr`.
    fn type_of(&self, ptr: HeapPtr<L>) -> ValueType;

    /// Payload of a float box.
    #[cfg(feature = "float")]
    fn float_of(&self, ptr: HeapPtr<L>) -> Float;

    /// Payload of a pointer box.
    fn cptr_of(&self, ptr: HeapPtr<L>) -> *mut c_void;
}

/// Materializes boxed scalars. Every returned address has its three low bits
/// clear, and its header is already tagged [ValueType::Float] or
/// [ValueType::CPtr].
pub trait Allocator<L: Layout>: Heap<L> {
    type Error: std::error::Error + 'static;

    #[cfg(feature = "float")]
    fn alloc_float(&mut self, f: Float) -> Result<HeapPtr<L>, Self::Error>;

    /// Like [Allocator::alloc_float], but the box may be shared with other
    /// callers that asked for the same value.
    #[cfg(feature = "float")]
    fn alloc_float_pooled(&mut self, f: Float) -> Result<HeapPtr<L>, Self::Error> {
        self.alloc_float(f)
    }

    fn alloc_cptr(&mut self, p: *mut c_void) -> Result<HeapPtr<L>, Self::Error>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    #[error("out of memory allocating a {size} byte box")]
    OutOfMemory { size: usize },

    #[error("heap is full ({capacity} boxes)")]
    Exhausted { capacity: usize },

    #[error("heap address {address:#x} does not fit a {layout} word")]
    AddressSpace { address: u64, layout: &'static str },
}
