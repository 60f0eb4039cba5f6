use std::fmt::Debug;
use std::marker::PhantomData;

use crate::layout::{Layout, IMMEDIATE_MASK};

/// Address of a heap object header, as a word of layout `L`. The allocator
/// guarantees the address is non-zero and 8-byte aligned; this type only
/// checks it in debug builds.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct HeapPtr<L: Layout>(pub(crate) L::Word, PhantomData<L>);

impl<L: Layout> HeapPtr<L> {
    #[inline]
    pub fn new(addr: L::Word) -> Self {
        #[cfg(debug_assertions)]
        if L::low_bits(addr) & IMMEDIATE_MASK != 0 || addr == L::NIL {
            panic!("heap address {addr:#x} is null or not 8-byte aligned");
        }

        Self(addr, PhantomData)
    }

    #[inline]
    pub fn addr(self) -> L::Word {
        self.0
    }

    #[inline]
    pub fn bits(self) -> u64 {
        L::to_bits(self.0)
    }
}

impl<L: Layout> Debug for HeapPtr<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HeapPtr({:#x})", self.0)
    }
}
