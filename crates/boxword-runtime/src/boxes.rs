//! Boxed scalars on the real heap. Addresses handed out by [BoxHeap] are
//! genuine pointers, so it only speaks the [Native] layout.

use std::alloc::{alloc, dealloc, Layout as MemLayout};

use fxhash::FxHashMap;
use libc::c_void;

use crate::allocator::{AllocError, Allocator, Heap};
use crate::layout::{Layout, Native};
use crate::tag::ValueType;
use crate::value::HeapPtr;

#[cfg(feature = "float")]
use crate::Float;

type Word = <Native as Layout>::Word;

/// The part every heap object starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ObjectHeader {
    pub tt: ValueType,
}

#[cfg(feature = "float")]
#[derive(Debug)]
#[repr(C, align(8))]
pub struct FloatBox {
    pub header: ObjectHeader,
    pub f: Float,
}

#[derive(Debug)]
#[repr(C, align(8))]
pub struct CPtrBox {
    pub header: ObjectHeader,
    pub p: *mut c_void,
}

/// Owns every box it allocates and frees them on drop. Values pointing into
/// it must not outlive it.
#[derive(Debug, Default)]
pub struct BoxHeap {
    live: FxHashMap<usize, MemLayout>,
    #[cfg(feature = "float")]
    pool: FxHashMap<u64, HeapPtr<Native>>,
}

impl BoxHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    fn place<T>(&mut self, data: T) -> Result<HeapPtr<Native>, AllocError> {
        let layout = MemLayout::new::<T>();
        let ptr = unsafe { alloc(layout) } as *mut T;

        if ptr.is_null() {
            return Err(AllocError::OutOfMemory {
                size: layout.size(),
            });
        }

        unsafe { ptr.write(data) };
        self.live.insert(ptr as usize, layout);

        Ok(HeapPtr::new(ptr as usize as Word))
    }

    /// Checks that `ptr` is one of ours before anything dereferences it.
    fn resolve(&self, ptr: HeapPtr<Native>) -> usize {
        let addr = ptr.addr() as usize;

        if !self.live.contains_key(&addr) {
            panic!("{ptr:?} is not a live box of this heap");
        }

        addr
    }

    fn header(&self, ptr: HeapPtr<Native>) -> &ObjectHeader {
        unsafe { &*(self.resolve(ptr) as *const ObjectHeader) }
    }
}

impl Heap<Native> for BoxHeap {
    fn type_of(&self, ptr: HeapPtr<Native>) -> ValueType {
        self.header(ptr).tt
    }

    #[cfg(feature = "float")]
    fn float_of(&self, ptr: HeapPtr<Native>) -> Float {
        let tt = self.header(ptr).tt;
        if tt != ValueType::Float {
            panic!("{ptr:?} is a {tt} box, not a float box");
        }

        unsafe { (*(self.resolve(ptr) as *const FloatBox)).f }
    }

    fn cptr_of(&self, ptr: HeapPtr<Native>) -> *mut c_void {
        let tt = self.header(ptr).tt;
        if tt != ValueType::CPtr {
            panic!("{ptr:?} is a {tt} box, not a pointer box");
        }

        unsafe { (*(self.resolve(ptr) as *const CPtrBox)).p }
    }
}

impl Allocator<Native> for BoxHeap {
    type Error = AllocError;

    #[cfg(feature = "float")]
    fn alloc_float(&mut self, f: Float) -> Result<HeapPtr<Native>, AllocError> {
        self.place(FloatBox {
            header: ObjectHeader {
                tt: ValueType::Float,
            },
            f,
        })
    }

    #[cfg(feature = "float")]
    fn alloc_float_pooled(&mut self, f: Float) -> Result<HeapPtr<Native>, AllocError> {
        if let Some(ptr) = self.pool.get(&f.to_bits()) {
            return Ok(*ptr);
        }

        let ptr = self.alloc_float(f)?;
        self.pool.insert(f.to_bits(), ptr);
        Ok(ptr)
    }

    fn alloc_cptr(&mut self, p: *mut c_void) -> Result<HeapPtr<Native>, AllocError> {
        self.place(CPtrBox {
            header: ObjectHeader {
                tt: ValueType::CPtr,
            },
            p,
        })
    }
}

impl Drop for BoxHeap {
    fn drop(&mut self) {
        for (addr, layout) in self.live.drain() {
            unsafe { dealloc(addr as *mut u8, layout) }
        }
    }
}
