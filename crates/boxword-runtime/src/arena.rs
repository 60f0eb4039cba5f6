//! A heap whose addresses are offsets into a slot table instead of real
//! pointers. It works for every [Layout] on every host, which makes it the
//! heap of choice for exercising the narrow layout on a 64-bit machine.

use std::marker::PhantomData;

#[cfg(feature = "float")]
use fxhash::FxHashMap;
use libc::c_void;

use crate::allocator::{AllocError, Allocator, Heap};
use crate::layout::{Layout, IMMEDIATE_MASK};
use crate::tag::ValueType;
use crate::value::HeapPtr;

#[cfg(feature = "float")]
use crate::Float;

const SLOT_SIZE: u64 = IMMEDIATE_MASK as u64 + 1;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    #[cfg(feature = "float")]
    Float(Float),
    CPtr(*mut c_void),
    /// A header without payload, standing in for any other heap object.
    Object(ValueType),
}

impl Slot {
    fn tt(&self) -> ValueType {
        match self {
            #[cfg(feature = "float")]
            Slot::Float(_) => ValueType::Float,
            Slot::CPtr(_) => ValueType::CPtr,
            Slot::Object(tt) => *tt,
        }
    }
}

#[derive(Debug)]
pub struct Arena<L: Layout> {
    base: u64,
    slots: Vec<Slot>,
    capacity: Option<usize>,
    #[cfg(feature = "float")]
    pool: FxHashMap<u64, HeapPtr<L>>,
    _layout: PhantomData<L>,
}

impl<L: Layout> Default for Arena<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Layout> Arena<L> {
    pub fn new() -> Self {
        Self::with_base(SLOT_SIZE)
    }

    /// An arena whose first box lives at `base`. `base` must be a non-zero
    /// multiple of 8.
    pub fn with_base(base: u64) -> Self {
        assert!(
            base != 0 && base % SLOT_SIZE == 0,
            "arena base {base:#x} is null or not 8-byte aligned"
        );

        Arena {
            base,
            slots: Vec::new(),
            capacity: None,
            #[cfg(feature = "float")]
            pool: FxHashMap::default(),
            _layout: PhantomData,
        }
    }

    /// Refuse allocations once `capacity` boxes are live.
    pub fn with_capacity_limit(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Allocates a bare header tagged `tt`.
    pub fn alloc_object(&mut self, tt: ValueType) -> Result<HeapPtr<L>, AllocError> {
        self.push(Slot::Object(tt))
    }

    fn push(&mut self, slot: Slot) -> Result<HeapPtr<L>, AllocError> {
        if let Some(capacity) = self.capacity {
            if self.slots.len() >= capacity {
                return Err(AllocError::Exhausted { capacity });
            }
        }

        let address = (self.slots.len() as u64)
            .checked_mul(SLOT_SIZE)
            .and_then(|offset| offset.checked_add(self.base));
        let word = address.and_then(L::from_bits).ok_or(AllocError::AddressSpace {
            address: address.unwrap_or(u64::MAX),
            layout: L::NAME,
        })?;

        self.slots.push(slot);
        Ok(HeapPtr::new(word))
    }

    fn slot(&self, ptr: HeapPtr<L>) -> &Slot {
        let bits = ptr.bits();
        bits.checked_sub(self.base)
            .filter(|offset| offset % SLOT_SIZE == 0)
            .and_then(|offset| self.slots.get((offset / SLOT_SIZE) as usize))
            .unwrap_or_else(|| panic!("{ptr:?} is not a box of this arena"))
    }
}

impl<L: Layout> Heap<L> for Arena<L> {
    fn type_of(&self, ptr: HeapPtr<L>) -> ValueType {
        self.slot(ptr).tt()
    }

    #[cfg(feature = "float")]
    fn float_of(&self, ptr: HeapPtr<L>) -> Float {
        match self.slot(ptr) {
            Slot::Float(f) => *f,
            other => panic!("{ptr:?} is a {} box, not a float box", other.tt()),
        }
    }

    fn cptr_of(&self, ptr: HeapPtr<L>) -> *mut c_void {
        match self.slot(ptr) {
            Slot::CPtr(p) => *p,
            other => panic!("{ptr:?} is a {} box, not a pointer box", other.tt()),
        }
    }
}

impl<L: Layout> Allocator<L> for Arena<L> {
    type Error = AllocError;

    #[cfg(feature = "float")]
    fn alloc_float(&mut self, f: Float) -> Result<HeapPtr<L>, AllocError> {
        self.push(Slot::Float(f))
    }

    #[cfg(feature = "float")]
    fn alloc_float_pooled(&mut self, f: Float) -> Result<HeapPtr<L>, AllocError> {
        if let Some(ptr) = self.pool.get(&f.to_bits()) {
            return Ok(*ptr);
        }

        let ptr = self.alloc_float(f)?;
        self.pool.insert(f.to_bits(), ptr);
        Ok(ptr)
    }

    fn alloc_cptr(&mut self, p: *mut c_void) -> Result<HeapPtr<L>, AllocError> {
        self.push(Slot::CPtr(p))
    }
}
