use std::fmt::Display;

use thiserror::Error;

/// The closed set of type tags. Immediate kinds are derived from the word
/// itself; every other tag is read from the header of a heap object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ValueType {
    False = 0,
    True,
    Float,
    Fixnum,
    Symbol,
    Undef,
    CPtr,
    Free,
    Object,
    Class,
    Module,
    IClass,
    SClass,
    Proc,
    Array,
    Hash,
    String,
    Range,
    Exception,
    Env,
    Data,
    Fiber,
    Break,
}

/// A header carried a byte that is not a [ValueType].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown type tag {0}")]
pub struct UnknownType(pub u8);

impl ValueType {
    pub const ALL: [ValueType; 23] = [
        ValueType::False,
        ValueType::True,
        ValueType::Float,
        ValueType::Fixnum,
        ValueType::Symbol,
        ValueType::Undef,
        ValueType::CPtr,
        ValueType::Free,
        ValueType::Object,
        ValueType::Class,
        ValueType::Module,
        ValueType::IClass,
        ValueType::SClass,
        ValueType::Proc,
        ValueType::Array,
        ValueType::Hash,
        ValueType::String,
        ValueType::Range,
        ValueType::Exception,
        ValueType::Env,
        ValueType::Data,
        ValueType::Fiber,
        ValueType::Break,
    ];

    /// Kinds that never live behind a heap reference.
    pub fn is_immediate_type(self) -> bool {
        matches!(
            self,
            ValueType::False
                | ValueType::True
                | ValueType::Fixnum
                | ValueType::Symbol
                | ValueType::Undef
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueType::False => "false",
            ValueType::True => "true",
            ValueType::Float => "float",
            ValueType::Fixnum => "fixnum",
            ValueType::Symbol => "symbol",
            ValueType::Undef => "undef",
            ValueType::CPtr => "cptr",
            ValueType::Free => "free",
            ValueType::Object => "object",
            ValueType::Class => "class",
            ValueType::Module => "module",
            ValueType::IClass => "iclass",
            ValueType::SClass => "sclass",
            ValueType::Proc => "proc",
            ValueType::Array => "array",
            ValueType::Hash => "hash",
            ValueType::String => "string",
            ValueType::Range => "range",
            ValueType::Exception => "exception",
            ValueType::Env => "env",
            ValueType::Data => "data",
            ValueType::Fiber => "fiber",
            ValueType::Break => "break",
        }
    }
}

impl TryFrom<u8> for ValueType {
    type Error = UnknownType;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        ValueType::ALL
            .get(tag as usize)
            .copied()
            .ok_or(UnknownType(tag))
    }
}

impl From<ValueType> for u8 {
    fn from(tt: ValueType) -> Self {
        tt as u8
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}
