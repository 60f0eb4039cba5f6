//! Reads value literals, encodes them with a layout and reports what the
//! resulting word looks like.

use std::fmt::Display;

use boxword_runtime::{
    AllocError, Allocator, Arena, BoxHeap, Layout, Narrow, Native, RangeError, Value, ValueType,
    Wide, Wide32,
};
use libc::c_void;

use crate::cli::LayoutArg;

#[derive(thiserror::Error, miette::Diagnostic, Debug, Clone, PartialEq)]
pub enum InspectError {
    #[error("cannot read `{0}` as a value")]
    #[diagnostic(
        code(boxword::parse),
        help("try nil, true, false, undef, 42, :7, 1.5 or cptr:0x10")
    )]
    Parse(String),

    #[error("{0}")]
    #[diagnostic(code(boxword::range))]
    Range(#[from] RangeError),

    #[error("{0}")]
    #[diagnostic(code(boxword::alloc))]
    Alloc(#[from] AllocError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Nil,
    True,
    False,
    Undef,
    Fixnum(i64),
    Symbol(u64),
    #[cfg(feature = "float")]
    Float(f64),
    CPtr(usize),
}

pub fn parse(input: &str) -> Result<Literal, InspectError> {
    let input = input.trim();
    let fail = || InspectError::Parse(input.to_string());

    let literal = match input {
        "nil" => Literal::Nil,
        "true" => Literal::True,
        "false" => Literal::False,
        "undef" => Literal::Undef,
        _ => {
            if let Some(id) = input.strip_prefix(':') {
                Literal::Symbol(id.parse().map_err(|_| fail())?)
            } else if let Some(addr) = input.strip_prefix("cptr:") {
                let addr = match addr.strip_prefix("0x") {
                    Some(hex) => usize::from_str_radix(hex, 16),
                    None => addr.parse(),
                };
                Literal::CPtr(addr.map_err(|_| fail())?)
            } else if let Ok(n) = input.parse::<i64>() {
                Literal::Fixnum(n)
            } else {
                float(input).ok_or_else(fail)?
            }
        }
    };

    Ok(literal)
}

#[cfg(feature = "float")]
fn float(input: &str) -> Option<Literal> {
    input.parse().ok().map(Literal::Float)
}

#[cfg(not(feature = "float"))]
fn float(_: &str) -> Option<Literal> {
    None
}

/// Turns a literal into a word, boxing floats and pointers in `heap`.
pub fn encode<L, A>(literal: Literal, heap: &mut A) -> Result<Value<L>, InspectError>
where
    L: Layout,
    A: Allocator<L, Error = AllocError>,
{
    let value = match literal {
        Literal::Nil => Value::nil(),
        Literal::True => Value::r#true(),
        Literal::False => Value::r#false(),
        Literal::Undef => Value::undef(),
        Literal::Fixnum(n) => {
            let n = L::Int::try_from(n).map_err(|_| RangeError::fixnum::<L>(n))?;
            Value::checked_fixnum(n)?
        }
        Literal::Symbol(id) => {
            let id = u32::try_from(id).map_err(|_| RangeError::symbol::<L>(id))?;
            Value::checked_symbol(id)?
        }
        #[cfg(feature = "float")]
        Literal::Float(f) => Value::boxed_float_pooled(heap, f)?,
        Literal::CPtr(addr) => Value::boxed_cptr(heap, addr as *mut c_void)?,
    };

    Ok(value)
}

/// What one value looks like as a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub input: String,
    pub layout: &'static str,
    pub width: u32,
    pub word: u64,
    pub tt: ValueType,
    pub immediate: bool,
    pub truthy: bool,
}

pub fn report<L, A>(input: &str, heap: &mut A) -> Result<Report, InspectError>
where
    L: Layout,
    A: Allocator<L, Error = AllocError>,
{
    let value: Value<L> = encode(parse(input)?, &mut *heap)?;

    Ok(Report {
        input: input.trim().to_string(),
        layout: L::NAME,
        width: L::WORD_BITS,
        word: value.bits(),
        tt: value.classify(&*heap),
        immediate: value.is_immediate(),
        truthy: value.truthy(),
    })
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = (self.width / 4) as usize;
        let bits = self.width as usize;

        writeln!(
            f,
            "{} => {:#0hex$x} {} ({}, {}, {})",
            self.input,
            self.word,
            self.tt,
            self.layout,
            if self.immediate { "immediate" } else { "heap" },
            if self.truthy { "truthy" } else { "falsy" },
            hex = digits + 2,
        )?;
        write!(f, "  {:0bits$b}", self.word, bits = bits)
    }
}

/// Keeps one heap per layout alive for the whole session, so pooled floats
/// are shared between inputs.
#[derive(Default)]
pub struct Session {
    pub layout: LayoutArg,
    pub debug: bool,
    narrow: Arena<Narrow>,
    wide: Arena<Wide>,
    wide32: Arena<Wide32>,
    native: BoxHeap,
}

impl Session {
    pub fn new(layout: LayoutArg, debug: bool) -> Self {
        Session {
            layout,
            debug,
            ..Default::default()
        }
    }

    pub fn inspect(&mut self, input: &str) -> Result<Report, InspectError> {
        let report = match self.layout {
            LayoutArg::Narrow => report::<Narrow, _>(input, &mut self.narrow)?,
            LayoutArg::Wide => report::<Wide, _>(input, &mut self.wide)?,
            LayoutArg::Wide32 => report::<Wide32, _>(input, &mut self.wide32)?,
            LayoutArg::Native => report::<Native, _>(input, &mut self.native)?,
        };

        if self.debug {
            eprintln!("[{}] {:?} -> {:#x}", report.layout, input.trim(), report.word);
        }

        Ok(report)
    }
}
