use clap::{Parser, ValueEnum};

/// Encodes runtime values as tagged words and shows their bits.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// Word layout to encode with.
    #[arg(short, long, value_enum, default_value_t = LayoutArg::Native)]
    pub layout: LayoutArg,

    /// Prints the raw word of every value to stderr.
    #[arg(short, long)]
    pub debug: bool,

    /// Starts a repl session.
    #[arg(short, long)]
    pub repl: bool,

    /// Values to inspect: nil, true, false, undef, 42, :7, 1.5, cptr:0x10.
    pub values: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutArg {
    /// 32-bit words.
    Narrow,
    /// 64-bit words.
    Wide,
    /// 64-bit words with 32-bit integers.
    Wide32,
    /// The word size of this machine, backed by real heap boxes.
    #[default]
    Native,
}
