use std::fmt::{Binary, Debug, LowerHex};

use super::*;

// Debug never touches the heap: heap references print as their address.
impl<L: Layout> Debug for Value<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_nil() {
            write!(f, "nil")
        } else if self.is_false() {
            write!(f, "false")
        } else if self.is_true() {
            write!(f, "true")
        } else if self.is_undef() {
            write!(f, "undef")
        } else if self.is_fixnum() {
            write!(f, "Fixnum({})", L::decode_fixnum(self.0))
        } else if self.is_symbol() {
            write!(f, "Symbol({})", L::decode_symbol(self.0))
        } else {
            write!(f, "Object({:#x})", self.0)
        }
    }
}

impl<L: Layout> Binary for Value<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Binary::fmt(&self.0, f)
    }
}

impl<L: Layout> LowerHex for Value<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        LowerHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Narrow, Wide};

    #[test]
    fn debug() {
        assert_eq!(format!("{:?}", Value::<Wide>::nil()), "nil");
        assert_eq!(format!("{:?}", Value::<Wide>::r#false()), "false");
        assert_eq!(format!("{:?}", Value::<Wide>::r#true()), "true");
        assert_eq!(format!("{:?}", Value::<Wide>::undef()), "undef");
        assert_eq!(format!("{:?}", Value::<Narrow>::fixnum(-3)), "Fixnum(-3)");
        assert_eq!(format!("{:?}", Value::<Narrow>::symbol(7)), "Symbol(7)");
        assert_eq!(
            format!("{:?}", Value::<Wide>::object(HeapPtr::new(0x1000))),
            "Object(0x1000)"
        );
    }

    #[test]
    fn binary_and_hex() {
        assert_eq!(format!("{:b}", Value::<Narrow>::r#true()), "1100");
        assert_eq!(format!("{:032b}", Value::<Narrow>::fixnum(2)), format!("{:032b}", 0b101));
        assert_eq!(format!("{:#x}", Value::<Wide>::symbol(1)), "0x100000002");
        assert_eq!(format!("{:#018x}", Value::<Wide>::undef()), "0x0000000000000014");
    }
}
