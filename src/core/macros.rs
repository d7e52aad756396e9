/******************************************\
|==========================================|
|          Macro: impl_enum_index          |
|==========================================|
\******************************************/

/// Index conversions for a fieldless `#[repr(u8)]` enum whose discriminants run
/// contiguously from zero and which declares `pub const NUM: usize`.
///
/// It provides:
/// - `unsafe fn from_unchecked(index: u8) -> Self`
/// - `fn from_index(index: u8) -> Option<Self>`
/// - `fn index(&self) -> usize`
/// - `fn iter() -> impl DoubleEndedIterator<Item = Self>`
#[macro_export]
macro_rules! impl_enum_index {
    ($enum_name:ident) => {
        impl $enum_name {
            #[doc=concat!("Converts a raw discriminant into ", stringify!($enum_name))]
            /// ## Safety
            /// - `index` must be below `Self::NUM`
            #[inline]
            pub const unsafe fn from_unchecked(index: u8) -> Self {
                debug_assert!((index as usize) < Self::NUM, "Index out of bounds");
                unsafe { std::mem::transmute::<u8, Self>(index) }
            }

            #[doc=concat!("Converts a raw discriminant into ", stringify!($enum_name), ", or `None` when out of range")]
            #[inline]
            pub const fn from_index(index: u8) -> Option<Self> {
                if (index as usize) < Self::NUM {
                    Some(unsafe { Self::from_unchecked(index) })
                } else {
                    None
                }
            }

            #[doc=concat!("Converts ", stringify!($enum_name), " to its discriminant as usize")]
            #[inline]
            pub const fn index(&self) -> usize {
                *self as usize
            }

            #[doc=concat!("Returns an iterator over every ", stringify!($enum_name))]
            pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
                (0..Self::NUM as u8).map(|i| unsafe { Self::from_unchecked(i) })
            }
        }
    };
}

/******************************************\
|==========================================|
|           Macro: impl_bit_ops            |
|==========================================|
\******************************************/

/// Implements `&`, `|`, `^` and their assignment forms for a single-field
/// tuple struct against another instance of the same struct.
#[macro_export]
macro_rules! impl_bit_ops {
    ($struct_name:ident) => {
        $crate::impl_bit_ops!(@op $struct_name, BitAnd, bitand, BitAndAssign, bitand_assign, &);
        $crate::impl_bit_ops!(@op $struct_name, BitOr, bitor, BitOrAssign, bitor_assign, |);
        $crate::impl_bit_ops!(@op $struct_name, BitXor, bitxor, BitXorAssign, bitxor_assign, ^);
    };

    (@op $struct_name:ident, $op_name:ident, $method:ident, $assign_name:ident, $assign_method:ident, $op:tt) => {
        impl std::ops::$op_name for $struct_name {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self::Output {
                Self(self.0 $op rhs.0)
            }
        }

        impl std::ops::$assign_name for $struct_name {
            #[inline]
            fn $assign_method(&mut self, rhs: Self) {
                self.0 = self.0 $op rhs.0;
            }
        }
    };
}
