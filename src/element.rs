//! The `Element` trait lets `BlockPool` and the codec be written once and instantiated for
//! both the 32-bit and 64-bit offset pools, avoiding a runtime dispatch per encoded entry
//! (the choice of pool is made once per `append`, not once per byte).

use std::convert::TryInto;
use std::mem;

/// An unsigned integer type a [`crate::block_pool::BlockPool`] can seed its blocks with.
///
/// Sealed over `u32` and `u64`: these are the only two widths the format ever uses.
pub trait Element: Copy + PartialOrd + private::Sealed {
    /// Size in bytes of this element on the wire (machine byte order).
    const SIZE: usize = mem::size_of::<Self>();
    /// Required alignment of this element on the wire.
    const ALIGN: usize = mem::align_of::<Self>();

    fn to_ne_bytes_vec(self) -> Vec<u8>;
    fn from_ne_bytes_slice(bytes: &[u8]) -> Self;
    fn as_u64(self) -> u64;
}

impl Element for u32 {
    fn to_ne_bytes_vec(self) -> Vec<u8> {
        self.to_ne_bytes().to_vec()
    }

    fn from_ne_bytes_slice(bytes: &[u8]) -> Self {
        u32::from_ne_bytes(bytes.try_into().expect("4-byte slice"))
    }

    fn as_u64(self) -> u64 {
        self as u64
    }
}

impl Element for u64 {
    fn to_ne_bytes_vec(self) -> Vec<u8> {
        self.to_ne_bytes().to_vec()
    }

    fn from_ne_bytes_slice(bytes: &[u8]) -> Self {
        u64::from_ne_bytes(bytes.try_into().expect("8-byte slice"))
    }

    fn as_u64(self) -> u64 {
        self
    }
}

/// `padded_element_size(T) = sizeof(u16) + alignof(T) + sizeof(T)`.
///
/// Sealed blocks are trimmed to `used_bytes + padded_element_size::<T>()`: this reserves
/// worst-case room (an alignment-skip byte, the Long-form header, full `pad`, and the T-value
/// itself) so that popping and re-appending the last entry as an absolute value never forces a
/// reallocation.
pub(crate) fn padded_element_size<T: Element>() -> usize {
    mem::size_of::<u16>() + T::ALIGN + T::SIZE
}

mod private {
    pub trait Sealed {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}
