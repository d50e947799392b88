//!
//! The synthetic address iterator.
//!

use crate::address::AddressIterator;
use crate::utils::ADDRESS_HEX_LENGTH;

///
/// The synthetic address iterator.
///
/// Every address is the fixed `0xce4604a` prefix shifted into the upper bits, plus a counter.
///
#[derive(Debug, Default, Clone)]
pub struct SyntheticAddressIterator {
    /// The number of addresses handed out.
    index: u128,
}

impl SyntheticAddressIterator {
    /// The address prefix.
    pub const PREFIX: u128 = 0xce4604a;

    /// The prefix shift in bits.
    pub const PREFIX_SHIFT: u32 = 100;

    ///
    /// Returns the number of addresses handed out.
    ///
    pub fn index(&self) -> u128 {
        self.index
    }
}

impl AddressIterator for SyntheticAddressIterator {
    fn next(&mut self) -> String {
        let address = (Self::PREFIX << Self::PREFIX_SHIFT) + self.index;
        self.index += 1;
        format!("{address:0width$x}", width = ADDRESS_HEX_LENGTH)
    }
}
