//!
//! The contract addresses.
//!

pub mod chosen;
pub mod synthetic;

///
/// The address iterator trait.
///
pub trait AddressIterator {
    ///
    /// Returns the next address as 40 lowercase hexadecimal digits.
    ///
    fn next(&mut self) -> String;
}
