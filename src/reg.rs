//! Register access support
//!
//! Every driver in this crate talks to the hardware through [`RegisterAccess`],
//! a byte-wide read/write interface keyed by data-space address. On the target
//! this is [`Mmio`], which performs volatile loads and stores. The
//! [`sim`](crate::sim) module provides an in-memory implementation for tests.

use core::ptr;

/// Data-space address of an 8-bit register.
pub type Address = usize;

/// Byte-wide access to a register file.
pub trait RegisterAccess {
    /// Reads the register at `address`.
    fn read(&self, address: Address) -> u8;

    /// Writes `value` to the register at `address`.
    fn write(&self, address: Address, value: u8);
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &T {
    #[inline(always)]
    fn read(&self, address: Address) -> u8 {
        (**self).read(address)
    }

    #[inline(always)]
    fn write(&self, address: Address, value: u8) {
        (**self).write(address, value)
    }
}

/// Memory mapped register file of the running device.
#[derive(Debug)]
pub struct Mmio {
    _0: (),
}

impl Mmio {
    /// Returns a handle to the memory mapped register file.
    ///
    /// # Safety
    ///
    /// Only valid on the target device, where the addresses in
    /// [`atmega32`](crate::atmega32) are backed by peripheral registers.
    /// Handles created this way are not tracked by
    /// [`Peripherals::take`](crate::atmega32::Peripherals::take).
    pub const unsafe fn steal() -> Self {
        Mmio { _0: () }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Mmio {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Mmio");
    }
}

impl RegisterAccess for Mmio {
    #[inline(always)]
    fn read(&self, address: Address) -> u8 {
        // SAFETY: `Mmio` can only be obtained on the device, where `address`
        // is one of the I/O registers listed in `atmega32`.
        unsafe { ptr::read_volatile(address as *const u8) }
    }

    #[inline(always)]
    fn write(&self, address: Address, value: u8) {
        // SAFETY: see `read`.
        unsafe { ptr::write_volatile(address as *mut u8, value) }
    }
}

/// Modify specific index of array-like register
///
/// The register is treated as an array of `bitwidth` wide fields, and the
/// field at `index` is replaced by `value`. Bits of `value` outside the field
/// are dropped.
#[inline]
pub(crate) fn modify_at<B>(bus: &B, address: Address, bitwidth: u8, index: u8, value: u8)
where
    B: RegisterAccess + ?Sized,
{
    let mask = (u8::MAX >> (8 - bitwidth)) << (bitwidth * index);
    let value = (value << (bitwidth * index)) & mask;
    let current = bus.read(address);
    bus.write(address, current & !mask | value);
}

/// Sets bit `bit` with a read-modify-write.
#[inline]
pub(crate) fn set_bit<B: RegisterAccess + ?Sized>(bus: &B, address: Address, bit: u8) {
    modify_at(bus, address, 1, bit, 1);
}

/// Clears bit `bit` with a read-modify-write.
#[inline]
pub(crate) fn clear_bit<B: RegisterAccess + ?Sized>(bus: &B, address: Address, bit: u8) {
    modify_at(bus, address, 1, bit, 0);
}

/// Inverts bit `bit` with a read-modify-write.
#[inline]
pub(crate) fn toggle_bit<B: RegisterAccess + ?Sized>(bus: &B, address: Address, bit: u8) {
    let current = bus.read(address);
    bus.write(address, current ^ (1 << bit));
}

/// Reads bit `bit`.
#[inline]
pub(crate) fn get_bit<B: RegisterAccess + ?Sized>(bus: &B, address: Address, bit: u8) -> bool {
    bus.read(address) & (1 << bit) != 0
}

/// Writes a byte with only bit `bit` set, without reading first.
///
/// This is the access pattern for write-one-to-clear flag registers: a
/// read-modify-write would write back every other flag that happens to be set
/// and clear it as well.
#[inline]
pub(crate) fn write_one<B: RegisterAccess + ?Sized>(bus: &B, address: Address, bit: u8) {
    bus.write(address, 1 << bit);
}
