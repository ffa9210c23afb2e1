use std::ops::RangeInclusive;

/// Total addressable memory size (64 KiB).
pub const MEMORY_SIZE: usize = 0x10000;

/// Abstraction over the Z80 memory bus.
///
/// Addresses are 16-bit, so every access wraps at 64 KiB by construction.
/// The 16-bit helpers are little-endian and wrap between 0xFFFF and 0x0000.
pub trait Memory {
    fn read8(&self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    fn read16(&self, addr: u16) -> u16 {
        u16::from_le_bytes([self.read8(addr), self.read8(addr.wrapping_add(1))])
    }

    fn write16(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write8(addr, lo);
        self.write8(addr.wrapping_add(1), hi);
    }
}

/// Flat 64 KiB read/write store.
#[derive(Clone)]
pub struct Ram {
    cells: Box<[u8]>,
}

impl Default for Ram {
    fn default() -> Self {
        Self {
            cells: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }
}

impl Ram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `bytes` into memory starting at `addr`, wrapping past 0xFFFF.
    pub fn load(&mut self, addr: u16, bytes: &[u8]) {
        let mut at = addr;
        for &byte in bytes {
            self.write8(at, byte);
            at = at.wrapping_add(1);
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }
}

impl Memory for Ram {
    #[inline]
    fn read8(&self, addr: u16) -> u8 {
        self.cells[addr as usize]
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        self.cells[addr as usize] = value;
    }
}

/// Observer for writes that land in an [`OverlayMemory`] watch range.
pub trait WriteListener {
    fn on_write(&mut self, addr: u16, value: u8);
}

/// Listener that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoListener;

impl WriteListener for NoListener {
    fn on_write(&mut self, _addr: u16, _value: u8) {}
}

/// A [`Ram`] with write protection below a boundary and an optional
/// watched range.
///
/// Writes to addresses below `protect_below` are dropped, which is how ROM
/// is emulated. Writes that are accepted and fall inside the watch range
/// are forwarded to the listener after they are stored.
pub struct OverlayMemory<L: WriteListener = NoListener> {
    ram: Ram,
    protect_below: u16,
    watch: RangeInclusive<u16>,
    listener: L,
}

impl<L: WriteListener> OverlayMemory<L> {
    pub fn new(protect_below: u16, watch: RangeInclusive<u16>, listener: L) -> Self {
        Self {
            ram: Ram::new(),
            protect_below,
            watch,
            listener,
        }
    }

    /// Install bytes directly, bypassing write protection and the listener.
    pub fn load(&mut self, addr: u16, bytes: &[u8]) {
        self.ram.load(addr, bytes);
    }

    pub fn protect_below(&self) -> u16 {
        self.protect_below
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn ram(&self) -> &Ram {
        &self.ram
    }
}

impl<L: WriteListener> Memory for OverlayMemory<L> {
    #[inline]
    fn read8(&self, addr: u16) -> u8 {
        self.ram.read8(addr)
    }

    fn write8(&mut self, addr: u16, value: u8) {
        if addr < self.protect_below {
            return;
        }
        self.ram.write8(addr, value);
        if self.watch.contains(&addr) {
            self.listener.on_write(addr, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<(u16, u8)>,
    }

    impl WriteListener for Recorder {
        fn on_write(&mut self, addr: u16, value: u8) {
            self.writes.push((addr, value));
        }
    }

    #[test]
    fn ram_stores_every_byte_value() {
        let mut ram = Ram::new();
        for value in 0..=255u8 {
            ram.write8(0x8000, value);
            assert_eq!(ram.read8(0x8000), value);
        }
    }

    #[test]
    fn word_access_is_little_endian_and_wraps() {
        let mut ram = Ram::new();
        ram.write16(0x1234, 0xBEEF);
        assert_eq!(ram.read8(0x1234), 0xEF);
        assert_eq!(ram.read8(0x1235), 0xBE);

        ram.write16(0xFFFF, 0x1122);
        assert_eq!(ram.read8(0xFFFF), 0x22);
        assert_eq!(ram.read8(0x0000), 0x11);
        assert_eq!(ram.read16(0xFFFF), 0x1122);
    }

    #[test]
    fn overlay_drops_protected_writes() {
        let mut mem = OverlayMemory::new(0x4000, 0x4000..=0x5AFF, NoListener);
        mem.load(0x0000, &[0xF3, 0xAF]);
        mem.write8(0x0000, 0x00);
        mem.write8(0x3FFF, 0x55);
        mem.write8(0x4000, 0x66);
        assert_eq!(mem.read8(0x0000), 0xF3);
        assert_eq!(mem.read8(0x3FFF), 0x00);
        assert_eq!(mem.read8(0x4000), 0x66);
        assert_eq!(mem.protect_below(), 0x4000);
    }

    #[test]
    fn overlay_notifies_only_inside_watch_range() {
        let mut mem = OverlayMemory::new(0x4000, 0x4000..=0x5AFF, Recorder::default());
        mem.write8(0x1000, 1);
        mem.write8(0x4000, 2);
        mem.write8(0x5AFF, 3);
        mem.write8(0x5B00, 4);
        assert_eq!(mem.listener().writes, vec![(0x4000, 2), (0x5AFF, 3)]);
    }
}
