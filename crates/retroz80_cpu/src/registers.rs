use bitflags::bitflags;

bitflags! {
    /// Flag bits in the F register.
    ///
    /// `X` and `Y` are the undocumented copies of result bits 3 and 5.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        const S = 0x80;
        const Z = 0x40;
        const Y = 0x20;
        const H = 0x10;
        const X = 0x08;
        const PV = 0x04;
        const N = 0x02;
        const C = 0x01;
    }
}

impl Flags {
    /// S, Z and the undocumented 5/3 bits taken from an 8-bit result.
    #[inline]
    pub fn sz53(value: u8) -> Self {
        let mut flags = Self::from_bits_retain(value & 0xA8);
        flags.set(Self::Z, value == 0);
        flags
    }

    /// Like [`Flags::sz53`], plus PV set for even parity.
    #[inline]
    pub fn sz53p(value: u8) -> Self {
        let mut flags = Self::sz53(value);
        flags.set(Self::PV, value.count_ones() % 2 == 0);
        flags
    }

    /// Only the undocumented 5/3 bits of `value`.
    #[inline]
    pub fn undocumented(value: u8) -> Self {
        Self::from_bits_retain(value & 0x28)
    }
}

/// Maskable interrupt response mode selected by IM 0/1/2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InterruptMode {
    #[default]
    Im0,
    Im1,
    Im2,
}

impl InterruptMode {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            1 => Self::Im1,
            2 => Self::Im2,
            _ => Self::Im0,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Self::Im0 => 0,
            Self::Im1 => 1,
            Self::Im2 => 2,
        }
    }
}

/// Register file of the Z80: main and shadow sets, index registers, the
/// interrupt/refresh pair and the interrupt flip-flops.
///
/// 16-bit pairs are never stored; they are composed from their two 8-bit
/// halves, high byte first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub a_alt: u8,
    pub f_alt: u8,
    pub b_alt: u8,
    pub c_alt: u8,
    pub d_alt: u8,
    pub e_alt: u8,
    pub h_alt: u8,
    pub l_alt: u8,
    pub ix: u16,
    pub iy: u16,
    pub sp: u16,
    pub pc: u16,
    pub i: u8,
    pub r: u8,
    pub iff1: bool,
    pub iff2: bool,
    pub im: InterruptMode,
}

impl Registers {
    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f])
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a = a;
        self.f = f;
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        let [b, c] = value.to_be_bytes();
        self.b = b;
        self.c = c;
    }

    #[inline]
    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        let [d, e] = value.to_be_bytes();
        self.d = d;
        self.e = e;
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        let [h, l] = value.to_be_bytes();
        self.h = h;
        self.l = l;
    }

    pub fn af_alt(&self) -> u16 {
        u16::from_be_bytes([self.a_alt, self.f_alt])
    }

    pub fn set_af_alt(&mut self, value: u16) {
        [self.a_alt, self.f_alt] = value.to_be_bytes();
    }

    pub fn bc_alt(&self) -> u16 {
        u16::from_be_bytes([self.b_alt, self.c_alt])
    }

    pub fn set_bc_alt(&mut self, value: u16) {
        [self.b_alt, self.c_alt] = value.to_be_bytes();
    }

    pub fn de_alt(&self) -> u16 {
        u16::from_be_bytes([self.d_alt, self.e_alt])
    }

    pub fn set_de_alt(&mut self, value: u16) {
        [self.d_alt, self.e_alt] = value.to_be_bytes();
    }

    pub fn hl_alt(&self) -> u16 {
        u16::from_be_bytes([self.h_alt, self.l_alt])
    }

    pub fn set_hl_alt(&mut self, value: u16) {
        [self.h_alt, self.l_alt] = value.to_be_bytes();
    }

    #[inline]
    pub fn ixh(&self) -> u8 {
        (self.ix >> 8) as u8
    }

    #[inline]
    pub fn ixl(&self) -> u8 {
        self.ix as u8
    }

    #[inline]
    pub fn iyh(&self) -> u8 {
        (self.iy >> 8) as u8
    }

    #[inline]
    pub fn iyl(&self) -> u8 {
        self.iy as u8
    }

    /// EXX: swap BC, DE and HL with their shadow counterparts.
    pub fn exx(&mut self) {
        std::mem::swap(&mut self.b, &mut self.b_alt);
        std::mem::swap(&mut self.c, &mut self.c_alt);
        std::mem::swap(&mut self.d, &mut self.d_alt);
        std::mem::swap(&mut self.e, &mut self.e_alt);
        std::mem::swap(&mut self.h, &mut self.h_alt);
        std::mem::swap(&mut self.l, &mut self.l_alt);
    }

    /// EX AF,AF'.
    pub fn ex_af(&mut self) {
        std::mem::swap(&mut self.a, &mut self.a_alt);
        std::mem::swap(&mut self.f, &mut self.f_alt);
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        Flags::from_bits_retain(self.f)
    }

    #[inline]
    pub fn set_flags(&mut self, flags: Flags) {
        self.f = flags.bits();
    }

    #[inline]
    pub fn flag(&self, flag: Flags) -> bool {
        self.flags().contains(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flags, value: bool) {
        let mut flags = self.flags();
        flags.set(flag, value);
        self.f = flags.bits();
    }

    /// Advance the low seven bits of R, keeping bit 7.
    #[inline]
    pub fn bump_r(&mut self) {
        self.r = (self.r & 0x80) | (self.r.wrapping_add(1) & 0x7F);
    }
}
