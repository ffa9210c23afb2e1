/// Handler for reads from one input port.
///
/// `address` is the full 16-bit value the CPU places on the address bus:
/// `(A << 8) | n` for `IN A,(n)` and BC for the `(C)` forms.
pub trait InputDevice {
    fn read(&mut self, address: u16) -> u8;
}

/// Handler for writes to one output port.
pub trait OutputDevice {
    fn write(&mut self, value: u8);
}

/// Value seen on a read from a port with no device attached.
pub const FLOATING_BUS: u8 = 0xFF;

/// 256 input slots and 256 output slots indexed by port number.
///
/// Unbound ports are not an error: reads see [`FLOATING_BUS`] and writes
/// are dropped.
pub struct Ports {
    inputs: [Option<Box<dyn InputDevice>>; 256],
    outputs: [Option<Box<dyn OutputDevice>>; 256],
}

impl Default for Ports {
    fn default() -> Self {
        Self {
            inputs: std::array::from_fn(|_| None),
            outputs: std::array::from_fn(|_| None),
        }
    }
}

impl Ports {
    pub fn attach_input(&mut self, port: u8, device: Box<dyn InputDevice>) {
        self.inputs[port as usize] = Some(device);
    }

    pub fn attach_output(&mut self, port: u8, device: Box<dyn OutputDevice>) {
        self.outputs[port as usize] = Some(device);
    }

    pub fn detach_input(&mut self, port: u8) -> Option<Box<dyn InputDevice>> {
        self.inputs[port as usize].take()
    }

    pub fn detach_output(&mut self, port: u8) -> Option<Box<dyn OutputDevice>> {
        self.outputs[port as usize].take()
    }

    pub fn read(&mut self, port: u8, address: u16) -> u8 {
        match self.inputs[port as usize].as_mut() {
            Some(device) => device.read(address),
            None => {
                log::trace!("IN from unbound port 0x{port:02X} (address 0x{address:04X})");
                FLOATING_BUS
            }
        }
    }

    pub fn write(&mut self, port: u8, value: u8) {
        match self.outputs[port as usize].as_mut() {
            Some(device) => device.write(value),
            None => log::trace!("OUT 0x{value:02X} to unbound port 0x{port:02X}"),
        }
    }
}

impl std::fmt::Debug for Ports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bound_in = self.inputs.iter().filter(|slot| slot.is_some()).count();
        let bound_out = self.outputs.iter().filter(|slot| slot.is_some()).count();
        f.debug_struct("Ports")
            .field("inputs", &bound_in)
            .field("outputs", &bound_out)
            .finish()
    }
}
