//! Simulated open-drain bus for tests
//!
//! Models both lines as a wired-AND of the master and the attached slave
//! devices, decodes START/STOP from line edges and runs a byte-level slave
//! state machine clocked by the master. Fault knobs hold lines low to
//! exercise bus recovery.

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use softwire_hal::{BusLines, Level, Line, Mode};

/// One addressed transfer seen by a device
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// R/W bit of the address byte
    pub read: bool,
    /// Data bytes the master wrote
    pub written: Vec<u8>,
    /// Bytes the device started to send
    pub bytes_read: usize,
}

/// Slave device answering one 7-bit address
///
/// Every write byte is acknowledged. Read bytes come from a response queue
/// and fall back to a fixed byte once it is empty.
#[derive(Debug, Clone)]
pub struct SimDevice {
    addr7: u8,
    responses: VecDeque<u8>,
    fallback: u8,
    pub transfers: Vec<Transfer>,
}

impl SimDevice {
    pub fn new(addr7: u8) -> Self {
        Self {
            addr7,
            responses: VecDeque::new(),
            fallback: 0xFF,
            transfers: Vec::new(),
        }
    }

    pub fn with_responses(mut self, bytes: &[u8]) -> Self {
        self.responses.extend(bytes.iter().copied());
        self
    }

    pub fn with_fallback(mut self, byte: u8) -> Self {
        self.fallback = byte;
        self
    }

    /// Write transfers whose first byte is `command`
    pub fn commands(&self, command: u8) -> usize {
        self.transfers
            .iter()
            .filter(|t| !t.read && t.written.first() == Some(&command))
            .count()
    }

    fn next_response(&mut self) -> u8 {
        if let Some(t) = self.transfers.last_mut() {
            t.bytes_read += 1;
        }
        self.responses.pop_front().unwrap_or(self.fallback)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Shifting in an address or data byte
    Receive,
    /// Holding the acknowledge of a received byte
    AckOut,
    /// Shifting out a data byte
    Transmit,
    /// Sampling the master's acknowledge
    AckIn,
}

/// Master side of one line
#[derive(Debug, Clone, Copy)]
struct Port {
    output: bool,
    latch: bool,
}

impl Port {
    fn released(self) -> bool {
        !self.output || self.latch
    }
}

pub struct SimBus {
    scl: Port,
    sda: Port,
    scl_prev: bool,
    sda_prev: bool,

    phase: Phase,
    shift: u8,
    bits: u8,
    addressing: bool,
    reading: bool,
    master_acked: bool,
    slave_sda_low: bool,
    active: Option<usize>,
    devices: Vec<SimDevice>,

    /// Clock held low by something outside the master
    scl_stuck_low: bool,
    /// Data held low for this many more clock rising edges
    sda_stuck_edges: u32,
    /// A device holds the clock low once the master pulls it low
    stretch_forever: bool,
    stretching: bool,

    pub starts: u32,
    pub stops: u32,
    /// Data pulled low with the clock high while data was already low
    pub missed_starts: u32,
    pub rising_edges: u32,
    /// Master drive or output-enable operations on the clock line
    pub clock_ops: u32,
    /// Data level at every clock rising edge
    pub samples: Vec<bool>,
    /// Acknowledge the master gave to each byte a device sent
    pub master_acks: Vec<bool>,
}

impl SimBus {
    /// Both lines released, no devices
    pub fn new() -> Self {
        Self {
            scl: Port {
                output: false,
                latch: false,
            },
            sda: Port {
                output: false,
                latch: false,
            },
            scl_prev: true,
            sda_prev: true,
            phase: Phase::Idle,
            shift: 0,
            bits: 0,
            addressing: false,
            reading: false,
            master_acked: false,
            slave_sda_low: false,
            active: None,
            devices: Vec::new(),
            scl_stuck_low: false,
            sda_stuck_edges: 0,
            stretch_forever: false,
            stretching: false,
            starts: 0,
            stops: 0,
            missed_starts: 0,
            rising_edges: 0,
            clock_ops: 0,
            samples: Vec::new(),
            master_acks: Vec::new(),
        }
    }

    pub fn with_device(mut self, device: SimDevice) -> Self {
        self.devices.push(device);
        self
    }

    /// Hold the clock low from outside the master
    pub fn with_scl_stuck_low(mut self) -> Self {
        self.scl_stuck_low = true;
        self.resync();
        self
    }

    /// Hold the data line low for `edges` clock rising edges
    pub fn with_sda_stuck(mut self, edges: u32) -> Self {
        self.sda_stuck_edges = edges;
        self.resync();
        self
    }

    /// Stretch the clock forever once the master first pulls it low
    pub fn with_stretch_forever(mut self) -> Self {
        self.stretch_forever = true;
        self
    }

    /// Take the current levels as the edge reference
    fn resync(&mut self) {
        self.scl_prev = self.scl_high();
        self.sda_prev = self.sda_high();
    }

    /// Device at a 7-bit address
    ///
    /// Panics if no such device was attached.
    pub fn device(&self, addr7: u8) -> &SimDevice {
        self.devices
            .iter()
            .find(|d| d.addr7 == addr7)
            .expect("no simulated device at address")
    }

    pub fn scl_high(&self) -> bool {
        self.scl.released() && !self.scl_stuck_low && !self.stretching
    }

    pub fn sda_high(&self) -> bool {
        self.sda.released() && !self.slave_sda_low && self.sda_stuck_edges == 0
    }

    /// Propagate a master change to the devices
    fn update(&mut self) {
        let scl = self.scl_high();
        let sda = self.sda_high();

        if self.scl_prev && scl && sda != self.sda_prev {
            if sda {
                self.on_stop();
            } else {
                self.on_start();
            }
        } else if !self.scl_prev && scl {
            self.on_rising(sda);
        } else if self.scl_prev && !scl {
            self.on_falling();
        }

        self.resync();
    }

    fn on_start(&mut self) {
        self.starts += 1;
        self.phase = Phase::Receive;
        self.addressing = true;
        self.shift = 0;
        self.bits = 0;
        self.active = None;
        self.slave_sda_low = false;
    }

    fn on_stop(&mut self) {
        self.stops += 1;
        self.phase = Phase::Idle;
        self.active = None;
        self.slave_sda_low = false;
    }

    fn on_rising(&mut self, sda: bool) {
        self.rising_edges += 1;
        self.samples.push(sda);
        if self.sda_stuck_edges > 0 {
            self.sda_stuck_edges -= 1;
        }

        match self.phase {
            Phase::Receive if self.bits < 8 => {
                self.shift = (self.shift << 1) | sda as u8;
                self.bits += 1;
            }
            Phase::AckIn => {
                self.master_acked = !sda;
                self.master_acks.push(!sda);
            }
            _ => {}
        }
    }

    fn on_falling(&mut self) {
        if self.stretch_forever {
            self.stretching = true;
        }

        match self.phase {
            Phase::Receive if self.bits == 8 => self.byte_received(),
            Phase::AckOut => {
                self.slave_sda_low = false;
                if self.reading {
                    self.load_next();
                } else {
                    self.phase = Phase::Receive;
                    self.shift = 0;
                    self.bits = 0;
                }
            }
            Phase::Transmit => {
                self.bits += 1;
                if self.bits < 8 {
                    self.slave_sda_low = self.shift & (0x80 >> self.bits) == 0;
                } else {
                    self.slave_sda_low = false;
                    self.phase = Phase::AckIn;
                }
            }
            Phase::AckIn => {
                if self.master_acked {
                    self.load_next();
                } else {
                    self.phase = Phase::Idle;
                }
            }
            _ => {}
        }
    }

    fn byte_received(&mut self) {
        let byte = self.shift;

        if self.addressing {
            self.addressing = false;
            match self.devices.iter().position(|d| d.addr7 == byte >> 1) {
                Some(index) => {
                    self.active = Some(index);
                    self.reading = byte & 1 == 1;
                    self.devices[index].transfers.push(Transfer {
                        read: self.reading,
                        ..Transfer::default()
                    });
                    self.slave_sda_low = true;
                    self.phase = Phase::AckOut;
                }
                None => self.phase = Phase::Idle,
            }
            return;
        }

        if let Some(index) = self.active {
            if let Some(t) = self.devices[index].transfers.last_mut() {
                t.written.push(byte);
            }
            self.slave_sda_low = true;
            self.phase = Phase::AckOut;
        }
    }

    fn load_next(&mut self) {
        let Some(index) = self.active else {
            self.phase = Phase::Idle;
            return;
        };
        self.shift = self.devices[index].next_response();
        self.bits = 0;
        self.slave_sda_low = self.shift & 0x80 == 0;
        self.phase = Phase::Transmit;
    }

    fn port(&mut self, line: Line) -> &mut Port {
        match line {
            Line::Clock => &mut self.scl,
            Line::Data => &mut self.sda,
        }
    }
}

impl BusLines for SimBus {
    fn set_mode(&mut self, line: Line, mode: Mode) {
        if line == Line::Clock && mode == Mode::Output {
            self.clock_ops += 1;
        }
        self.port(line).output = mode == Mode::Output;
        self.update();
    }

    fn drive(&mut self, line: Line, level: Level) {
        match line {
            Line::Clock => self.clock_ops += 1,
            Line::Data => {
                if level.is_low() && self.sda.output && self.scl_high() && !self.sda_high() {
                    self.missed_starts += 1;
                }
            }
        }
        self.port(line).latch = level.is_high();
        self.update();
    }

    fn read(&mut self, line: Line) -> Level {
        let high = match line {
            Line::Clock => self.scl_high(),
            Line::Data => self.sda_high(),
        };
        Level::from_bit(high)
    }
}

/// Virtual clock, sums requested delays
#[derive(Debug, Default)]
pub struct SimDelay {
    elapsed_ns: u64,
}

impl SimDelay {
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_ns / 1_000
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}
