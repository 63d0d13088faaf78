//! ILI9341 command set and initialization script.
//!
//! The script is applied verbatim by [`Panel::configure`](super::Panel::configure).
//! Order and payloads are the panel vendor's bring-up sequence for this
//! module; multi-byte parameters use continuation words for every byte
//! except the last.

use super::panel::{InitStep, WordKind};

// ILI9341 Commands
pub const SLPOUT: u8 = 0x11;
pub const GAMSET: u8 = 0x26;
pub const DISPON: u8 = 0x29;
pub const CASET: u8 = 0x2A;
pub const PASET: u8 = 0x2B;
pub const RAMWR: u8 = 0x2C;
pub const MADCTL: u8 = 0x36;
pub const PIXSET: u8 = 0x3A;
pub const FRMCTR1: u8 = 0xB1;
pub const DISCTRL: u8 = 0xB6;
pub const PWCTR1: u8 = 0xC0;
pub const PWCTR2: u8 = 0xC1;
pub const VMCTR1: u8 = 0xC5;
pub const VMCTR2: u8 = 0xC7;
pub const PWCTRA: u8 = 0xCB;
pub const PWCTRB: u8 = 0xCF;
pub const PGAMCTRL: u8 = 0xE0;
pub const NGAMCTRL: u8 = 0xE1;
pub const DTCA: u8 = 0xE8;
pub const DTCB: u8 = 0xEA;
pub const PWRSEQ: u8 = 0xED;
pub const EN3G: u8 = 0xF2;
pub const PRC: u8 = 0xF7;
pub const IFCTL: u8 = 0xF6;

// MADCTL flags
const MADCTL_MV: u16 = 0x20; // Row/column exchange (landscape 320x240)
const MADCTL_BGR: u16 = 0x08; // BGR subpixel order

// COLMOD: 16 bits per pixel on both RGB and MCU interfaces
const PIXEL_FORMAT_16BPP: u16 = 0x55;

/// Terminal command word.
pub const fn command(cmd: u8) -> InitStep { InitStep::new(WordKind::Command, cmd as u16) }

const fn cmd_cont(cmd: u8) -> InitStep { InitStep::new(WordKind::CommandContinuation, cmd as u16) }

const fn data(value: u16) -> InitStep { InitStep::new(WordKind::Data, value) }

const fn data_cont(value: u16) -> InitStep { InitStep::new(WordKind::DataContinuation, value) }

/// Full bring-up script: sleep out, power, timing, gamma, window, pixel format,
/// interface control, display on.
pub const INIT_SEQUENCE: &[InitStep] = &[
    command(SLPOUT),
    // Power control B
    cmd_cont(PWCTRB),
    data_cont(0x00),
    data_cont(0x81),
    data(0xC0),
    // Power on sequence control (soft start keeps 1 frame)
    cmd_cont(PWRSEQ),
    data_cont(0x64),
    data_cont(0x03),
    data_cont(0x12),
    data(0x81),
    // Driver timing control A
    cmd_cont(DTCA),
    data_cont(0x85),
    data_cont(0x01),
    data(0x0798),
    // Power control A
    cmd_cont(PWCTRA),
    data_cont(0x39),
    data_cont(0x2C),
    data_cont(0x00),
    data_cont(0x34),
    data(0x02),
    // Pump ratio control
    cmd_cont(PRC),
    data(0x20),
    // Driver timing control B
    cmd_cont(DTCB),
    data_cont(0x00),
    data(0x00),
    // Frame rate control (normal mode)
    cmd_cont(FRMCTR1),
    data_cont(0x00),
    data(0x1B),
    // Display function control
    cmd_cont(DISCTRL),
    data_cont(0x0A),
    data(0xA2),
    // Power control 1 (VRH)
    cmd_cont(PWCTR1),
    data(0x05),
    // Power control 2 (SAP, BT)
    cmd_cont(PWCTR2),
    data(0x11),
    // VCOM control 1
    cmd_cont(VMCTR1),
    data_cont(0x45),
    data(0x45),
    // VCOM control 2
    cmd_cont(VMCTR2),
    data(0xA2),
    // Memory access control
    cmd_cont(MADCTL),
    data(MADCTL_MV | MADCTL_BGR),
    // 3-gamma function disable
    cmd_cont(EN3G),
    data(0x00),
    // Gamma curve 1
    cmd_cont(GAMSET),
    data(0x01),
    // Positive gamma correction
    cmd_cont(PGAMCTRL),
    data_cont(0x0F),
    data_cont(0x26),
    data_cont(0x24),
    data_cont(0x0B),
    data_cont(0x0E),
    data_cont(0x08),
    data_cont(0x4B),
    data_cont(0xA8),
    data_cont(0x3B),
    data_cont(0x0A),
    data_cont(0x14),
    data_cont(0x06),
    data_cont(0x10),
    data_cont(0x09),
    data(0x00),
    // Negative gamma correction
    cmd_cont(NGAMCTRL),
    data_cont(0x00),
    data_cont(0x1C),
    data_cont(0x20),
    data_cont(0x04),
    data_cont(0x10),
    data_cont(0x08),
    data_cont(0x34),
    data_cont(0x47),
    data_cont(0x44),
    data_cont(0x05),
    data_cont(0x0B),
    data_cont(0x09),
    data_cont(0x2F),
    data_cont(0x36),
    data(0x0F),
    // Column address 0..319
    cmd_cont(CASET),
    data_cont(0x00),
    data_cont(0x00),
    data_cont(0x01),
    data(0x3F),
    // Page address 0..239
    cmd_cont(PASET),
    data_cont(0x00),
    data_cont(0x00),
    data_cont(0x00),
    data(0xEF),
    // Pixel format
    cmd_cont(PIXSET),
    data(PIXEL_FORMAT_16BPP),
    // Interface control
    cmd_cont(IFCTL),
    data_cont(0x01),
    data_cont(0x30),
    data(0x00),
    command(DISPON),
];

// =============================================================================
// Tests
// =============================================================================
