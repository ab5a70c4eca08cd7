// Waveshare 2.7" monochrome e-paper driver (176x264, V1 controller)
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::spi::{self, SpiDevice};
use thiserror::Error;

use crate::application::panel_service::Panel;

/// Native panel size, portrait
pub const WIDTH: u32 = 176;
pub const HEIGHT: u32 = 264;
pub const BUFFER_LEN: usize = (WIDTH as usize / 8) * HEIGHT as usize;

/// spidev rejects single transfers above its default bufsiz
const SPI_CHUNK: usize = 4096;
const BUSY_POLL_MS: u32 = 10;
const BUSY_TIMEOUT_MS: u32 = 30_000;

mod cmd {
    pub const PANEL_SETTING: u8 = 0x00;
    pub const POWER_SETTING: u8 = 0x01;
    pub const POWER_OFF: u8 = 0x02;
    pub const POWER_ON: u8 = 0x04;
    pub const BOOSTER_SOFT_START: u8 = 0x06;
    pub const DEEP_SLEEP: u8 = 0x07;
    pub const DATA_START_OLD: u8 = 0x10;
    pub const DISPLAY_REFRESH: u8 = 0x12;
    pub const DATA_START_NEW: u8 = 0x13;
    pub const PARTIAL_DISPLAY_REFRESH: u8 = 0x16;
    pub const LUT_VCOM: u8 = 0x20;
    pub const LUT_WW: u8 = 0x21;
    pub const LUT_BW: u8 = 0x22;
    pub const LUT_BB: u8 = 0x23;
    pub const LUT_WB: u8 = 0x24;
    pub const PLL_CONTROL: u8 = 0x30;
    pub const VCOM_DATA_INTERVAL: u8 = 0x50;
    pub const VCM_DC_SETTING: u8 = 0x82;
    pub const POWER_OPTIMIZATION: u8 = 0xF8;
}

const POWER_OPTIMIZATION: [[u8; 2]; 7] = [
    [0x60, 0xA5],
    [0x89, 0xA5],
    [0x90, 0x00],
    [0x93, 0x2A],
    [0xA0, 0xA5],
    [0xA1, 0x00],
    [0x73, 0x41],
];

#[rustfmt::skip]
const LUT_VCOM_DC: [u8; 44] = [
    0x00, 0x00,
    0x00, 0x08, 0x00, 0x00, 0x00, 0x02,
    0x60, 0x28, 0x28, 0x00, 0x00, 0x01,
    0x00, 0x14, 0x00, 0x00, 0x00, 0x01,
    0x00, 0x12, 0x12, 0x00, 0x00, 0x01,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// White-to-white and black-to-white share one waveform
#[rustfmt::skip]
const LUT_TO_WHITE: [u8; 42] = [
    0x40, 0x08, 0x00, 0x00, 0x00, 0x02,
    0x90, 0x28, 0x28, 0x00, 0x00, 0x01,
    0x40, 0x14, 0x00, 0x00, 0x00, 0x01,
    0xA0, 0x12, 0x12, 0x00, 0x00, 0x01,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

#[rustfmt::skip]
const LUT_TO_BLACK: [u8; 42] = [
    0x80, 0x08, 0x00, 0x00, 0x00, 0x02,
    0x90, 0x28, 0x28, 0x00, 0x00, 0x01,
    0x80, 0x14, 0x00, 0x00, 0x00, 0x01,
    0x50, 0x12, 0x12, 0x00, 0x00, 0x01,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PanelError {
    #[error("SPI transfer failed: {0:?}")]
    Spi(spi::ErrorKind),
    #[error("GPIO access failed: {0:?}")]
    Pin(digital::ErrorKind),
    #[error("buffer is {got} bytes, panel expects {expected}")]
    BufferSize { expected: usize, got: usize },
    #[error("panel still busy after {0} ms")]
    BusyTimeout(u32),
}

fn spi_err<E: spi::Error>(e: E) -> PanelError {
    PanelError::Spi(e.kind())
}

fn pin_err<E: digital::Error>(e: E) -> PanelError {
    PanelError::Pin(e.kind())
}

/// Driver over any embedded-hal 1.0 bus; BUSY reads low while the controller works
pub struct Epd2in7<SPI, BUSY, DC, RST, DELAY> {
    spi: SPI,
    busy: BUSY,
    dc: DC,
    rst: RST,
    delay: DELAY,
}

impl<SPI, BUSY, DC, RST, DELAY> Epd2in7<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(spi: SPI, busy: BUSY, dc: DC, rst: RST, delay: DELAY) -> Self {
        Self {
            spi,
            busy,
            dc,
            rst,
            delay,
        }
    }

    fn command(&mut self, command: u8) -> Result<(), PanelError> {
        self.dc.set_low().map_err(pin_err)?;
        self.spi.write(&[command]).map_err(spi_err)
    }

    fn data(&mut self, data: &[u8]) -> Result<(), PanelError> {
        self.dc.set_high().map_err(pin_err)?;
        for chunk in data.chunks(SPI_CHUNK) {
            self.spi.write(chunk).map_err(spi_err)?;
        }
        Ok(())
    }

    fn command_with(&mut self, command: u8, data: &[u8]) -> Result<(), PanelError> {
        self.command(command)?;
        self.data(data)
    }

    fn reset(&mut self) -> Result<(), PanelError> {
        self.rst.set_high().map_err(pin_err)?;
        self.delay.delay_ms(200);
        self.rst.set_low().map_err(pin_err)?;
        self.delay.delay_ms(10);
        self.rst.set_high().map_err(pin_err)?;
        self.delay.delay_ms(200);
        Ok(())
    }

    fn wait_until_idle(&mut self) -> Result<(), PanelError> {
        let mut waited = 0;
        while self.busy.is_low().map_err(pin_err)? {
            if waited >= BUSY_TIMEOUT_MS {
                return Err(PanelError::BusyTimeout(waited));
            }
            self.delay.delay_ms(BUSY_POLL_MS);
            waited += BUSY_POLL_MS;
        }
        Ok(())
    }

    fn load_luts(&mut self) -> Result<(), PanelError> {
        self.command_with(cmd::LUT_VCOM, &LUT_VCOM_DC)?;
        self.command_with(cmd::LUT_WW, &LUT_TO_WHITE)?;
        self.command_with(cmd::LUT_BW, &LUT_TO_WHITE)?;
        self.command_with(cmd::LUT_BB, &LUT_TO_BLACK)?;
        self.command_with(cmd::LUT_WB, &LUT_TO_BLACK)
    }

    fn refresh(&mut self) -> Result<(), PanelError> {
        self.command(cmd::DISPLAY_REFRESH)?;
        self.wait_until_idle()
    }

    /// Hardware reset and full power-up sequence
    pub fn init(&mut self) -> Result<(), PanelError> {
        self.reset()?;

        self.command_with(cmd::POWER_SETTING, &[0x03, 0x00, 0x2B, 0x2B, 0x09])?;
        self.command_with(cmd::BOOSTER_SOFT_START, &[0x07, 0x07, 0x17])?;
        for pair in POWER_OPTIMIZATION {
            self.command_with(cmd::POWER_OPTIMIZATION, &pair)?;
        }
        self.command_with(cmd::PARTIAL_DISPLAY_REFRESH, &[0x00])?;
        self.command(cmd::POWER_ON)?;
        self.wait_until_idle()?;

        // KW-BF, KWR-AF, BWROTP 0f
        self.command_with(cmd::PANEL_SETTING, &[0xAF])?;
        // 100 Hz
        self.command_with(cmd::PLL_CONTROL, &[0x3A])?;
        self.command_with(cmd::VCOM_DATA_INTERVAL, &[0x57])?;
        self.command_with(cmd::VCM_DC_SETTING, &[0x12])?;
        self.load_luts()
    }

    /// Full refresh with a packed native-orientation buffer (`1` = white)
    pub fn display(&mut self, buffer: &[u8]) -> Result<(), PanelError> {
        if buffer.len() != BUFFER_LEN {
            return Err(PanelError::BufferSize {
                expected: BUFFER_LEN,
                got: buffer.len(),
            });
        }
        self.command_with(cmd::DATA_START_OLD, &[0xFF; BUFFER_LEN])?;
        self.command_with(cmd::DATA_START_NEW, buffer)?;
        self.refresh()
    }

    pub fn clear(&mut self, fill: u8) -> Result<(), PanelError> {
        let fill = [fill; BUFFER_LEN];
        self.command_with(cmd::DATA_START_OLD, &fill)?;
        self.command_with(cmd::DATA_START_NEW, &fill)?;
        self.refresh()
    }

    /// Power off and enter deep sleep; `init` is needed before the next refresh
    pub fn sleep(&mut self) -> Result<(), PanelError> {
        self.command_with(cmd::VCOM_DATA_INTERVAL, &[0xF7])?;
        self.command(cmd::POWER_OFF)?;
        self.command_with(cmd::DEEP_SLEEP, &[0xA5])
    }
}

impl<SPI, BUSY, DC, RST, DELAY> Panel for Epd2in7<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice + Send + 'static,
    BUSY: InputPin + Send + 'static,
    DC: OutputPin + Send + 'static,
    RST: OutputPin + Send + 'static,
    DELAY: DelayNs + Send + 'static,
{
    fn size(&self) -> (u32, u32) {
        (WIDTH, HEIGHT)
    }

    fn init(&mut self) -> anyhow::Result<()> {
        Ok(Epd2in7::init(self)?)
    }

    fn clear(&mut self, fill: u8) -> anyhow::Result<()> {
        Ok(Epd2in7::clear(self, fill)?)
    }

    fn display(&mut self, buffer: &[u8]) -> anyhow::Result<()> {
        Ok(Epd2in7::display(self, buffer)?)
    }

    fn sleep(&mut self) -> anyhow::Result<()> {
        Ok(Epd2in7::sleep(self)?)
    }
}
