// Raspberry Pi wiring for the 2.7" HAT: SPI panel and the four keys
use anyhow::{Context, Result};
use linux_embedded_hal::{
    gpio_cdev::{Chip, EventRequestFlags, LineRequestFlags},
    spidev::{SpiModeFlags, SpidevOptions},
    CdevPin, Delay, SpidevDevice,
};
use tokio::sync::mpsc;

use super::epd2in7::Epd2in7;
use crate::application::button_handler::Button;

const GPIO_CHIP: &str = "/dev/gpiochip0";
const SPI_DEVICE: &str = "/dev/spidev0.0";
const SPI_SPEED_HZ: u32 = 4_000_000;

/// BCM numbers fixed by the HAT
const RST_PIN: u32 = 17;
const DC_PIN: u32 = 25;
const BUSY_PIN: u32 = 24;

pub type RpiPanel = Epd2in7<SpidevDevice, CdevPin, CdevPin, CdevPin, Delay>;

pub fn open_panel() -> Result<RpiPanel> {
    let mut spi = SpidevDevice::open(SPI_DEVICE).context("opening SPI device")?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(SPI_SPEED_HZ)
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.configure(&options).context("configuring SPI")?;

    let mut chip = Chip::new(GPIO_CHIP).context("opening GPIO chip")?;

    let rst_handle = chip
        .get_line(RST_PIN)
        .context("getting RST line")?
        .request(LineRequestFlags::OUTPUT, 1, "weather-station-rst")
        .context("requesting RST line")?;
    let rst = CdevPin::new(rst_handle).context("creating RST pin")?;

    let dc_handle = chip
        .get_line(DC_PIN)
        .context("getting DC line")?
        .request(LineRequestFlags::OUTPUT, 0, "weather-station-dc")
        .context("requesting DC line")?;
    let dc = CdevPin::new(dc_handle).context("creating DC pin")?;

    let busy_handle = chip
        .get_line(BUSY_PIN)
        .context("getting BUSY line")?
        .request(LineRequestFlags::INPUT, 0, "weather-station-busy")
        .context("requesting BUSY line")?;
    let busy = CdevPin::new(busy_handle).context("creating BUSY pin")?;

    Ok(Epd2in7::new(spi, busy, dc, rst, Delay))
}

/// Watch the keys on background threads and forward each press.
///
/// Keys pull the line low, so the lines are requested active-low and a press is the logical rising edge.
pub fn watch_buttons(pins: [u32; 4], presses: mpsc::Sender<Button>) -> Result<()> {
    let mut chip = Chip::new(GPIO_CHIP).context("opening GPIO chip")?;

    for (pin, button) in pins.into_iter().zip(Button::ALL) {
        let events = chip
            .get_line(pin)
            .with_context(|| format!("getting button line {}", pin))?
            .events(
                LineRequestFlags::INPUT | LineRequestFlags::ACTIVE_LOW,
                EventRequestFlags::RISING_EDGE,
                "weather-station-key",
            )
            .with_context(|| format!("requesting events on line {}", pin))?;

        let presses = presses.clone();
        std::thread::Builder::new()
            .name(format!("key-{}", pin))
            .spawn(move || {
                for event in events {
                    match event {
                        Ok(_) => {
                            if presses.blocking_send(button).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::error!(pin, "Button line failed: {}", e);
                            break;
                        }
                    }
                }
            })
            .context("spawning button thread")?;
    }
    Ok(())
}
