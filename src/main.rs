//! Firmware entry point for the nRF52840 transmitter board.
//!
//! Owns the peripherals, builds the collaborators and runs the poll loop:
//! sample every input into an [`InputSnapshot`], hand it to
//! [`Controller::poll`], sleep one poll interval, repeat.

#![no_std]
#![no_main]

use defmt::{info, unwrap, warn};
use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::{bind_interrupts, peripherals, saadc, spim, twim, Peripheral};
use embassy_time::{Delay, Instant, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;

use rc_transmitter::config::{ADC_MAX, POLL_INTERVAL_MS};
use rc_transmitter::drivers::{Eeprom24x, Nrf24};
use rc_transmitter::io::{AnalogChannel, BuzzerOutput, DigitalPin, InputSnapshot};
use rc_transmitter::ui::display::OledPresenter;
use rc_transmitter::{Collaborators, Controller};

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    TWISPI1 => twim::InterruptHandler<peripherals::TWISPI1>;
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
});

/// Piezo on a plain GPIO (self-oscillating buzzer).
struct Buzzer(Output<'static>);

impl BuzzerOutput for Buzzer {
    fn set(&mut self, on: bool) {
        if on {
            self.0.set_high();
        } else {
            self.0.set_low();
        }
    }
}

fn analog_channel<'d>(pin: impl Peripheral<P = impl saadc::Input> + 'd) -> saadc::ChannelConfig<'d> {
    let mut channel = saadc::ChannelConfig::single_ended(pin);
    // Full scale = VDD, matching the 3.3 V reference in the battery math.
    channel.gain = saadc::Gain::GAIN1_4;
    channel.reference = saadc::Reference::VDD1_4;
    channel
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("rc-transmitter starting");

    // Sticks, pots and battery sense, in `AnalogChannel` order.
    let mut adc_config = saadc::Config::default();
    adc_config.resolution = saadc::Resolution::_12BIT;
    let mut saadc = saadc::Saadc::new(
        p.SAADC,
        Irqs,
        adc_config,
        [
            analog_channel(p.P0_02),
            analog_channel(p.P0_03),
            analog_channel(p.P0_04),
            analog_channel(p.P0_05),
            analog_channel(p.P0_28),
            analog_channel(p.P0_29),
            analog_channel(p.P0_30),
        ],
    );
    saadc.calibrate().await;

    // Buttons and switches, active-low.
    let mut digital = [
        (DigitalPin::Up, Input::new(p.P0_11, Pull::Up)),
        (DigitalPin::Down, Input::new(p.P0_12, Pull::Up)),
        (DigitalPin::Enter, Input::new(p.P0_24, Pull::Up)),
        (DigitalPin::Trim1Up, Input::new(p.P1_01, Pull::Up)),
        (DigitalPin::Trim1Down, Input::new(p.P1_02, Pull::Up)),
        (DigitalPin::Trim2Up, Input::new(p.P1_03, Pull::Up)),
        (DigitalPin::Trim2Down, Input::new(p.P1_04, Pull::Up)),
        (DigitalPin::Trim3Up, Input::new(p.P1_05, Pull::Up)),
        (DigitalPin::Trim3Down, Input::new(p.P1_06, Pull::Up)),
        (DigitalPin::SwitchA, Input::new(p.P1_07, Pull::Up)),
        (DigitalPin::SwitchB, Input::new(p.P1_08, Pull::Up)),
    ];

    let buzzer = Buzzer(Output::new(p.P1_10, Level::Low, OutputDrive::Standard));

    // OLED on TWIM0. At the default 100 kHz one frame flush takes ~90 ms.
    let mut oled_config = twim::Config::default();
    oled_config.frequency = twim::Frequency::K400;
    let oled_i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, oled_config);
    let presenter = match OledPresenter::new(oled_i2c) {
        Ok(presenter) => Some(presenter),
        Err(e) => {
            warn!("display init failed: {}", e);
            None
        }
    };

    // Settings EEPROM on TWIM1.
    let eeprom_i2c = twim::Twim::new(p.TWISPI1, Irqs, p.P1_11, p.P1_12, twim::Config::default());
    let store = Eeprom24x::new(eeprom_i2c, Delay);

    // nRF24L01+ on SPIM3.
    let mut spi_config = spim::Config::default();
    spi_config.frequency = spim::Frequency::M8;
    let spi_bus = spim::Spim::new(p.SPI3, Irqs, p.P0_19, p.P0_21, p.P0_20, spi_config);
    let csn = Output::new(p.P0_22, Level::High, OutputDrive::Standard);
    let ce = Output::new(p.P0_23, Level::Low, OutputDrive::Standard);
    let spi = unwrap!(ExclusiveDevice::new(spi_bus, csn, Delay));
    let radio = match Nrf24::new(spi, ce, Delay) {
        Ok(radio) => Some(radio),
        Err(e) => {
            warn!("radio init failed: {}", e);
            None
        }
    };

    let mut hw = Collaborators {
        store,
        radio,
        presenter,
        buzzer,
    };
    let mut controller = Controller::start(&mut hw.store);

    let mut samples = [0i16; AnalogChannel::COUNT];
    loop {
        saadc.sample(&mut samples).await;

        let mut raw = InputSnapshot::idle();
        for (slot, sample) in raw.analog.iter_mut().zip(samples.iter()) {
            *slot = (*sample).clamp(0, ADC_MAX as i16) as u16;
        }
        for (pin, input) in digital.iter_mut() {
            raw.set_digital(*pin, input.is_high());
        }

        let now = Instant::now().as_millis();
        controller.poll(&raw, now, &mut hw);

        Timer::after_millis(POLL_INTERVAL_MS).await;
    }
}
