use std::convert::TryFrom;

use atmega32_hal::atmega32;
use atmega32_hal::gpio::{Error, Gpio, Level, Mode, Pin, Port};
use atmega32_hal::hal::digital::v2::PinState;
use atmega32_hal::prelude::*;
use atmega32_hal::sim::Mcu;
use proptest::prelude::*;

#[test]
fn output_level_reads_back() {
    let mcu = Mcu::new();
    let gpio = Gpio::new(&mcu);

    gpio.set_direction(Port::A, Pin::P3, Mode::Output);
    gpio.set_value(Port::A, Pin::P3, Level::High);

    assert_eq!(gpio.get_value(Port::A, Pin::P3), Level::High);
    assert_eq!(mcu.read(atmega32::PINA), 0b0000_1000);

    gpio.set_value(Port::A, Pin::P3, false);
    assert_eq!(gpio.get_value(Port::A, Pin::P3), Level::Low);
}

#[test]
fn mode_sets_direction_and_pull_up() {
    let mcu = Mcu::new();
    let gpio = Gpio::new(&mcu);

    gpio.set_direction(Port::C, Pin::P5, Mode::Output);
    assert_eq!(mcu.read(atmega32::DDRC), 1 << 5);

    gpio.set_direction(Port::C, Pin::P5, Mode::InputPullUp);
    assert_eq!(mcu.read(atmega32::DDRC), 0);
    assert_eq!(mcu.read(atmega32::PORTC), 1 << 5);

    gpio.set_direction(Port::C, Pin::P5, Mode::Input);
    assert_eq!(mcu.read(atmega32::DDRC), 0);
    assert_eq!(mcu.read(atmega32::PORTC), 0);
}

#[test]
fn undriven_inputs_read_their_pull_up() {
    let mcu = Mcu::new();
    let gpio = Gpio::new(&mcu);

    gpio.set_direction(Port::B, Pin::P0, Mode::InputPullUp);
    gpio.set_direction(Port::B, Pin::P1, Mode::Input);

    assert_eq!(gpio.get_value(Port::B, Pin::P0), Level::High);
    assert_eq!(gpio.get_value(Port::B, Pin::P1), Level::Low);
}

#[test]
fn driven_inputs_read_the_external_level() {
    let mcu = Mcu::new();
    let gpio = Gpio::new(&mcu);
    gpio.set_direction(Port::B, Pin::P4, Mode::InputPullUp);

    mcu.drive(Port::B, Pin::P4, Level::Low);
    assert_eq!(gpio.get_value(Port::B, Pin::P4), Level::Low);

    mcu.release(Port::B, Pin::P4);
    assert_eq!(gpio.get_value(Port::B, Pin::P4), Level::High);
}

#[test]
fn outputs_ignore_external_drive() {
    let mcu = Mcu::new();
    let gpio = Gpio::new(&mcu);
    gpio.set_direction(Port::D, Pin::P7, Mode::Output);

    mcu.drive(Port::D, Pin::P7, Level::High);

    assert_eq!(gpio.get_value(Port::D, Pin::P7), Level::Low);
}

#[test]
fn set_value_leaves_other_pins_alone() {
    let mcu = Mcu::new();
    let gpio = Gpio::new(&mcu);
    gpio.write_port(Port::D, 0b1010_0101);

    gpio.set_value(Port::D, Pin::P1, Level::High);
    gpio.set_value(Port::D, Pin::P7, Level::Low);

    assert_eq!(mcu.read(atmega32::PORTD), 0b0010_0111);
}

#[test]
fn toggle_pin_inverts_one_bit() {
    let mcu = Mcu::new();
    let gpio = Gpio::new(&mcu);
    gpio.write_port(Port::A, 0b0000_0001);

    gpio.toggle_pin(Port::A, Pin::P0);
    gpio.toggle_pin(Port::A, Pin::P6);

    assert_eq!(mcu.read(atmega32::PORTA), 0b0100_0000);
    assert_eq!(gpio.get_output(Port::A, Pin::P6), Level::High);
}

#[test]
fn toggle_port_inverts_every_bit() {
    let mcu = Mcu::new();
    let gpio = Gpio::new(&mcu);

    gpio.write_port(Port::A, 0xF0);
    gpio.toggle_port(Port::A);

    assert_eq!(mcu.read(atmega32::PORTA), 0x0F);
}

#[test]
fn whole_port_access() {
    let mcu = Mcu::new();
    let gpio = Gpio::new(&mcu);

    gpio.set_port_direction(Port::C, 0x0F);
    gpio.write_port(Port::C, 0xFF);
    mcu.drive(Port::C, Pin::P7, Level::Low);

    assert_eq!(mcu.read(atmega32::DDRC), 0x0F);
    assert_eq!(gpio.read_port(Port::C), 0x7F);
}

#[test]
fn ports_do_not_interfere() {
    let mcu = Mcu::new();
    let gpio = Gpio::new(&mcu);

    for port in Port::ALL {
        gpio.set_port_direction(port, 0xFF);
    }
    gpio.write_port(Port::B, 0xAA);

    for port in [Port::A, Port::C, Port::D] {
        assert_eq!(gpio.read_port(port), 0);
    }
    assert_eq!(gpio.read_port(Port::B), 0xAA);
}

#[test]
fn raw_port_and_pin_numbers() {
    assert_eq!(Port::try_from(0), Ok(Port::A));
    assert_eq!(Port::try_from(3), Ok(Port::D));
    assert_eq!(Port::try_from(4), Err(Error::InvalidPort(4)));

    for pin in Pin::ALL {
        assert_eq!(Pin::try_from(pin.bit()), Ok(pin));
    }
    assert_eq!(Pin::try_from(8), Err(Error::InvalidPin(8)));
}

#[test]
fn register_addresses() {
    assert_eq!(Port::A.pin_address(), 0x39);
    assert_eq!(Port::B.ddr_address(), 0x37);
    assert_eq!(Port::C.port_address(), 0x35);
    assert_eq!(Port::D.pin_address(), 0x30);
}

#[test]
fn level_conversions() {
    assert_eq!(Level::from(true), Level::High);
    assert!(!bool::from(Level::Low));
    assert_eq!(Level::from(PinState::High), Level::High);
    assert_eq!(PinState::from(Level::Low), PinState::Low);
}

#[test]
fn erased_pin_implements_digital_traits() {
    let mcu = Mcu::new();
    let gpio = Gpio::new(&mcu);
    let mut led = gpio.pin(Port::B, Pin::P3);
    led.set_mode(Mode::Output);

    led.set_high().unwrap();
    assert!(led.is_high().unwrap());
    assert!(led.is_set_high().unwrap());

    led.toggle().unwrap();
    assert!(led.is_low().unwrap());
    assert!(led.is_set_low().unwrap());

    led.set_state(PinState::High).unwrap();
    assert_eq!(mcu.read(atmega32::PORTB), 1 << 3);
    assert_eq!((led.port(), led.pin()), (Port::B, Pin::P3));
}

#[test]
fn erased_input_pin_reads_the_pin() {
    let mcu = Mcu::new();
    let gpio = Gpio::new(&mcu);
    let mut button = gpio.pin(Port::D, Pin::P2);
    button.set_mode(Mode::InputPullUp);

    assert!(button.is_high().unwrap());
    mcu.drive(Port::D, Pin::P2, Level::Low);
    assert!(button.is_low().unwrap());
}

proptest! {
    #[test]
    fn toggle_port_twice_restores_the_port(value in any::<u8>(), index in 0u8..4) {
        let port = Port::try_from(index).unwrap();
        let mcu = Mcu::new();
        let gpio = Gpio::new(&mcu);
        gpio.write_port(port, value);

        gpio.toggle_port(port);
        prop_assert_eq!(mcu.read(port.port_address()), !value);
        gpio.toggle_port(port);

        prop_assert_eq!(mcu.read(port.port_address()), value);
    }

    #[test]
    fn set_value_only_touches_its_bit(value in any::<u8>(), bit in 0u8..8, high in any::<bool>()) {
        let pin = Pin::try_from(bit).unwrap();
        let mcu = Mcu::new();
        let gpio = Gpio::new(&mcu);
        gpio.write_port(Port::A, value);

        gpio.set_value(Port::A, pin, high);

        let written = mcu.read(atmega32::PORTA);
        prop_assert_eq!(written & !(1 << bit), value & !(1 << bit));
        prop_assert_eq!(written & (1 << bit) != 0, high);
    }
}
