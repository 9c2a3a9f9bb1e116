// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! USB CDC transport with COBS-framed postcard serialization.

use rp2040_hal::usb::UsbBus;
use stormloader_common::framing::FrameAccumulator;
use stormloader_common::protocol::{Command, Response, MAX_FRAME_SIZE};
use usb_device::class_prelude::UsbBusAllocator;
use usb_device::prelude::*;
use usbd_serial::SerialPort;

pub struct UsbTransport {
    serial: SerialPort<'static, UsbBus>,
    usb_dev: UsbDevice<'static, UsbBus>,
    rx: FrameAccumulator,
    rx_buf: [u8; 64],
    rx_start: usize,
    rx_end: usize,
}

impl UsbTransport {
    pub fn new(usb_bus: &'static UsbBusAllocator<UsbBus>) -> Self {
        let serial = SerialPort::new(usb_bus);
        let usb_dev = UsbDeviceBuilder::new(usb_bus, UsbVidPid(0x2E8A, 0x000A))
            .strings(&[StringDescriptors::default()
                .manufacturer("ADNT")
                .product("StormLoader")
                .serial_number("0001")])
            .expect("single string descriptor set")
            .device_class(usbd_serial::USB_CLASS_CDC)
            .build();

        Self {
            serial,
            usb_dev,
            rx: FrameAccumulator::new(),
            rx_buf: [0u8; 64],
            rx_start: 0,
            rx_end: 0,
        }
    }

    /// Poll USB device. Must be called frequently.
    pub fn poll(&mut self) -> bool {
        self.usb_dev.poll(&mut [&mut self.serial])
    }

    /// Try to receive a complete COBS-framed command.
    ///
    /// Returns `Some(Err(_))` for a complete frame that does not decode.
    /// Bytes after a completed frame are kept for the next call.
    pub fn try_receive(&mut self) -> Option<postcard::Result<Command>> {
        if self.rx_start == self.rx_end {
            let count = self.serial.read(&mut self.rx_buf).ok()?;
            self.rx_start = 0;
            self.rx_end = count;
        }

        let mut pending = &self.rx_buf[self.rx_start..self.rx_end];
        let result = self.rx.feed(&mut pending);
        self.rx_start = self.rx_end - pending.len();
        result
    }

    /// Send a response as a COBS-framed postcard message.
    pub fn send(&mut self, resp: &Response) {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let Ok(encoded) = postcard::to_slice_cobs(resp, &mut buf) else {
            return;
        };

        let mut offset = 0;
        while offset < encoded.len() {
            match self.serial.write(&encoded[offset..]) {
                Ok(n) => offset += n,
                Err(UsbError::WouldBlock) => {
                    self.poll();
                }
                Err(_) => break,
            }
        }
    }
}
