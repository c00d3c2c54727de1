use std::io::{self, BufRead, BufReader, Read, Write};

use pinbridge_core::{Error, IntoLevel, LineRegistry, Result, check_angle};
use tracing::{debug, info};

use crate::command::{Command, PinMode};

/// Line, analog and servo operations relayed to an Arduino.
///
/// `T` is the byte link to the board, normally a serial port. Query replies
/// are returned verbatim as text (trimmed of surrounding whitespace); the
/// caller decides how to interpret them. The board keeps the real pin state,
/// so the set of touched pins is only reported back, never verified.
pub struct RemoteBoard<T> {
    link: Option<BufReader<T>>,
    touched: LineRegistry,
}

impl<T> Default for RemoteBoard<T> {
    fn default() -> Self {
        Self {
            link: None,
            touched: LineRegistry::new(),
        }
    }
}

impl<T: Read + Write> RemoteBoard<T> {
    /// A board with no link attached yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A board already attached to `link`.
    pub fn with_link(link: T) -> Self {
        Self {
            link: Some(BufReader::new(link)),
            touched: LineRegistry::new(),
        }
    }

    /// Attaches `link`.
    ///
    /// # Errors
    ///
    /// [`Error::Resource`] when a link is already attached.
    pub fn attach(&mut self, link: T) -> Result<()> {
        if self.link.is_some() {
            return Err(Error::Resource("serial link is already open".into()));
        }
        self.link = Some(BufReader::new(link));
        Ok(())
    }

    /// `true` while a link is attached.
    pub fn is_open(&self) -> bool {
        self.link.is_some()
    }

    /// The attached link.
    pub fn link(&self) -> Option<&T> {
        self.link.as_ref().map(BufReader::get_ref)
    }

    /// Sends `PINMODE`.
    pub fn pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        self.send(&Command::PinMode { pin, mode })
    }

    /// Sends `DWRITE`. Accepts `0`/`1`, `"0"`/`"1"` or a [`pinbridge_core::Level`].
    pub fn digital_write(&mut self, pin: u8, value: impl IntoLevel) -> Result<()> {
        self.ensure_open()?;
        let level = value.into_level()?;
        self.send(&Command::DigitalWrite { pin, level })
    }

    /// Sends `DREAD` and returns the reply line.
    pub fn digital_read(&mut self, pin: u8) -> Result<String> {
        self.query(&Command::DigitalRead { pin })
    }

    /// Sends `AWRITE`.
    pub fn analog_write(&mut self, pin: u8, value: u16) -> Result<()> {
        self.send(&Command::AnalogWrite { pin, value })
    }

    /// Sends `AREAD` and returns the reply line.
    pub fn analog_read(&mut self, pin: u8) -> Result<String> {
        self.query(&Command::AnalogRead { pin })
    }

    /// Sends `SERVOWRITE` for an angle in `0..=180` degrees.
    ///
    /// Out-of-range angles fail with [`Error::InvalidArgument`] and send nothing.
    pub fn servo_write(&mut self, pin: u8, angle: f64) -> Result<()> {
        self.ensure_open()?;
        let angle = check_angle(angle)?;
        self.send(&Command::ServoWrite { pin, angle })
    }

    /// Sends `SERVOSTOP`.
    pub fn servo_stop(&mut self, pin: u8) -> Result<()> {
        self.send(&Command::ServoStop { pin })
    }

    /// Pins addressed since the link was attached, ascending.
    pub fn touched_pins(&self) -> impl Iterator<Item = u8> + '_ {
        self.touched.pins()
    }

    /// Drops the link and returns the pins it touched.
    ///
    /// Closing an already closed board returns an empty list.
    pub fn close(&mut self) -> Vec<u8> {
        let touched: Vec<u8> = self.touched.pins().collect();
        if self.link.take().is_some() {
            info!(?touched, "serial link closed");
        }
        self.touched.clear();
        touched
    }

    fn ensure_open(&self) -> Result<()> {
        if self.link.is_none() {
            return Err(Error::Resource("serial link is not open".into()));
        }
        Ok(())
    }

    fn send(&mut self, command: &Command) -> Result<()> {
        let link = self
            .link
            .as_mut()
            .ok_or_else(|| Error::Resource("serial link is not open".into()))?;
        let writer = link.get_mut();
        writer.write_all(command.encode().as_bytes())?;
        writer.flush()?;
        self.touched.mark(command.pin());
        debug!(%command, "sent");
        Ok(())
    }

    fn query(&mut self, command: &Command) -> Result<String> {
        self.send(command)?;
        let link = self
            .link
            .as_mut()
            .ok_or_else(|| Error::Resource("serial link is not open".into()))?;
        let mut reply = String::new();
        if link.read_line(&mut reply)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("link closed before a reply to {command}"),
            )
            .into());
        }
        let reply = reply.trim().to_string();
        debug!(%command, %reply, "reply");
        Ok(reply)
    }
}
