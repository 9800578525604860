//! Attribute tree over an initialized switch.

use crate::attribute::Attribute;
use crate::error::{Result, SurfaceError};
use crate::parse::{
    format_enable, format_port, format_register, parse_enable, parse_register, parse_voltage,
};
use poe_core::constants::IDENTIFICATION;
use poe_hardware::{GpioPlatform, PoeSwitch};
use tracing::debug;

/// Text read/write access to the controller, one value per attribute.
///
/// Cloning is cheap and every clone drives the same switch.
pub struct ControlSurface<P: GpioPlatform> {
    switch: PoeSwitch<P>,
}

impl<P: GpioPlatform> ControlSurface<P> {
    pub fn new(switch: PoeSwitch<P>) -> Self {
        Self { switch }
    }

    pub fn switch(&self) -> &PoeSwitch<P> {
        &self.switch
    }

    pub fn attributes(&self) -> Vec<Attribute> {
        Attribute::all()
    }

    /// Current value of `attribute`.
    pub async fn read(&self, attribute: &Attribute) -> String {
        match attribute {
            Attribute::Name => IDENTIFICATION.to_string(),
            Attribute::RawValue => format_register(self.switch.register().await),
            Attribute::Enable => {
                format_enable(self.switch.output_enable().is_enabled().await).to_string()
            }
            Attribute::Port(port) => {
                format_port(self.switch.register().await.port(*port)).to_string()
            }
        }
    }

    /// Apply `value` to `attribute`.
    ///
    /// Port writes complete after any settling delay the change requires.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::ReadOnly`] for attributes that are not
    /// [writable](Attribute::is_writable), and
    /// [`SurfaceError::InvalidArgument`] for malformed `raw_value` or `enable`
    /// input. Nothing is written when an error is returned.
    pub async fn write(&self, attribute: &Attribute, value: &str) -> Result<()> {
        debug!(%attribute, value = value.trim_end(), "Attribute write");

        let read_only = || SurfaceError::ReadOnly(attribute.to_string());
        if !attribute.is_writable() {
            return Err(read_only());
        }

        match attribute {
            Attribute::Name => Err(read_only()),
            Attribute::RawValue => {
                let raw = parse_register(value)?;
                self.switch.set_raw_register(raw).await;
                Ok(())
            }
            Attribute::Enable => {
                let on = parse_enable(value)?;
                self.switch.output_enable().set_enabled(on).await;
                Ok(())
            }
            Attribute::Port(port) => {
                self.switch
                    .ports()
                    .set_port(port.as_u8(), parse_voltage(value))
                    .await?;
                Ok(())
            }
        }
    }

    /// [`read`](Self::read) by attribute name.
    pub async fn read_named(&self, name: &str) -> Result<String> {
        let attribute: Attribute = name.parse()?;
        Ok(self.read(&attribute).await)
    }

    /// [`write`](Self::write) by attribute name.
    pub async fn write_named(&self, name: &str, value: &str) -> Result<()> {
        let attribute: Attribute = name.parse()?;
        self.write(&attribute, value).await
    }
}

impl<P: GpioPlatform> Clone for ControlSurface<P> {
    fn clone(&self) -> Self {
        Self {
            switch: self.switch.clone(),
        }
    }
}
