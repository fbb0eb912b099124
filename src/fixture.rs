//! Fixture wiring: engine plus output driver.
//!
//! The embedding's polling loop calls [`Fixture::poll`] continuously; a
//! frame is only written to the hardware when the render timer fired.

use embassy_time::Instant;

use crate::OutputDriver;
use crate::engine::{InitError, LightEngine};

/// A light engine bound to a concrete output driver.
pub struct Fixture<O: OutputDriver, const MAX_PIXELS: usize> {
    engine: LightEngine<MAX_PIXELS>,
    output: O,
}

impl<O: OutputDriver, const MAX_PIXELS: usize> Fixture<O, MAX_PIXELS> {
    /// Bind the engine to its driver. The driver is initialized and the
    /// strip blanked; a driver that fails to start is fatal.
    pub fn new(engine: LightEngine<MAX_PIXELS>, mut output: O) -> Result<Self, InitError> {
        if !output.init() {
            return Err(InitError::Output);
        }
        output.clear();
        Ok(Self { engine, output })
    }

    /// Advance the engine; when a new frame was produced, push it to the
    /// strip. Returns whether a write happened.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.engine.poll(now) {
            self.output.write(self.engine.frame());
            return true;
        }
        false
    }

    /// Blank both the engine buffers and the physical strip.
    pub fn clear(&mut self) {
        self.engine.clear();
        self.output.clear();
    }

    pub const fn engine(&self) -> &LightEngine<MAX_PIXELS> {
        &self.engine
    }

    pub const fn output(&self) -> &O {
        &self.output
    }

    pub fn engine_mut(&mut self) -> &mut LightEngine<MAX_PIXELS> {
        &mut self.engine
    }
}
