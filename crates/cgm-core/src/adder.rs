//! Plain-data construction requests for lines.
//!
//! A [`LineAdder`] collects everything needed to create a [`Line`] without
//! holding any reference into a network. It can therefore be prepared from
//! one network (reading a dangling line that is about to be removed) and
//! applied later to another, once that network has reached the state the
//! line's terminals refer to.
//!
//! # Example
//! ```
//! use cgm_core::*;
//!
//! let mut network = Network::new("n", "test");
//! network.add_substation(Substation::new("S")).unwrap();
//! network
//!     .add_voltage_level(VoltageLevel::new("VL", "S", Kilovolts(225.0), TopologyKind::BusBreaker))
//!     .unwrap();
//! network.add_bus("VL", Bus::new("B1")).unwrap();
//! network.add_bus("VL", Bus::new("B2")).unwrap();
//!
//! LineAdder::new("L")
//!     .impedance(Ohms(0.5), Ohms(5.0))
//!     .terminal1(Terminal::bus("VL", "B1", true))
//!     .terminal2(Terminal::bus("VL", "B2", false))
//!     .add(&mut network)
//!     .unwrap();
//!
//! assert!(!network.line("L").unwrap().terminal2.connected);
//! ```

use crate::{CgmError, CgmResult, Line, Network, Ohms, Siemens, Terminal};

#[derive(Debug, Clone, PartialEq)]
pub struct LineAdder {
    pub id: String,
    pub name: Option<String>,
    pub r: Ohms,
    pub x: Ohms,
    pub g1: Siemens,
    pub b1: Siemens,
    pub g2: Siemens,
    pub b2: Siemens,
    pub terminal1: Option<Terminal>,
    pub terminal2: Option<Terminal>,
}

impl LineAdder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            r: Ohms::ZERO,
            x: Ohms::ZERO,
            g1: Siemens::ZERO,
            b1: Siemens::ZERO,
            g2: Siemens::ZERO,
            b2: Siemens::ZERO,
            terminal1: None,
            terminal2: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn impedance(mut self, r: Ohms, x: Ohms) -> Self {
        self.r = r;
        self.x = x;
        self
    }

    /// Shunt admittance at the terminal-1 side
    pub fn shunt1(mut self, g: Siemens, b: Siemens) -> Self {
        self.g1 = g;
        self.b1 = b;
        self
    }

    /// Shunt admittance at the terminal-2 side
    pub fn shunt2(mut self, g: Siemens, b: Siemens) -> Self {
        self.g2 = g;
        self.b2 = b;
        self
    }

    pub fn terminal1(mut self, terminal: Terminal) -> Self {
        self.terminal1 = Some(terminal);
        self
    }

    pub fn terminal2(mut self, terminal: Terminal) -> Self {
        self.terminal2 = Some(terminal);
        self
    }

    /// Materialize the line.
    ///
    /// Fails if a terminal is missing or if the network rejects the line
    /// (duplicate id, unknown voltage level or bus, topology mismatch).
    pub fn build(self) -> CgmResult<Line> {
        let terminal1 = self
            .terminal1
            .ok_or_else(|| CgmError::Validation(format!("line '{}' has no terminal 1", self.id)))?;
        let terminal2 = self
            .terminal2
            .ok_or_else(|| CgmError::Validation(format!("line '{}' has no terminal 2", self.id)))?;
        Ok(Line {
            name: self.name.unwrap_or_else(|| self.id.clone()),
            id: self.id,
            terminal1,
            terminal2,
            r: self.r,
            x: self.x,
            g1: self.g1,
            b1: self.b1,
            g2: self.g2,
            b2: self.b2,
        })
    }

    pub fn add(self, network: &mut Network) -> CgmResult<()> {
        network.add_line(self.build()?)
    }
}
