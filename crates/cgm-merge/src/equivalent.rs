//! Equivalent lines replacing boundary stubs.
//!
//! Each stub of a pair becomes its own line from the stub's original
//! connection point to the synthesized boundary bus, so the segment values of
//! both sides stay visible in the merged model:
//!
//! - id, name, R and X are copied from the stub
//! - the stub's G/B become the terminal-1 shunt, the terminal-2 shunt is zero
//! - terminal 1 reproduces the stub's terminal (voltage level, node or bus,
//!   connection state)
//! - terminal 2 sits on the boundary bus and is connected iff the stub was
//!
//! The result is a [`LineAdder`]: plain data that stays valid after the stub
//! is removed from its fragment.

use cgm_core::{Connection, DanglingLine, LineAdder, Siemens, Terminal};

use crate::synthesize::BoundaryNode;

pub fn equivalent_line(node: &BoundaryNode, stub: &DanglingLine) -> LineAdder {
    let connected = stub.terminal.connected;
    let voltage_level = stub.terminal.voltage_level.clone();
    let terminal1 = match &stub.terminal.connection {
        Connection::Node(index) => Terminal::node(voltage_level, *index, connected),
        Connection::Bus(bus) => Terminal::bus(voltage_level, bus.clone(), connected),
    };

    LineAdder::new(stub.id.clone())
        .name(stub.name.clone())
        .impedance(stub.r, stub.x)
        .shunt1(stub.g, stub.b)
        .shunt2(Siemens::ZERO, Siemens::ZERO)
        .terminal1(terminal1)
        .terminal2(Terminal::bus(
            node.voltage_level.clone(),
            node.bus.clone(),
            connected,
        ))
}
