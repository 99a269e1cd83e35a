use cgm_core::{
    Bus, DanglingLine, Kilovolts, Network, Substation, Terminal, TopologyKind, VoltageLevel,
};

/// Fragment `<id>` with substation `<id>_S`, a bus-breaker voltage level
/// `<id>_VL` at `nominal_kv` and one bus `<id>_B`.
pub fn bus_breaker_fragment(id: &str, nominal_kv: f64) -> Network {
    let mut network = Network::new(id, "test");
    let substation = format!("{id}_S");
    let vl = format!("{id}_VL");
    network.add_substation(Substation::new(&substation)).unwrap();
    network
        .add_voltage_level(VoltageLevel::new(
            &vl,
            &substation,
            Kilovolts(nominal_kv),
            TopologyKind::BusBreaker,
        ))
        .unwrap();
    network.add_bus(&vl, Bus::new(format!("{id}_B"))).unwrap();
    network
}

/// Add a connected stub at the fragment's bus `<id>_B`.
pub fn add_stub(network: &mut Network, stub: &str, boundary: Option<&str>) {
    let vl = format!("{}_VL", network.id);
    let bus = format!("{}_B", network.id);
    let mut dl = DanglingLine::new(stub, Terminal::bus(vl, bus, true));
    dl.boundary = boundary.map(str::to_string);
    network.add_dangling_line(dl).unwrap();
}

/// Fragment with one bus and one stub per `(stub id, boundary)` entry.
pub fn fragment_with_stubs(id: &str, stubs: &[(&str, Option<&str>)]) -> Network {
    let mut network = bus_breaker_fragment(id, 380.0);
    for (stub, boundary) in stubs {
        add_stub(&mut network, stub, *boundary);
    }
    network
}
