//! Boundary pairing tests across bus-breaker fragments

use cgm_core::{
    Bus, Connection, DanglingLine, Kilovolts, LineAdder, Network, Ohms, Siemens, Substation,
    Terminal, TopologyKind, VoltageLevel,
};
use cgm_merge::{merge, MergeError, MergeOptions, Merger};

/// Fragment with substation `<id>_S`, voltage level `<id>_VL` (380 kV) and
/// the given buses.
fn fragment(id: &str, buses: &[&str]) -> Network {
    let mut network = Network::new(id, "test");
    let substation = format!("{id}_S");
    let vl = format!("{id}_VL");
    network.add_substation(Substation::new(&substation)).unwrap();
    network
        .add_voltage_level(VoltageLevel::new(
            &vl,
            &substation,
            Kilovolts(380.0),
            TopologyKind::BusBreaker,
        ))
        .unwrap();
    for bus in buses {
        network.add_bus(&vl, Bus::new(*bus)).unwrap();
    }
    network
}

fn stub(network: &mut Network, id: &str, bus: &str, boundary: &str) {
    let vl = format!("{}_VL", network.id);
    network
        .add_dangling_line(
            DanglingLine::new(id, Terminal::bus(vl, bus, true))
                .with_impedance(Ohms(1.0), Ohms(10.0))
                .with_boundary(boundary),
        )
        .unwrap();
}

/// F1 holds L1 on B1 at X1, F2 holds L2 on B2 at X1
fn scenario_a() -> Vec<Network> {
    let mut f1 = fragment("F1", &["B1"]);
    f1.add_dangling_line(
        DanglingLine::new("L1", Terminal::bus("F1_VL", "B1", true))
            .with_impedance(Ohms(1.0), Ohms(2.0))
            .with_shunt(Siemens(0.01), Siemens(0.02))
            .with_boundary("X1"),
    )
    .unwrap();
    let mut f2 = fragment("F2", &["B2"]);
    f2.add_dangling_line(
        DanglingLine::new("L2", Terminal::bus("F2_VL", "B2", true))
            .with_impedance(Ohms(1.5), Ohms(2.5))
            .with_boundary("X1"),
    )
    .unwrap();
    vec![f1, f2]
}

#[test]
fn test_scenario_a_pair_becomes_two_lines() {
    let network = merge(scenario_a()).unwrap();

    assert!(network.substation("X1").is_some());
    let vl = network.voltage_level("X1_VL").unwrap();
    assert_eq!(vl.topology, TopologyKind::BusBreaker);
    assert_eq!(vl.substation, "X1");
    assert_eq!(vl.nominal_v, Kilovolts(380.0));
    assert!(network.bus("X1_BUS").is_some());

    let l1 = network.line("L1").unwrap();
    assert_eq!(l1.terminal1.connection, Connection::Bus("B1".into()));
    assert_eq!(l1.terminal2.connection, Connection::Bus("X1_BUS".into()));
    assert_eq!(l1.terminal2.voltage_level, "X1_VL");
    assert_eq!((l1.r, l1.x), (Ohms(1.0), Ohms(2.0)));
    assert_eq!((l1.g1, l1.b1), (Siemens(0.01), Siemens(0.02)));
    assert_eq!((l1.g2, l1.b2), (Siemens::ZERO, Siemens::ZERO));

    let l2 = network.line("L2").unwrap();
    assert_eq!(l2.terminal1.connection, Connection::Bus("B2".into()));
    assert_eq!(l2.terminal2.connection, Connection::Bus("X1_BUS".into()));
    assert_eq!((l2.r, l2.x), (Ohms(1.5), Ohms(2.5)));
    assert_eq!((l2.g1, l2.b1), (Siemens::ZERO, Siemens::ZERO));
    assert_eq!((l2.g2, l2.b2), (Siemens::ZERO, Siemens::ZERO));

    assert!(network
        .dangling_lines()
        .iter()
        .all(|dl| dl.boundary_id() != Some("X1")));
}

#[test]
fn test_scenario_b_single_stub_kept() {
    let mut f1 = fragment("F1", &["B1"]);
    f1.add_dangling_line(
        DanglingLine::new("L9", Terminal::bus("F1_VL", "B1", false))
            .with_impedance(Ohms(0.7), Ohms(7.0))
            .with_shunt(Siemens(0.001), Siemens(0.002))
            .with_boundary("X2"),
    )
    .unwrap();
    let original = f1.dangling_line("L9").unwrap().clone();

    let outcome = Merger::default()
        .merge(vec![f1, fragment("F2", &["B2"])])
        .unwrap();

    assert_eq!(outcome.network.dangling_line("L9"), Some(&original));
    assert!(outcome.network.substation("X2").is_none());
    assert!(outcome.network.voltage_level("X2_VL").is_none());
    assert!(outcome.network.bus("X2_BUS").is_none());
    assert_eq!(outcome.report.unmatched.len(), 1);
    assert_eq!(outcome.report.unmatched[0].identifier.as_deref(), Some("X2"));
    assert!(outcome.report.boundaries.is_empty());
}

#[test]
fn test_scenario_c_three_stubs_ambiguous() {
    let mut fragments = Vec::new();
    for (id, bus, dl) in [("F1", "B1", "S1"), ("F2", "B2", "S2"), ("F3", "B3", "S3")] {
        let mut network = fragment(id, &[bus]);
        stub(&mut network, dl, bus, "X3");
        fragments.push(network);
    }

    let err = merge(fragments).unwrap_err();
    match err {
        MergeError::AmbiguousBoundary {
            identifier,
            count,
            fragments,
        } => {
            assert_eq!(identifier, "X3");
            assert_eq!(count, 3);
            assert_eq!(fragments, vec![0, 1, 2]);
        }
        other => panic!("expected AmbiguousBoundary, got {other:?}"),
    }
}

#[test]
fn test_ambiguity_within_one_fragment() {
    let mut f1 = fragment("F1", &["B1"]);
    stub(&mut f1, "S1", "B1", "X4");
    stub(&mut f1, "S2", "B1", "X4");
    let mut f2 = fragment("F2", &["B2"]);
    stub(&mut f2, "S3", "B2", "X4");

    assert!(matches!(
        merge(vec![f1, f2]),
        Err(MergeError::AmbiguousBoundary { count: 3, .. })
    ));
}

#[test]
fn test_pairing_completeness_over_mixed_boundaries() {
    let mut f1 = fragment("F1", &["B1"]);
    stub(&mut f1, "A1", "B1", "PAIRED_1");
    stub(&mut f1, "A2", "B1", "PAIRED_2");
    stub(&mut f1, "A3", "B1", "ALONE_1");
    let mut f2 = fragment("F2", &["B2"]);
    stub(&mut f2, "B1_DL", "B2", "PAIRED_1");
    stub(&mut f2, "B2_DL", "B2", "ALONE_2");
    let mut f3 = fragment("F3", &["B3"]);
    stub(&mut f3, "C1", "B3", "PAIRED_2");

    let network = merge(vec![f1, f2, f3]).unwrap();

    let remaining: Vec<&str> = network
        .dangling_lines()
        .iter()
        .filter_map(|dl| dl.boundary_id())
        .collect();
    assert_eq!(remaining, vec!["ALONE_1", "ALONE_2"]);
    for id in ["A1", "A2", "B1_DL", "C1"] {
        assert!(network.line(id).is_some(), "missing equivalent line {id}");
    }
}

#[test]
fn test_conservation_of_entities() {
    let mut f1 = fragment("F1", &["B1", "B1b"]);
    LineAdder::new("F1_L")
        .impedance(Ohms(0.2), Ohms(2.0))
        .terminal1(Terminal::bus("F1_VL", "B1", true))
        .terminal2(Terminal::bus("F1_VL", "B1b", true))
        .add(&mut f1)
        .unwrap();
    stub(&mut f1, "S1", "B1", "X1");
    stub(&mut f1, "S1b", "B1b", "X2");
    let mut f2 = fragment("F2", &["B2"]);
    stub(&mut f2, "S2", "B2", "X1");
    stub(&mut f2, "S2b", "B2", "X9");

    let fragments = vec![f1, f2];
    let non_boundary: usize = fragments
        .iter()
        .map(|f| f.stats().non_boundary_entities())
        .sum();
    let lines: usize = fragments.iter().map(|f| f.stats().num_lines).sum();

    let outcome = Merger::default().merge(fragments).unwrap();
    let stats = outcome.network.stats();
    let pairable = outcome.report.boundaries.len();
    assert_eq!(pairable, 1);
    assert_eq!(stats.num_lines, lines + 2 * pairable);
    assert_eq!(
        stats.non_boundary_entities(),
        non_boundary + 2 * pairable + 3 * pairable
    );
    assert_eq!(stats.num_dangling_lines, 2);
}

#[test]
fn test_disconnected_stub_keeps_state_on_both_ends() {
    let mut f1 = fragment("F1", &["B1"]);
    f1.add_dangling_line(
        DanglingLine::new("OPEN", Terminal::bus("F1_VL", "B1", false)).with_boundary("X1"),
    )
    .unwrap();
    let mut f2 = fragment("F2", &["B2"]);
    stub(&mut f2, "CLOSED", "B2", "X1");

    let network = merge(vec![f1, f2]).unwrap();
    let open = network.line("OPEN").unwrap();
    assert!(!open.terminal1.connected);
    assert!(!open.terminal2.connected);
    let closed = network.line("CLOSED").unwrap();
    assert!(closed.terminal1.connected && closed.terminal2.connected);
}

#[test]
fn test_duplicate_identifier_across_fragments() {
    let f1 = fragment("F1", &["SHARED"]);
    let mut f2 = Network::new("F2", "test");
    f2.add_substation(Substation::new("F2_S")).unwrap();
    f2.add_voltage_level(VoltageLevel::new(
        "F2_VL",
        "F2_S",
        Kilovolts(380.0),
        TopologyKind::BusBreaker,
    ))
    .unwrap();
    f2.add_bus("F2_VL", Bus::new("SHARED")).unwrap();

    match merge(vec![f1, f2]) {
        Err(MergeError::DuplicateIdentifier { identifier }) => assert_eq!(identifier, "SHARED"),
        other => panic!("expected DuplicateIdentifier, got {other:?}"),
    }
}

#[test]
fn test_synthesized_id_collision() {
    let mut f1 = fragment("F1", &["B1"]);
    f1.add_substation(Substation::new("X1")).unwrap();
    stub(&mut f1, "S1", "B1", "X1");
    let mut f2 = fragment("F2", &["B2"]);
    stub(&mut f2, "S2", "B2", "X1");

    assert!(matches!(
        merge(vec![f1, f2]),
        Err(MergeError::DuplicateIdentifier { identifier }) if identifier == "X1"
    ));
}

#[test]
fn test_boundary_named_like_another_boundary_level() {
    // Boundary "A" synthesizes "A_VL", which is also the substation id of
    // boundary "A_VL".
    let mut f1 = fragment("F1", &["B1"]);
    stub(&mut f1, "A1", "B1", "A");
    stub(&mut f1, "V1", "B1", "A_VL");
    let mut f2 = fragment("F2", &["B2"]);
    stub(&mut f2, "A2", "B2", "A");
    stub(&mut f2, "V2", "B2", "A_VL");

    match merge(vec![f1, f2]) {
        Err(MergeError::DuplicateIdentifier { identifier }) => assert_eq!(identifier, "A_VL"),
        other => panic!("expected DuplicateIdentifier, got {other:?}"),
    }
}

#[test]
fn test_equivalent_line_collides_with_other_fragment_line() {
    let mut f1 = fragment("F1", &["B1"]);
    stub(&mut f1, "L1", "B1", "X1");
    let mut f2 = fragment("F2", &["B2", "B3"]);
    stub(&mut f2, "L2", "B2", "X1");
    LineAdder::new("L1")
        .impedance(Ohms(0.5), Ohms(5.0))
        .terminal1(Terminal::bus("F2_VL", "B2", true))
        .terminal2(Terminal::bus("F2_VL", "B3", true))
        .add(&mut f2)
        .unwrap();

    match merge(vec![f1, f2]) {
        Err(MergeError::DuplicateIdentifier { identifier }) => assert_eq!(identifier, "L1"),
        other => panic!("expected DuplicateIdentifier, got {other:?}"),
    }
}

#[test]
fn test_strict_mode_rejects_unidentified_stub() {
    let mut f1 = fragment("F1", &["B1"]);
    f1.add_dangling_line(DanglingLine::new("NAMELESS", Terminal::bus("F1_VL", "B1", true)))
        .unwrap();

    let options = MergeOptions {
        strict_identifiers: true,
        ..Default::default()
    };
    match Merger::new(options).merge(vec![fragment("F0", &["B0"]), f1]) {
        Err(MergeError::MissingIdentifier { stub, fragment }) => {
            assert_eq!(stub, "NAMELESS");
            assert_eq!(fragment, 1);
        }
        other => panic!("expected MissingIdentifier, got {other:?}"),
    }
}

#[test]
fn test_lenient_mode_keeps_blank_boundary_stub() {
    let mut f1 = fragment("F1", &["B1"]);
    stub(&mut f1, "BLANK", "B1", "  ");
    let mut f2 = fragment("F2", &["B2"]);
    stub(&mut f2, "ALSO_BLANK", "B2", "");

    let outcome = Merger::default().merge(vec![f1, f2]).unwrap();
    assert_eq!(outcome.network.dangling_lines().len(), 2);
    assert!(outcome.report.boundaries.is_empty());
    assert!(outcome
        .report
        .unmatched
        .iter()
        .all(|stub| stub.identifier.is_none()));
}

#[test]
fn test_merged_network_identity_from_options() {
    let options = MergeOptions {
        network_id: "core-cgm".into(),
        source_format: "cgmes".into(),
        ..Default::default()
    };
    let outcome = Merger::new(options).merge(scenario_a()).unwrap();
    assert_eq!(outcome.network.id, "core-cgm");
    assert_eq!(outcome.network.source_format, "cgmes");
    assert_eq!(outcome.report.fragment_ids, vec!["F1", "F2"]);
    assert_eq!(outcome.report.origin_of("B2"), Some("F2"));
    assert_eq!(outcome.report.origin_of("L1"), Some("F1"));
    let f1: Vec<&str> = outcome.report.subnetwork(0).collect();
    assert_eq!(f1, vec!["B1", "F1_S", "F1_VL", "L1"]);
}
