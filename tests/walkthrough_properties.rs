use nnwalk::config::{Config, NetworkConfig};
use nnwalk::diagram::{DiagramLayout, Scene};
use nnwalk::math::{UnicodeRenderer, typeset};
use nnwalk::network::{DerivedKey, NetworkState, NodeId, Topology};
use nnwalk::walkthrough::highlight::resolve;
use nnwalk::walkthrough::{Navigator, Session, StepSequence};

fn default_state() -> NetworkState {
    NetworkState::from_config(&NetworkConfig::default())
}

fn default_session() -> Session {
    Session::standard(default_state()).unwrap()
}

#[test]
fn test_next_i_times_reaches_min_of_i_and_last() {
    let total = StepSequence::standard(&Topology::two_two_two()).len();
    for i in 0..total + 5 {
        let mut nav = Navigator::new(total);
        for _ in 0..i {
            nav.next();
        }
        assert_eq!(nav.current(), i.min(total - 1));
    }
}

#[test]
fn test_prev_i_times_from_end_stops_at_zero() {
    let mut session = default_session();
    let total = session.total_steps();
    session.advance_to(total - 1).unwrap();
    for i in 1..total + 5 {
        let moved = session.retreat().unwrap();
        assert_eq!(moved, i < total);
        assert_eq!(session.current_index(), (total - 1).saturating_sub(i));
    }
}

#[test]
fn test_full_forward_pass_leaves_every_value_defined() {
    let mut session = default_session();
    while session.advance().unwrap() {}
    let state = session.state();
    for node in [NodeId::H1, NodeId::H2, NodeId::O1, NodeId::O2] {
        assert!(state.calculated(DerivedKey::Net(node)).is_some());
        assert!(state.calculated(DerivedKey::Out(node)).is_some());
    }
    assert!(state.calculated(DerivedKey::TotalError).is_some());
}

#[test]
fn test_net_h1_default_value() {
    let mut session = default_session();
    session.advance().unwrap();
    let net_h1 = session.state().calculated(DerivedKey::Net(NodeId::H1)).unwrap();
    assert!((net_h1 - 0.0275).abs() < 1e-12);
    assert!(session.output().result.ends_with("0.0275"));
}

#[test]
fn test_two_sessions_produce_identical_results() {
    let mut a = default_session();
    let mut b = default_session();
    loop {
        assert_eq!(a.output(), b.output());
        let moved_a = a.advance().unwrap();
        let moved_b = b.advance().unwrap();
        assert_eq!(moved_a, moved_b);
        if !moved_a {
            break;
        }
    }
}

#[test]
fn test_every_highlight_stays_inside_topology() {
    let topo = Topology::two_two_two();
    let seq = StepSequence::standard(&topo);
    for step in seq.iter() {
        assert!(resolve(step).is_within(&topo), "{}", step.title);
    }
}

#[test]
fn test_initial_scene_matches_first_highlight() {
    let session = default_session();
    let layout = DiagramLayout::compute(session.topology(), 100.0, 100.0);
    let scene = Scene::build(session.state(), session.highlight(), &layout);
    let declared = &session.steps().step(0).highlight;

    for node in &scene.nodes {
        assert_eq!(node.active, declared.nodes.contains(&node.id));
    }
    for edge in &scene.edges {
        assert_eq!(edge.active, declared.weights.contains(&edge.weight));
    }

    let i1 = scene.node(NodeId::I1).unwrap();
    assert!((i1.at.x - 10.0).abs() < 1e-9);
    assert!((i1.at.y - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(i1.value, "0.05");
    assert_eq!(scene.node(NodeId::O1).unwrap().value, "?");
}

#[test]
fn test_resizing_scales_scene_x_only() {
    let session = default_session();
    let narrow = DiagramLayout::compute(session.topology(), 60.0, 30.0);
    let wide = DiagramLayout::compute(session.topology(), 120.0, 30.0);
    let a = Scene::build(session.state(), session.highlight(), &narrow);
    let b = Scene::build(session.state(), session.highlight(), &wide);
    for (na, nb) in a.nodes.iter().zip(&b.nodes) {
        assert!((nb.at.x - 2.0 * na.at.x).abs() < 1e-9);
        assert_eq!(na.at.y, nb.at.y);
    }
}

#[test]
fn test_custom_config_flows_into_walkthrough() {
    let mut config = Config::default();
    config.network.inputs = [1.0, 0.0];
    config.network.weights = [0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let mut session = Session::standard(NetworkState::from_config(&config.network)).unwrap();
    session.advance().unwrap();
    assert_eq!(
        session.state().calculated(DerivedKey::Net(NodeId::H1)),
        Some(0.5)
    );
}

#[test]
fn test_every_standard_formula_typesets() {
    let seq = StepSequence::standard(&Topology::two_two_two());
    for step in seq.iter() {
        if let Some(source) = step.formula.as_deref() {
            let view = typeset(&UnicodeRenderer, source);
            assert!(!view.is_error(), "{}: {}", step.title, view.text());
        }
    }
}
