//! End-to-end scenarios through the public engine API.

use arclight::arcs::BoolOp;
use arclight::arcs::BoolOperand;
use arclight::arcs::RelOp;
use arclight::arcs::TernaryBoolBuilder;
use arclight::arcs::TernaryProductBuilder;
use arclight::arcs::TernarySumBuilder;
use arclight::engine::PropagationEngine;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn binding_a_factor_to_zero_forces_the_product() {
    init_logger();
    let mut engine: PropagationEngine<i32> = PropagationEngine::default();
    let x = engine.new_interval_node(-1000, 1000);
    let y = engine.new_interval_node(-1000, 1000);
    let z = engine.new_interval_node(-1_000_000, 1_000_000);

    let _ = engine.add_arc(TernaryProductBuilder {
        x,
        y,
        z,
        op: RelOp::Eq,
    });
    engine.propagate().unwrap();

    engine.assign(y, 0).unwrap();
    engine.propagate().unwrap();

    assert!(engine.is_bound(z));
    assert_eq!(engine.min(z), 0);
    // x stays free; any value satisfies x * 0 = 0.
    assert_eq!((engine.min(x), engine.max(x)), (-1000, 1000));
}

#[test]
fn changes_flow_through_a_chain_of_arcs() {
    init_logger();
    // a + b = c and c * two = d.
    let mut engine: PropagationEngine<i32> = PropagationEngine::default();
    let a = engine.new_interval_node(0, 50);
    let b = engine.new_interval_node(0, 50);
    let c = engine.new_interval_node(0, 1000);
    let two = engine.new_interval_node(2, 2);
    let d = engine.new_interval_node(0, 1000);

    let _ = engine.add_arc(TernarySumBuilder {
        x: a,
        y: b,
        z: c,
        op: RelOp::Eq,
    });
    let _ = engine.add_arc(TernaryProductBuilder {
        x: c,
        y: two,
        z: d,
        op: RelOp::Eq,
    });
    engine.propagate().unwrap();

    assert_eq!(engine.max(c), 100);
    assert_eq!(engine.max(d), 200);

    engine.set_max(d, 60).unwrap();
    engine.propagate().unwrap();

    // d <= 60 means c <= 30, which caps a and b.
    assert_eq!(engine.max(c), 30);
    assert_eq!(engine.max(a), 30);
    assert_eq!(engine.max(b), 30);
}

#[test]
fn boolean_network_propagates_across_connectives() {
    init_logger();
    // and_xy = x & y, result = and_xy | z.
    let mut engine: PropagationEngine<i32> = PropagationEngine::default();
    let x = engine.new_bool_node();
    let y = engine.new_bool_node();
    let z = engine.new_bool_node();
    let and_xy = engine.new_bool_node();
    let result = engine.new_bool_node();

    let _ = engine.add_arc(TernaryBoolBuilder {
        x: BoolOperand::plain(x),
        y: BoolOperand::plain(y),
        z: BoolOperand::plain(and_xy),
        op: BoolOp::And,
    });
    let _ = engine.add_arc(TernaryBoolBuilder {
        x: BoolOperand::plain(and_xy),
        y: BoolOperand::plain(z),
        z: BoolOperand::plain(result),
        op: BoolOp::Or,
    });
    engine.propagate().unwrap();

    assert_eq!(engine.bool_state(result), None);

    engine.assign_bool(result, false).unwrap();
    engine.propagate().unwrap();

    // result false forces both or-operands false, and a false conjunction target with no bound
    // operand leaves x and y open.
    assert_eq!(engine.bool_state(and_xy), Some(false));
    assert_eq!(engine.bool_state(z), Some(false));
    assert_eq!(engine.bool_state(x), None);

    engine.assign_bool(x, true).unwrap();
    engine.propagate().unwrap();
    assert_eq!(engine.bool_state(y), Some(false));
}

#[test]
fn failure_is_terminal() {
    init_logger();
    let mut engine: PropagationEngine<i32> = PropagationEngine::default();
    let x = engine.new_interval_node(2, 2);
    let y = engine.new_interval_node(3, 3);
    let z = engine.new_interval_node(10, 20);

    let _ = engine.add_arc(TernarySumBuilder {
        x,
        y,
        z,
        op: RelOp::Eq,
    });

    assert!(engine.propagate().is_err());
    assert!(engine.is_failed());

    // Every subsequent interaction keeps reporting failure.
    assert!(engine.propagate().is_err());
    assert!(engine.set_min(z, 11).is_err());
}

#[test]
fn real_valued_engine_runs_the_same_arcs() {
    init_logger();
    let mut engine: PropagationEngine<f64> = PropagationEngine::default();
    let x = engine.new_interval_node(1.0, 2.0);
    let y = engine.new_interval_node(3.0, 4.0);
    let z = engine.new_interval_node(-1e9, 1e9);

    let _ = engine.add_arc(TernarySumBuilder {
        x,
        y,
        z,
        op: RelOp::Eq,
    });
    engine.propagate().unwrap();

    assert_eq!(engine.min(z), 4.0);
    assert_eq!(engine.max(z), 6.0);

    engine.set_max(z, 4.5).unwrap();
    engine.propagate().unwrap();
    assert_eq!(engine.max(x), 1.5);
}
