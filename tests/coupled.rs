use pdevs::models::*;
use pdevs::utils::errors::{ConstructionError, SimulationError};

mod fixtures;
use fixtures::*;

fn counter(id: &str) -> Model {
    Model::atomic(id, Box::new(Counter::new(1.0)))
}

fn construction_error(result: Result<Coupled, SimulationError>) -> ConstructionError {
    match result {
        Err(SimulationError::Construction(err)) => err,
        Err(other) => panic!("expected a construction error, found {}", other),
        Ok(_) => panic!("expected a construction error, but the model was built"),
    }
}

#[test]
fn input_to_input_coupling_is_rejected() {
    let err = construction_error(Coupled::new(
        Vec::new(),
        Vec::new(),
        vec![counter("a"), counter("b")],
        Vec::new(),
        Vec::new(),
        vec![InternalCoupling::new("a", "in", "b", "in")],
    ));
    assert_eq!(
        err,
        ConstructionError::DirectionMismatch {
            model_id: String::from("a"),
            port: String::from("in"),
            expected: Direction::Output,
            found: Direction::Input,
        }
    );
}

#[test]
fn external_input_must_target_an_input_port() {
    let err = construction_error(Coupled::new(
        vec![Port::new("in", ValueKind::Integer)],
        Vec::new(),
        vec![counter("a")],
        vec![ExternalInputCoupling::new("in", "a", "out")],
        Vec::new(),
        Vec::new(),
    ));
    assert_eq!(
        err,
        ConstructionError::DirectionMismatch {
            model_id: String::from("a"),
            port: String::from("out"),
            expected: Direction::Input,
            found: Direction::Output,
        }
    );
}

#[test]
fn external_output_must_leave_through_an_output_port() {
    let err = construction_error(Coupled::new(
        vec![Port::any("in")],
        vec![Port::any("out")],
        vec![counter("a")],
        Vec::new(),
        vec![ExternalOutputCoupling::new("a", "out", "in")],
        Vec::new(),
    ));
    assert![matches!(
        err,
        ConstructionError::DirectionMismatch {
            expected: Direction::Output,
            found: Direction::Input,
            ..
        }
    )];
}

#[test]
fn missing_components_and_ports_are_rejected() {
    let err = construction_error(Coupled::new(
        Vec::new(),
        Vec::new(),
        vec![counter("a")],
        Vec::new(),
        Vec::new(),
        vec![InternalCoupling::new("a", "out", "ghost", "in")],
    ));
    assert_eq!(err, ConstructionError::ModelNotFound(String::from("ghost")));

    let err = construction_error(Coupled::new(
        Vec::new(),
        Vec::new(),
        vec![counter("a"), counter("b")],
        Vec::new(),
        Vec::new(),
        vec![InternalCoupling::new("a", "out", "b", "nope")],
    ));
    assert_eq!(
        err,
        ConstructionError::PortNotFound {
            model_id: String::from("b"),
            port: String::from("nope"),
        }
    );
}

#[test]
fn duplicate_ids_and_ports_are_rejected() {
    let err = construction_error(Coupled::new(
        Vec::new(),
        Vec::new(),
        vec![counter("a"), counter("a")],
        Vec::new(),
        Vec::new(),
        Vec::new(),
    ));
    assert_eq!(err, ConstructionError::DuplicateModelId(String::from("a")));

    let err = construction_error(Coupled::new(
        vec![Port::any("in"), Port::new("in", ValueKind::Float)],
        Vec::new(),
        vec![counter("a")],
        Vec::new(),
        Vec::new(),
        Vec::new(),
    ));
    assert![matches!(err, ConstructionError::DuplicatePort { port, .. } if port == "in")];
}

#[test]
fn components_cannot_feed_themselves() {
    let err = construction_error(Coupled::new(
        Vec::new(),
        Vec::new(),
        vec![counter("a")],
        Vec::new(),
        Vec::new(),
        vec![InternalCoupling::new("a", "out", "a", "in")],
    ));
    assert_eq!(err, ConstructionError::CouplingCycle(String::from("a")));

    let err = construction_error(Coupled::new(
        Vec::new(),
        Vec::new(),
        vec![counter("a")],
        Vec::new(),
        Vec::new(),
        vec![InternalCoupling::new("a", "out", "a", "out")],
    ));
    assert_eq!(
        err,
        ConstructionError::SelfCoupling {
            model_id: String::from("a"),
            port: String::from("out"),
        }
    );
}

#[test]
fn value_kinds_must_be_compatible() {
    let err = construction_error(Coupled::new(
        Vec::new(),
        Vec::new(),
        vec![
            Model::atomic("pin", Box::new(AnalogSource::new(vec![1.0], 1.0))),
            counter("a"),
        ],
        Vec::new(),
        Vec::new(),
        vec![InternalCoupling::new("pin", "out", "a", "in")],
    ));
    assert![matches!(
        err,
        ConstructionError::PortKindMismatch { ref source_kind, ref target_kind, .. }
            if source_kind == "Float" && target_kind == "Integer"
    )];

    // Untyped ports accept every kind
    assert![Coupled::new(
        Vec::new(),
        Vec::new(),
        vec![
            Model::atomic("pin", Box::new(AnalogSource::new(vec![1.0], 1.0))),
            Model::atomic("sink", Box::new(Passive::default())),
        ],
        Vec::new(),
        Vec::new(),
        vec![InternalCoupling::new("pin", "out", "sink", "in")],
    )
    .is_ok()];
}

#[test]
fn construction_errors_are_reported_as_such() {
    let err = Coupled::new(
        Vec::new(),
        Vec::new(),
        vec![counter("a")],
        Vec::new(),
        Vec::new(),
        vec![InternalCoupling::new("a", "in", "a", "out")],
    )
    .err()
    .unwrap();
    assert![err.is_construction_error()];
    assert_eq!(err.model_id(), None);
    assert_eq!(
        err.to_string(),
        "Model `a` is coupled to itself, creating a same-step delivery cycle"
    );
}

#[test]
fn nested_models_expose_their_structure() {
    let inner = Coupled::new(
        vec![Port::new("in", ValueKind::Integer)],
        vec![Port::new("out", ValueKind::Integer)],
        vec![counter("x"), counter("y")],
        vec![ExternalInputCoupling::new("in", "x", "in")],
        vec![ExternalOutputCoupling::new("y", "out", "out")],
        vec![InternalCoupling::new("x", "out", "y", "in")],
    )
    .unwrap();
    let top = Model::coupled(
        "top",
        Coupled::new(
            Vec::new(),
            Vec::new(),
            vec![counter("source"), Model::coupled("inner", inner)],
            Vec::new(),
            Vec::new(),
            vec![InternalCoupling::new("source", "out", "inner", "in")],
        )
        .unwrap(),
    );
    assert_eq!(top.get_type(), "Coupled");
    assert_eq!(top.atomic_count(), 3);
    match top.kind() {
        ModelKind::Coupled(coupled) => {
            assert_eq!(coupled.components().len(), 2);
            assert_eq!(coupled.components()[0].get_type(), "Counter");
            assert_eq!(coupled.components()[1].ports_in(), vec![Port::new("in", ValueKind::Integer)]);
            assert_eq!(coupled.internal_couplings().len(), 1);
            assert![coupled.external_input_couplings().is_empty()];
        }
        ModelKind::Atomic(_) => panic!("expected a coupled model"),
    }
}
