#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use ndarray::Array1;
use neurodrive::simulation::brain::{
    Brain, BrainError, BrainRecord, HIDDEN_COUNT, INPUT_COUNT, OUTPUT_COUNT,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn create_test_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn test_predict_on_zero_inputs_stays_inside_sigmoid_range() {
    let mut rng = create_test_rng();
    let brain = Brain::new_random(8, 8, 3, &mut rng).expect("valid topology");

    let activations = brain.predict(&Array1::zeros(8));

    assert_eq!(activations.hidden.len(), 8);
    assert_eq!(activations.outputs.len(), 3);
    for &value in activations.hidden.iter().chain(activations.outputs.iter()) {
        assert!(value > 0.0 && value < 1.0, "activation {value} out of (0, 1)");
    }
}

#[test]
fn test_empty_topology_is_rejected() {
    let mut rng = create_test_rng();
    assert!(Brain::new_random(0, 8, 3, &mut rng).is_err());
    assert!(Brain::new_random(8, 0, 3, &mut rng).is_err());
    assert!(Brain::new_random(8, 8, 0, &mut rng).is_err());
}

#[test]
fn test_random_weights_are_in_unit_range() {
    let mut rng = create_test_rng();
    let brain = Brain::driver(&mut rng);

    assert_eq!(brain.topology(), (INPUT_COUNT, HIDDEN_COUNT, OUTPUT_COUNT));
    assert_eq!(
        brain.to_flat_vector().len(),
        INPUT_COUNT * HIDDEN_COUNT + HIDDEN_COUNT + HIDDEN_COUNT * OUTPUT_COUNT + OUTPUT_COUNT
    );
    assert!(brain.to_flat_vector().iter().all(|w| (-1.0..=1.0).contains(w)));
}

#[test]
fn test_mutating_a_clone_leaves_the_original_alone() {
    let mut rng = create_test_rng();
    let original = Brain::driver(&mut rng);
    let before = original.to_flat_vector();

    let mut child = original.clone();
    child.mutate(1.0, 0.5, &mut rng);

    assert_eq!(original.to_flat_vector(), before);
    assert_ne!(child.to_flat_vector(), before);
}

#[test]
fn test_mutation_keeps_weights_clamped() {
    let mut rng = create_test_rng();
    let mut brain = Brain::driver(&mut rng);

    for _ in 0..50 {
        brain.mutate(0.9, 2.0, &mut rng);
    }

    assert!(brain.to_flat_vector().iter().all(|w| (-1.0..=1.0).contains(w)));
}

#[test]
fn test_zero_rate_or_amount_is_a_no_op() {
    let mut rng = create_test_rng();
    let mut brain = Brain::driver(&mut rng);
    let before = brain.clone();

    brain.mutate(0.0, 0.5, &mut rng);
    assert_eq!(brain, before);

    brain.mutate(1.0, 0.0, &mut rng);
    assert_eq!(brain, before);
}

#[test]
fn test_json_round_trip_preserves_weights() {
    let mut rng = create_test_rng();
    let brain = Brain::driver(&mut rng);

    let json = brain.to_json().expect("serializable");
    assert!(json.contains("weightsInputHidden"));
    assert!(json.contains("biasOutput"));

    let restored = Brain::from_json(&json).expect("valid record");
    assert_eq!(restored, brain);

    let inputs = Array1::from_vec(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8]);
    assert_eq!(restored.predict(&inputs), brain.predict(&inputs));
}

#[test]
fn test_record_with_wrong_shape_is_rejected() {
    let mut rng = create_test_rng();
    let brain = Brain::driver(&mut rng);

    let mut record = BrainRecord::from(&brain);
    record.bias_output.pop();
    let result = Brain::try_from(record);
    assert!(matches!(
        result,
        Err(BrainError::ShapeMismatch {
            field: "biasOutput",
            expected: 3,
            found: 2
        })
    ));

    let mut record = BrainRecord::from(&brain);
    record.weights_input_hidden[3].push(0.0);
    assert!(Brain::try_from(record).is_err());

    let mut record = BrainRecord::from(&brain);
    record.hidden_count = 0;
    assert!(matches!(
        Brain::try_from(record),
        Err(BrainError::EmptyTopology)
    ));
}

#[test]
fn test_non_driving_topology_is_flagged() {
    let mut rng = create_test_rng();
    let brain = Brain::new_random(4, 3, 2, &mut rng).expect("valid topology");

    assert!(matches!(
        brain.expect_driver(),
        Err(BrainError::TopologyMismatch {
            found: (4, 3, 2),
            ..
        })
    ));
}

#[test]
fn test_unusable_json_falls_back_to_random_driver() {
    let mut rng = create_test_rng();

    let brain = Brain::from_json_or_random("not a brain", &mut rng);
    assert_eq!(brain.topology(), (INPUT_COUNT, HIDDEN_COUNT, OUTPUT_COUNT));

    let small = Brain::new_random(4, 3, 2, &mut rng).expect("valid topology");
    let json = small.to_json().expect("serializable");
    let brain = Brain::from_json_or_random(&json, &mut rng);
    assert_eq!(brain.topology(), (INPUT_COUNT, HIDDEN_COUNT, OUTPUT_COUNT));

    let driver = Brain::driver(&mut rng);
    let json = driver.to_json().expect("serializable");
    assert_eq!(Brain::from_json_or_random(&json, &mut rng), driver);
}
