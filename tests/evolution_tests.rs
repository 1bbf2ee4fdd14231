#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use geo::Coord;
use neurodrive::simulation::brain::Brain;
use neurodrive::simulation::car::{Car, ControlInputs, ControlMode, population_color};
use neurodrive::simulation::evolution::GeneticAlgorithm;
use neurodrive::simulation::params::Params;
use neurodrive::simulation::stepper::Simulation;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn create_test_params() -> Params {
    Params {
        population_size: 10,
        rng_seed: Some(1234),
        ..Params::default()
    }
}

fn scored_cars(params: &Params, scores: &[f32], rng: &mut StdRng) -> Vec<Car> {
    scores
        .iter()
        .enumerate()
        .map(|(i, &score)| {
            let mut car = Car::driver(
                Coord { x: 400.0, y: 100.0 },
                ControlMode::Ai,
                params,
                Some(Brain::driver(rng)),
                population_color(i),
            );
            car.score = score;
            car.damaged = true;
            car
        })
        .collect()
}

#[test]
fn test_selection_sizes() {
    let genetics = GeneticAlgorithm::new(&create_test_params());
    assert_eq!(genetics.parent_count(), 2);
    assert_eq!(genetics.elite_count(2), 1);

    let genetics = GeneticAlgorithm::new(&Params::default());
    assert_eq!(genetics.parent_count(), 20);
    assert_eq!(genetics.elite_count(20), 2);
}

#[test]
fn test_select_best_is_stable_on_ties() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(1);
    let cars = scored_cars(&params, &[5.0, 9.0, 5.0, 9.0, 1.0], &mut rng);

    let best = GeneticAlgorithm::select_best(&cars, 3);

    assert_eq!(best.len(), 3);
    assert!(std::ptr::eq(best[0], &cars[1]));
    assert!(std::ptr::eq(best[1], &cars[3]));
    assert!(std::ptr::eq(best[2], &cars[0]));
}

#[test]
fn test_evolve_fills_population_and_keeps_the_elite() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(2);
    let scores = [3.0, 14.0, 7.0, 1.0, 99.0, 2.0, 8.0, 0.5, 12.0, 6.0];
    let cars = scored_cars(&params, &scores, &mut rng);
    let mut genetics = GeneticAlgorithm::new(&params);

    let brains = genetics.evolve(&cars, &mut rng);

    assert_eq!(brains.len(), 10);
    assert_eq!(genetics.generation, 1);
    assert_eq!(Some(&brains[0]), cars[4].brain.as_ref());
    assert_eq!(genetics.all_time_best, 99.0);
    assert_eq!(genetics.best_brain.as_ref(), cars[4].brain.as_ref());
    for brain in &brains {
        assert_eq!(brain.topology(), (8, 8, 3));
        assert!(brain.to_flat_vector().iter().all(|w| (-1.0..=1.0).contains(w)));
    }
}

#[test]
fn test_all_time_best_only_improves() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(3);
    let mut genetics = GeneticAlgorithm::new(&params);

    let strong = scored_cars(&params, &[50.0; 10], &mut rng);
    genetics.evolve(&strong, &mut rng);
    let champion = genetics.best_brain.clone();

    let weak = scored_cars(&params, &[10.0; 10], &mut rng);
    genetics.evolve(&weak, &mut rng);

    assert_eq!(genetics.generation, 2);
    assert_eq!(genetics.all_time_best, 50.0);
    assert_eq!(genetics.best_brain, champion);
}

#[test]
fn test_empty_population_gets_random_brains() {
    let params = create_test_params();
    let mut rng = StdRng::seed_from_u64(4);
    let mut genetics = GeneticAlgorithm::new(&params);

    let brains = genetics.evolve(&[], &mut rng);

    assert_eq!(brains.len(), 10);
    assert_eq!(genetics.generation, 1);
    assert!(genetics.best_brain.is_none());
}

#[test]
fn test_same_seed_same_run() {
    let params = create_test_params();
    let mut a = Simulation::new(params.clone()).expect("valid params");
    let mut b = Simulation::new(params).expect("valid params");

    for _ in 0..3 {
        for _ in 0..150 {
            assert_eq!(
                a.tick(1.0, ControlInputs::default()),
                b.tick(1.0, ControlInputs::default())
            );
        }
        for sim in [&mut a, &mut b] {
            for car in &mut sim.population.cars {
                car.damaged = true;
            }
        }
        a.tick(1.0, ControlInputs::default());
        b.tick(1.0, ControlInputs::default());
    }

    assert_eq!(a.population.generation(), b.population.generation());
    assert!(a.population.generation() >= 3);
    for (x, y) in a.cars().iter().zip(b.cars()) {
        assert_eq!(x.brain, y.brain);
        assert_eq!(x.pos, y.pos);
    }
    for (x, y) in a.traffic.iter().zip(&b.traffic) {
        assert_eq!(x.pos, y.pos);
    }
}
