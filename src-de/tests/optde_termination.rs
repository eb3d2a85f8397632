use std::cell::RefCell;
use std::rc::Rc;

use deflex_de::{DEConfigBuilder, Init, SeededDeviates, differential_evolution, initial_population};
use deflex_testfunctions::{create_bounds, sphere};
use ndarray::Array2;

fn population(seed: u64) -> Array2<f64> {
    let (lower, upper) = create_bounds(2, -5.0, 5.0);
    let mut d = SeededDeviates::seeded(seed);
    initial_population(Init::Random, 8, &lower, &upper, d.rng_mut())
}

#[test]
fn test_predicate_sees_generation_numbers_from_one() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let config = DEConfigBuilder::new()
        .seed(1)
        .termination(move |g| {
            log.borrow_mut().push(g);
            Some(g > 4)
        })
        .build();
    let bounds = vec![(-5.0, 5.0); 2];
    let report = differential_evolution(&sphere, &bounds, population(2), config).unwrap();

    assert_eq!(*seen.borrow(), vec![1, 2, 3, 4, 5]);
    assert_eq!(report.nit, 4);
    assert_eq!(report.history.len(), 5);
}

#[test]
fn test_predicate_overrides_maxiter() {
    let config = DEConfigBuilder::new().seed(1).maxiter(2).termination(|g| Some(g > 10)).build();
    let bounds = vec![(-5.0, 5.0); 2];
    let report = differential_evolution(&sphere, &bounds, population(3), config).unwrap();
    assert_eq!(report.nit, 10);
}

#[test]
fn test_empty_answer_stops_before_first_generation() {
    let config = DEConfigBuilder::new().seed(1).termination(|_| None).build();
    let bounds = vec![(-5.0, 5.0); 2];
    let report = differential_evolution(&sphere, &bounds, population(4), config).unwrap();
    assert_eq!(report.nit, 0);
    assert_eq!(report.history.len(), 1);
    assert_eq!(report.nfev, 8);
    assert!(report.message.contains("termination predicate"));
}
