//! Optimization test functions library
//!
//! Benchmark objectives used by the deflex solver tests and the `run_deflex`
//! binary. Functions are organized by category:
//!
//! - **Unimodal**: single global optimum (sphere, rosenbrock, ...)
//! - **Multimodal**: many local minima (ackley, rastrigin, ...)
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array1;
//! use deflex_testfunctions::*;
//!
//! let x = Array1::from_vec(vec![0.0, 0.0]);
//! assert_eq!(sphere(&x), 0.0);
//!
//! let bounds = get_function_bounds("sphere");
//! assert!(bounds.is_some());
//! ```

use ndarray::Array1;
use std::collections::HashMap;

pub mod functions;
pub use functions::*;

/// Signature shared by every benchmark function
pub type TestFunction = fn(&Array1<f64>) -> f64;

/// Metadata for a test function: bounds, known minima and typical dimensions
#[derive(Debug, Clone)]
pub struct FunctionMetadata {
    /// Function name
    pub name: String,
    /// Bounds for each dimension (min, max); a single pair applies to every dimension
    pub bounds: Vec<(f64, f64)>,
    /// Global minima locations and values
    pub global_minima: Vec<(Vec<f64>, f64)>,
    /// Description of the function
    pub description: String,
    /// Whether the function is multimodal
    pub multimodal: bool,
    /// Typical dimension(s) for the function; a single entry means the dimension is fixed
    pub dimensions: Vec<usize>,
}

/// Create `(lower, upper)` bound vectors of dimension `n`
pub fn create_bounds(n: usize, lower: f64, upper: f64) -> (Array1<f64>, Array1<f64>) {
    (Array1::from_elem(n, lower), Array1::from_elem(n, upper))
}

fn entry(
    name: &str,
    bound: (f64, f64),
    minimum: (Vec<f64>, f64),
    description: &str,
    multimodal: bool,
    dimensions: Vec<usize>,
) -> (String, FunctionMetadata) {
    (
        name.to_string(),
        FunctionMetadata {
            name: name.to_string(),
            bounds: vec![bound; 2],
            global_minima: vec![minimum],
            description: description.to_string(),
            multimodal,
            dimensions,
        },
    )
}

/// Get metadata for all available test functions
pub fn get_function_metadata() -> HashMap<String, FunctionMetadata> {
    HashMap::from([
        entry(
            "sphere",
            (-5.12, 5.12),
            (vec![0.0, 0.0], 0.0),
            "N-dimensional convex bowl",
            false,
            vec![2, 5, 10],
        ),
        entry(
            "quadratic",
            (-5.0, 5.0),
            (vec![0.0, 0.0], 0.0),
            "Sum of squares, alias of sphere",
            false,
            vec![2, 5],
        ),
        entry(
            "sum_squares",
            (-10.0, 10.0),
            (vec![0.0, 0.0], 0.0),
            "Axis-parallel hyper-ellipsoid",
            false,
            vec![2, 5, 10],
        ),
        entry(
            "rosenbrock",
            (-5.0, 10.0),
            (vec![1.0, 1.0], 0.0),
            "Narrow curved valley",
            false,
            vec![2, 5, 10],
        ),
        entry(
            "booth",
            (-10.0, 10.0),
            (vec![1.0, 3.0], 0.0),
            "2D plate-shaped function",
            false,
            vec![2],
        ),
        entry(
            "rastrigin",
            (-5.12, 5.12),
            (vec![0.0, 0.0], 0.0),
            "Highly multimodal with regular local minima",
            true,
            vec![2, 5, 10],
        ),
        entry(
            "ackley",
            (-32.768, 32.768),
            (vec![0.0, 0.0], 0.0),
            "Nearly flat outer region with a deep central hole",
            true,
            vec![2, 5, 10],
        ),
        entry(
            "griewank",
            (-600.0, 600.0),
            (vec![0.0, 0.0], 0.0),
            "Product-of-cosines multimodal function",
            true,
            vec![2, 5, 10],
        ),
        entry(
            "schwefel",
            (-500.0, 500.0),
            (vec![420.9687, 420.9687], 0.0),
            "Deceptive, optimum far from the second best minimum",
            true,
            vec![2, 5],
        ),
    ])
}

/// Look up a benchmark function by name (case-insensitive)
pub fn get_function(name: &str) -> Option<TestFunction> {
    let f: TestFunction = match name.to_lowercase().as_str() {
        "sphere" => sphere,
        "quadratic" => quadratic,
        "sum_squares" => sum_squares,
        "rosenbrock" => rosenbrock,
        "booth" => booth,
        "rastrigin" => rastrigin,
        "ackley" => ackley,
        "griewank" => griewank,
        "schwefel" => schwefel,
        _ => return None,
    };
    Some(f)
}

/// Names of every registered function, sorted
pub fn list_functions() -> Vec<String> {
    let mut names: Vec<String> = get_function_metadata().into_keys().collect();
    names.sort();
    names
}

/// Get bounds for a specific function
pub fn get_function_bounds(function_name: &str) -> Option<Vec<(f64, f64)>> {
    get_function_metadata().get(function_name).map(|meta| meta.bounds.clone())
}

/// Bounds for `function_name` expanded to `dim` dimensions, or `default_bounds` when unknown
pub fn get_function_bounds_vec(
    function_name: &str,
    dim: usize,
    default_bounds: (f64, f64),
) -> Vec<(f64, f64)> {
    let bound = get_function_bounds(function_name)
        .and_then(|b| b.first().copied())
        .unwrap_or(default_bounds);
    vec![bound; dim]
}

/// Whether `function_name` can be evaluated in `dim` dimensions
pub fn accepts_dimension(function_name: &str, dim: usize) -> bool {
    if dim == 0 {
        return false;
    }
    match get_function_metadata().get(function_name) {
        Some(meta) if meta.dimensions.len() == 1 => meta.dimensions[0] == dim,
        Some(_) => true,
        None => false,
    }
}
