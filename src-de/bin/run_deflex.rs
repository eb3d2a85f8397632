use clap::{Parser, ValueEnum};
use deflex_de::{
	BoundaryPolicy, DEConfig, Init, SeededDeviates, Strategy, differential_evolution,
	initial_population, run_recorded_differential_evolution,
};
use deflex_testfunctions::{
	accepts_dimension, get_function, get_function_bounds_vec, get_function_metadata, list_functions,
};
use ndarray::Array1;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
	name = "run_deflex",
	about = "Run self-adaptive differential evolution on a selected benchmark function"
)]
struct Cli {
	/// Name of the benchmark function to optimize (use --list-functions to see available options)
	#[arg(long)]
	function: Option<String>,

	/// Dimensionality of the problem
	#[arg(long, default_value_t = 2)]
	dim: usize,

	/// Number of candidates in the population
	#[arg(long, default_value_t = 20)]
	popsize: usize,

	/// JSON configuration file; flags given on the command line override it
	#[arg(long)]
	config: Option<PathBuf>,

	/// Maximum number of generations
	#[arg(long)]
	maxiter: Option<usize>,

	/// Base crossover rate in [0, 1]
	#[arg(long)]
	cr: Option<f64>,

	/// Base mutation factor
	#[arg(long)]
	f: Option<f64>,

	/// Adaptation speed in [0, 1] (0 disables adaptation)
	#[arg(long)]
	c: Option<f64>,

	/// Jitter factor added to the mutation factor per element
	#[arg(long)]
	jf: Option<f64>,

	/// Boundary repair policy
	#[arg(long, value_enum)]
	boundary: Option<BoundaryChoice>,

	/// Shorthand for --boundary bounce-back
	#[arg(long, conflicts_with = "boundary")]
	bounce_back: bool,

	/// Quantization step for trial elements (0 disables it)
	#[arg(long)]
	precision: Option<f64>,

	/// Strategy: jitterbest, rand1bin, rand2bin, best1bin, best2bin
	#[arg(long)]
	strategy: Option<String>,

	/// Initialization scheme for the population
	#[arg(long, value_enum, default_value_t = InitChoice::LatinHypercube)]
	init: InitChoice,

	/// Optional random seed for reproducibility
	#[arg(long)]
	seed: Option<u64>,

	/// Write the generation history as CSV into this directory
	#[arg(long)]
	output: Option<PathBuf>,

	/// Write the generation history as CSV into the DEFLEX_DIR records directory
	#[arg(long, conflicts_with = "output")]
	record: bool,

	/// List all available functions and exit
	#[arg(long)]
	list_functions: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum BoundaryChoice {
	Clip,
	BounceBack,
	Reflect,
}

impl From<BoundaryChoice> for BoundaryPolicy {
	fn from(choice: BoundaryChoice) -> Self {
		match choice {
			BoundaryChoice::Clip => BoundaryPolicy::Clip,
			BoundaryChoice::BounceBack => BoundaryPolicy::BounceBack,
			BoundaryChoice::Reflect => BoundaryPolicy::Reflect,
		}
	}
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum InitChoice {
	LatinHypercube,
	Random,
}

impl From<InitChoice> for Init {
	fn from(choice: InitChoice) -> Self {
		match choice {
			InitChoice::LatinHypercube => Init::LatinHypercube,
			InitChoice::Random => Init::Random,
		}
	}
}

fn build_config(args: &Cli) -> Result<DEConfig, String> {
	let mut config = match &args.config {
		Some(path) => DEConfig::from_json_file(path)
			.map_err(|e| format!("cannot load config {}: {}", path.display(), e))?,
		None => DEConfig::default(),
	};
	if let Some(v) = args.maxiter {
		config.maxiter = v;
	}
	if let Some(v) = args.cr {
		config.recombination = v;
	}
	if let Some(v) = args.f {
		config.mutation = v;
	}
	if let Some(v) = args.c {
		config.adaptation = v;
	}
	if let Some(v) = args.jf {
		config.jitter = v;
	}
	if let Some(v) = args.boundary {
		config.boundary = v.into();
	}
	if args.bounce_back {
		config.boundary = BoundaryPolicy::BounceBack;
	}
	if let Some(v) = args.precision {
		config.precision = v;
	}
	if let Some(s) = &args.strategy {
		config.strategy = Strategy::from_str(s)?;
	}
	if args.seed.is_some() {
		config.seed = args.seed;
	}
	config.validate().map_err(|e| e.to_string())?;
	Ok(config)
}

fn print_functions() {
	let metadata = get_function_metadata();
	println!("Available functions:");
	for name in list_functions() {
		match metadata.get(&name) {
			Some(meta) => println!("  {:<12} {}", name, meta.description),
			None => println!("  {}", name),
		}
	}
}

fn main() {
	env_logger::init();
	let args = Cli::parse();

	if args.list_functions {
		print_functions();
		return;
	}

	let name = match &args.function {
		Some(name) => name.trim().to_lowercase(),
		None => {
			eprintln!("Error: --function must be provided unless --list-functions is used.");
			process::exit(2);
		}
	};
	let Some(func) = get_function(&name) else {
		eprintln!("Error: function '{name}' not found. Use --list-functions to inspect available names.");
		process::exit(2);
	};
	if !accepts_dimension(&name, args.dim) {
		let dims = get_function_metadata().get(&name).map(|m| m.dimensions.clone()).unwrap_or_default();
		eprintln!("Error: function '{name}' does not support --dim {} (supported: {:?}).", args.dim, dims);
		process::exit(2);
	}

	let config = match build_config(&args) {
		Ok(c) => c,
		Err(e) => {
			eprintln!("Error: {e}");
			process::exit(2);
		}
	};

	let bounds = get_function_bounds_vec(&name, args.dim, (-5.0, 5.0));
	let lower: Array1<f64> = bounds.iter().map(|b| b.0).collect();
	let upper: Array1<f64> = bounds.iter().map(|b| b.1).collect();

	// initial population draws from seed + 1, the solver from seed
	let mut init_rng = SeededDeviates::from_seed(config.seed.map(|s| s.wrapping_add(1)));
	let population =
		initial_population(args.init.into(), args.popsize, &lower, &upper, init_rng.rng_mut());

	println!(
		"Optimizing {name} (dim={}, popsize={}, strategy={}, maxiter={})",
		args.dim, args.popsize, config.strategy, config.maxiter
	);

	let start = Instant::now();
	let objective = |x: &Array1<f64>| func(x);
	let outcome = if args.record || args.output.is_some() {
		run_recorded_differential_evolution(
			&name,
			&objective,
			&bounds,
			population,
			config,
			args.output.as_deref(),
		)
		.map(|(report, path)| {
			println!("History written to {}", path.display());
			report
		})
	} else {
		differential_evolution(&objective, &bounds, population, config)
	};

	match outcome {
		Ok(report) => {
			println!("{}", report.message);
			println!("  best f = {:.6e}", report.fun);
			println!("  best x = {:?}", report.x.to_vec());
			println!("  generations = {}, evaluations = {}", report.nit, report.nfev);
			println!("  elapsed = {:.3} s", start.elapsed().as_secs_f64());
		}
		Err(e) => {
			eprintln!("Error: {e}");
			process::exit(1);
		}
	}
}
