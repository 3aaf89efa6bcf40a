use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use rollout_cli::config::{Overrides, Settings, discover_settings, load_settings, resolve_settings};
use rollout_cli::meta::AppMeta;
use rollout_cli::promotion::{Navigator, ZoneResolver};
use rollout_cli::render::{Renderer, generate};
use rollout_cli::validate::validate_placements;

#[derive(Parser)]
#[command(name = "rollout")]
#[command(
	author,
	version,
	about = "CLI tool for navigating promotion sequences and rendering rollout manifests"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,

	/// Directory holding per-application metadata
	#[arg(long, global = true, env = "ROLLOUT_META_DIR", value_name = "DIR")]
	meta_dir: Option<PathBuf>,

	/// Directory rendered manifests are written under
	#[arg(long, global = true, env = "ROLLOUT_RELEASE_DIR", value_name = "DIR")]
	release_dir: Option<PathBuf>,

	/// Directories searched for templates, in order (comma-separated)
	#[arg(
		long,
		global = true,
		env = "ROLLOUT_TEMPLATES_DIR",
		value_name = "DIR",
		value_delimiter = ','
	)]
	templates_dir: Option<Vec<PathBuf>>,

	/// Default application template name
	#[arg(long, global = true, env = "ROLLOUT_APPLICATION_TEMPLATE", value_name = "NAME")]
	application_template: Option<String>,

	/// Default subscription template name
	#[arg(long, global = true, env = "ROLLOUT_SUBSCRIPTION_TEMPLATE", value_name = "NAME")]
	subscription_template: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// Render the application and zone subscription manifests
	Generate {
		app: String,
		env: String,
		zone: String,
	},
	/// Query the promotion sequence
	Get {
		#[command(subcommand)]
		query: GetQuery,
	},
	/// Check rendered output against the promotion sequence
	Validate {
		#[command(subcommand)]
		target: ValidateTarget,
	},
	/// Settings management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum GetQuery {
	/// Print zones of an environment, one comma-separated line per priority
	Zones { app: String, env: String },
	/// Print the first environment
	FirstEnv { app: String },
	/// Print the environment after ENV (nothing if ENV is last)
	NextEnv { app: String, env: String },
	/// Print the environment before ENV (nothing if ENV is first)
	PrevEnv { app: String, env: String },
}

#[derive(Subcommand)]
enum ValidateTarget {
	/// Check that every placement has a matching placement rule
	Placements { app: String },
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display effective settings with their sources
	Show,
	/// Check all settings files for errors
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	if let Err(e) = rollout_cli::logging::init(cli.verbose) {
		eprintln!("Warning: failed to initialize logging: {e}");
	}

	let overrides = Overrides {
		meta_dir: cli.meta_dir,
		release_dir: cli.release_dir,
		templates_dir: cli.templates_dir,
		application_template: cli.application_template,
		subscription_template: cli.subscription_template,
	};

	match cli.command {
		Commands::Generate { app, env, zone } => {
			handle_generate(&effective_settings(&overrides)?, &app, &env, &zone)
		}
		Commands::Get { query } => handle_get(&effective_settings(&overrides)?, query),
		Commands::Validate {
			target: ValidateTarget::Placements { app },
		} => handle_validate_placements(&effective_settings(&overrides)?, &app),
		Commands::Config { action } => match action {
			ConfigAction::Show => handle_config_show(&overrides),
			ConfigAction::Validate => handle_config_validate(),
		},
	}
}

fn effective_settings(overrides: &Overrides) -> Result<Settings> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	load_settings(&cwd, overrides).context("Failed to load settings")
}

fn handle_generate(settings: &Settings, app: &str, env: &str, zone: &str) -> Result<ExitCode> {
	let layout = settings.layout();
	let mut meta = AppMeta::new(&layout, app);
	let renderer = Renderer::new(&settings.templates_dir.value);

	let generated = generate(&mut meta, &renderer, &settings.template_names(), env, zone)
		.with_context(|| format!("Failed to generate manifests for {app} in {env}/{zone}"))?;

	println!("{}", generated.application.display());
	println!("{}", generated.subscription.display());
	Ok(ExitCode::SUCCESS)
}

fn handle_get(settings: &Settings, query: GetQuery) -> Result<ExitCode> {
	let app = match &query {
		GetQuery::Zones { app, .. }
		| GetQuery::FirstEnv { app }
		| GetQuery::NextEnv { app, .. }
		| GetQuery::PrevEnv { app, .. } => app.clone(),
	};

	let layout = settings.layout();
	let mut meta = AppMeta::new(&layout, &app);
	let graph = meta
		.promotion()
		.with_context(|| format!("Failed to load promotion sequence for {app}"))?;
	let nav = Navigator::new(graph);

	match query {
		GetQuery::Zones { env, .. } => {
			let groups = ZoneResolver::new(graph)
				.zones_for(&env)
				.with_context(|| format!("Failed to resolve zones of {env} for {app}"))?;
			for group in groups {
				println!("{}", group.zones.join(","));
			}
		}
		GetQuery::FirstEnv { .. } => {
			let first = nav
				.first_environment()
				.with_context(|| format!("Failed to find first environment for {app}"))?;
			println!("{first}");
		}
		GetQuery::NextEnv { env, .. } => {
			let next = nav
				.next_environment(&env)
				.with_context(|| format!("Failed to find environment after {env} for {app}"))?;
			match next {
				Some(next) => println!("{next}"),
				None => tracing::info!(environment = %env, "no next environment"),
			}
		}
		GetQuery::PrevEnv { env, .. } => {
			let previous = nav
				.previous_environment(&env)
				.with_context(|| format!("Failed to find environment before {env} for {app}"))?;
			match previous {
				Some(previous) => println!("{previous}"),
				None => tracing::info!(environment = %env, "no previous environment"),
			}
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_validate_placements(settings: &Settings, app: &str) -> Result<ExitCode> {
	let layout = settings.layout();
	let mut meta = AppMeta::new(&layout, app);
	let graph = meta
		.promotion()
		.with_context(|| format!("Failed to load promotion sequence for {app}"))?;

	let report = validate_placements(graph, &layout)
		.with_context(|| format!("Failed to validate placements for {app}"))?;

	if report.is_ok() {
		println!("All {} placement rules are valid.", report.checked());
		return Ok(ExitCode::SUCCESS);
	}

	for failure in &report.failures {
		eprintln!("  {failure}");
	}
	eprintln!(
		"{} of {} placement rules failed validation.",
		report.failures.len(),
		report.checked()
	);
	Ok(ExitCode::FAILURE)
}

fn handle_config_show(overrides: &Overrides) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let loaded = discover_settings(&cwd).context("Failed to discover settings files")?;
	let settings = resolve_settings(&loaded, overrides);

	if loaded.is_empty() {
		println!("No settings files found.");
	} else {
		println!("Settings files (in cascade order):");
		for file in &loaded {
			println!("  {}", file.path.display());
		}
	}
	println!();

	println!("Effective settings:");
	println!(
		"  meta-dir: {} ({})",
		settings.meta_dir.value.display(),
		settings.meta_dir.source
	);
	println!(
		"  release-dir: {} ({})",
		settings.release_dir.value.display(),
		settings.release_dir.source
	);
	let templates_dirs: Vec<_> = settings
		.templates_dir
		.value
		.iter()
		.map(|dir| dir.display().to_string())
		.collect();
	println!(
		"  templates-dir: {} ({})",
		templates_dirs.join(","),
		settings.templates_dir.source
	);
	println!(
		"  application-template: {} ({})",
		settings.application_template.value, settings.application_template.source
	);
	println!(
		"  subscription-template: {} ({})",
		settings.subscription_template.value, settings.subscription_template.source
	);

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate() -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match discover_settings(&cwd) {
		Ok(loaded) => {
			if loaded.is_empty() {
				println!("No settings files found.");
			} else {
				println!("All settings files are valid:");
				for file in &loaded {
					println!("  {}", file.path.display());
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Settings error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
