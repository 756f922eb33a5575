use clap::Parser;
use terrain_playground::Args;

fn main() -> Result<(), anyhow::Error> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = Args::parse();
	terrain_playground::run(&args)
}
