mod io;

use clap::{Parser, Subcommand};
use octomap_common::util::config::Config;
use octomap_common::util::{generator, logger};
use octomap_optim::{check, viz, Drawing, GridGraph};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw the configured network (default).
    Optimize,
    /// Write a random instance to the configured input path.
    Generate {
        #[arg(long, default_value_t = 20)]
        stations: usize,
        #[arg(long, default_value_t = 4)]
        lines: usize,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            args.config
        );
        Config::default()
    };

    let command = args.command.unwrap_or(Commands::Optimize);

    match command {
        Commands::Generate { stations, lines } => {
            prepare_output_dir(&config.input.graph_file)?;
            generator::generate_random_graph(&config.input.graph_file, stations, lines)?;
        }
        Commands::Optimize => {
            if !Path::new(&config.input.graph_file).exists() {
                return Err(anyhow::anyhow!(
                    "Input graph missing: '{}'. Did you run 'generate'?",
                    config.input.graph_file
                ));
            }
            prepare_output_dir(&config.input.output_drawing)?;
            prepare_output_dir(&config.input.output_png)?;

            if run_optimize(&config).is_err() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn prepare_output_dir(path_str: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path_str).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            log::info!("Creating output directory: {:?}", parent);
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn run_optimize(config: &Config) -> anyhow::Result<()> {
    log::info!("Parsing network: {}", config.input.graph_file);
    let (cg, names) = io::load_graph(&config.input.graph_file)?;
    log::info!("{} stations, {} edges", cg.num_nodes(), cg.num_edges());

    let bbox = cg
        .bbox()
        .padded(config.grid.padding_cells as f64 * config.grid.cell_size);
    let mut gg = GridGraph::build(&cg, bbox, &config.grid, &config.penalties);
    log::info!(
        "Base grid: {}x{} window, {} sinks, {} edges",
        gg.width(),
        gg.height(),
        gg.sinks().len(),
        gg.num_edges()
    );

    let mut drawing = Drawing::new(&cg);
    let stats = octomap_optim::optimize(&mut gg, &cg, &mut drawing, &config.ilp, None)
        .map_err(|e| anyhow::anyhow!(e))?;

    log::info!(
        "Finished: score {:.4}, {} cols, {} rows, {:.2}s, optimal: {}",
        stats.score,
        stats.cols,
        stats.rows,
        stats.time.as_secs_f64(),
        stats.optimal
    );

    if config.ilp.no_solve {
        return Ok(());
    }

    check::run(&gg, &cg, &drawing, &stats, None)
        .map_err(|e| anyhow::anyhow!("Verification failed: {}", e))?;

    log::info!("Writing drawing to {}", config.input.output_drawing);
    io::write_drawing(&config.input.output_drawing, &cg, &gg, &drawing, &stats, &names)?;

    log::info!("Writing rendering to {}", config.input.output_png);
    viz::draw_drawing(&gg, &cg, &drawing, &config.input.output_png, 1200);

    Ok(())
}
