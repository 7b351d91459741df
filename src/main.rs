use clap::{Parser, Subcommand};
use socials::config::{self, ProjectLayout};
use socials::raster::RasterizerKind;
use socials::{gallery, output, publish, render};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "socials")]
#[command(about = "Generates meetup posters and a gallery page")]
#[command(long_about = "\
Generates meetup posters and a gallery page

Reads posters.toml, renders one SVG per meetup instance from the series
template, rasterizes it to PNG and writes a gallery page listing them all.

Project structure:

  ./
  ├── posters.toml                 # Series templates and instances
  ├── templates/                   # SVG templates → copied to build/templates/
  └── build/
      ├── 2024/digital-meetup/     # digital-meetup-2024-05-01-18:00.png
      ├── index.html               # Gallery, newest first
      └── posters.json             # posters.toml as JSON

Template tags: {{year}}, {{date}}, {{time}}

Running with no subcommand is the same as 'socials build'.")]
#[command(version)]
struct Cli {
    /// Project root; all other paths are relative to it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Posters config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Templates directory (published into the output)
    #[arg(long, default_value = config::TEMPLATES_DIR, global = true)]
    templates: PathBuf,

    /// Output directory
    #[arg(long, default_value = config::BUILD_DIR, global = true)]
    output: PathBuf,

    /// External tool used to turn SVG into PNG
    #[arg(long, value_enum, default_value_t = RasterizerKind::Rsvg, global = true)]
    rasterizer: RasterizerKind,

    /// Path to the rasterizer binary (defaults to looking it up on PATH)
    #[arg(long, global = true)]
    rasterizer_bin: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Render every poster, write the gallery and publish templates
    Build,
    /// Validate the config and templates without rendering anything
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let layout = project_layout(&cli);
    info!(root = %layout.root.display(), "project layout resolved");

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            println!("Generating socials content...");
            let posters = config::load_config(&layout.config_file)?;
            let rasterizer = cli.rasterizer.build(cli.rasterizer_bin.clone());
            println!(
                "==> Rendering {} posters with {}",
                posters.instance_count(),
                rasterizer.name()
            );

            let (tx, rx) = std::sync::mpsc::channel();
            let root = layout.root.clone();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_render_event(&event, &root) {
                        println!("{}", line);
                    }
                }
            });
            let result = render::render_posters(&layout, &posters, rasterizer.as_ref(), Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer panicked")?;
            let assets = result?;

            println!("==> Writing gallery");
            gallery::write_gallery(&layout.build_dir, &assets, &posters)?;
            let published =
                publish::publish_templates(&layout.templates_dir, &layout.published_templates_dir())?;

            output::print_build_summary(&assets, published, &layout.build_dir, &layout.root);
            println!("Generated socials content");
        }
        Command::Check => {
            println!("==> Checking {}", layout.config_file.display());
            let posters = config::load_config(&layout.config_file)?;
            let planned = render::plan_posters(&layout, &posters)?;
            output::print_check_output(&planned, &layout.root);
            println!("==> Config is valid");
        }
    }

    Ok(())
}

/// Resolve CLI paths against the project root.
fn project_layout(cli: &Cli) -> ProjectLayout {
    let mut layout = ProjectLayout::new(&cli.root);
    layout.config_file = layout.resolve(&cli.config);
    layout.templates_dir = layout.resolve(&cli.templates);
    layout.build_dir = layout.resolve(&cli.output);
    layout
}

/// Diagnostics go to stderr so stdout stays the progress report.
/// `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let default = if verbose { "socials=debug" } else { "socials=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
