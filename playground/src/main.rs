use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

mod commands;
mod output;

use commands::{PickerOptions, grid, navigate};

#[derive(Parser)]
#[command(name = "playground")]
#[command(version, about = "Inspector for meridian components", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cell grid and geometry of one month
    Grid {
        /// Year of the month to lay out
        #[arg(long)]
        year: i32,
        /// Month to lay out; values outside 1-12 roll into neighbouring years
        #[arg(long, allow_hyphen_values = true)]
        month: i32,
        #[command(flatten)]
        picker: PickerArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Replay navigation actions against a headless calendar picker
    Navigate {
        /// Initial month as YYYY-MM
        #[arg(long)]
        start: String,
        /// Date used by the `today` action, as YYYY-MM-DD (defaults to the local date)
        #[arg(long)]
        today: Option<String>,
        /// How many months before the start can be reached
        #[arg(long = "previous-months")]
        previous_months: Option<u32>,
        /// How many months after the start can be reached
        #[arg(long = "additional-months")]
        additional_months: Option<u32>,
        /// Apply navigation without animation
        #[arg(long)]
        instant: bool,
        #[command(flatten)]
        picker: PickerArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Actions: next, prev, today, drag-next, drag-prev or a YYYY-MM month
        #[arg(required = true)]
        actions: Vec<String>,
    },
}

#[derive(Args)]
struct PickerArgs {
    /// Viewport width in points
    #[arg(long, default_value_t = 320.0)]
    width: f32,
    /// Row reservation policy
    #[arg(long = "height-mode", value_enum, default_value_t = HeightMode::Fixed)]
    height_mode: HeightMode,
    /// Weekday shown in the first column
    #[arg(long = "first-weekday", value_enum, default_value_t = FirstWeekday::Sunday)]
    first_weekday: FirstWeekday,
    /// Height of the month header in points
    #[arg(long = "header-height")]
    header_height: Option<f32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum HeightMode {
    Fixed,
    Dynamic,
}

#[derive(Clone, Copy, ValueEnum)]
enum FirstWeekday {
    Sunday,
    Monday,
    Saturday,
}

impl From<PickerArgs> for PickerOptions {
    fn from(args: PickerArgs) -> Self {
        PickerOptions {
            width: args.width,
            dynamic_height: matches!(args.height_mode, HeightMode::Dynamic),
            first_weekday: match args.first_weekday {
                FirstWeekday::Sunday => chrono::Weekday::Sun,
                FirstWeekday::Monday => chrono::Weekday::Mon,
                FirstWeekday::Saturday => chrono::Weekday::Sat,
            },
            header_height: args.header_height,
        }
    }
}

fn main() -> Result<()> {
    let Cli { verbose, command } = Cli::parse();
    meridian_ui::logging::init_tracing(if verbose { "debug" } else { "warn" });

    match command {
        Commands::Grid {
            year,
            month,
            picker,
            json,
        } => {
            grid::execute(grid::GridOptions {
                year,
                month,
                picker: picker.into(),
                json,
            })?;
        }
        Commands::Navigate {
            start,
            today,
            previous_months,
            additional_months,
            instant,
            picker,
            json,
            actions,
        } => {
            navigate::execute(navigate::NavigateOptions {
                start,
                today,
                previous_months,
                additional_months,
                animated: !instant,
                picker: picker.into(),
                json,
                actions,
            })?;
        }
    }

    Ok(())
}
