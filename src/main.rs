// QuadVM: quadruple virtual machine with a time-travel stepper

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser as CliParser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use quadvm::interpreter::constants::DEFAULT_HISTORY_LIMIT;
use quadvm::interpreter::engine::{Vm, VmConfig};
use quadvm::memory::store::ConstantTable;
use quadvm::parser::constants::parse_constants;
use quadvm::parser::parser::Parser;
use quadvm::ui::App;

#[derive(CliParser, Debug)]
#[command(name = "quadvm")]
#[command(about = "Run a quadruple program, then step through its execution history")]
struct Cli {
    /// Quadruple program, one instruction per line
    program: PathBuf,

    /// Constant table (`<type> <address> <literal>` per line)
    #[arg(short, long)]
    constants: Option<PathBuf>,

    /// Print the output and exit instead of opening the stepper
    #[arg(long)]
    headless: bool,

    /// Snapshot history budget in bytes
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_limit: usize,

    /// Abort after this many executed instructions
    #[arg(long)]
    max_steps: Option<usize>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quadvm=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.program)?;
    let constants = match &cli.constants {
        Some(path) => parse_constants(&fs::read_to_string(path)?)?,
        None => ConstantTable::default(),
    };

    info!("Decoding {}...", cli.program.display());
    let program = match Parser::new(&source).parse_program() {
        Ok(program) => program,
        Err(e) => {
            error!("Decode error: {}", e);
            std::process::exit(1);
        }
    };
    info!("Decoded {} instructions.", program.len());

    let config = VmConfig {
        history_limit: (!cli.headless).then_some(cli.history_limit),
        max_steps: cli.max_steps,
    };
    let mut vm = Vm::with_config(config);

    if cli.headless {
        match vm.run(program, constants) {
            Ok(output) => {
                let mut stdout = io::stdout().lock();
                for fragment in output {
                    stdout.write_all(fragment.as_bytes())?;
                }
                stdout.flush()?;
                return Ok(());
            }
            Err(e) => {
                eprintln!("Runtime error: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Run execution to build history
    info!("Executing program...");
    match vm.run(program, constants) {
        Ok(_) => {
            info!("Execution completed successfully.");
            info!("Total snapshots: {}", vm.total_snapshots());
        }
        Err(e) => {
            error!("Runtime error: {}", e);
            info!("Entering stepper with partial execution history...");
        }
    }

    // Rewind to the beginning for TUI
    if let Err(e) = vm.rewind_to_start() {
        error!("Failed to rewind to start: {}", e);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(vm);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
