use clap::Parser;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tapeforge::{
    Graph, ProgramLoader, ProgramManager, Step, TapeArity, TuringMachine, TuringMachineError,
};
use tracing::{debug, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Compile a Turing machine program and step it until it accepts or rejects.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  tapeforge --program programs/even-zeros.tm --input 100100
  tapeforge --builtin 'Fast binary palindrome' --input 10101 --debug
  cat programs/divisible-by-3.tm | tapeforge --input 110")]
struct Cli {
    /// The program file to execute. Read from stdin when omitted and input is piped.
    #[clap(short, long)]
    program: Option<String>,

    /// Run a bundled program by name instead of a file.
    #[clap(short, long, conflicts_with = "program")]
    builtin: Option<String>,

    /// List the bundled programs and exit.
    #[clap(long)]
    list: bool,

    /// Number of tapes the program is written for.
    #[clap(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    tapes: u8,

    /// Initial content of each tape, in tape order. `_` is the blank symbol.
    #[clap(short, long)]
    input: Vec<String>,

    /// Print every step of the execution.
    #[clap(short = 'd', long)]
    debug: bool,

    /// Stop playback after this many steps without a verdict.
    #[clap(long, default_value_t = 10_000)]
    max_steps: usize,

    /// Print the final machine snapshot as JSON.
    #[clap(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if cli.list {
        for (index, name) in ProgramManager::list_program_names().iter().enumerate() {
            println!("{index}: {name}");
        }
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(Some(step)) if step.is_accepted() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug {
            "warn,tapeforge=debug"
        } else {
            "warn"
        })
    });

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Returns the final outcome, or `None` when the step limit ran out first.
fn run(cli: &Cli) -> Result<Option<Step>, TuringMachineError> {
    let (graph, arity) = load_program(cli)?;
    let mut machine = TuringMachine::new(Arc::new(graph), arity);
    machine.set_tapes_content(&cli.input)?;

    if cli.debug {
        print_state(&machine);
    }

    let mut outcome = None;
    while machine.step_count() < cli.max_steps {
        let step = machine.step();
        if cli.debug {
            print_state(&machine);
        }
        if step.is_halted() {
            outcome = Some(step);
            break;
        }
    }

    match outcome {
        Some(step) => println!("Machine {step} in state {}.", machine.state()),
        None => warn!(max_steps = cli.max_steps, "step limit reached without a verdict"),
    }

    if cli.json {
        let snapshot = serde_json::to_string_pretty(&machine.snapshot())
            .map_err(|e| TuringMachineError::ValidationError(e.to_string()))?;
        println!("{snapshot}");
    } else {
        for line in render_tapes(&machine) {
            println!("{line}");
        }
    }

    Ok(outcome)
}

fn load_program(cli: &Cli) -> Result<(Graph, TapeArity), TuringMachineError> {
    if let Some(name) = &cli.builtin {
        let program = ProgramManager::get_program_by_name(name)?;
        debug!(name = %program.name, arity = %program.arity, "using bundled program");
        return Ok((program.graph, program.arity));
    }

    let arity = TapeArity::try_from(usize::from(cli.tapes))?;
    let graph = match &cli.program {
        Some(path) => ProgramLoader::load_program(Path::new(path), arity)?,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(|e| TuringMachineError::FileError(format!("Failed to read stdin: {e}")))?;
            ProgramLoader::load_program_from_string(&content, arity)?
        }
        None => {
            return Err(TuringMachineError::ValidationError(
                "No program given: pass --program, --builtin or pipe a program on stdin"
                    .to_string(),
            ))
        }
    };

    Ok((graph, arity))
}

fn print_state(machine: &TuringMachine) {
    println!(
        "Step: {}, State: {}, Heads: {:?}, Symbols: {:?}",
        machine.step_count(),
        machine.state(),
        machine.heads(),
        machine.symbols()
    );
}

/// Renders each tape over its written cells, widened to include the head.
fn render_tapes(machine: &TuringMachine) -> Vec<String> {
    machine
        .tapes()
        .iter()
        .zip(machine.heads())
        .map(|(tape, &head)| {
            let (from, to) = tape
                .bounds()
                .map_or((head, head), |(lo, hi)| (lo.min(head), hi.max(head)));
            let width = usize::try_from(head - from).unwrap_or(0);
            format!("{}\n{}^", tape.render(from, to), " ".repeat(width))
        })
        .collect()
}
