use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tmachine::{
    analyze, unreachable_states, MachineDefinition, Mode, ProgramLoader, ProgramManager,
    TuringMachine, TuringMachineError,
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The machine definition file (JSON) to execute
    #[clap(short, long, conflicts_with = "builtin")]
    program: Option<String>,

    /// Run one of the embedded machines by name
    #[clap(short, long)]
    builtin: Option<String>,

    /// The input tape. Defaults to the definition's sample input
    #[clap(short, long)]
    input: Option<String>,

    /// Stop after this many steps (0 means no limit)
    #[clap(short, long)]
    steps: Option<usize>,

    /// Treat missing transitions and undefined states as errors
    #[clap(long)]
    strict: bool,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print the execution history as JSON
    #[clap(long)]
    history: bool,

    /// Analyze the definition without running it
    #[clap(long)]
    check: bool,

    /// List the embedded machines
    #[clap(short, long)]
    list: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match execute(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<ExitCode, TuringMachineError> {
    if cli.list {
        for name in ProgramManager::list_program_names() {
            println!("{}", name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut definition = load_definition(cli)?;
    if cli.strict {
        definition = definition.with_mode(Mode::Strict);
    }

    if cli.check {
        analyze(&definition)?;
        let unreachable = unreachable_states(&definition);
        if !unreachable.is_empty() {
            println!("Unreachable states: {}", unreachable.join(", "));
        }
        println!("OK");
        return Ok(ExitCode::SUCCESS);
    }

    let input = cli
        .input
        .clone()
        .or_else(|| definition.input.clone())
        .unwrap_or_default();
    let mut machine = TuringMachine::new(&definition, &input);

    if cli.debug {
        let print_state = |machine: &TuringMachine| {
            println!(
                "Step: {}, State: {}, Tape: [{}], Head: {}",
                machine.step_count(),
                machine.state(),
                machine.tape(),
                machine.position()
            );
        };

        print_state(&machine);
        machine.run_with_observer(cli.steps, print_state)?;
        println!("\nFinal tape:");
    } else {
        machine.run(cli.steps)?;
    }

    let outcome = machine.finish();

    if cli.history {
        let json = serde_json::to_string_pretty(&outcome.history)
            .map_err(|e| TuringMachineError::FileError(e.to_string()))?;
        println!("{}", json);
    }

    println!("{}", outcome.tape);
    log::info!("halted: {}, steps: {}", outcome.halted, outcome.history.len());

    Ok(if outcome.halted {
        ExitCode::SUCCESS
    } else {
        eprintln!("Machine did not halt within {:?} steps", cli.steps);
        ExitCode::from(2)
    })
}

fn load_definition(cli: &Cli) -> Result<MachineDefinition, TuringMachineError> {
    match (&cli.program, &cli.builtin) {
        (Some(path), _) => ProgramLoader::load_program(Path::new(path)),
        (None, Some(name)) => ProgramManager::get_program_by_name(name),
        (None, None) => Err(TuringMachineError::ValidationError(
            "Either --program or --builtin is required".to_string(),
        )),
    }
}
