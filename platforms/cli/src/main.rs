use automata_compiler::{
    run_counted, AutomatonError, AutomatonKind, ProgramLoader, ProgramManager, RunOptions, Stage,
};
use clap::Parser;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

/// Compiles and runs finite automata, pushdown automata and Turing Machines.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(after_help = "EXAMPLES:
  automata-cli dfa programs/even-ones.dfa
  automata-cli tm programs/binary-increment.tm -i -o out/increment.txt
  cat programs/balanced.pa | automata-cli pa
  automata-cli --example oscillator -t 100")]
struct Cli {
    /// The automaton type: dfa, pa (or pda) or tm.
    #[clap(required_unless_present_any = ["example", "list"])]
    kind: Option<AutomatonKind>,

    /// Path to the program source. Can also pipe program content via stdin.
    program: Option<PathBuf>,

    /// Timeout in milliseconds, 0 disables it.
    #[clap(short, long, default_value_t = 3000)]
    timeout: u64,

    /// Write the result (and calculations) to this file instead of stdout.
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Print the automaton configuration before every move.
    #[clap(short, long = "include-calculations")]
    include_calculations: bool,

    /// Print the result as JSON.
    #[clap(long)]
    json: bool,

    /// Run one of the built-in sample programs.
    #[clap(short, long, conflicts_with = "program")]
    example: Option<String>,

    /// List the built-in sample programs.
    #[clap(long)]
    list: bool,
}

fn main() {
    let _ = env_logger::try_init();
    let cli = Cli::parse();

    if cli.list {
        for (index, name) in ProgramManager::list_program_names().iter().enumerate() {
            if let Ok(program) = ProgramManager::get_program_by_index(index) {
                println!("{index}. {name} ({})", program.kind);
            }
        }
        return;
    }

    if let Err(e) = execute(&cli) {
        eprintln!("error during {} stage: {}", e.stage(), e);
        process::exit(exit_code(&e));
    }
}

fn execute(cli: &Cli) -> Result<(), AutomatonError> {
    let (kind, source) = load_source(cli)?;
    let automaton = ProgramLoader::load_program_from_string(&source, kind)?;

    let mut sink = open_output(cli.output.as_deref())?;
    let options = RunOptions::new()
        .with_output(sink.as_mut())
        .with_trace(cli.include_calculations)
        .with_timeout(Duration::from_millis(cli.timeout));

    let execution = run_counted(automaton, options)?;
    log::info!("{kind} finished after {} moves", execution.steps);

    let rendered = if cli.json {
        serde_json::to_string_pretty(&execution.outcome)
            .map(|json| json + "\n")
            .map_err(|e| AutomatonError::Output(e.to_string()))?
    } else {
        execution.outcome.to_string()
    };

    sink.write_all(rendered.as_bytes())
        .and_then(|_| sink.flush())
        .map_err(|e| AutomatonError::Output(e.to_string()))
}

/// Resolves the automaton kind and the program text.
///
/// It tries the built-in example first, then the file path, and finally falls back to stdin.
fn load_source(cli: &Cli) -> Result<(AutomatonKind, String), AutomatonError> {
    if let Some(name) = &cli.example {
        let program = ProgramManager::get_program_by_name(name)?;
        if let Some(kind) = cli.kind.filter(|kind| *kind != program.kind) {
            return Err(AutomatonError::Config(format!(
                "program '{}' is a {}, not a {}",
                program.name, program.kind, kind
            )));
        }
        return Ok((program.kind, program.source.to_string()));
    }

    let kind = cli
        .kind
        .ok_or_else(|| AutomatonError::Config("missing automaton type".to_string()))?;

    if let Some(path) = &cli.program {
        ProgramLoader::load_source(path).map(|source| (kind, source))
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| AutomatonError::FileError(format!("Failed to read from stdin: {}", e)))?;
        Ok((kind, buffer))
    } else {
        Err(AutomatonError::Config(
            "no program given, pass a path or pipe the source via stdin".to_string(),
        ))
    }
}

/// Opens the output file, creating missing parent directories, or falls back to stdout.
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, AutomatonError> {
    let Some(path) = path else {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AutomatonError::FileError(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let file = File::create(path).map_err(|e| {
        AutomatonError::FileError(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(Box::new(BufWriter::new(file)))
}

fn exit_code(error: &AutomatonError) -> i32 {
    match error.stage() {
        Stage::Lexing | Stage::Compiling => 1,
        Stage::Running => 2,
        Stage::Io => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::parse_from(["automata-cli", "pda", "balanced.pa", "-t", "0", "-i"]);

        assert_eq!(cli.kind, Some(AutomatonKind::Pda));
        assert_eq!(cli.program, Some(PathBuf::from("balanced.pa")));
        assert_eq!(cli.timeout, 0);
        assert!(cli.include_calculations);
        assert!(!cli.json);
    }

    #[test]
    fn test_default_timeout() {
        let cli = Cli::parse_from(["automata-cli", "tm", "machine.tm"]);
        assert_eq!(cli.timeout, 3000);
    }

    #[test]
    fn test_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["automata-cli", "nfa", "x.nfa"]).is_err());
    }

    #[test]
    fn test_example_kind_mismatch() {
        let cli = Cli::parse_from(["automata-cli", "dfa", "--example", "oscillator"]);
        assert!(matches!(load_source(&cli), Err(AutomatonError::Config(_))));

        let cli = Cli::parse_from(["automata-cli", "--example", "oscillator"]);
        let (kind, source) = load_source(&cli).unwrap();
        assert_eq!(kind, AutomatonKind::Tm);
        assert!(!source.is_empty());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code(&AutomatonError::Lex {
                line: 1,
                character: '$'
            }),
            1
        );
        assert_eq!(exit_code(&AutomatonError::Structural(String::new())), 1);
        assert_eq!(exit_code(&AutomatonError::Timeout), 2);
        assert_eq!(exit_code(&AutomatonError::FileError(String::new())), 3);
    }

    #[test]
    fn test_output_file_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("result.txt");

        let mut sink = open_output(Some(&path)).unwrap();
        sink.write_all(b"final state: qA, accepted: true\n").unwrap();
        sink.flush().unwrap();
        drop(sink);

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "final state: qA, accepted: true\n"
        );
    }
}
