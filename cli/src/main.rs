use clap::Parser;
use command_shell_cli::build_demo_shell;
use command_shell_engine::smart_split;

/// Interactive demo shell over an in-memory key/value store.
#[derive(Debug, Parser)]
#[command(name = "metash")]
#[command(about = "Interactive demo shell over an in-memory key/value store")]
struct Cli {
    /// Run a single command line and exit (e.g. -c "kv set a 1").
    #[arg(short = 'c', long)]
    command: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let (mut shell, _store) = match build_demo_shell() {
        Ok(built) => built,
        Err(err) => {
            eprintln!("invalid shell configuration: {err}");
            std::process::exit(2);
        }
    };

    match cli.command {
        Some(line) => {
            let (tokens, incomplete) = smart_split(&line);
            if incomplete {
                eprintln!("unterminated quote in command: {line}");
                std::process::exit(2);
            }
            shell.run_once(&tokens);
        }
        None => shell.run(&[]),
    }
}
