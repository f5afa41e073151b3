use tabclose::cli;

fn main() {
    match cli::process_cli() {
        cli::CliResult::Exit(0) => {}
        // Non-zero exit: use process::exit so the shell sees the correct exit code
        cli::CliResult::Exit(code) => std::process::exit(code),
    }
}
