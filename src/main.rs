use sirsim::runner::run_with_args;

fn main() {
    match run_with_args() {
        Ok(output) => print!("{}", output.summary()),
        Err(error) => {
            eprintln!("Simulation failed: {error}");
            std::process::exit(1);
        }
    }
}
