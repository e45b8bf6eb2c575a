use abigen_tracing::{init_tracing_subscriber, println_error};
use clap::Parser;

fn main() {
    let command = abigen::cmd::Command::parse();
    init_tracing_subscriber(command.tracing_options());
    match abigen::op::run(command) {
        Ok(report) if report.is_success() => {}
        Ok(report) => {
            for failure in &report.failures {
                println_error(&failure.to_string());
            }
            std::process::exit(1);
        }
        Err(err) => {
            println_error(&format!("{err:#}"));
            std::process::exit(1);
        }
    }
}
