#![forbid(unsafe_code)]

fn main() {
    std::process::exit(explorer_demo_cli::run());
}
