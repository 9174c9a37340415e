use spendora_core::cli::run_cli;

fn main() {
    spendora_core::init();
    if let Err(err) = run_cli() {
        eprintln!("spendora: {err}");
        std::process::exit(1);
    }
}
