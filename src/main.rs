fn main() {
    if let Err(err) = spark::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
