fn main() {
    if let Err(err) = carelog::run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
