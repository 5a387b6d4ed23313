fn main() {
    if let Err(err) = csv_lens::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
