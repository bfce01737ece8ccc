fn main() {
    if let Err(e) = sales_lens::cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
