fn main() {
    if let Err(err) = archflow::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
