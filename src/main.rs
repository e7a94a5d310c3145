fn main() {
    if let Err(err) = mindflow_layout::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
