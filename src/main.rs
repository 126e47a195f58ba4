//! forgefs binary entry point.

fn main() {
    if let Err(err) = forgefs::cli::run() {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
