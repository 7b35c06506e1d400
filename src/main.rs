//! jjb - structured operations over the Jujutsu CLI.

fn main() {
    if let Err(e) = jj_bridge::cli::run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
