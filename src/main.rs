use sward::Meadow;

fn main() {
    if let Err(e) = Meadow::new().with_title("sward - grass meadow").run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
