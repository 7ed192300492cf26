pub mod cli;
pub mod config;
pub mod hooks;

use std::io::Read;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Hooks consume their payload from stdin; other commands ignore it
    let stdin_json = if args.get(1).map(String::as_str) == Some("hook") {
        let mut buf = String::new();
        let _ = std::io::stdin().read_to_string(&mut buf);
        buf
    } else {
        String::new()
    };

    match cli::run_cli(&args, &stdin_json) {
        Ok((output, exit_code)) => {
            print!("{}", output);
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
