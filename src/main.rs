use flexi_logger::Logger;

fn main() {
    let _logger = match Logger::try_with_env_or_str("info").and_then(|l| l.log_to_stderr().start()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Failed to start logger: {e}");
            None
        }
    };

    if let Err(e) = screenpack::run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
