#[tokio::main]
async fn main() {
  // Minimal CLI: support --version/-V
  let mut args = std::env::args().skip(1);
  if let Some(arg) = args.next() {
    if arg == "--version" || arg == "-V" {
      println!("dtrkiosk {}", env!("CARGO_PKG_VERSION"));
      return;
    }
    if arg == "--help" || arg == "-h" {
      eprintln!("Usage: dtrkiosk [--version]");
      eprintln!();
      eprintln!("Environment:");
      eprintln!("  DTRKIOSK_ADDR                   listen address (127.0.0.1:3000)");
      eprintln!("  DTRKIOSK_UPSTREAM_URL           attendance relay endpoint");
      eprintln!("  DTRKIOSK_UPSTREAM_INSECURE      accept invalid upstream certificates (false)");
      eprintln!("  DTRKIOSK_UPSTREAM_TIMEOUT_SECS  relay timeout in seconds (30)");
      return;
    }
  }

  if let Err(e) = dtrkiosk::app::run().await {
    eprintln!("error: {e}");
    std::process::exit(1);
  }
}
