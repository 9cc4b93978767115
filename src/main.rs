use v5_logger::prelude::*;

#[tokio::main]
async fn main() {
    let options = Options::new();

    if let Err(e) = v5_logger::app(options).await {
        eprintln!("Error while sending request: {:#}", e);
        std::process::exit(1);
    }
}
