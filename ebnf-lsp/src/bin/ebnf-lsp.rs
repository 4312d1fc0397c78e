use ebnf_lsp::build_service;
use tokio::io::{stdin, stdout};
use tower_lsp::Server;

#[tokio::main]
async fn main() {
    // stdout carries the protocol
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let (service, socket) = build_service();
    Server::new(stdin(), stdout(), socket).serve(service).await;
}
