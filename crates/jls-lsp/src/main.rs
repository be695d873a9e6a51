//! Binary entry point: wires stdio to an `lsp-server` [`Connection`] and
//! hands off to [`jls_lsp::run`]. Logging goes to stderr — stdout is the
//! LSP wire and must stay clean.

use lsp_server::Connection;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let (connection, io_threads) = Connection::stdio();
    let result = jls_lsp::run(connection);
    io_threads.join()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "server exited with an error");
    }
    result
}
