use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use tokio::net::TcpListener;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut bind_addr: SocketAddr = "127.0.0.1:5000".parse()?;
    let mut behavior = apiload_testserver::Behavior::default();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bind" => {
                let addr = args.next().ok_or_else(|| {
                    anyhow::anyhow!("--bind requires an address, e.g. 127.0.0.1:5000")
                })?;
                bind_addr = addr.parse()?;
            }
            "--latency-ms" => {
                let ms = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--latency-ms requires a number"))?;
                behavior.latency = Duration::from_millis(ms.parse()?);
            }
            "--fail-status" => {
                let code = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--fail-status requires a status code"))?;
                behavior.fail_status = Some(StatusCode::from_u16(code.parse()?)?);
            }
            "-h" | "--help" => {
                eprintln!(
                    "apiload-testserver\n\nUSAGE:\n  apiload-testserver [--bind 127.0.0.1:5000] [--latency-ms N] [--fail-status CODE]\n\nOUTPUT:\n  Prints HTTP_URL=<url> to stdout once ready."
                );
                return Ok(());
            }
            other => {
                return Err(anyhow::anyhow!("unknown argument: {other}"));
            }
        }
    }

    let listener = TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    let stats = apiload_testserver::TestServerStats::default();
    let app = apiload_testserver::router(stats, behavior);

    println!("HTTP_URL=http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
