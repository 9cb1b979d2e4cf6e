use std::time::Duration;

use tracing::info;

use crate::probe::Prober;

/// Runs the monitoring loop until the process is killed.
///
/// Hosts are probed strictly in list order, one at a time; a host's
/// status line is printed before the next host's probe starts. Status
/// lines go to stdout, diagnostics to the log.
pub async fn run(hosts: &[String], prober: &Prober, sleep_time: Duration, timeout: Duration) {
    info!(
        hosts = hosts.len(),
        interval = ?sleep_time,
        "Starting monitor loop"
    );

    loop {
        for host in hosts {
            let online = prober.probe(host, timeout).await;
            println!("{}", status_line(host, online));
        }
        tokio::time::sleep(sleep_time).await;
    }
}

fn status_line(host: &str, online: bool) -> String {
    format!("{host} is {}", if online { "online" } else { "offline" })
}
