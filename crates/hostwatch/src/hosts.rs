//! Host list sources: a file of one host per line, or interactive entry.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Reads newline-separated hosts, trimming whitespace and skipping blank
/// lines.
pub fn read_hosts_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read hosts file {}", path.as_ref().display()))?;
    Ok(parse_host_lines(&content))
}

fn parse_host_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Prompts for hosts on stdin until an empty line (or end of input).
pub fn read_hosts_from_console() -> Result<Vec<String>> {
    let stdin = io::stdin();
    let mut hosts = Vec::new();
    loop {
        print!("Enter a host (leave empty to finish): ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        let host = line.trim();
        if read == 0 || host.is_empty() {
            break;
        }
        hosts.push(host.to_owned());
    }
    Ok(hosts)
}
