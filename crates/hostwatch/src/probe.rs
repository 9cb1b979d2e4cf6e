//! ICMP echo probing over a raw socket.

use std::io;
use std::mem::MaybeUninit;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::{Duration, Instant};

use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use thiserror::Error;
use tracing::{info, warn};

use crate::packet::{EchoReply, EchoRequest};

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("cannot resolve host: {0}")]
    Resolution(String),
    #[error("cannot create raw ICMP socket (try running with elevated privileges): {0}")]
    SocketCreation(#[source] io::Error),
    #[error("failed to send echo request: {0}")]
    Send(#[source] io::Error),
    #[error("no reply within timeout")]
    Timeout,
    #[error("failed to receive reply: {0}")]
    Receive(#[source] io::Error),
}

/// Sends Echo Requests and waits for matching Echo Replies.
///
/// The identifier is captured once from the process id so replies to our
/// probes can be told apart from other ICMP traffic on the host. The
/// sequence number increments per probe; only one probe is ever in
/// flight, so it is not used for matching.
pub struct Prober {
    ident: u16,
    seq: AtomicU16,
}

impl Prober {
    pub fn new() -> Self {
        Self {
            ident: (std::process::id() & 0xffff) as u16,
            seq: AtomicU16::new(0),
        }
    }

    /// Probes `host` once with the given receive timeout.
    ///
    /// Ordinary network failures (unresolvable name, missing privilege,
    /// send error, timeout) all come back as unreachable; nothing here is
    /// fatal to the monitoring loop.
    pub async fn probe(&self, host: &str, timeout: Duration) -> bool {
        let request = EchoRequest {
            ident: self.ident,
            seq: self.seq.fetch_add(1, Ordering::Relaxed),
        };
        let target = host.to_owned();
        let result =
            tokio::task::spawn_blocking(move || probe_blocking(&target, request, timeout)).await;

        match result {
            Ok(Ok(())) => true,
            Ok(Err(err @ ProbeError::SocketCreation(_))) => {
                warn!(host, %err, "Probe failed");
                false
            }
            Ok(Err(err)) => {
                info!(host, %err, "Probe failed");
                false
            }
            Err(err) => {
                warn!(host, %err, "Probe task failed");
                false
            }
        }
    }
}

fn probe_blocking(host: &str, request: EchoRequest, timeout: Duration) -> Result<(), ProbeError> {
    let addr = resolve(host)?;

    // Resolution happens before the socket is opened; an unresolvable
    // name never touches the network. The socket lives for exactly this
    // call and is closed on every exit path when it drops.
    let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))
        .map_err(ProbeError::SocketCreation)?;

    let packet = request.encode();
    let dest = SockAddr::from(SocketAddr::new(IpAddr::V4(addr), 0));
    socket.send_to(&packet, &dest).map_err(ProbeError::Send)?;

    wait_for_reply(&socket, &request, timeout)
}

/// Resolves a hostname or address literal to its first IPv4 address.
fn resolve(host: &str) -> Result<Ipv4Addr, ProbeError> {
    (host, 0u16)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| {
            addrs.find_map(|addr| match addr.ip() {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            })
        })
        .ok_or_else(|| ProbeError::Resolution(host.to_owned()))
}

/// Receives until a reply carrying our identifier arrives or the
/// deadline lapses. Foreign or malformed datagrams are skipped, not
/// treated as the probe's outcome.
fn wait_for_reply(
    socket: &Socket,
    request: &EchoRequest,
    timeout: Duration,
) -> Result<(), ProbeError> {
    let deadline = Instant::now() + timeout;
    let mut buf = [MaybeUninit::<u8>::uninit(); 1024];

    loop {
        // set_read_timeout only has microsecond resolution; a shorter
        // remainder would truncate to a zero timeval, which the kernel
        // reads as "block forever".
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining < Duration::from_micros(1) {
            return Err(ProbeError::Timeout);
        }
        socket
            .set_read_timeout(Some(remaining))
            .map_err(ProbeError::Receive)?;

        let len = match socket.recv(&mut buf) {
            Ok(len) => len,
            Err(err)
                if matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) =>
            {
                return Err(ProbeError::Timeout);
            }
            Err(err) => return Err(ProbeError::Receive(err)),
        };

        // Safety: recv initialized the first `len` bytes.
        let datagram = unsafe { std::slice::from_raw_parts(buf.as_ptr().cast::<u8>(), len) };

        let Some(reply) = icmp_message(datagram).and_then(EchoReply::parse) else {
            continue;
        };
        if reply.answers(request) {
            return Ok(());
        }
    }
}

/// Raw ICMPv4 sockets deliver the full IP datagram; locate the ICMP
/// message behind the variable-length IP header.
fn icmp_message(datagram: &[u8]) -> Option<&[u8]> {
    let first = *datagram.first()?;
    if first >> 4 != 4 {
        return None;
    }
    let header_len = usize::from(first & 0x0f) * 4;
    if header_len < 20 || datagram.len() < header_len {
        return None;
    }
    Some(&datagram[header_len..])
}
