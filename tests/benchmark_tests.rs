//! Performance benchmarks for the codec and the broadcast fan-out

use server::registry::{ConnectionHandle, ConnectionRegistry};
use shared::{decode, encode};
use std::net::SocketAddr;
use std::time::Instant;

/// Benchmarks encoding and decoding a typical chat line
#[test]
fn benchmark_codec() {
    let line = "Bob: the quick brown fox jumps over the lazy dog 0123456789";

    let iterations = 100_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let encoded = encode(line);
        let _ = decode(&encoded);
    }

    let duration = start.elapsed();
    println!(
        "Codec round trip: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    // Should complete in under 2 seconds even in debug builds
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks broadcasting to a large number of connections
#[tokio::test]
async fn benchmark_broadcast_fan_out() {
    let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
    let registry = ConnectionRegistry::new();
    let mut receivers = Vec::new();

    for _ in 0..1000 {
        let (handle, receiver) = ConnectionHandle::channel(registry.next_id(), addr);
        registry.register(handle).await;
        receivers.push(receiver);
    }

    let line = encode("Administrator: maintenance soon");
    let iterations = 100;
    let start = Instant::now();

    for _ in 0..iterations {
        let delivered = registry.broadcast(&line, None).await;
        assert_eq!(delivered, 1000);
    }

    let duration = start.elapsed();
    println!(
        "Broadcast to 1000 connections: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 2 seconds
    assert!(duration.as_millis() < 2000);

    for receiver in &mut receivers {
        let mut count = 0;
        while receiver.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, iterations);
    }
}

/// Benchmarks registry churn
#[tokio::test]
async fn benchmark_register_deregister() {
    let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
    let registry = ConnectionRegistry::new();

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let (handle, _receiver) = ConnectionHandle::channel(registry.next_id(), addr);
        let id = handle.id();
        registry.register(handle).await;
        registry.deregister(id).await;
    }

    let duration = start.elapsed();
    println!(
        "Register/deregister: {} iterations in {:?} ({:.2} μs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(registry.is_empty().await);
    assert!(duration.as_millis() < 2000);
}
