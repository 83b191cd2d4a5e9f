mod common;

use common::*;
use fixed_pool::*;
use std::thread;

#[test]
fn test_lease_returns_on_drop() {
    let pool = Pool::new(1, ByteBufferFactory::default());
    let id = {
        let mut lease = pool.lease().unwrap();
        lease.buffer.extend_from_slice(b"scratch");
        assert_eq!(pool.in_use(), 1);
        assert!(pool.lease().unwrap_err().is_exhausted());
        lease.id()
    };

    assert_eq!(pool.in_use(), 0);
    assert_eq!(pool.idle(), 1);

    let lease = pool.lease().unwrap();
    assert_eq!(lease.id(), id);
    assert!(lease.buffer.is_empty());
}

#[test]
fn test_lease_into_pooled() {
    let pool = Pool::new(1, ByteBufferFactory::default());
    let obj = pool.lease().unwrap().into_pooled();
    assert_eq!(pool.in_use(), 1);
    assert_eq!(pool.idle(), 0);

    pool.put(obj).unwrap();
    assert_eq!(pool.idle(), 1);
}

#[test]
fn test_lease_into_inner() {
    let pool = Pool::new(1, ByteBufferFactory::default());
    let buffer = pool.lease().unwrap().into_inner();
    assert_eq!(buffer.buffer.capacity(), BUFFER_SIZE);
    assert!(pool.is_exhausted());
}

#[test]
fn test_lease_rc() {
    let pool = Pool::new(2, ByteBufferFactory::default()).to_rc();
    let lease = pool.clone().lease_rc().unwrap();
    assert_eq!(lease.buffer.capacity(), BUFFER_SIZE);
    assert_eq!(pool.in_use(), 1);
    drop(lease);
    assert_eq!(pool.in_use(), 0);
    assert_eq!(pool.idle(), 1);
}

#[test]
fn test_lease_rc_moves_across_threads() {
    let pool = Pool::new(2, ByteBufferFactory::default()).to_rc();
    let mut lease = pool.clone().lease_rc().unwrap();
    lease.buffer.extend_from_slice(b"from main");

    let handle = thread::spawn(move || {
        assert_eq!(lease.buffer, b"from main");
        assert_eq!(lease.pool().in_use(), 1);
    });
    handle.join().unwrap();

    assert_eq!(pool.in_use(), 0);
    assert_eq!(pool.idle(), 1);
}

#[test]
fn test_lease_rc_keeps_pool_alive() {
    let pool = Pool::new(1, ByteBufferFactory::default()).to_rc();
    let lease = pool.clone().lease_rc().unwrap();
    drop(pool);
    let pool = lease.pool().clone();
    drop(lease);
    assert_eq!(pool.idle(), 1);
}
