#![allow(dead_code)]

use fixed_pool::{Factory, Poolable};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const BUFFER_SIZE: usize = 1024;

/// Buffer-backed pooled object.
#[derive(Debug)]
pub struct ByteBuffer {
    pub buffer: Vec<u8>,
    pub resets: usize,
}

impl Poolable for ByteBuffer {
    fn reset(&mut self) {
        self.buffer.clear();
        self.resets += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("out of memory")]
pub struct OutOfMemory;

/// Creates buffers and counts how many it made.
#[derive(Debug, Default)]
pub struct ByteBufferFactory {
    pub created: AtomicUsize,
}

impl ByteBufferFactory {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl Factory for ByteBufferFactory {
    type Object = ByteBuffer;
    type Error = OutOfMemory;

    fn create(&self) -> Result<ByteBuffer, OutOfMemory> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(ByteBuffer {
            buffer: Vec::with_capacity(BUFFER_SIZE),
            resets: 0,
        })
    }
}

/// Succeeds `budget` times, then fails.
#[derive(Debug)]
pub struct LimitedFactory {
    pub budget: AtomicUsize,
}

impl LimitedFactory {
    pub fn new(budget: usize) -> Self {
        LimitedFactory {
            budget: AtomicUsize::new(budget),
        }
    }
}

impl Factory for LimitedFactory {
    type Object = ByteBuffer;
    type Error = OutOfMemory;

    fn create(&self) -> Result<ByteBuffer, OutOfMemory> {
        self.budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .map_err(|_| OutOfMemory)?;
        Ok(ByteBuffer {
            buffer: Vec::with_capacity(BUFFER_SIZE),
            resets: 0,
        })
    }
}
