//! Device memory arena.
//!
//! Buffers are append-only and never freed during a launch, so a `BufferId`
//! stays valid for the lifetime of the `DeviceMemory` that issued it.

use std::fmt;

use warpc_core::Dtype;

use super::error::RuntimeError;
use super::value::{Lanes, Scalar};

/// Index of a buffer in [`DeviceMemory`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(u32);

impl BufferId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buf{}", self.0)
    }
}

/// Address base: a buffer and an element offset into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pointer {
    pub buffer: BufferId,
    pub offset: usize,
}

impl Pointer {
    pub fn new(buffer: BufferId) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Pointer `elements` further into the same buffer. Wraps on overflow;
    /// a wrapped pointer is rejected when dereferenced.
    pub fn add(self, elements: usize) -> Self {
        Self {
            buffer: self.buffer,
            offset: self.offset.wrapping_add(elements),
        }
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.buffer, self.offset)
    }
}

/// A typed, fixed-length buffer.
#[derive(Clone, Debug)]
pub struct Buffer {
    dtype: Dtype,
    data: Vec<Scalar>,
}

impl Buffer {
    pub fn dtype(&self) -> Dtype {
        self.dtype
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[Scalar] {
        &self.data
    }
}

#[derive(Clone, Debug, Default)]
pub struct DeviceMemory {
    buffers: Vec<Buffer>,
}

impl DeviceMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a zero-filled buffer.
    pub fn alloc(&mut self, dtype: Dtype, len: usize) -> BufferId {
        self.push(Buffer {
            dtype,
            data: vec![Scalar::zero(dtype); len],
        })
    }

    /// Allocate a buffer holding a copy of `values`.
    pub fn upload(&mut self, values: &Lanes) -> BufferId {
        self.push(Buffer {
            dtype: values.dtype(),
            data: values.values().to_vec(),
        })
    }

    /// Copy a buffer's contents out.
    pub fn download(&self, id: BufferId) -> Result<Lanes, RuntimeError> {
        let buf = self.buffer(id)?;
        Ok(Lanes::from_raw(buf.dtype, buf.data.clone()))
    }

    pub fn buffer(&self, id: BufferId) -> Result<&Buffer, RuntimeError> {
        self.buffers
            .get(id.index())
            .ok_or(RuntimeError::UnknownBuffer(id))
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Element index `ptr.offset + offset`, bounds-checked for `lane`.
    pub(crate) fn index(
        &self,
        ptr: Pointer,
        offset: usize,
        lane: usize,
    ) -> Result<usize, RuntimeError> {
        let buf = self.buffer(ptr.buffer)?;
        let len = buf.data.len();
        match ptr.offset.checked_add(offset) {
            Some(index) if index < len => Ok(index),
            index => Err(RuntimeError::OutOfBounds {
                lane,
                buffer: ptr.buffer,
                index: index.unwrap_or(usize::MAX),
                len,
            }),
        }
    }

    pub(crate) fn read(&self, buffer: BufferId, index: usize) -> Scalar {
        self.buffers[buffer.index()].data[index]
    }

    pub(crate) fn write(&mut self, buffer: BufferId, index: usize, value: Scalar) {
        self.buffers[buffer.index()].data[index] = value;
    }

    fn push(&mut self, buf: Buffer) -> BufferId {
        let id = BufferId(self.buffers.len() as u32);
        self.buffers.push(buf);
        id
    }
}
