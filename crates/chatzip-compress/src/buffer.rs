use crate::error::CompressionError;

/// Capacity of a fresh output buffer.
pub(crate) const INITIAL_BUFFER_SIZE: usize = 32;

/// Output buffer that doubles its capacity on demand, optionally bounded.
///
/// With a limit, capacity never grows past `limit + 1`: one byte over is
/// enough to prove the limit was crossed, and nothing more is ever
/// allocated for a hostile stream.
pub(crate) struct GrowableBuffer {
    data: Vec<u8>,
    limit: Option<usize>,
}

impl GrowableBuffer {
    pub(crate) fn unbounded() -> Self {
        Self {
            data: Vec::with_capacity(INITIAL_BUFFER_SIZE),
            limit: None,
        }
    }

    pub(crate) fn bounded(limit: usize) -> Self {
        Self {
            data: Vec::with_capacity(INITIAL_BUFFER_SIZE.min(limit.saturating_add(1))),
            limit: Some(limit),
        }
    }

    /// Make sure at least one byte of spare capacity exists, doubling the
    /// capacity when the buffer is full.
    pub(crate) fn reserve_spare(&mut self) {
        if self.data.len() < self.data.capacity() {
            return;
        }

        let mut target = self.data.capacity().max(INITIAL_BUFFER_SIZE).saturating_mul(2);
        if let Some(limit) = self.limit {
            target = target.min(limit.saturating_add(1));
        }

        // A bounded buffer already at `limit + 1` has failed the limit check;
        // grow by one so callers never spin on a zero-sized window.
        let additional = target.saturating_sub(self.data.len()).max(1);
        self.data.reserve_exact(additional);
    }

    pub(crate) fn spare_len(&self) -> usize {
        self.data.capacity() - self.data.len()
    }

    /// Direct access for engines that write into spare capacity
    /// (`flate2`'s `*_vec` methods).
    pub(crate) fn as_mut_vec(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    pub(crate) fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    /// Fail with [`CompressionError::OutputTooLarge`] once the running total
    /// exceeds the limit.
    pub(crate) fn check_limit(&self) -> Result<(), CompressionError> {
        match self.limit {
            Some(limit) if self.data.len() > limit => Err(CompressionError::OutputTooLarge { limit }),
            _ => Ok(()),
        }
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.data
    }
}
