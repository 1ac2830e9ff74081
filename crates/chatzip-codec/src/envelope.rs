use crate::error::DecodeError;

// Envelope layout, before the radix conversion:
//
//   ┌───────────────┬──────────────────────────────┐
//   │ identifier u8 │ compressed body (0..n bytes) │
//   └───────────────┴──────────────────────────────┘
//
// The identifier is never 0, so the envelope's first byte is also the
// most significant byte of a nonzero integer and survives the trip
// through the big-integer conversion unchanged.

/// Prefix `body` with its compressor identifier.
pub(crate) fn build(id: u8, body: &[u8]) -> Vec<u8> {
    let mut envelope = Vec::with_capacity(body.len() + 1);
    envelope.push(id);
    envelope.extend_from_slice(body);
    envelope
}

/// Split a decoded byte string into identifier and body.
///
/// A single leading `0x00` is treated as padding and skipped. The radix
/// decoder only produces one for a zero-valued segment, where nothing
/// follows it.
pub(crate) fn parse(bytes: &[u8]) -> Result<(u8, &[u8]), DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::MalformedEnvelope);
    }

    let payload = match bytes {
        [0, rest @ ..] => rest,
        _ => bytes,
    };

    match payload {
        [id, body @ ..] => Ok((*id, body)),
        [] => Err(DecodeError::EnvelopeTooSmall),
    }
}
