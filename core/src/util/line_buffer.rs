/// Per-direction accumulator for bytes that have not yet seen a newline.
///
/// Bytes are buffered raw and decoded one completed line at a time, so a
/// multi-byte UTF-8 sequence split across reads is reassembled before decoding.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(8 * 1024),
        }
    }

    /// Appends a chunk and returns every line it completed, without the `\n`.
    /// A `\r` before it is kept so CRLF traffic is logged as sent.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(pos) = self.pending[start..].iter().position(|&b| b == b'\n') {
            let end = start + pos;
            lines.push(String::from_utf8_lossy(&self.pending[start..end]).into_owned());
            start = end + 1;
        }
        if start > 0 {
            self.pending.drain(..start);
        }
        lines
    }

    /// Takes whatever partial line is left, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
