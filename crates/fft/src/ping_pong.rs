//! Ping-pong buffer selection for the butterfly passes.
//!
//! Every butterfly stage reads one buffer and writes the other. Rather than
//! keeping a mutable "which buffer is live" flag inside the engine, each stage
//! takes the currently active buffer and returns the one it wrote, so the
//! alternation is an explicit value threaded through the caller.

/// Which of the two transform buffers holds the most recent result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveBuffer {
    /// The caller's grid.
    Input,
    /// The caller-provided scratch grid.
    Scratch,
}

impl ActiveBuffer {
    /// The buffer a stage writes to when `self` is the one it reads from.
    pub fn other(self) -> Self {
        match self {
            ActiveBuffer::Input => ActiveBuffer::Scratch,
            ActiveBuffer::Scratch => ActiveBuffer::Input,
        }
    }

    /// The active buffer after `stages` alternations starting from `self`.
    pub fn after_stages(self, stages: usize) -> Self {
        if stages % 2 == 0 {
            self
        } else {
            self.other()
        }
    }
}
