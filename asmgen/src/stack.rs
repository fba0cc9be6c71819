/// Bytes pushed onto the stack since the function's frame was set up.
///
/// Right after the prologue the stack pointer sits on a 16 byte boundary (return address plus
/// the saved frame pointer), so a depth of zero is aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StackDepth(u32);

impl StackDepth {
    pub const WORD: u32 = 8;
    pub const CALL_ALIGNMENT: u32 = 16;

    pub fn bytes(self) -> u32 {
        self.0
    }

    /// Depth after one more machine word has been pushed.
    pub fn pushed(self) -> Self {
        Self(self.0 + Self::WORD)
    }

    /// Bytes to reserve before a call so the stack pointer is aligned at the call instruction.
    pub fn call_padding(self) -> u32 {
        micc_utils::padding_to(Self::CALL_ALIGNMENT, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_padding() {
        let depth = StackDepth::default();
        assert_eq!(depth.call_padding(), 0);
        assert_eq!(depth.pushed().call_padding(), 8);
        assert_eq!(depth.pushed().pushed().call_padding(), 0);
        assert_eq!(depth.pushed().pushed().pushed().bytes(), 24);
    }
}
