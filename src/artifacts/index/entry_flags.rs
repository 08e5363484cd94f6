use bitflags::bitflags;

bitflags! {
    /// The 16-bit flags word that follows an entry's content hash
    ///
    /// `STAGE` and `NAME_LENGTH` are multi-bit fields; use the accessors
    /// rather than testing them with `contains`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EntryFlags: u16 {
        const ASSUME_VALID = 0x8000;
        const EXTENDED = 0x4000;
        const STAGE = 0x3000;
        const NAME_LENGTH = 0x0fff;
    }
}

bitflags! {
    /// Second flags word, present only when `EntryFlags::EXTENDED` is set
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ExtendedFlags: u16 {
        const RESERVED = 0x8000;
        const SKIP_WORKTREE = 0x4000;
        const INTENT_TO_ADD = 0x2000;
    }
}

/// Name length value meaning "this long or longer"
pub const NAME_LENGTH_SENTINEL: u16 = 0x0fff;

impl EntryFlags {
    /// Merge stage: 0 for a normal entry, 1..=3 during a conflicted merge
    pub fn stage(&self) -> u8 {
        ((self.bits() & Self::STAGE.bits()) >> 12) as u8
    }

    /// Path length as recorded in the flags, capped at the sentinel
    pub fn name_length(&self) -> u16 {
        self.bits() & Self::NAME_LENGTH.bits()
    }

    pub fn is_assume_valid(&self) -> bool {
        self.contains(Self::ASSUME_VALID)
    }

    pub fn is_extended(&self) -> bool {
        self.contains(Self::EXTENDED)
    }

    /// Same flags with the name length bits replaced
    pub fn with_name_length(self, path_len: usize) -> Self {
        let length = path_len.min(usize::from(NAME_LENGTH_SENTINEL)) as u16;
        Self::from_bits_retain((self.bits() & !Self::NAME_LENGTH.bits()) | length)
    }

    pub fn with_stage(self, stage: u8) -> Self {
        let stage = (u16::from(stage) << 12) & Self::STAGE.bits();
        Self::from_bits_retain((self.bits() & !Self::STAGE.bits()) | stage)
    }
}
